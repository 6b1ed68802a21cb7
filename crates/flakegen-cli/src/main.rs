#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::io::{self, BufWriter, Write};

use clap::Parser;
use config::{CliArgs, CliConfig, Command};
use flakegen::{ParsedId, SnowflakeGenerator, SnowflakeId, SystemClock};
use serde::Serialize;
use telemetry::init_telemetry;
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry(config.log_format)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match &config.command {
        Command::Generate { count } => generate(&config, *count, &mut out)?,
        Command::Parse { ids } => parse(ids, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

fn generate(config: &CliConfig, count: usize, out: &mut impl Write) -> anyhow::Result<()> {
    let generator = SnowflakeGenerator::from_config(&config.generator, SystemClock)?;
    info!(
        machine_id = generator.machine_id(),
        clock_skew_tolerance = generator.clock_skew_tolerance(),
        count,
        "generating ids"
    );

    for _ in 0..count {
        let id = generator.generate()?;
        writeln!(out, "{id}")?;
    }

    debug!(count, "done");
    Ok(())
}

#[derive(Serialize)]
struct ParseOutput {
    id: SnowflakeId,
    #[serde(flatten)]
    parsed: ParsedId,
    valid: bool,
}

fn parse(ids: &[SnowflakeId], out: &mut impl Write) -> anyhow::Result<()> {
    for &id in ids {
        let line = ParseOutput {
            id,
            parsed: id.parse(),
            valid: id.is_valid(),
        };
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_writes_json_lines() {
        let mut out = Vec::new();
        parse(
            &[
                SnowflakeId::from_components(1000, 42, 1),
                SnowflakeId::from_raw(u64::MAX),
            ],
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], "4194476033");
        assert_eq!(lines[0]["timestamp"], 1_767_225_601_000u64);
        assert_eq!(lines[0]["machine_id"], 42);
        assert_eq!(lines[0]["sequence"], 1);
        assert_eq!(lines[0]["valid"], true);
        assert_eq!(lines[1]["valid"], false);
    }

    #[test]
    fn parse_output_is_flat() {
        let id = SnowflakeId::from_components(7, 3, 2);
        let value = serde_json::to_value(ParseOutput {
            id,
            parsed: id.parse(),
            valid: id.is_valid(),
        })
        .unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "id": id.to_string(),
                "timestamp": 1_767_225_600_007u64,
                "machine_id": 3,
                "sequence": 2,
                "valid": true,
            })
        );
    }

    #[test]
    fn generate_writes_increasing_ids() {
        let args = CliArgs::parse_from(["flakegen", "--machine-id", "9", "generate", "-n", "50"]);
        let config = CliConfig::try_from(args).unwrap();

        let mut out = Vec::new();
        generate(&config, 50, &mut out).unwrap();

        let ids: Vec<SnowflakeId> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| l.parse().unwrap())
            .collect();
        assert_eq!(ids.len(), 50);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|id| id.machine_id() == 9));
    }
}
