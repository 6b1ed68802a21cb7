use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use core::time::Duration;
use flakegen::{
    CLOCK_SKEW_TOLERANCE_ENV, DEFAULT_CLOCK_SKEW_TOLERANCE_MS, DEFAULT_WAIT_TIMEOUT,
    GeneratorConfig, MACHINE_ID_ENV, SnowflakeId, WAIT_TIMEOUT_ENV,
};

/// Runtime configuration for the `flakegen` binary.
///
/// Generator settings are parsed from CLI arguments or environment
/// variables (a `.env` file is loaded first, if present).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakegen",
    version,
    about = "Generate and decode 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    /// Machine ID embedded in every generated ID (0-1023).
    ///
    /// Must be unique among all processes sharing an ID space.
    ///
    /// Environment variable: `MACHINE_ID`
    #[arg(long, env = MACHINE_ID_ENV, default_value_t = 0)]
    pub machine_id: u16,

    /// Maximum backward clock drift, in milliseconds, absorbed by waiting.
    ///
    /// Environment variable: `CLOCK_SKEW_TOLERANCE_MS`
    #[arg(long, env = CLOCK_SKEW_TOLERANCE_ENV, default_value_t = DEFAULT_CLOCK_SKEW_TOLERANCE_MS)]
    pub clock_skew_tolerance_ms: u64,

    /// Upper bound, in milliseconds, on any single wait for the clock.
    ///
    /// Environment variable: `WAIT_TIMEOUT_MS`
    #[arg(
        long,
        env = WAIT_TIMEOUT_ENV,
        default_value_t = DEFAULT_WAIT_TIMEOUT.as_millis() as u64
    )]
    pub wait_timeout_ms: u64,

    /// Log output format (logs go to stderr).
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print new IDs, one per line.
    Generate {
        /// How many IDs to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Decode IDs into timestamp, machine ID and sequence (JSON lines).
    Parse {
        /// IDs in decimal form.
        #[arg(required = true, value_parser = parse_id)]
        ids: Vec<SnowflakeId>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub generator: GeneratorConfig,
    pub log_format: LogFormat,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.wait_timeout_ms == 0 {
            bail!("WAIT_TIMEOUT_MS must be greater than 0");
        }

        if let Command::Generate { count: 0 } = args.command {
            bail!("--count must be greater than 0");
        }

        let generator = GeneratorConfig::new(args.machine_id)
            .with_clock_skew_tolerance(args.clock_skew_tolerance_ms)
            .with_wait_timeout(Duration::from_millis(args.wait_timeout_ms));
        generator
            .validate()
            .context("invalid generator configuration")?;

        Ok(Self {
            generator,
            log_format: args.log_format,
            command: args.command,
        })
    }
}

fn parse_id(s: &str) -> Result<SnowflakeId, flakegen::ParseIdError> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliConfig> {
        let args = CliArgs::try_parse_from(args.iter().copied())?;
        CliConfig::try_from(args)
    }

    #[test]
    fn generate_defaults() {
        let config = parse(&["flakegen", "generate"]).unwrap();
        assert_eq!(config.command, Command::Generate { count: 1 });
        assert_eq!(config.generator.clock_skew_tolerance, 5);
        assert_eq!(config.generator.wait_timeout, Duration::from_millis(1000));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn wait_timeout_default_matches_library() {
        let args = CliArgs::try_parse_from(["flakegen", "generate"]).unwrap();
        assert_eq!(
            Duration::from_millis(args.wait_timeout_ms),
            DEFAULT_WAIT_TIMEOUT
        );

        let config = CliConfig::try_from(args).unwrap();
        assert_eq!(config.generator.wait_timeout, GeneratorConfig::default().wait_timeout);
    }

    #[test]
    fn generate_with_flags() {
        let config = parse(&[
            "flakegen",
            "--machine-id",
            "42",
            "--clock-skew-tolerance-ms",
            "10",
            "--log-format",
            "json",
            "generate",
            "-n",
            "3",
        ])
        .unwrap();
        assert_eq!(config.generator.machine_id, 42);
        assert_eq!(config.generator.clock_skew_tolerance, 10);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.command, Command::Generate { count: 3 });
    }

    #[test]
    fn rejects_out_of_range_machine_id() {
        let err = parse(&["flakegen", "--machine-id", "1024", "generate"]).unwrap_err();
        assert!(format!("{err:#}").contains("machine id must be between 0 and 1023"));
    }

    #[test]
    fn rejects_zero_count_and_timeout() {
        assert!(parse(&["flakegen", "generate", "--count", "0"]).is_err());
        assert!(parse(&["flakegen", "--wait-timeout-ms", "0", "generate"]).is_err());
    }

    #[test]
    fn parse_command_decodes_ids() {
        let config = parse(&["flakegen", "parse", "0", "18446744073709551615"]).unwrap();
        assert_eq!(
            config.command,
            Command::Parse {
                ids: vec![SnowflakeId::from_raw(0), SnowflakeId::from_raw(u64::MAX)]
            }
        );
    }

    #[test]
    fn parse_command_rejects_bad_ids() {
        assert!(CliArgs::try_parse_from(["flakegen", "parse", "12a"]).is_err());
        assert!(CliArgs::try_parse_from(["flakegen", "parse"]).is_err());
    }
}
