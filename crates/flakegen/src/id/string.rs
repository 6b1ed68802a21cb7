use core::str::FromStr;

use crate::SnowflakeId;

/// Errors that can occur while decoding an ID from its decimal string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ParseIdError {
    /// The input was empty.
    #[error("empty id string")]
    Empty,

    /// The input contained something other than an ASCII digit.
    #[error("invalid character {found:?} at byte {index}")]
    InvalidDigit { index: usize, found: char },

    /// The value does not fit in 64 bits.
    #[error("id exceeds 64 bits")]
    Overflow,
}

impl FromStr for SnowflakeId {
    type Err = ParseIdError;

    /// Parses the canonical decimal form. Only ASCII digits are accepted: no
    /// sign, whitespace or separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseIdError::Empty);
        }

        let mut raw: u64 = 0;
        for (index, c) in s.char_indices() {
            let digit = c
                .to_digit(10)
                .ok_or(ParseIdError::InvalidDigit { index, found: c })?;
            raw = raw
                .checked_mul(10)
                .and_then(|r| r.checked_add(u64::from(digit)))
                .ok_or(ParseIdError::Overflow)?;
        }

        Ok(Self::from_raw(raw))
    }
}

/// Renders `id` in its canonical decimal form.
pub fn id_to_string(id: SnowflakeId) -> String {
    id.to_string()
}

/// Parses an ID from its canonical decimal form.
///
/// # Errors
///
/// Returns [`ParseIdError`] if the input is empty, contains a non-digit, or
/// does not fit in 64 bits.
pub fn string_to_id(s: &str) -> Result<SnowflakeId, ParseIdError> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_boundaries() {
        for raw in [0, 489_626_271_744_012_345, u64::MAX] {
            let id = SnowflakeId::from_raw(raw);
            let s = id_to_string(id);
            assert_eq!(s, raw.to_string());
            assert_eq!(string_to_id(&s), Ok(id));
        }
    }

    #[test]
    fn max_value_text() {
        let id: SnowflakeId = "18446744073709551615".parse().unwrap();
        assert_eq!(id.to_raw(), u64::MAX);
    }

    #[test]
    fn rejects_overflow() {
        assert_eq!(
            "18446744073709551616".parse::<SnowflakeId>(),
            Err(ParseIdError::Overflow)
        );
        assert_eq!(
            "99999999999999999999999".parse::<SnowflakeId>(),
            Err(ParseIdError::Overflow)
        );
    }

    #[test]
    fn rejects_non_canonical_input() {
        assert_eq!(string_to_id(""), Err(ParseIdError::Empty));
        assert_eq!(
            string_to_id("+12"),
            Err(ParseIdError::InvalidDigit {
                index: 0,
                found: '+'
            })
        );
        assert_eq!(
            string_to_id("-1"),
            Err(ParseIdError::InvalidDigit {
                index: 0,
                found: '-'
            })
        );
        assert_eq!(
            string_to_id("12 "),
            Err(ParseIdError::InvalidDigit {
                index: 2,
                found: ' '
            })
        );
        assert_eq!(
            string_to_id("1.5e3"),
            Err(ParseIdError::InvalidDigit {
                index: 1,
                found: '.'
            })
        );
    }

    #[test]
    fn leading_zeros_parse() {
        assert_eq!(string_to_id("0007"), Ok(SnowflakeId::from_raw(7)));
    }
}
