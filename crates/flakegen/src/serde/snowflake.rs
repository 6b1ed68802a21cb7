use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SnowflakeId;

/// IDs serialize as their canonical decimal string, the form collaborators
/// store and transmit. JSON numbers lose precision past 2^53, strings don't.
impl Serialize for SnowflakeId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal id string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}

pub mod as_native_snow {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::SnowflakeId;

    /// Serialize an ID as its native `u64`, for binary formats.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native `u64`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The value has the reserved high bit set
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = SnowflakeId::from_raw(u64::deserialize(d)?);
        if !id.is_valid() {
            return Err(serde::de::Error::custom(format_args!(
                "id {} sets the reserved bit",
                id.to_raw()
            )));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeneratorConfig, ParsedId};
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Message {
        id: SnowflakeId,
        channel_id: SnowflakeId,
    }

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "as_native_snow")]
        id: SnowflakeId,
    }

    #[test]
    fn ids_serialize_as_decimal_strings() {
        let msg = Message {
            id: SnowflakeId::from_raw(u64::MAX),
            channel_id: SnowflakeId::from_components(1000, 42, 1),
        };

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({ "id": "18446744073709551615", "channel_id": "4194476033" })
        );

        let back: Message = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn decimal_deserialize_rejects_numbers_and_garbage() {
        assert!(serde_json::from_str::<SnowflakeId>("42").is_err());
        assert!(serde_json::from_str::<SnowflakeId>("\"4x2\"").is_err());
        assert!(serde_json::from_str::<SnowflakeId>("\"18446744073709551616\"").is_err());
    }

    #[test]
    fn native_snow_roundtrip() {
        let row = Row {
            id: SnowflakeId::from_components(77, 3, 9),
        };
        let s = serde_json::to_string(&row).unwrap();
        assert_eq!(s, format!("{{\"id\":{}}}", row.id.to_raw()));
        assert_eq!(serde_json::from_str::<Row>(&s).unwrap(), row);
    }

    #[test]
    fn native_snow_rejects_reserved_bit() {
        let s = format!("{{\"id\":{}}}", u64::MAX);
        let err = serde_json::from_str::<Row>(&s).unwrap_err();
        assert!(err.to_string().contains("reserved bit"));
    }

    #[test]
    fn parsed_id_and_config_serialize() {
        let parsed = ParsedId {
            timestamp: 1_767_225_601_000,
            machine_id: 42,
            sequence: 1,
        };
        assert_eq!(
            serde_json::to_value(parsed).unwrap(),
            json!({ "timestamp": 1_767_225_601_000u64, "machine_id": 42, "sequence": 1 })
        );

        let config = GeneratorConfig::new(8);
        let value = serde_json::to_value(config).unwrap();
        assert_eq!(value["machine_id"], 8);
        assert_eq!(value["clock_skew_tolerance"], 5);
    }
}
