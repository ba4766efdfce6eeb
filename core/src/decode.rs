//! Decoding of response envelopes and entity mappings.
//!
//! # Design
//! Every entity field carries its decoding policy as a serde attribute, so
//! the policy of a field is read off its declaration:
//!
//! - tolerant scalar: a plain `Option<T>`. A missing key or `null` is `None`.
//! - strict timestamp: `#[serde(with = "epoch_seconds")]` on a
//!   `DateTime<Utc>`. A missing or `null` key fails the whole entity.
//! - lenient timestamp: `#[serde(default, with = "epoch_seconds::option")]`
//!   on an `Option<DateTime<Utc>>`.
//! - strict nested entity: `#[serde(deserialize_with = "mapping::deserialize")]`
//!   on a `User` field. Missing or non-mapping fails.
//! - optional collection: `#[serde(default, deserialize_with = "mapping::list")]`
//!   on a `Vec<_>`. Absent is empty; every element must be a mapping.
//! - opaque integer: `deserialize_with = "opaque_int::deserialize"`.
//!
//! The stock entities keep scalars tolerant and timestamps/nested entities
//! strict: a response missing a timestamp is treated as malformed.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// An entity decoded from one mapping of an API response.
pub trait ApiEntity: DeserializeOwned {
    /// Entity name used in `ApiError::InvalidEntity`.
    const NAME: &'static str;

    /// Builds the entity from a decoded mapping.
    fn from_api(value: &Value) -> Result<Self, ApiError> {
        if !value.is_object() {
            return Err(ApiError::InvalidEntity {
                entity: Self::NAME,
                reason: format!("expected a mapping, got {value}"),
            });
        }
        Self::deserialize(value).map_err(|e| ApiError::InvalidEntity {
            entity: Self::NAME,
            reason: e.to_string(),
        })
    }

    /// Re-populates `self` from a decoded mapping. On error `self` is left
    /// untouched.
    fn import_from_api(&mut self, value: &Value) -> Result<(), ApiError> {
        *self = Self::from_api(value)?;
        Ok(())
    }
}

/// Parses `body` and takes the single top-level `key` out of the envelope.
pub fn envelope(body: &str, key: &str) -> Result<Value, ApiError> {
    let parsed: Value =
        serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    let Value::Object(mut map) = parsed else {
        return Err(ApiError::DeserializationError(
            "response envelope is not a JSON object".to_string(),
        ));
    };
    map.remove(key).ok_or_else(|| ApiError::MissingField(key.to_string()))
}

/// Returns the nested value under `key`, failing if the key is absent.
pub fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value, ApiError> {
    value.get(key).ok_or_else(|| ApiError::MissingField(key.to_string()))
}

/// Items of an envelope value that must be an array, in response order.
pub fn items<'a>(value: &'a Value, key: &str) -> Result<&'a [Value], ApiError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ApiError::DeserializationError(format!("`{key}` is not an array")))
}

/// Decodes every element of the array under envelope `key`.
pub fn decode_list<T: ApiEntity>(body: &str, key: &str) -> Result<Vec<T>, ApiError> {
    let value = envelope(body, key)?;
    items(&value, key)?.iter().map(T::from_api).collect()
}

/// Decodes the single mapping under envelope `key`.
pub fn decode_one<T: ApiEntity>(body: &str, key: &str) -> Result<T, ApiError> {
    T::from_api(&envelope(body, key)?)
}

/// Converts epoch seconds (fractional allowed) to a UTC timestamp, rounded
/// to the microsecond.
pub fn from_epoch(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let micros = ((seconds - whole) * 1_000_000.0).round() as u32;
    let (whole, micros) = if micros >= 1_000_000 {
        (whole + 1.0, 0)
    } else {
        (whole, micros)
    };
    DateTime::from_timestamp(whole as i64, micros * 1_000)
}

/// Strict epoch-seconds codec for `DateTime<Utc>` fields.
pub mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        let micros = ts.timestamp_subsec_micros();
        if micros == 0 {
            serializer.serialize_i64(ts.timestamp())
        } else {
            serializer.serialize_f64(ts.timestamp() as f64 + f64::from(micros) / 1_000_000.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let seconds = f64::deserialize(deserializer)?;
        super::from_epoch(seconds)
            .ok_or_else(|| D::Error::custom(format!("timestamp {seconds} is out of range")))
    }

    /// Lenient variant: missing or `null` decodes to `None`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => super::serialize(ts, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<f64>::deserialize(deserializer)? {
                Some(seconds) => crate::decode::from_epoch(seconds)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("timestamp {seconds} is out of range"))),
                None => Ok(None),
            }
        }
    }
}

/// Nested entities that must arrive as JSON objects.
///
/// serde's derived structs also accept a sequence of field values; these
/// helpers decode through `serde_json::Map` first so only mappings pass.
pub mod mapping {
    use serde::de::{DeserializeOwned, Error as _};
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        T::deserialize(Value::Object(map)).map_err(D::Error::custom)
    }

    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Vec::<Map<String, Value>>::deserialize(deserializer)?
            .into_iter()
            .map(|map| T::deserialize(Value::Object(map)).map_err(D::Error::custom))
            .collect()
    }
}

/// Integer-valued flags the API may send as a number or a boolean.
pub mod opaque_int {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(i64::from(flag))),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("{n} is not an integer"))),
            Some(other) => Err(D::Error::custom(format!(
                "expected an integer or boolean, got {other}"
            ))),
        }
    }
}
