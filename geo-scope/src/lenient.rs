//! Forgiving field deserializers.
//!
//! Upstream documents are loosely validated, so a field holding the wrong JSON
//! type must read as absent instead of rejecting the whole record. The raw
//! value is not lost: records restore it into their `extra` map under the
//! same key, so a record serializes back to what was read.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::Extra;

/// Deserialize an optional field, mapping any shape mismatch to `None`.
pub(crate) fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// A record whose unmodelled keys live in a flattened map.
pub(crate) trait Passthrough: Serialize {
    fn extra_mut(&mut self) -> &mut Extra;
}

/// Run the derived deserializer, then put back every raw key that the typed
/// fields dropped (wrong type or null).
pub(crate) fn restore<'de, D, T, F>(deserializer: D, derived: F) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Passthrough,
    F: FnOnce(Value) -> Result<T, serde_json::Error>,
{
    let raw = Value::deserialize(deserializer)?;
    let mut record = derived(raw.clone()).map_err(D::Error::custom)?;

    if let Value::Object(raw) = raw {
        let kept = serde_json::to_value(&record).map_err(D::Error::custom)?;
        for (key, value) in raw {
            if kept.get(&key).is_none() {
                record.extra_mut().insert(key, value);
            }
        }
    }
    Ok(record)
}

/// Implement `Serialize`, `Deserialize` and [`Passthrough`] for records that
/// derive with `#[serde(remote = "Self")]` and carry an `extra` map.
macro_rules! passthrough {
    ($($record:ty),+ $(,)?) => {$(
        impl $crate::lenient::Passthrough for $record {
            fn extra_mut(&mut self) -> &mut $crate::types::Extra {
                &mut self.extra
            }
        }

        impl ::serde::Serialize for $record {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                <$record>::serialize(self, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $record {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::lenient::restore(deserializer, |value| <$record>::deserialize(value))
            }
        }
    )+};
}

pub(crate) use passthrough;
