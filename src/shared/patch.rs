//! Explicit-presence field updates
//!
//! Update requests distinguish three states per nullable field:
//!
//! | JSON            | Rust              | meaning           |
//! |-----------------|-------------------|-------------------|
//! | field absent    | `None`            | leave unchanged   |
//! | `"field": null` | `Some(None)`      | clear the value   |
//! | `"field": v`    | `Some(Some(v))`   | set the value     |
//!
//! Non-nullable fields use a plain `Option<T>`: absent leaves the stored value
//! alone, and any present value (including an empty string) is applied.

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable field so that `null` is kept apart from "absent".
///
/// Use together with `#[serde(default)]`; serde only calls this function when
/// the key is present, so a missing key falls back to `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Apply a plain optional update to a non-nullable value.
pub fn apply<T>(target: &mut T, update: Option<T>) {
    if let Some(value) = update {
        *target = value;
    }
}

/// Apply an explicit-presence update to a nullable value.
pub fn apply_nullable<T>(target: &mut Option<T>, update: Option<Option<T>>) {
    if let Some(value) = update {
        *target = value;
    }
}
