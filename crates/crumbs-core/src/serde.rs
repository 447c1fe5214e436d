// Module name shadows the `serde` crate; use `::serde` for the external one.
use ::serde::{Deserialize, Deserializer, Serializer};
use chrono::{DateTime, SecondsFormat, Utc};

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Same as [`to_rfc3339_ms`] for optional timestamps (`None` → `null`).
pub fn to_rfc3339_ms_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => to_rfc3339_ms(dt, s),
        None => s.serialize_none(),
    }
}

/// Deserialize a field that is present in the payload as `Some(value)`,
/// including an explicit `null` as `Some(None)`.
///
/// Pair with `#[serde(default)]` so an absent field stays `None`:
///
/// ```ignore
/// #[serde(default, deserialize_with = "crumbs_core::serde::deserialize_some")]
/// pub notes: Option<Option<String>>,
/// ```
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
