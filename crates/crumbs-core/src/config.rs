/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` (field names map to upper-case
/// env vars) and then call `Config::from_env()` at startup.
///
/// # Panics
///
/// `from_env` panics if any required env var is missing or cannot be
/// deserialized. Use `try_from_env` to handle the error instead.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        Self::try_from_env().expect("failed to load config from environment")
    }

    fn try_from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load from an explicit list of `(KEY, value)` pairs. Used by tests.
    fn from_pairs<I>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(pairs)
    }
}

/// Split a comma-separated env value into trimmed, non-empty items.
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
