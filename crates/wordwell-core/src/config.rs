/// Loads a service's configuration struct from environment variables.
///
/// Derive `serde::Deserialize` on the config struct and implement this
/// trait (no methods required); `Config::from_env()` then maps field names
/// to upper-cased env vars via `envy`.
///
/// # Panics
///
/// Panics if a required env var is missing or fails to deserialize —
/// services are expected to die loudly at startup on bad configuration.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        envy::from_env().expect("failed to load config from environment")
    }
}
