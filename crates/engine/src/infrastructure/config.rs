//! Runtime configuration read from the environment.

pub const DATABASE_URL_VAR: &str = "FIELDREG_DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "FIELDREG_MAX_CONNECTIONS";

const DEFAULT_DATABASE_URL: &str = "sqlite:fieldreg.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// sqlx connection string, e.g. `sqlite:fieldreg.db?mode=rwc`
    pub database_url: String,
    /// Pool size; the engine is single-connection by default
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing, blank or unparsable values fall
    /// back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let database_url = lookup(DATABASE_URL_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.database_url);

        let max_connections = match lookup(MAX_CONNECTIONS_VAR) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "Ignoring invalid {}, using {}",
                        MAX_CONNECTIONS_VAR,
                        defaults.max_connections
                    );
                    defaults.max_connections
                }
            },
            None => defaults.max_connections,
        };

        Self {
            database_url,
            max_connections,
        }
    }
}
