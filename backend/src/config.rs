use std::env;

/// Runtime configuration, read once at startup from environment variables.
/// Every key has a default so the service comes up without any setup on a
/// fresh front-desk machine.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_host: String,
    pub bind_port: u16,
    /// Path of the SQLite file backing the record store.
    pub database_path: String,
    /// Base URL of the remote relay service, e.g. `http://192.168.0.10:3001`.
    pub relay_endpoint: String,
    /// Upper bound on a single relay request; an unreachable relay must not
    /// stall the background forward task.
    pub relay_timeout_secs: u64,
    /// When set, a confirmed relay transitions the stored record from SENT
    /// to COMPLETED. Off by default: the record keeps SENT regardless of
    /// the relay outcome.
    pub relay_confirms_completion: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_host = env::var("BIND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let bind_port = env::var("BIND_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8080);
        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "contracts.sqlite".to_string());
        let relay_endpoint =
            env::var("RELAY_ENDPOINT").unwrap_or_else(|_| "http://127.0.0.1:3001".to_string());
        let relay_timeout_secs = env::var("RELAY_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(5);
        let relay_confirms_completion = env::var("RELAY_CONFIRMS_COMPLETION")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Self {
            bind_host,
            bind_port,
            database_path,
            relay_endpoint,
            relay_timeout_secs,
            relay_confirms_completion,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    raw == "1" || raw.eq_ignore_ascii_case("true")
}
