//! Environment-driven server configuration, read once at startup.

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8450";
const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to (`TASKDECK_BIND_ADDR`).
    pub bind_addr: String,
    /// Directory holding the SQLite database (`TASKDECK_DATA_DIR`).
    pub data_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("TASKDECK_BIND_ADDR", DEFAULT_BIND_ADDR),
            data_dir: env_or("TASKDECK_DATA_DIR", DEFAULT_DATA_DIR),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
