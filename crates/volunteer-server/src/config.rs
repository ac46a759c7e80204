//! Server configuration from command-line flags and environment variables

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which persistence backend the record store runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// One pretty-printed JSON file per collection in the data directory
    Json,
    /// Single SQLite database file
    Sqlite,
    /// Process memory only, lost on restart
    Memory,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "volunteer-server", version, about = "Volunteer, event and service hours tracker")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
    pub bind_address: String,

    /// Port override for the bind address
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory holding the collection files
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long = "storage", env = "STORAGE_BACKEND", value_enum, default_value = "json")]
    pub storage: StorageKind,

    /// SQLite database file, defaults to `<data-dir>/volunteers.db`
    #[arg(long, env = "DATABASE_PATH")]
    pub database_path: Option<PathBuf>,

    /// Directory served as the web frontend
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    #[arg(long, env = "ADMIN_USER", default_value = "admin")]
    pub admin_user: String,

    /// Plain admin password, hashed at startup
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Argon2 PHC hash of the admin password, preferred over the plain form
    #[arg(long, env = "ADMIN_PASSWORD_HASH", hide_env_values = true)]
    pub admin_password_hash: Option<String>,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let mut addr: SocketAddr = self
            .bind_address
            .parse()
            .with_context(|| format!("Failed to parse bind address {}", self.bind_address))?;
        if let Some(port) = self.port {
            addr.set_port(port);
        }
        Ok(addr)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("volunteers.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_follows_data_dir() {
        let config =
            ServerConfig::try_parse_from(["volunteer-server", "--data-dir", "/srv/volunteers"])
                .unwrap();
        assert_eq!(config.storage, StorageKind::Json);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/srv/volunteers").join("volunteers.db")
        );
    }

    #[test]
    fn test_port_overrides_bind_address() {
        let config = ServerConfig::try_parse_from([
            "volunteer-server",
            "--bind-address",
            "127.0.0.1:3000",
            "--port",
            "8080",
            "--storage",
            "sqlite",
        ])
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.storage, StorageKind::Sqlite);
    }

    #[test]
    fn test_bad_bind_address() {
        let config =
            ServerConfig::try_parse_from(["volunteer-server", "--bind-address", "nowhere"]).unwrap();
        assert!(config.socket_addr().is_err());
    }
}
