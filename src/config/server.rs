use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Zone every "today" is rendered in unless configured otherwise. One zone
/// per deployment, not per user.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Ho_Chi_Minh;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Named zone all "today" calculations are anchored to. One zone for the
    /// whole deployment, not per user.
    pub timezone: Tz,
}

/// Optional `tally.toml` overlay in the data directory. Every field falls
/// back to the built-in default when absent.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timezone: Option<String>,
}

impl ServerConfig {
    /// Builds a config rooted at `data_dir`, applying `<data_dir>/tally.toml`
    /// when it exists.
    pub fn load(data_dir: PathBuf) -> Result<Self> {
        let mut config = Self {
            data_dir,
            ..Self::default()
        };

        let path = config.config_path();
        if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let file: FileConfig = toml::from_str(&raw)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
            config.apply(file)?;
        }

        Ok(config)
    }

    pub fn apply(&mut self, file: FileConfig) -> Result<()> {
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(timezone) = file.timezone {
            self.timezone = parse_timezone(&timezone)?;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address: {e}")))
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("tally.db")
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("tally.toml")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|e| Error::Config(format!("invalid timezone '{name}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_overlays_defaults() {
        let file: FileConfig =
            toml::from_str("port = 9000\ntimezone = \"America/New_York\"").unwrap();
        let mut config = ServerConfig::default();
        config.apply(file).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.timezone, chrono_tz::America::New_York);
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let mut config = ServerConfig::default();
        let file = FileConfig {
            timezone: Some("Atlantis/Lost_City".to_string()),
            ..FileConfig::default()
        };
        assert!(config.apply(file).is_err());
    }

    #[test]
    fn test_db_path_under_data_dir() {
        let config = ServerConfig {
            data_dir: PathBuf::from("/tmp/tally"),
            ..ServerConfig::default()
        };
        assert_eq!(config.db_path(), PathBuf::from("/tmp/tally/tally.db"));
    }
}
