use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Which todo store the process talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb {
        table: String,
        /// Endpoint override, e.g. DynamoDB Local.
        endpoint: Option<String>,
        region: Option<String>,
    },
    /// Process local store. Contents are lost on exit.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub host: IpAddr,
    pub port: u16,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("STORE_BACKEND").as_deref() {
            None | Some("dynamodb") => StoreBackend::DynamoDb {
                // No fallback table: the deployment has to say where the data lives.
                table: lookup("DYNAMODB_TABLE")
                    .filter(|t| !t.is_empty())
                    .ok_or(ConfigError::Missing("DYNAMODB_TABLE"))?,
                endpoint: lookup("DYNAMODB_ENDPOINT").filter(|e| !e.is_empty()),
                region: lookup("AWS_REGION").filter(|r| !r.is_empty()),
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let host = match lookup("HOST") {
            Some(value) => value.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                name: "HOST",
                value,
            })?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => 3000,
        };

        Ok(Config {
            store,
            host,
            port,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
