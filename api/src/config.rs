use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Server configuration, read from `HOST` and `PORT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env::var("HOST").ok(), env::var("PORT").ok())
    }

    /// Invalid values are logged and replaced by the defaults.
    pub fn from_vars(host: Option<String>, port: Option<String>) -> Self {
        Self {
            host: parse_or_default("HOST", host, DEFAULT_HOST),
            port: parse_or_default("PORT", port, DEFAULT_PORT),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or_default<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match raw {
        Some(raw) => match T::from_str(&raw) {
            Ok(value) => {
                info!("Using {} {} from environment variable {}.", name, value, name);
                value
            }
            Err(_) => {
                warn!(
                    "Invalid {} value '{}' in environment variable. Using default {}.",
                    name, raw, default
                );
                default
            }
        },
        None => {
            info!(
                "{} environment variable not set. Using default {}.",
                name, default
            );
            default
        }
    }
}
