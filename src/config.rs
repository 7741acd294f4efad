//! Runtime configuration.
//!
//! Everything the service needs at startup lives in one [`Config`] value that
//! is handed to [`app`](crate::app) and [`Server::new`](crate::Server::new).
//! Nothing is read from the environment after startup.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `TOLLGATE_ADDR` | `0.0.0.0:8080` | listen address |
//! | `TOLLGATE_AUTH_TOKEN` | `123` | value the `Authorization` header must equal |

use std::net::{Ipv4Addr, SocketAddr};

use crate::error::Error;
use crate::middleware::auth::DEFAULT_TOKEN;

pub const ADDR_VAR: &str = "TOLLGATE_ADDR";
pub const AUTH_TOKEN_VAR: &str = "TOLLGATE_AUTH_TOKEN";

const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Address the listener binds to.
    pub addr: SocketAddr,
    /// Token every request must present in `Authorization`.
    pub auth_token: String,
}

impl Config {
    /// Defaults overridden by `TOLLGATE_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Config::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();

        if let Some(addr) = lookup(ADDR_VAR) {
            config.addr = addr.parse().map_err(|e| Error::addr(&addr, e))?;
        }
        if let Some(token) = lookup(AUTH_TOKEN_VAR) {
            config.auth_token = token;
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            auth_token: DEFAULT_TOKEN.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.auth_token, "123");
    }

    #[test]
    fn overrides_from_variables() {
        let config = Config::from_lookup(|key| match key {
            ADDR_VAR => Some("127.0.0.1:9000".to_owned()),
            AUTH_TOKEN_VAR => Some("s3cret".to_owned()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.auth_token, "s3cret");
    }

    #[test]
    fn rejects_bad_address() {
        let err = Config::from_lookup(|key| (key == ADDR_VAR).then(|| ":8080".to_owned()))
            .unwrap_err();

        assert!(matches!(err, Error::Addr { ref value, .. } if value == ":8080"));
        assert!(err.to_string().contains("invalid listen address"));
    }
}
