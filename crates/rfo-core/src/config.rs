//! Environment-variable configuration, shared by client and server.
//!
//! Matches the original `init_client`/`main` env lookups exactly: both
//! variables are optional, both fall back to a fixed default, and a present
//! but non-numeric `serverport15440` is tolerated the same way `atoi` is
//! (it decays to `0`, reproduced here as a `0` fallback rather than a parse
//! error, since the original never validates the variable either).

use std::env;

/// `server15440`'s default value when the variable is unset.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// `serverport15440`'s default value when the variable is unset.
pub const DEFAULT_PORT: u16 = 15440;

/// Resolved client-side connection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Host or address to connect to.
    pub host: String,
    /// TCP port to connect to.
    pub port: u16,
}

impl RemoteConfig {
    /// Reads `server15440` and `serverport15440` from the process
    /// environment, falling back to [`DEFAULT_HOST`]/[`DEFAULT_PORT`].
    #[must_use]
    pub fn from_env() -> Self {
        let host = env::var("server15440").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("serverport15440")
            .ok()
            .map(|raw| raw.trim().parse::<u16>().unwrap_or(0))
            .unwrap_or(DEFAULT_PORT);
        tracing::debug!(target: "rfo", host = %host, port, "resolved remote config");
        Self { host, port }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT }
    }
}

/// The server only cares about the port; it always binds `INADDR_ANY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port to listen on.
    pub port: u16,
}

impl ServerConfig {
    /// Reads `serverport15440` from the process environment, falling back
    /// to [`DEFAULT_PORT`].
    #[must_use]
    pub fn from_env() -> Self {
        let port = env::var("serverport15440")
            .ok()
            .map(|raw| raw.trim().parse::<u16>().unwrap_or(0))
            .unwrap_or(DEFAULT_PORT);
        tracing::debug!(target: "rfo", port, "resolved server config");
        Self { port }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        assert_eq!(DEFAULT_HOST, "127.0.0.1");
        assert_eq!(DEFAULT_PORT, 15440);
    }

    #[test]
    fn remote_config_default_matches_documented_defaults() {
        let cfg = RemoteConfig::default();
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }
}
