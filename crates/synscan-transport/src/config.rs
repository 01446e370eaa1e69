use std::time::Duration;

use crate::error::{Result, TransportError};

/// Default controller address (the mount's own Wi-Fi access point).
pub const DEFAULT_HOST: &str = "192.168.4.1";

/// Default controller UDP port.
pub const DEFAULT_PORT: u16 = 11880;

/// Default wait for a reply datagram.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Environment variable holding the controller host.
pub const ENV_HOST: &str = "SYNSCAN_UDP_IP";
/// Environment variable holding the controller port.
pub const ENV_PORT: &str = "SYNSCAN_UDP_PORT";
/// Environment variable holding the reply timeout (`2s`, `500ms`, `3`).
pub const ENV_TIMEOUT: &str = "SYNSCAN_TIMEOUT";

/// Where the controller lives and how long to wait for it.
///
/// Read once when a transport is constructed; later changes to the
/// environment have no effect on an existing transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Controller host name or IP address.
    pub host: String,
    /// Controller UDP port.
    pub port: u16,
    /// Wait window for a single reply. Default: 2 seconds.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Create a config for an explicit endpoint with the default timeout.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Override the reply timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a config from `SYNSCAN_UDP_IP`, `SYNSCAN_UDP_PORT` and
    /// `SYNSCAN_TIMEOUT`, falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Set-but-unparsable values are errors; they never fall back silently.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_HOST) {
            let host = host.trim();
            if host.is_empty() {
                return Err(TransportError::InvalidConfig {
                    key: ENV_HOST,
                    value: host.to_string(),
                });
            }
            config.host = host.to_string();
        }

        if let Some(port) = lookup(ENV_PORT) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| TransportError::InvalidConfig {
                    key: ENV_PORT,
                    value: port.clone(),
                })?;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            config.timeout =
                parse_duration(&timeout).ok_or_else(|| TransportError::InvalidConfig {
                    key: ENV_TIMEOUT,
                    value: timeout.clone(),
                })?;
        }

        Ok(config)
    }

    /// `host:port` form of the endpoint.
    pub fn endpoint(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Parse `2s`, `500ms` or a bare number of seconds. Zero is rejected.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number.trim().parse().ok()?;
    if value == 0 {
        return None;
    }

    Some(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_controller_access_point() {
        let config = TransportConfig::default();
        assert_eq!(config.host, "192.168.4.1");
        assert_eq!(config.port, 11880);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.endpoint(), "192.168.4.1:11880");
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = TransportConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, TransportConfig::default());
    }

    #[test]
    fn environment_overrides_every_field() {
        let config = TransportConfig::from_lookup(lookup_from(&[
            (ENV_HOST, "10.0.0.7"),
            (ENV_PORT, "4000"),
            (ENV_TIMEOUT, "750ms"),
        ]))
        .unwrap();

        assert_eq!(config.host, "10.0.0.7");
        assert_eq!(config.port, 4000);
        assert_eq!(config.timeout, Duration::from_millis(750));
    }

    #[test]
    fn unparsable_port_is_rejected() {
        let err = TransportConfig::from_lookup(lookup_from(&[(ENV_PORT, "eleven")])).unwrap_err();
        assert!(matches!(
            err,
            TransportError::InvalidConfig {
                key: ENV_PORT,
                ..
            }
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = TransportConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT, "0s")])).unwrap_err();
        assert!(matches!(
            err,
            TransportError::InvalidConfig {
                key: ENV_TIMEOUT,
                ..
            }
        ));
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s"), Some(Duration::from_secs(2)));
        assert_eq!(parse_duration("150ms"), Some(Duration::from_millis(150)));
        assert_eq!(parse_duration("3"), Some(Duration::from_secs(3)));
        assert_eq!(parse_duration("bad"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        let config = TransportConfig::new("::1", 11880);
        assert_eq!(config.endpoint(), "[::1]:11880");
    }
}
