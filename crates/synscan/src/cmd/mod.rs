use clap::{Args, Subcommand};
use synscan_transport::config::{parse_duration, ENV_HOST, ENV_PORT, ENV_TIMEOUT};
use synscan_transport::{TransportConfig, DEFAULT_HOST, DEFAULT_PORT};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod envinfo;
pub mod probe;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the controller whether it has finished initializing.
    Probe(ProbeArgs),
    /// Send one command and print the decoded reply.
    Send(SendArgs),
    /// Convert a number to synscan hex.
    Encode(EncodeArgs),
    /// Convert a synscan hex payload to a number.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Probe(args) => probe::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

/// Controller endpoint flags shared by every networked subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConnArgs {
    /// Controller host or IP address.
    #[arg(long, env = ENV_HOST, default_value = DEFAULT_HOST)]
    pub host: String,
    /// Controller UDP port.
    #[arg(long, env = ENV_PORT, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Reply timeout (e.g. 2s, 500ms).
    #[arg(long, env = ENV_TIMEOUT, default_value = "2s")]
    pub timeout: String,
}

impl ConnArgs {
    pub fn to_config(&self) -> CliResult<TransportConfig> {
        let timeout = parse_duration(&self.timeout).ok_or_else(|| {
            CliError::new(USAGE, format!("invalid --timeout value: {}", self.timeout))
        })?;
        Ok(TransportConfig::new(self.host.clone(), self.port).with_timeout(timeout))
    }
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub conn: ConnArgs,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Command letter (e.g. j, f, G).
    pub command: char,
    /// Axis digit (1 or 2).
    pub axis: char,
    /// Payload value, decimal or 0x-prefixed hex.
    #[arg(long, value_parser = parse_value)]
    pub value: Option<u32>,
    /// Payload width in hex digits (0, 2, 4 or 6). Ignored without --value.
    #[arg(long, default_value_t = 6)]
    pub width: usize,
    #[command(flatten)]
    pub conn: ConnArgs,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Value to encode, decimal or 0x-prefixed hex.
    #[arg(value_parser = parse_value)]
    pub value: u32,
    /// Width in hex digits (2, 4 or 6).
    #[arg(long, default_value_t = 6)]
    pub width: usize,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Synscan hex payload (0, 2, 3, 4 or 6 digits).
    #[arg(allow_hyphen_values = true)]
    pub payload: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}

/// Parse a decimal or `0x`-prefixed hexadecimal `u32`.
pub fn parse_value(input: &str) -> Result<u32, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|err| format!("invalid value {input:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn parse_value_decimal_and_hex() {
        assert_eq!(parse_value("24378"), Ok(0x5F3A));
        assert_eq!(parse_value("0x1FCA89"), Ok(0x1FCA89));
        assert_eq!(parse_value("0Xb8"), Ok(0xB8));
        assert!(parse_value("0x").is_err());
        assert!(parse_value("-1").is_err());
    }

    #[test]
    fn conn_args_build_transport_config() {
        let conn = ConnArgs {
            host: "10.0.0.2".to_string(),
            port: 4000,
            timeout: "250ms".to_string(),
        };
        let config = conn.to_config().unwrap();
        assert_eq!(config.endpoint(), "10.0.0.2:4000");
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn conn_args_reject_bad_timeout() {
        let conn = ConnArgs {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: "soon".to_string(),
        };
        assert_eq!(conn.to_config().unwrap_err().code, USAGE);
    }
}
