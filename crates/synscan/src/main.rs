mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "synscan", version, about = "Skywatcher Synscan motor-controller CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "SYNSCAN_LOGGING_LEVEL",
        default_value = "info",
        ignore_case = true,
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "synscan",
            "send",
            "G",
            "1",
            "--value",
            "0x30",
            "--width",
            "2",
            "--host",
            "127.0.0.1",
        ])
        .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.command, 'G');
                assert_eq!(args.axis, '1');
                assert_eq!(args.value, Some(0x30));
                assert_eq!(args.width, 2);
                assert_eq!(args.conn.host, "127.0.0.1");
            }
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unparsable_value() {
        let err = Cli::try_parse_from(["synscan", "send", "S", "1", "--value", "lots"])
            .expect_err("bad value should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_probe_with_timeout() {
        let cli = Cli::try_parse_from(["synscan", "probe", "--port", "4000", "--timeout", "3s"])
            .expect("probe args should parse");
        match cli.command {
            Command::Probe(args) => {
                assert_eq!(args.conn.port, 4000);
                assert_eq!(args.conn.timeout, "3s");
            }
            other => panic!("expected probe, got {other:?}"),
        }
    }

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from(["synscan", "decode", "89CA1F"])
            .expect("decode args should parse");
        assert!(matches!(cli.command, Command::Decode(_)));
    }
}
