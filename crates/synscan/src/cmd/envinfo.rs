use std::collections::BTreeMap;

use serde::Serialize;
use synscan_transport::config::{ENV_HOST, ENV_PORT, ENV_TIMEOUT};
use synscan_transport::TransportConfig;

use crate::cmd::EnvinfoArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

const ENV_LOG_LEVEL: &str = "SYNSCAN_LOGGING_LEVEL";

#[derive(Serialize)]
struct PlatformInfo {
    os: String,
    arch: String,
}

#[derive(Serialize)]
struct ResolvedConfig {
    host: String,
    port: u16,
    timeout_ms: u128,
}

#[derive(Serialize)]
struct EnvInfoOutput {
    version: String,
    target: String,
    platform: PlatformInfo,
    features: Vec<String>,
    environment: BTreeMap<String, Option<String>>,
    config: ResolvedConfig,
}

pub fn run(_args: EnvinfoArgs, format: OutputFormat) -> CliResult<i32> {
    let mut env = BTreeMap::new();
    for key in [ENV_HOST, ENV_PORT, ENV_TIMEOUT, ENV_LOG_LEVEL] {
        env.insert(key.to_string(), std::env::var(key).ok());
    }

    let config = TransportConfig::from_env()
        .map_err(|err| transport_error("invalid environment", err))?;

    let output = EnvInfoOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        target: target_triple(),
        platform: PlatformInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        },
        features: active_features(),
        environment: env,
        config: ResolvedConfig {
            host: config.host,
            port: config.port,
            timeout_ms: config.timeout.as_millis(),
        },
    };

    print_envinfo(&output, format);
    Ok(SUCCESS)
}

pub(crate) fn target_triple() -> String {
    if let Some(target) = option_env!("SYNSCAN_BUILD_TARGET") {
        return target.to_string();
    }

    match (std::env::consts::ARCH, std::env::consts::OS) {
        ("aarch64", "macos") => "aarch64-apple-darwin".to_string(),
        ("x86_64", "macos") => "x86_64-apple-darwin".to_string(),
        ("aarch64", "linux") => "aarch64-unknown-linux-gnu".to_string(),
        ("x86_64", "linux") => "x86_64-unknown-linux-gnu".to_string(),
        ("x86_64", "windows") => "x86_64-pc-windows-msvc".to_string(),
        (arch, os) => format!("{arch}-unknown-{os}"),
    }
}

fn print_envinfo(output: &EnvInfoOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("synscan environment\n");
            println!("  Version:    {}", output.version);
            println!("  Target:     {}", output.target);
            println!(
                "  Platform:   {} ({})",
                output.platform.os, output.platform.arch
            );
            println!("  Features:   {}", output.features.join(", "));
            println!("\n  Environment:");
            for (k, v) in &output.environment {
                println!("    {:<24} {}", k, v.as_deref().unwrap_or("(not set)"));
            }
            println!("\n  Controller:");
            println!(
                "    {:<24} {}:{}",
                "endpoint", output.config.host, output.config.port
            );
            println!("    {:<24} {}ms", "timeout", output.config.timeout_ms);
        }
        OutputFormat::Raw => println!("{}", output.version),
    }
}

fn active_features() -> Vec<String> {
    let mut features = Vec::new();
    if cfg!(feature = "async") {
        features.push("async".to_string());
    }
    if cfg!(feature = "cli") {
        features.push("cli".to_string());
    }
    features
}
