use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use synscan_codec::Payload;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PayloadOutput<'a> {
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request: Option<&'a str>,
    kind: &'static str,
    value: Option<u32>,
    hex: Option<String>,
    status: Option<&'a str>,
}

pub fn print_payload(payload: &Payload, source: &str, request: Option<&str>, format: OutputFormat) {
    let out = PayloadOutput {
        source,
        request,
        kind: payload_kind(payload),
        value: payload.value(),
        hex: payload.value().map(|v| format!("{v:#X}")),
        status: payload.as_status(),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SOURCE", "REQUEST", "KIND", "VALUE"])
                .add_row(vec![
                    out.source.to_string(),
                    out.request.unwrap_or("-").to_string(),
                    out.kind.to_string(),
                    payload_preview(payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "source={} request={} kind={} value={}",
                out.source,
                out.request.unwrap_or("-"),
                out.kind,
                payload_preview(payload)
            );
        }
        OutputFormat::Raw => println!("{payload}"),
    }
}

#[derive(Serialize)]
struct ProbeOutput<'a> {
    endpoint: &'a str,
    initialized: bool,
}

pub fn print_probe(endpoint: &str, initialized: bool, format: OutputFormat) {
    let out = ProbeOutput {
        endpoint,
        initialized,
    };
    let verdict = if initialized {
        "initialized"
    } else {
        "not initialized"
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ENDPOINT", "MOUNT"])
                .add_row(vec![endpoint.to_string(), verdict.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("endpoint={endpoint} mount={verdict}"),
        OutputFormat::Raw => println!("{initialized}"),
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    value: u32,
    width: usize,
    synscan_hex: &'a str,
}

pub fn print_encoded(value: u32, width: usize, wire: &str, format: OutputFormat) {
    let out = EncodedOutput {
        value,
        width,
        synscan_hex: wire,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["VALUE", "HEX", "WIDTH", "SYNSCAN HEX"])
                .add_row(vec![
                    value.to_string(),
                    format!("{value:#X}"),
                    width.to_string(),
                    wire.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("value={value} ({value:#X}) width={width} synscan_hex={wire}")
        }
        OutputFormat::Raw => println!("{wire}"),
    }
}

fn print_json<T: Serialize>(out: &T) {
    println!(
        "{}",
        serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
    );
}

fn payload_kind(payload: &Payload) -> &'static str {
    match payload {
        Payload::Empty => "empty",
        Payload::Value(_) => "value",
        Payload::Status(_) => "status",
    }
}

fn payload_preview(payload: &Payload) -> String {
    match payload {
        Payload::Empty => "(none)".to_string(),
        Payload::Value(v) => format!("{v} ({v:#X})"),
        Payload::Status(s) => s.clone(),
    }
}
