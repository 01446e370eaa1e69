use synscan_codec::{Axis, DigitWidth};
use synscan_comm::SynscanComm;

use crate::cmd::SendArgs;
use crate::exit::{codec_error, comm_error, CliResult, SUCCESS};
use crate::output::{print_payload, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    // Validate everything locally before a socket is even bound.
    let axis = Axis::new(args.axis).map_err(|err| codec_error("invalid axis", err))?;
    let width = resolve_width(args.value, args.width)?;
    let config = args.conn.to_config()?;

    let mut comm = SynscanComm::bind(&config).map_err(|err| comm_error("bind failed", err))?;
    let payload = comm
        .send_command(args.command, axis, args.value, width)
        .map_err(|err| comm_error("command failed", err))?;

    let label = request_label(args.command, axis, args.value, width);
    print_payload(&payload, &config.endpoint(), Some(&label), format);
    Ok(SUCCESS)
}

fn resolve_width(value: Option<u32>, digits: usize) -> CliResult<DigitWidth> {
    let width = DigitWidth::try_from(digits).map_err(|err| codec_error("invalid --width", err))?;
    if let Some(value) = value {
        synscan_codec::encode(Some(value), width)
            .map_err(|err| codec_error("invalid --value", err))?;
    }
    Ok(width)
}

fn request_label(command: char, axis: Axis, value: Option<u32>, width: DigitWidth) -> String {
    match value {
        Some(value) => format!("{command}{axis} {value:#X}/{width}"),
        None => format!("{command}{axis}"),
    }
}
