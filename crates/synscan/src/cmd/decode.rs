use synscan_codec::decode;

use crate::cmd::DecodeArgs;
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_payload, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = decode(&args.payload).map_err(|err| codec_error("decode failed", err))?;
    print_payload(&payload, "argument", None, format);
    Ok(SUCCESS)
}
