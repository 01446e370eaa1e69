use synscan_codec::{encode, DigitWidth};

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let width = DigitWidth::try_from(args.width).map_err(|err| codec_error("invalid --width", err))?;
    let wire = encode(Some(args.value), width).map_err(|err| codec_error("encode failed", err))?;
    print_encoded(args.value, width.digits(), &wire, format);
    Ok(SUCCESS)
}
