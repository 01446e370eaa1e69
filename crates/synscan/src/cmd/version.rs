use synscan_codec::{MAX_PAYLOAD_DIGITS, PROBE_REQUEST};
use synscan_transport::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT, MAX_DATAGRAM};

use crate::cmd::envinfo::target_triple;
use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("synscan {}", env!("CARGO_PKG_VERSION"));
    if !args.extended {
        return Ok(SUCCESS);
    }

    println!("target: {}", target_triple());
    println!("async: {}", cfg!(feature = "async"));
    println!("default endpoint: {DEFAULT_HOST}:{DEFAULT_PORT} (udp)");
    println!("default timeout: {}ms", DEFAULT_TIMEOUT.as_millis());
    println!("max payload digits: {MAX_PAYLOAD_DIGITS}");
    println!("max reply datagram: {MAX_DATAGRAM} bytes");
    println!("probe request: {:?}", String::from_utf8_lossy(PROBE_REQUEST));

    Ok(SUCCESS)
}
