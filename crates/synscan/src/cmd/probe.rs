use synscan_comm::SynscanComm;

use crate::cmd::ProbeArgs;
use crate::exit::{comm_error, CliResult, NOT_INITIALIZED, SUCCESS};
use crate::output::{print_probe, OutputFormat};

pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.conn.to_config()?;
    let mut comm = SynscanComm::bind(&config).map_err(|err| comm_error("bind failed", err))?;

    let initialized = comm
        .test_comm()
        .map_err(|err| comm_error("probe failed", err))?;
    print_probe(&config.endpoint(), initialized, format);

    Ok(if initialized { SUCCESS } else { NOT_INITIALIZED })
}
