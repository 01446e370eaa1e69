//! Probe a mount and read both axis positions.
//!
//! Run with:
//!   SYNSCAN_UDP_IP=192.168.4.1 cargo run --example probe
//!
//! `SYNSCAN_UDP_PORT` and `SYNSCAN_TIMEOUT` are honoured too.

use synscan::codec::{Axis, DigitWidth};
use synscan::comm::SynscanComm;
use synscan::transport::TransportConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TransportConfig::from_env()?;
    let mut comm = SynscanComm::bind(&config)?;
    eprintln!("Talking to {}", config.endpoint());

    if !comm.test_comm()? {
        eprintln!("Controller answered but is not initialized");
        return Ok(());
    }

    for axis in [Axis::ONE, Axis::TWO] {
        let position = comm.send_command('j', axis, None, DigitWidth::Six)?;
        println!("axis {axis}: {position}");
    }

    Ok(())
}
