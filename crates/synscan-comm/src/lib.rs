//! Command round trips and liveness probing for Synscan motor controllers.
//!
//! This is the layer outside code talks to: frame a command, send it,
//! classify the reply and decode its payload, all in one blocking call.
//!
//! ```no_run
//! use synscan_codec::{Axis, DigitWidth};
//! use synscan_comm::SynscanComm;
//! use synscan_transport::TransportConfig;
//!
//! let mut comm = SynscanComm::bind(&TransportConfig::default())?;
//! if comm.test_comm()? {
//!     let position = comm.send_command('j', Axis::ONE, None, DigitWidth::Six)?;
//!     println!("axis 1 position: {position}");
//! }
//! # Ok::<(), synscan_comm::CommError>(())
//! ```

pub mod comm;
pub mod error;

#[cfg(feature = "async")]
pub mod async_comm;

pub use comm::SynscanComm;
pub use error::{CommError, Result};

#[cfg(feature = "async")]
pub use async_comm::AsyncSynscanComm;
