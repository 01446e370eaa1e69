//! Skywatcher Synscan motor-controller protocol over UDP.
//!
//! synscan talks to the motor controller of a Skywatcher mount: short
//! ASCII command lines out, one reply datagram back, integers in the
//! protocol's byte-group-reversed "synscan hex".
//!
//! # Crate Structure
//!
//! - [`transport`]: Blocking UDP round trips with a bounded wait
//! - [`codec`]: Synscan hex and command/response framing
//! - [`comm`]: `send_command` / `test_comm` on top of the two
//!
//! Command-name tables, axis helpers and motion logic belong to callers;
//! they only need [`comm::SynscanComm`] and the [`codec`] encode/decode pair.

/// Re-export transport types.
pub mod transport {
    pub use synscan_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use synscan_codec::*;
}

/// Re-export command types.
pub mod comm {
    pub use synscan_comm::*;
}
