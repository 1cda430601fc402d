//! Tether agent binary support: argument parsing, logging setup, and the
//! host integrations that back the runtime's device traits on a Linux box.

pub mod cli;
pub mod host;
pub mod logging;
