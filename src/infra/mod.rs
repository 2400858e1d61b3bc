//! Infrastructure layer
//!
//! Wraps external process execution

pub mod command;

pub use command::CommandRunner;
