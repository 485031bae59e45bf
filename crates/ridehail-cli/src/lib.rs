//! Terminal frontend for the ride-hailing flow.
//!
//! Runs the shared [`ridehail_app::Runtime`] on the wall clock with a
//! line-oriented console: every render prints the current screen, every ride
//! notification prints one line, and commands are read from standard input.
//!
//! # Components
//!
//! - [`SystemEnv`]: production clock
//! - [`ConsoleDriver`]: [`ridehail_app::Driver`] over an async reader and a
//!   writer
//! - [`command`]: console command parser
//! - [`render`]: plain text screens
//! - [`catalog`]: bookable ride tiers

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod catalog;
pub mod command;
pub mod console;
pub mod render;
pub mod system_env;

pub use command::CommandError;
pub use console::{ConsoleDriver, ConsoleError};
pub use system_env::SystemEnv;
