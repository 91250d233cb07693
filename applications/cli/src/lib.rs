//! Gecs CLI Library
//!
//! Headless front-end for Gecs Player: configuration, a simulated media
//! engine, and the line-driven playback session used by the `gecs` binary.

pub mod config;
pub mod engine;
pub mod error;
pub mod session;

pub use config::GecsConfig;
pub use engine::HeadlessEngine;
pub use error::{CliError, Result};
pub use session::{Session, SessionCommand, SessionFlow};
