//! Logger bootstrap for binaries and tests.
//!
//! Library code only talks to the `log` facade; `init_logging` installs an
//! `env_logger` backend when the host has none.

mod init;

pub use init::{LoggingConfig, init_logging};
