//! Data-source connector that keeps a local directory in sync with a Perforce
//! server by running the `p4` command-line client.
//!
//! Credentials reach `p4` through an environment overlay on the child process
//! only, so several connectors may fetch concurrently in one process.

pub mod config;
pub mod connector;
pub mod error;
pub mod icon;
pub mod logger;
pub mod p4;
mod utils;

pub use config::{ConnectionParameters, Params};
pub use connector::{ConnectionSchema, ConnectorContext, DataSource, PerforceConnector};
pub use error::ConnectorError;
pub use logger::{Logger, MemoryLogger, TracingLogger};
pub use p4::P4Client;
