pub use client::{NexusClient, NexusSettings};
pub use error::{Error, ErrorKind, Result};
pub use model::*;
pub use pipeline::Schedule;

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub(crate) mod nexus;
pub mod observability;
pub mod pipeline;
pub mod refresh;
pub mod server;
