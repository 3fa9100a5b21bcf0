pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::storage::JsonFileStore;
pub use app::servers::BoundServers;
pub use config::{BoardConfig, CliConfig};
pub use crate::core::board::MessageBoard;
pub use utils::error::{BoardError, Result};
