pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod ordering;
pub mod server;

pub use error::{Result, StrideError};
pub use models::*;
