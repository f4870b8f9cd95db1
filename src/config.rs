use crate::db::{DEFAULT_DB_PATH, Store};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Address the web server binds when none is given
pub const DEFAULT_ADDR: &str = "127.0.0.1:5001";

/// Everything the web server needs to start
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub addr: SocketAddr,
}

impl ServerConfig {
    pub fn new(db_path: impl Into<PathBuf>, addr: SocketAddr) -> Self {
        Self {
            db_path: db_path.into(),
            addr,
        }
    }

    pub fn store(&self) -> Store {
        Store::new(&self.db_path)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            addr: SocketAddr::from(([127, 0, 0, 1], 5001)),
        }
    }
}
