//! Server application state shared across handlers

use crate::config::RelayConfig;
use crate::file_storage::leads::FileLeadStore;
use crate::notify::RelayClient;
use crate::shutdown::ShutdownState;
use std::path::Path;
use std::sync::Arc;

/// Shared state for the server: storage, relay and shutdown flag
#[derive(Clone)]
pub struct ServerAppState {
    /// Relay and lead-capture configuration
    pub config: Arc<RelayConfig>,

    /// WhatsApp notification relay
    pub relay: Arc<RelayClient>,

    /// Lead document store
    pub lead_store: Arc<FileLeadStore>,

    /// Shutdown state
    pub shutdown_state: ShutdownState,
}

impl ServerAppState {
    /// Create a new server application state
    pub fn new(config: RelayConfig, data_dir: &Path, shutdown_state: ShutdownState) -> Self {
        let relay = Arc::new(RelayClient::new(config.clone()));
        Self {
            config: Arc::new(config),
            relay,
            lead_store: Arc::new(FileLeadStore::new(data_dir)),
            shutdown_state,
        }
    }
}
