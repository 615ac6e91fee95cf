use std::path::Path;
use std::sync::Arc;

use crate::engine::errors::StoreError;
use crate::engine::store::Database;
use crate::frontend::server_state::ServerState;
use crate::shared::config::Settings;

/// Everything a request handler needs, shared across connections.
#[derive(Clone)]
pub struct FrontendContext {
    pub db: Arc<Database>,
    pub server_state: Arc<ServerState>,
    pub max_body_bytes: usize,
}

impl FrontendContext {
    pub fn new(db: Database, server_state: ServerState, max_body_bytes: usize) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(db),
            server_state: Arc::new(server_state),
            max_body_bytes,
        })
    }

    /// Opens the seed file and sizes limits from `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Arc<Self>, StoreError> {
        let db = Database::open(Path::new(&settings.store.seed_path))?;
        let server_state = ServerState::new(settings.server.max_inflight_requests);
        Ok(Self::new(db, server_state, settings.server.max_body_bytes))
    }
}
