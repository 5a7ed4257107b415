use std::sync::Arc;

use crate::engine::Engine;

/// Shared, read-only handler state. The engine keeps no mutable state, so
/// no lock is needed.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
