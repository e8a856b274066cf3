//! Application state

use std::sync::Arc;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::websocket::RealtimeState;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Connection table with the presence and room registries
    pub realtime: RealtimeState,

    /// Verifier for login tokens on WebSocket upgrade
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    /// Create application state from configuration
    pub fn new(config: Config) -> Self {
        let authenticator = Arc::new(Authenticator::new(&config.jwt_secret));
        Self {
            config: Arc::new(config),
            realtime: RealtimeState::new(),
            authenticator,
        }
    }
}
