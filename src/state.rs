/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Holds the collaborator clients behind their seam traits so tests can
 *   swap in stubs
 * - Clone is cheap (Arc all the way down)
 */
use std::sync::Arc;
use std::time::Duration;

use crate::services::content::ContentStore;
use crate::services::session::SessionResolver;
use crate::services::webhook::SignatureValidator;

/// Static gate configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct GateSettings {
    pub protected_prefixes: Vec<String>,
    pub role_lookup_timeout: Duration,
}

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentStore>,
    pub sessions: Arc<dyn SessionResolver>,
    pub gate: Arc<GateSettings>,
    pub webhook_signatures: SignatureValidator,
}

impl AppState {
    pub fn new(
        content: Arc<dyn ContentStore>,
        sessions: Arc<dyn SessionResolver>,
        gate: GateSettings,
        webhook_signatures: SignatureValidator,
    ) -> Self {
        Self {
            content,
            sessions,
            gate: Arc::new(gate),
            webhook_signatures,
        }
    }
}
