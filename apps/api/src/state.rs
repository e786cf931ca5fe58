use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::VisionModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Upstream model. `GeminiClient` in production, scripted in tests.
    pub model: Arc<dyn VisionModel>,
    pub config: Config,
}
