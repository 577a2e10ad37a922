//! Shared application state

use markflow_core::analyzer::PageAnalyzer;
use markflow_core::synth::Synthesizer;
use markflow_storage::db::DatabasePool;
use markflow_storage::store::TemplateStore;
use std::sync::Arc;

/// State shared by every handler
pub struct AppState {
    /// Template persistence (remote + local cache)
    pub store: TemplateStore,
    /// Template synthesizer
    pub synthesizer: Arc<Synthesizer>,
    /// Page analyzer
    pub analyzer: PageAnalyzer,
    /// Database pool, absent when running cache-only
    pub db_pool: Option<DatabasePool>,
}
