//! Shared application state for the linkmeter exporter.

use std::sync::Arc;

use linkmeter_core::registry::MetricRegistry;

use crate::config::ExporterConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    registry: MetricRegistry,
}

impl AppState {
    pub fn new(cfg: ExporterConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry: MetricRegistry::new(),
            }),
        }
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.inner.registry
    }
}
