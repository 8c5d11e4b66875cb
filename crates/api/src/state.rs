use std::sync::Arc;

use page_builder_core::events::EventBus;
use page_builder_core::persist::{
    NavigationSink, PageStore, PersistenceCoordinator, StaticIdentity,
};

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: Arc<dyn PageStore>,
    coordinator: PersistenceCoordinator,
    config: AppConfig,
    event_bus: EventBus,
}

impl AppState {
    /// The coordinator gets no ambient identity: every request passes its
    /// authenticated actor explicitly.
    pub fn new(
        store: Arc<dyn PageStore>,
        navigation: Option<Arc<dyn NavigationSink>>,
        config: AppConfig,
        event_bus: EventBus,
    ) -> Self {
        let mut coordinator = PersistenceCoordinator::new(
            store.clone(),
            Arc::new(StaticIdentity(None)),
            event_bus.clone(),
        );
        if let Some(navigation) = navigation {
            coordinator = coordinator.with_navigation(navigation);
        }
        Self {
            inner: Arc::new(InnerState {
                store,
                coordinator,
                config,
                event_bus,
            }),
        }
    }

    pub fn store(&self) -> &Arc<dyn PageStore> {
        &self.inner.store
    }

    pub fn coordinator(&self) -> &PersistenceCoordinator {
        &self.inner.coordinator
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }
}
