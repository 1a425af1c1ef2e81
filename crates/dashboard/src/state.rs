//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::QueryCache;
use crate::config::{DashboardConfig, OrdersSource};
use crate::wms::{LiveOrders, MockOrders, OrderSource, WmsClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to shared
/// resources: configuration, the WMS API client, the query cache, and the
/// configured order source.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    wms: WmsClient,
    queries: QueryCache,
    orders: Arc<dyn OrderSource>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        let wms = WmsClient::new(&config.wms_api);

        let orders: Arc<dyn OrderSource> = match config.orders_source {
            OrdersSource::Mock => Arc::new(MockOrders::new()),
            OrdersSource::Live => Arc::new(LiveOrders::new(wms.clone())),
        };

        Self {
            inner: Arc::new(AppStateInner {
                config,
                wms,
                queries: QueryCache::new(),
                orders,
            }),
        }
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Get a reference to the WMS API client.
    #[must_use]
    pub fn wms(&self) -> &WmsClient {
        &self.inner.wms
    }

    /// Get a reference to the query/mutation cache.
    #[must_use]
    pub fn queries(&self) -> &QueryCache {
        &self.inner.queries
    }

    /// Get the configured order source.
    #[must_use]
    pub fn orders(&self) -> Arc<dyn OrderSource> {
        Arc::clone(&self.inner.orders)
    }
}
