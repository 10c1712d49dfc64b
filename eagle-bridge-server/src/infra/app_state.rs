use std::{fmt, sync::Arc};

use eagle_bridge_core::{
    ActiveLibrarySession, ContentDelivery, DeliveryPolicy, HostApi,
    ImageResolver, LibraryRegistry,
};

use crate::infra::config::Config;

/// Shared handles passed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<LibraryRegistry>,
    pub session: Arc<ActiveLibrarySession>,
    pub resolver: ImageResolver,
    pub delivery: ContentDelivery,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        registry: LibraryRegistry,
        host: Arc<dyn HostApi>,
    ) -> Self {
        let session = Arc::new(ActiveLibrarySession::new(
            host,
            config.public_base_url(),
        ));
        let delivery = ContentDelivery::new(DeliveryPolicy::with_threshold(
            config.delivery.stream_threshold_bytes,
        ));

        Self {
            resolver: ImageResolver::new(Arc::clone(&session)),
            registry: Arc::new(registry),
            session,
            delivery,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
