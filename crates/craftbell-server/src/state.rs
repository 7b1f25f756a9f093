use std::sync::Arc;

use craftbell_core::config::Config;

use crate::compute::InstanceApi;
use crate::line::LinePush;
use crate::store::RedbStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<RedbStore>,
    pub notifier: Arc<LinePush>,
    pub compute: Arc<InstanceApi>,
}

impl AppState {
    /// Wire the collaborators from one loaded config and an opened
    /// store. One reqwest client is shared by both outbound APIs.
    pub fn new(config: Config, store: RedbStore) -> Self {
        let client = reqwest::Client::new();
        let notifier = LinePush::new(
            client.clone(),
            config.push_api_base.clone(),
            config.line_channel_token.clone(),
        );
        let compute = InstanceApi::new(
            client,
            config.compute_api_base.clone(),
            config.compute_api_token.clone(),
            config.instance_id.clone(),
        );
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            notifier: Arc::new(notifier),
            compute: Arc::new(compute),
        }
    }
}
