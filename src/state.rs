use crate::config::Config;
use crate::entitlements::Entitlements;
use crate::errors::PersistenceError;
use crate::feed::LiveFeed;
use crate::store::ReadingStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<ReadingStore>,
    pub feed: Arc<LiveFeed>,
    pub entitlements: Arc<Entitlements>,
}

impl AppState {
    /// Opens the store and starts the live feed. Must run inside a tokio runtime.
    pub async fn open(config: Config) -> Result<Self, PersistenceError> {
        let store = ReadingStore::open(config.data_path.clone(), config.window.max_fetch).await?;
        let feed = LiveFeed::spawn(store.watch(), config.scheme, config.window);
        let entitlements = Entitlements::new(config.premium);

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            feed: Arc::new(feed),
            entitlements: Arc::new(entitlements),
        })
    }
}
