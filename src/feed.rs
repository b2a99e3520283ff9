use crate::classify::ThresholdScheme;
use crate::models::{LogItem, Reading};
use crate::store::Subscription;
use crate::window::{window_with, Series, WindowSettings};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// List and chart state derived from one store snapshot.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub items: Vec<LogItem>,
    pub series: Series,
}

impl Dashboard {
    pub fn from_snapshot(readings: &[Reading], scheme: ThresholdScheme, settings: WindowSettings) -> Self {
        let items = readings
            .iter()
            .map(|reading| LogItem {
                current: scheme.classify(reading.value, reading.context),
                reading: reading.clone(),
            })
            .collect();

        Self {
            items,
            series: window_with(readings, settings),
        }
    }
}

/// Keeps a `Dashboard` in step with a store subscription.
pub struct LiveFeed {
    view: Arc<RwLock<Dashboard>>,
    task: JoinHandle<()>,
}

impl LiveFeed {
    pub fn spawn(mut subscription: Subscription, scheme: ThresholdScheme, settings: WindowSettings) -> Self {
        let initial = subscription.current();
        let view = Arc::new(RwLock::new(Dashboard::from_snapshot(&initial, scheme, settings)));

        let shared = Arc::clone(&view);
        let task = tokio::spawn(async move {
            while let Some(snapshot) = subscription.changed().await {
                let dashboard = Dashboard::from_snapshot(&snapshot, scheme, settings);
                debug!(
                    items = dashboard.items.len(),
                    points = dashboard.series.len(),
                    "dashboard refreshed"
                );
                *shared.write().await = dashboard;
            }
            subscription.release();
        });

        Self { view, task }
    }

    pub async fn current(&self) -> Dashboard {
        self.view.read().await.clone()
    }

    pub fn release(&self) {
        if !self.task.is_finished() {
            info!("releasing live feed");
            self.task.abort();
        }
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}
