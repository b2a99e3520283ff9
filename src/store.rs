use crate::errors::PersistenceError;
use crate::models::{NewReading, Reading, StoreData};
use std::{cmp::Reverse, ffi::OsString, path::Path, path::PathBuf, sync::Arc};
use tokio::fs;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

/// Most recent readings, newest first.
pub type Snapshot = Arc<Vec<Reading>>;

/// Append-only reading log backed by a JSON document.
///
/// Every successful append publishes a fresh snapshot of the most recent
/// `snapshot_limit` readings to all subscribers.
pub struct ReadingStore {
    path: PathBuf,
    data: Mutex<StoreData>,
    snapshots: watch::Sender<Snapshot>,
    snapshot_limit: usize,
}

impl ReadingStore {
    /// Fails when an existing data file cannot be read. A file that reads
    /// but does not parse is moved aside and the store starts empty.
    pub async fn open(path: PathBuf, snapshot_limit: usize) -> Result<Self, PersistenceError> {
        let data = load_data(&path).await?;
        info!(
            path = %path.display(),
            readings = data.readings.len(),
            "reading store opened"
        );
        let initial = Arc::new(most_recent(&data.readings, snapshot_limit));
        let (snapshots, _) = watch::channel(initial);

        Ok(Self {
            path,
            data: Mutex::new(data),
            snapshots,
            snapshot_limit,
        })
    }

    /// Assigns an id and writes the record. The record is only kept, and
    /// subscribers only notified, once the write succeeded.
    pub async fn append(&self, new: NewReading) -> Result<Reading, PersistenceError> {
        let mut data = self.data.lock().await;
        let previous_id = data.last_id;
        let reading = Reading::from_new(previous_id + 1, new);

        data.last_id = reading.id;
        data.readings.push(reading.clone());

        if let Err(err) = persist_data(&self.path, &data).await {
            data.readings.pop();
            data.last_id = previous_id;
            error!("failed to persist reading: {err}");
            return Err(err);
        }

        let snapshot = Arc::new(most_recent(&data.readings, self.snapshot_limit));
        self.snapshots.send_replace(snapshot);
        info!(
            id = reading.id,
            value = reading.value,
            context = reading.context.as_tag(),
            label = reading.status.label.as_str(),
            "reading saved"
        );

        Ok(reading)
    }

    pub fn watch(&self) -> Subscription {
        debug!(listeners = self.snapshots.receiver_count() + 1, "snapshot subscription opened");
        Subscription {
            rx: self.snapshots.subscribe(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }
}

/// Live view of the store's most recent readings.
pub struct Subscription {
    rx: watch::Receiver<Snapshot>,
}

impl Subscription {
    pub fn current(&mut self) -> Snapshot {
        self.rx.borrow_and_update().clone()
    }

    /// Waits for the next snapshot. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn release(self) {
        debug!("snapshot subscription released");
    }
}

/// Newest `recorded_at` first; equal timestamps put the later-stored record first.
fn most_recent(readings: &[Reading], limit: usize) -> Vec<Reading> {
    let mut sorted: Vec<Reading> = readings.to_vec();
    sorted.sort_by_key(|reading| Reverse((reading.recorded_at, reading.id)));
    sorted.truncate(limit);
    sorted
}

pub async fn load_data(path: &Path) -> Result<StoreData, PersistenceError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(StoreData::default()),
        Err(err) => {
            error!("failed to read data file: {err}");
            return Err(err.into());
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(data) => Ok(data),
        Err(err) => {
            let aside = sibling(path, "corrupt");
            error!("failed to parse data file: {err}");
            fs::rename(path, &aside).await?;
            warn!(moved_to = %aside.display(), "unreadable data file moved aside, starting empty");
            Ok(StoreData::default())
        }
    }
}

/// Writes a sibling temp file and renames it over `path`, so a failed write
/// leaves the previous document intact.
pub async fn persist_data(path: &Path, data: &StoreData) -> Result<(), PersistenceError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let tmp = sibling(path, "tmp");
    fs::write(&tmp, payload).await?;
    if let Err(err) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(err.into());
    }
    Ok(())
}

/// `readings.json` -> `readings.json.<suffix>`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
