// JSON file snapshot gateway
// Decision: Two independent blobs so a corrupt logs file never costs the sessions
// Decision: Write to a temp file and rename, so a crash never leaves a torn snapshot
//
// Every flush rewrites both files in full (O(total size) per mutation).

use async_trait::async_trait;
use chatlog_core::{
    sort_newest_first, LogEntry, Result, SessionMap, Snapshot, SnapshotGateway, StoreError,
};
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the log blob (JSON array, newest first)
pub const LOGS_FILE: &str = "logs.json";

/// File name of the session blob (JSON object keyed by session id)
pub const SESSIONS_FILE: &str = "sessions.json";

/// Snapshot gateway storing logs and sessions as JSON files in one directory
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    data_dir: PathBuf,
}

impl JsonFileGateway {
    /// Use `data_dir` for storage, creating it if absent
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| StoreError::PersistenceWrite {
                path: data_dir.display().to_string(),
                reason: e.to_string(),
            })?;
        info!(path = %data_dir.display(), "Using data directory");
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn logs_path(&self) -> PathBuf {
        self.data_dir.join(LOGS_FILE)
    }

    pub fn sessions_path(&self) -> PathBuf {
        self.data_dir.join(SESSIONS_FILE)
    }

    /// Read one blob. `Ok(None)` when the file does not exist.
    async fn read_blob<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::PersistenceRead {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::PersistenceRead {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Read one blob, falling back to the empty default on any failure
    async fn load_blob<T: DeserializeOwned + Default>(path: &Path, what: &str) -> T {
        match Self::read_blob(path).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                info!(path = %path.display(), "No persisted {} found, starting empty", what);
                T::default()
            }
            Err(e) => {
                warn!(error = %e, "Could not load persisted {}, starting empty", what);
                T::default()
            }
        }
    }

    /// Overwrite one blob via temp file + rename
    async fn write_blob<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_vec_pretty(value)?;
        let write_err = |p: &Path, e: std::io::Error| StoreError::PersistenceWrite {
            path: p.display().to_string(),
            reason: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| write_err(self.data_dir.as_path(), e))?;

        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json)
            .await
            .map_err(|e| write_err(tmp_path.as_path(), e))?;
        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| write_err(path, e))?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotGateway for JsonFileGateway {
    async fn load(&self) -> Snapshot {
        let logs: Vec<LogEntry> = Self::load_blob(&self.logs_path(), "logs").await;
        let sessions: SessionMap = Self::load_blob(&self.sessions_path(), "sessions").await;
        Snapshot { logs, sessions }
    }

    async fn flush(&self, mut logs: Vec<LogEntry>, sessions: &SessionMap) -> Result<()> {
        sort_newest_first(&mut logs);
        self.write_blob(&self.logs_path(), &logs).await?;
        self.write_blob(&self.sessions_path(), sessions).await?;
        debug!(
            log_count = logs.len(),
            session_count = sessions.len(),
            "Snapshot flushed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlog_core::{
        AppendAppointmentRequest, AppendMessageRequest, CreateSessionRequest, EventStore,
        LogEntryType, Session,
    };
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn entry(id: i64, secs: i64) -> LogEntry {
        LogEntry::new(
            id,
            "s1",
            LogEntryType::Message,
            format!("Bot: {}", id),
            Utc.timestamp_opt(secs, 0).unwrap(),
            json!({"sender": "bot", "fullMessage": id.to_string()}),
        )
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("data");
        let gateway = JsonFileGateway::open(&dir).await.unwrap();
        assert!(dir.is_dir());
        assert_eq!(gateway.logs_path(), dir.join(LOGS_FILE));
        assert_eq!(gateway.sessions_path(), dir.join(SESSIONS_FILE));
    }

    #[tokio::test]
    async fn test_load_without_files_is_empty() {
        let tmp = TempDir::new().unwrap();
        let gateway = JsonFileGateway::open(tmp.path()).await.unwrap();

        // repeated loads never fail
        assert!(gateway.load().await.is_empty());
        assert!(gateway.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_round_trip() {
        let tmp = TempDir::new().unwrap();
        let gateway = JsonFileGateway::open(tmp.path()).await.unwrap();

        gateway.flush(Vec::new(), &SessionMap::new()).await.unwrap();

        assert!(gateway.logs_path().exists());
        assert!(gateway.sessions_path().exists());
        assert!(gateway.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_orders_logs_newest_first() {
        let tmp = TempDir::new().unwrap();
        let gateway = JsonFileGateway::open(tmp.path()).await.unwrap();

        let logs = vec![entry(1, 100), entry(3, 300), entry(2, 200)];
        let mut sessions = SessionMap::new();
        let mut session = Session::new("s1", Some("UA-1".to_string()), Utc::now());
        session.message_count = 3;
        sessions.insert("s1".to_string(), session.clone());

        gateway.flush(logs.clone(), &sessions).await.unwrap();
        let snapshot = gateway.load().await;

        let ids: Vec<i64> = snapshot.logs.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        for original in &logs {
            assert!(snapshot.logs.contains(original));
        }
        assert_eq!(snapshot.sessions.len(), 1);
        assert_eq!(snapshot.sessions["s1"], session);
    }

    #[tokio::test]
    async fn test_flush_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let gateway = JsonFileGateway::open(tmp.path()).await.unwrap();
        gateway
            .flush(vec![entry(1, 100)], &SessionMap::new())
            .await
            .unwrap();

        let mut names: Vec<String> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec![LOGS_FILE.to_string(), SESSIONS_FILE.to_string()]);
    }

    #[tokio::test]
    async fn test_flush_overwrites_previous_snapshot() {
        let tmp = TempDir::new().unwrap();
        let gateway = JsonFileGateway::open(tmp.path()).await.unwrap();

        gateway
            .flush(vec![entry(1, 100), entry(2, 200)], &SessionMap::new())
            .await
            .unwrap();
        gateway
            .flush(vec![entry(9, 900)], &SessionMap::new())
            .await
            .unwrap();

        let snapshot = gateway.load().await;
        assert_eq!(snapshot.logs.len(), 1);
        assert_eq!(snapshot.logs[0].id, 9);
    }

    #[tokio::test]
    async fn test_corrupt_logs_keep_sessions() {
        let tmp = TempDir::new().unwrap();
        let gateway = JsonFileGateway::open(tmp.path()).await.unwrap();

        let mut sessions = SessionMap::new();
        sessions.insert("s1".to_string(), Session::new("s1", None, Utc::now()));
        gateway.flush(vec![entry(1, 100)], &sessions).await.unwrap();

        std::fs::write(gateway.logs_path(), b"{not json").unwrap();

        let snapshot = gateway.load().await;
        assert!(snapshot.logs.is_empty());
        assert_eq!(snapshot.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_sessions_keep_logs() {
        let tmp = TempDir::new().unwrap();
        let gateway = JsonFileGateway::open(tmp.path()).await.unwrap();
        gateway
            .flush(vec![entry(1, 100)], &SessionMap::new())
            .await
            .unwrap();

        // valid JSON, wrong shape
        std::fs::write(gateway.sessions_path(), b"[1, 2, 3]").unwrap();

        let snapshot = gateway.load().await;
        assert_eq!(snapshot.logs.len(), 1);
        assert!(snapshot.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_read_blob_reports_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOGS_FILE);
        std::fs::write(&path, b"garbage").unwrap();

        let result = JsonFileGateway::read_blob::<Vec<LogEntry>>(&path).await;
        assert!(matches!(result, Err(StoreError::PersistenceRead { .. })));

        let missing = tmp.path().join("missing.json");
        let result = JsonFileGateway::read_blob::<Vec<LogEntry>>(&missing).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_flush_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let gateway = JsonFileGateway::open(tmp.path()).await.unwrap();

        // a directory where the logs file should go makes the rename fail
        std::fs::create_dir(gateway.logs_path()).unwrap();
        std::fs::write(gateway.logs_path().join("keep"), b"x").unwrap();

        let result = gateway.flush(vec![entry(1, 100)], &SessionMap::new()).await;
        assert!(matches!(result, Err(StoreError::PersistenceWrite { .. })));
    }

    #[tokio::test]
    async fn test_event_store_survives_restart() {
        let tmp = TempDir::new().unwrap();

        let first_ids = {
            let gateway = Arc::new(JsonFileGateway::open(tmp.path()).await.unwrap());
            let store = EventStore::open(gateway).await;
            store
                .create_session(CreateSessionRequest::new("s1", Some("UA-1")))
                .await
                .unwrap();
            store
                .append_message(AppendMessageRequest::new("s1", "user", "hello"))
                .await
                .unwrap();
            store
                .append_appointment(AppendAppointmentRequest::new(
                    "s1",
                    json!({"patientName": "Jane"}),
                ))
                .await
                .unwrap();
            store.shutdown_flush().await.unwrap();
            store.list_logs().await
        };

        let gateway = Arc::new(JsonFileGateway::open(tmp.path()).await.unwrap());
        let store = EventStore::open(gateway).await;

        let logs = store.list_logs().await;
        assert_eq!(logs, first_ids);
        let sessions = store.list_sessions().await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].message_count, 1);
        assert_eq!(sessions[0].appointment_count, 1);

        // ids keep increasing after reload
        let next = store
            .append_message(AppendMessageRequest::new("s1", "bot", "again"))
            .await
            .unwrap();
        assert!(logs.iter().all(|l| l.id < next));
    }

    #[tokio::test]
    async fn test_persisted_files_are_plain_json() {
        let tmp = TempDir::new().unwrap();
        let gateway = JsonFileGateway::open(tmp.path()).await.unwrap();

        let now = Utc::now();
        let mut sessions = SessionMap::new();
        sessions.insert(
            "s1".to_string(),
            Session::new("s1", None, now - Duration::minutes(5)),
        );
        gateway.flush(vec![entry(7, 700)], &sessions).await.unwrap();

        let logs: serde_json::Value =
            serde_json::from_slice(&std::fs::read(gateway.logs_path()).unwrap()).unwrap();
        assert!(logs.is_array());
        assert_eq!(logs[0]["id"], 7);
        assert_eq!(logs[0]["type"], "message");

        let sessions: serde_json::Value =
            serde_json::from_slice(&std::fs::read(gateway.sessions_path()).unwrap()).unwrap();
        assert!(sessions.is_object());
        assert_eq!(sessions["s1"]["status"], "active");
    }
}
