use crate::core::{Message, MessageLog, MessageStore, Result, StoredMessage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Entries that do not look like a message are kept as-is so a rewrite
/// never drops them.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Message(StoredMessage),
    Other(serde_json::Value),
}

type RawLog = BTreeMap<String, StoredEntry>;

/// Message log persisted as one pretty-printed JSON object.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// `None` means the file exists but is not a JSON object.
    async fn read_raw(&self) -> Result<Option<RawLog>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Some(RawLog::new())),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&data) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable message file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn corrupt_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    /// 壞掉的檔案先改名保留，不直接覆蓋
    async fn quarantine(&self) -> Result<()> {
        let target = self.corrupt_path();
        tokio::fs::rename(&self.path, &target).await?;
        tracing::warn!(
            "Moved unreadable message file {} to {}",
            self.path.display(),
            target.display()
        );
        Ok(())
    }

    /// 先寫暫存檔再 rename，避免讀到寫一半的檔案
    async fn write_log(&self, log: &RawLog) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        log.serialize(&mut serializer)?;

        self.ensure_parent_dir().await?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &buf).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for JsonFileStore {
    async fn load_all(&self) -> Result<MessageLog> {
        let Some(raw) = self.read_raw().await? else {
            return Ok(MessageLog::new());
        };

        let mut log = MessageLog::new();
        for (timestamp, entry) in raw {
            match entry {
                StoredEntry::Message(stored) => {
                    log.insert(timestamp, stored);
                }
                StoredEntry::Other(value) => {
                    tracing::warn!("Skipping malformed entry {}: {}", timestamp, value);
                }
            }
        }
        Ok(log)
    }

    async fn append(&self, message: &Message) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut raw = match self.read_raw().await? {
            Some(raw) => raw,
            None => {
                self.quarantine().await?;
                RawLog::new()
            }
        };
        raw.insert(
            message.timestamp.clone(),
            StoredEntry::Message(message.stored()),
        );
        self.write_log(&raw).await?;

        tracing::info!("Saved message: {:?}", message);
        Ok(())
    }
}
