//! The durable-log subsystem (§4.1 "Ambient addition"): one append-only,
//! length-prefixed postcard file per stream under `storeDir`, plus a domain
//! marker file checked on every start. This is the core's own on-disk
//! representation — no external embedded database is involved.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use bytes::Bytes;

use transport_domain::StreamName;

use crate::errors::BrokerError;

#[derive(Debug, Clone)]
pub(crate) struct StoredMessage {
    pub seq: u64,
    pub subject: String,
    pub payload: Bytes,
}

pub(crate) struct StreamStore {
    pub(crate) messages: Vec<StoredMessage>,
    next_seq: u64,
    file: Option<File>,
}

impl StreamStore {
    fn file_path(store_dir: &Path, name: StreamName) -> PathBuf {
        store_dir.join(format!("{}.log", name.as_str().to_lowercase()))
    }

    /// Opens (creating if necessary) the on-disk log for `name` and replays
    /// any existing records into memory, reconstructing sequence state.
    pub(crate) fn open(
        store_dir: &Path,
        name: StreamName,
        durable: bool,
    ) -> Result<Self, BrokerError> {
        let mut messages = Vec::new();
        let mut next_seq = 1u64;
        let file = if durable {
            let path = Self::file_path(store_dir, name);
            let mut handle = OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(&path)
                .map_err(|e| BrokerError::Io(e.to_string()))?;
            let mut bytes = Vec::new();
            handle
                .read_to_end(&mut bytes)
                .map_err(|e| BrokerError::Io(e.to_string()))?;
            let mut cursor = &bytes[..];
            while cursor.len() >= 4 {
                let len = u32::from_le_bytes([cursor[0], cursor[1], cursor[2], cursor[3]]) as usize;
                cursor = &cursor[4..];
                if cursor.len() < len {
                    break;
                }
                let record = &cursor[..len];
                cursor = &cursor[len..];
                if let Ok((seq, subject, payload)) =
                    postcard::from_bytes::<(u64, String, Vec<u8>)>(record)
                {
                    next_seq = next_seq.max(seq + 1);
                    messages.push(StoredMessage {
                        seq,
                        subject,
                        payload: Bytes::from(payload),
                    });
                }
            }
            Some(handle)
        } else {
            None
        };
        Ok(Self {
            messages,
            next_seq,
            file,
        })
    }

    pub(crate) fn append(&mut self, subject: String, payload: Bytes) -> Result<u64, BrokerError> {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(file) = self.file.as_mut() {
            let record = postcard::to_allocvec(&(seq, subject.clone(), payload.to_vec()))
                .map_err(|e| BrokerError::Io(e.to_string()))?;
            let len = (record.len() as u32).to_le_bytes();
            file.write_all(&len)
                .map_err(|e| BrokerError::Io(e.to_string()))?;
            file.write_all(&record)
                .map_err(|e| BrokerError::Io(e.to_string()))?;
            file.flush().map_err(|e| BrokerError::Io(e.to_string()))?;
        }
        self.messages.push(StoredMessage {
            seq,
            subject,
            payload,
        });
        Ok(seq)
    }
}

/// Writes the domain marker on first start, or checks it on every
/// subsequent one; a mismatch is a fatal `DomainMismatch`.
pub(crate) fn check_domain_marker(store_dir: &Path, domain: &str) -> Result<(), BrokerError> {
    fs::create_dir_all(store_dir).map_err(|e| BrokerError::Io(e.to_string()))?;
    let marker = store_dir.join("DOMAIN");
    match fs::read_to_string(&marker) {
        Ok(existing) => {
            let existing = existing.trim();
            if existing != domain {
                return Err(BrokerError::DomainMismatch {
                    on_disk: existing.to_string(),
                    requested: domain.to_string(),
                });
            }
            Ok(())
        }
        Err(_) => fs::write(&marker, domain).map_err(|e| BrokerError::Io(e.to_string())),
    }
}

pub(crate) struct PendingDelivery {
    pub delivery_count: u32,
    pub expires_at: Instant,
}

/// Broker-side state for one durable pull consumer (§4.3).
pub(crate) struct ConsumerState {
    pub stream: StreamName,
    pub filter_subjects: Vec<String>,
    pub ack_wait: Duration,
    pub max_deliver: u32,
    /// Next sequence number not yet freshly delivered.
    pub cursor: u64,
    pub pending: HashMap<u64, PendingDelivery>,
}

impl ConsumerState {
    pub(crate) fn matches(&self, subject: &str) -> bool {
        if self.filter_subjects.is_empty() {
            return true;
        }
        self.filter_subjects
            .iter()
            .any(|f| subject == f || subject.starts_with(&format!("{f}.")))
    }
}
