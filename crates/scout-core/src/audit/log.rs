//! Append-only, rotating, crash-resistant JSON-Lines audit log.
//!
//! One process owns one open handle; the handle's methods take exclusive
//! access through a single mutex. The critical section guarded by that
//! mutex is strictly the write-plus-counter-update -- `fsync` is issued
//! after releasing the lock, on a file handle cloned while still holding
//! it, matching the narrow-critical-section style the rest of this crate
//! uses for its synchronized state.

use super::event::{Event, EventKind};
use crate::error::{ScoutError, ScoutResult};
use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rotate when the current log file reaches this size.
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;

/// Fsync after this many buffered lines...
const FSYNC_EVERY_LINES: u32 = 10;
/// ...or after this much wall time, whichever comes first.
const FSYNC_EVERY: Duration = Duration::from_secs(1);

struct OpenHandle {
    writer: LineWriter<File>,
    lines_since_fsync: u32,
    last_fsync: Instant,
}

/// A durable, append-only event journal.
///
/// Opens lazily on the first write; stays open with line buffering
/// thereafter. Rotation and fsync cadence are internal to [`Self::append`]
/// and never visible to callers beyond the `AccuracyMetrics`/`query`
/// results they affect.
pub struct AuditLog {
    path: PathBuf,
    handle: Mutex<Option<OpenHandle>>,
}

/// Aggregate accuracy figures over a time window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyMetrics {
    pub total_nav: u64,
    pub validation_fail_count: u64,
    pub accuracy_pct: f64,
}

impl AuditLog {
    /// The conventional default path, `~/.scout/audit.jsonl`.
    pub fn default_path() -> ScoutResult<PathBuf> {
        let home = std::env::var_os("HOME").ok_or(ScoutError::NoHomeDirectory)?;
        Ok(PathBuf::from(home).join(".scout").join("audit.jsonl"))
    }

    /// Construct a log bound to `path`. No file is opened or created
    /// until the first [`Self::append`] call.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            handle: Mutex::new(None),
        }
    }

    /// Append `event` as a single JSON line, rotating first if the
    /// current file has crossed the size threshold, and fsyncing on
    /// cadence. Rotation failures are logged and do not block the write.
    pub fn append(&self, event: &Event) -> ScoutResult<()> {
        let line = serde_json::to_string(event)
            .map_err(|source| ScoutError::Other(source.into()))?;

        let mut guard = self.handle.lock().expect("audit log mutex poisoned");
        self.ensure_open(&mut guard)?;

        if self.current_len(&guard) >= ROTATE_AT_BYTES {
            if let Err(err) = self.rotate(&mut guard) {
                tracing::warn!(error = %err, "audit log rotation failed, continuing without rotating");
            }
            self.ensure_open(&mut guard)?;
        }

        let handle = guard.as_mut().expect("just ensured open");
        handle
            .writer
            .write_all(line.as_bytes())
            .and_then(|_| handle.writer.write_all(b"\n"))
            .map_err(|source| ScoutError::FileWrite {
                path: self.path.clone(),
                source,
            })?;
        handle.lines_since_fsync += 1;

        let should_fsync = handle.lines_since_fsync >= FSYNC_EVERY_LINES
            || handle.last_fsync.elapsed() >= FSYNC_EVERY;

        let cloned = if should_fsync {
            handle.lines_since_fsync = 0;
            handle.last_fsync = Instant::now();
            handle.writer.flush().ok();
            handle.writer.get_ref().try_clone().ok()
        } else {
            None
        };
        drop(guard);

        if let Some(file) = cloned {
            if let Err(err) = file.sync_all() {
                tracing::warn!(error = %err, "audit log fsync failed");
            }
        }

        Ok(())
    }

    fn ensure_open(&self, guard: &mut Option<OpenHandle>) -> ScoutResult<()> {
        if guard.is_some() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ScoutError::FileWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| ScoutError::FileWrite {
                path: self.path.clone(),
                source,
            })?;
        *guard = Some(OpenHandle {
            writer: LineWriter::new(file),
            lines_since_fsync: 0,
            last_fsync: Instant::now(),
        });
        Ok(())
    }

    fn current_len(&self, guard: &Option<OpenHandle>) -> u64 {
        guard
            .as_ref()
            .and_then(|h| h.writer.get_ref().metadata().ok())
            .map(|m| m.len())
            .unwrap_or(0)
    }

    /// Gzip the current file to `<stem>_<YYYYMMDD_HHMMSS>.jsonl.gz`,
    /// truncate the original, and drop the open handle so the next write
    /// reopens it fresh.
    fn rotate(&self, guard: &mut Option<OpenHandle>) -> ScoutResult<()> {
        if let Some(handle) = guard.as_mut() {
            handle.writer.flush().ok();
        }
        *guard = None;

        let contents = std::fs::read(&self.path).map_err(|source| ScoutError::FileRead {
            path: self.path.clone(),
            source,
        })?;

        let archive_path = self.archive_path();
        let archive = File::create(&archive_path).map_err(|source| ScoutError::FileWrite {
            path: archive_path.clone(),
            source,
        })?;
        let mut encoder = GzEncoder::new(archive, Compression::default());
        encoder
            .write_all(&contents)
            .map_err(|source| ScoutError::FileWrite {
                path: archive_path.clone(),
                source,
            })?;
        encoder
            .finish()
            .map_err(|source| ScoutError::FileWrite {
                path: archive_path,
                source,
            })?;

        std::fs::File::create(&self.path).map_err(|source| ScoutError::FileWrite {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }

    fn archive_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audit");
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let suffix = Utc::now().format("%Y%m%d_%H%M%S");
        parent.join(format!("{stem}_{suffix}.jsonl.gz"))
    }

    /// Flush, fsync, and close the current handle. Subsequent writes
    /// reopen it.
    pub fn close(&self) -> ScoutResult<()> {
        let mut guard = self.handle.lock().expect("audit log mutex poisoned");
        if let Some(handle) = guard.as_mut() {
            handle
                .writer
                .flush()
                .map_err(|source| ScoutError::FileWrite {
                    path: self.path.clone(),
                    source,
                })?;
            handle
                .writer
                .get_ref()
                .sync_all()
                .map_err(|source| ScoutError::FileWrite {
                    path: self.path.clone(),
                    source,
                })?;
        }
        *guard = None;
        Ok(())
    }

    /// Stream every line of the current log file, parsing each as JSON
    /// independently. Malformed lines are skipped with a warning rather
    /// than aborting the read -- a torn write or hand-edit never halts
    /// querying.
    fn stream_events(&self) -> impl Iterator<Item = Event> + '_ {
        let file = File::open(&self.path).ok();
        let reader = file.map(BufReader::new);
        reader
            .into_iter()
            .flat_map(|r| r.lines())
            .filter_map(|line| match line {
                Ok(line) if !line.trim().is_empty() => match serde_json::from_str::<Event>(&line) {
                    Ok(event) => Some(event),
                    Err(err) => {
                        tracing::warn!(error = %err, "skipping corrupt audit log line");
                        None
                    }
                },
                _ => None,
            })
    }

    /// All events matching `since`/`event_type`, in write order.
    pub fn query(&self, since: Option<DateTime<Utc>>, event_type: Option<&EventKind>) -> Vec<Event> {
        self.stream_events()
            .filter(|e| since.is_none_or(|s| e.timestamp >= s))
            .filter(|e| event_type.is_none_or(|k| &e.event == k))
            .collect()
    }

    /// Sum of `cost` over events from `now - hours` to `now`.
    pub fn hourly_spend(&self, hours: f64) -> f64 {
        let cutoff = Utc::now() - chrono::Duration::milliseconds((hours * 3_600_000.0) as i64);
        self.stream_events()
            .filter(|e| e.timestamp >= cutoff)
            .filter_map(|e| e.cost)
            .sum()
    }

    /// The last `n` events matching `event_type`, using a bounded deque
    /// during the stream so memory stays proportional to `n`, never to
    /// the log's full length.
    pub fn last_events(&self, n: usize, event_type: Option<&EventKind>) -> Vec<Event> {
        let mut window: VecDeque<Event> = VecDeque::with_capacity(n);
        for event in self.stream_events() {
            if let Some(kind) = event_type {
                if &event.event != kind {
                    continue;
                }
            }
            if window.len() == n {
                window.pop_front();
            }
            window.push_back(event);
        }
        window.into_iter().collect()
    }

    /// Accuracy figures since `since`: total `nav` events, how many
    /// `validation_fail` events occurred, and the resulting pass rate.
    pub fn accuracy_metrics(&self, since: DateTime<Utc>) -> AccuracyMetrics {
        let mut total_nav = 0u64;
        let mut validation_fail_count = 0u64;
        for event in self.stream_events().filter(|e| e.timestamp >= since) {
            match event.event {
                EventKind::Nav => total_nav += 1,
                EventKind::ValidationFail => validation_fail_count += 1,
                _ => {}
            }
        }
        let accuracy_pct = if total_nav == 0 {
            100.0
        } else {
            100.0 * (1.0 - (validation_fail_count as f64 / total_nav as f64))
        };
        AccuracyMetrics {
            total_nav,
            validation_fail_count,
            accuracy_pct,
        }
    }
}
