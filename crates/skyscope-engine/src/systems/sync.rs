//! Debounced, sequence-numbered synchronization with the data source.

use crate::bridge::protocol::StatusSummary;
use crate::core::timer::DebounceTimer;

/// Coalesces sync requests and tracks which response is current.
///
/// Every issued request gets the next sequence number. Only a response
/// carrying the latest number may be applied.
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    timer: DebounceTimer,
    delay_ms: f64,
    last_issued: u64,
}

impl UpdateScheduler {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            timer: DebounceTimer::new(),
            delay_ms,
            last_issued: 0,
        }
    }

    /// Restart the debounce window.
    pub fn request(&mut self, now_ms: f64) {
        self.timer.schedule(now_ms, self.delay_ms);
    }

    /// Drop any pending window and issue right away.
    pub fn issue_now(&mut self) -> u64 {
        self.timer.cancel();
        self.last_issued += 1;
        log::debug!("sync #{} issued", self.last_issued);
        self.last_issued
    }

    /// Issue if the debounce window has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<u64> {
        self.timer.poll(now_ms).then(|| self.issue_now())
    }

    /// Whether a response with `seq` is the current one.
    pub fn accept(&self, seq: u64) -> bool {
        if seq == self.last_issued && seq != 0 {
            true
        } else {
            log::warn!("discarding stale sync #{seq} (latest #{})", self.last_issued);
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }
}

const NOT_AVAILABLE: &str = "N/A";

/// How the status line was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSource {
    /// Not synced yet.
    Local,
    Confirmed,
    /// The response carried no status.
    Unknown,
    /// The sync failed.
    Error,
}

/// The status line shown under the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub zoom_level: i32,
    pub mode_label: String,
    pub clock: String,
    pub scale_info: String,
    pub selected: Option<String>,
    pub source: StatusSource,
}

impl StatusLine {
    /// Status built from local state only.
    pub fn local(zoom_level: i32, mode_label: &str, clock: &str, selected: Option<&str>) -> Self {
        Self {
            zoom_level,
            mode_label: mode_label.to_string(),
            clock: clock.to_string(),
            scale_info: NOT_AVAILABLE.to_string(),
            selected: selected.map(str::to_string),
            source: StatusSource::Local,
        }
    }

    /// Merge a server summary over the local fallback values.
    pub fn confirmed(summary: &StatusSummary, local: StatusLine) -> Self {
        Self {
            zoom_level: summary.zoom_level.unwrap_or(local.zoom_level),
            mode_label: summary.mode_label.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
            clock: summary.clock.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            scale_info: summary.scale_info.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            selected: summary.selected.clone(),
            source: StatusSource::Confirmed,
        }
    }

    /// The response had no status payload.
    pub fn unknown(local: StatusLine) -> Self {
        Self {
            mode_label: "UNKNOWN".to_string(),
            source: StatusSource::Unknown,
            ..local
        }
    }

    /// The sync failed.
    pub fn error(local: StatusLine) -> Self {
        Self {
            mode_label: "ERROR".to_string(),
            source: StatusSource::Error,
            ..local
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, StatusSource::Unknown | StatusSource::Error)
    }

    /// `MODE | clock | scale`.
    pub fn text(&self) -> String {
        format!("{} | {} | {}", self.mode_label, self.clock, self.scale_info)
    }

    pub fn zoom_text(&self) -> String {
        format!("Level: {}", self.zoom_level)
    }
}
