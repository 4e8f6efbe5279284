//! Real-time run events via Server-Sent Events (SSE).
//!
//! A broadcast channel carries shell-level events to connected clients:
//! progress lines while an upload is processed, and the run summary once a
//! clean finishes. Only the shells publish here; the transformation core
//! stays silent.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::CleanSummary;

/// Severity of a progress line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
}

/// An event published during a cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RunEvent {
    /// A progress line.
    #[serde(rename_all = "camelCase")]
    Log { level: LogLevel, message: String },

    /// The bookkeeping of a finished run.
    #[serde(rename_all = "camelCase")]
    Summary { summary: CleanSummary },
}

/// Global event bus.
pub static RUN_EVENTS: Lazy<RunEventBus> = Lazy::new(RunEventBus::new);

/// Fans run events out to all connected SSE clients, echoing them to stdout.
pub struct RunEventBus {
    sender: broadcast::Sender<RunEvent>,
}

impl RunEventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    pub fn publish(&self, event: RunEvent) {
        match &event {
            RunEvent::Log { level, message } => {
                let prefix = match level {
                    LogLevel::Info => "   ",
                    LogLevel::Success => "   ✓",
                    LogLevel::Warning => "   ⚠️",
                };
                println!("{} {}", prefix, message);
            }
            RunEvent::Summary { summary } => {
                println!(
                    "   ✓ sheet '{}': {} columns cleared, {} West dropped, {} eligible rows, ~{} cells blanked",
                    summary.sheet_name,
                    summary.columns_to_clear_count,
                    summary.west_columns_dropped,
                    summary.rows_eligible_by_supplier_rule,
                    summary.cleared_cells_estimate,
                );
            }
        }

        // No receivers just means no SSE clients are connected.
        let _ = self.sender.send(event);
    }

    /// Receiver for SSE streaming.
    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.sender.subscribe()
    }
}

impl Default for RunEventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(msg: impl Into<String>) {
    RUN_EVENTS.publish(RunEvent::Log { level: LogLevel::Info, message: msg.into() });
}

pub fn log_success(msg: impl Into<String>) {
    RUN_EVENTS.publish(RunEvent::Log { level: LogLevel::Success, message: msg.into() });
}

pub fn log_warning(msg: impl Into<String>) {
    RUN_EVENTS.publish(RunEvent::Log { level: LogLevel::Warning, message: msg.into() });
}

pub fn publish_summary(summary: CleanSummary) {
    RUN_EVENTS.publish(RunEvent::Summary { summary });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_event_is_tagged() {
        let event = RunEvent::Summary {
            summary: CleanSummary {
                sheet_name: "TDSheet".into(),
                columns_to_clear_count: 2,
                west_columns_dropped: 1,
                rows_eligible_by_supplier_rule: 5,
                cleared_cells_estimate: 9,
                protected_supplier: "გაგრა პლუსი".into(),
            },
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "summary");
        assert_eq!(json["summary"]["sheet_name"], "TDSheet");
        assert_eq!(json["summary"]["columns_to_clear_count"], 2);
    }

    #[test]
    fn test_log_event_is_tagged() {
        let event = RunEvent::Log {
            level: LogLevel::Warning,
            message: "nothing to clear".into(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "log");
        assert_eq!(json["level"], "warning");
    }
}
