use crate::core::{HistoryEntry, MessageLog};
use chrono::NaiveDateTime;

/// Reduces a stored timestamp to `HH:MM`. Keys that do not parse are shown as-is.
pub fn display_time(timestamp: &str) -> String {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f")
        .map(|ts| ts.format("%H:%M").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

/// 依時間戳排序（最舊在前）
pub fn build_history(log: &MessageLog) -> Vec<HistoryEntry> {
    log.iter()
        .map(|(timestamp, stored)| HistoryEntry {
            time: display_time(timestamp),
            timestamp: timestamp.clone(),
            username: stored.username.clone(),
            message: stored.message.clone(),
        })
        .collect()
}
