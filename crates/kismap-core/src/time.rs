// ── Timestamp rendering ──

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

const HUMAN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time zone used when rendering capture timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStyle {
    #[default]
    Utc,
    Local,
}

impl TimeStyle {
    /// Render epoch seconds as `YYYY-MM-DD HH:MM:SS`. Out-of-range values
    /// fall back to the raw number.
    pub fn format(self, epoch_secs: i64) -> String {
        let Some(utc) = DateTime::from_timestamp(epoch_secs, 0) else {
            return epoch_secs.to_string();
        };
        match self {
            Self::Utc => utc.format(HUMAN_FORMAT).to_string(),
            Self::Local => utc.with_timezone(&Local).format(HUMAN_FORMAT).to_string(),
        }
    }
}
