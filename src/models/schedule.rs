use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Maximum characters kept in a parsed schedule content.
pub const MAX_CONTENT_CHARS: usize = 256;

/// Priority tier of a schedule entry. Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    pub fn tier(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.tier()
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            other => Err(format!("无效的优先级: {other}")),
        }
    }
}

/// One schedule entry as exchanged with the caller.
///
/// Drafts are plain values: cloning yields a fully independent copy, which is
/// what the optimizer relies on when it builds candidate assignments.
/// `original_start_at` is present exactly when the entry has been displaced
/// from its originally requested start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub executor: String,
    pub content: String,
    #[serde(with = "wire_time")]
    pub start_at: NaiveDateTime,
    #[serde(with = "wire_time")]
    pub end_at: NaiveDateTime,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(
        default,
        with = "wire_time_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_start_at: Option<NaiveDateTime>,
}

impl ScheduleDraft {
    pub fn duration(&self) -> Duration {
        self.end_at - self.start_at
    }

    pub fn is_displaced(&self) -> bool {
        self.original_start_at.is_some()
    }
}

/// Read-only report of one colliding counterpart event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub content: String,
    #[serde(with = "wire_time")]
    pub start_at: NaiveDateTime,
    #[serde(with = "wire_time")]
    pub end_at: NaiveDateTime,
    pub resource: String,
    pub executor: String,
}

/// Timestamps cross the boundary as `"YYYY-MM-DD HH:MM:SS"` strings.
pub(crate) mod wire_time {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }
}

pub(crate) mod wire_time_opt {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::wire_time::FORMAT;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => serializer.serialize_some(&inner.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|value| NaiveDateTime::parse_from_str(&value, FORMAT).map_err(de::Error::custom))
            .transpose()
    }
}
