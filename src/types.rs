use std::fmt;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Configuration stored in ~/.mindflow/config.json
///
/// Every field is optional; a missing file behaves like an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Overrides the default `~/.mindflow/mindflow.db` location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    /// IANA zone name (e.g. "Asia/Shanghai"). System local time when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Recorded in backup files as the exporting device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
}

impl Config {
    /// Parse the configured timezone. Unknown names are logged and ignored.
    pub fn resolved_timezone(&self) -> Option<Tz> {
        let name = self.timezone.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(e) => {
                log::warn!("Ignoring unknown timezone '{}': {}", name, e);
                None
            }
        }
    }

    pub fn device_name(&self) -> &str {
        self.device_name.as_deref().unwrap_or(std::env::consts::OS)
    }
}

/// Task priority, stored as an ordinal (low=1, medium=2, high=3).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "i64")]
pub enum Priority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
}

impl From<i64> for Priority {
    /// Out-of-range levels clamp to the nearest defined priority.
    fn from(level: i64) -> Self {
        match level {
            i64::MIN..=1 => Priority::Low,
            2 => Priority::Medium,
            _ => Priority::High,
        }
    }
}

impl From<Priority> for i64 {
    fn from(priority: Priority) -> Self {
        priority as i64
    }
}

/// Task category as seen by queries and analysis.
///
/// Records keep their category as free text; this is the classified view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Work,
    Study,
    Life,
    Fitness,
    Idea,
    Other,
}

impl Category {
    /// The four categories that are scored individually.
    pub const STANDARD: [Category; 4] = [
        Category::Work,
        Category::Study,
        Category::Life,
        Category::Fitness,
    ];

    /// Classify a stored category label.
    ///
    /// Accepts the English keys and the labels written by the mobile app.
    pub fn classify(label: &str) -> Self {
        match label.trim() {
            "工作" => Category::Work,
            "学习" => Category::Study,
            "生活" => Category::Life,
            "健身" => Category::Fitness,
            "灵感" => Category::Idea,
            other => match other.to_ascii_lowercase().as_str() {
                "work" => Category::Work,
                "study" => Category::Study,
                "life" => Category::Life,
                "fitness" => Category::Fitness,
                "idea" | "inspiration" => Category::Idea,
                _ => Category::Other,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Study => "study",
            Category::Life => "life",
            Category::Fitness => "fitness",
            Category::Idea => "idea",
            Category::Other => "other",
        }
    }

    /// Label the mobile app stores in the category column.
    pub fn app_label(&self) -> &'static str {
        match self {
            Category::Work => "工作",
            Category::Study => "学习",
            Category::Life => "生活",
            Category::Fitness => "健身",
            Category::Idea => "灵感",
            Category::Other => "其他",
        }
    }

    /// Capitalized display name.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Study => "Study",
            Category::Life => "Life",
            Category::Fitness => "Fitness",
            Category::Idea => "Idea",
            Category::Other => "Other",
        }
    }

    pub fn is_standard(&self) -> bool {
        Self::STANDARD.contains(self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A to-do or inspiration record as held by the task store.
///
/// Timestamps are epoch milliseconds and are interpreted in the local zone
/// wherever a calendar date is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: i64,
    pub title: String,
    #[serde(rename = "content", default)]
    pub body: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(rename = "isDone", default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_uris: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
    #[serde(rename = "isIncubated", default)]
    pub incubated: bool,
    #[serde(rename = "isFromInspiration", default)]
    pub from_inspiration: bool,
}

impl TaskRecord {
    /// A pending, medium-priority record with no dates set.
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        TaskRecord {
            title: title.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn category_kind(&self) -> Category {
        Category::classify(&self.category)
    }

    pub fn is_idea(&self) -> bool {
        self.category_kind() == Category::Idea
    }
}
