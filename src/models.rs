use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Progress of a study task. Any status text outside the three known states
/// is kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::Other(s) => s,
        }
    }

    /// Sort bucket: Not Started < In Progress < everything else.
    pub fn rank(&self) -> u8 {
        match self {
            Status::NotStarted => 1,
            Status::InProgress => 2,
            _ => 3,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Status::Completed => "✓",
            Status::InProgress => "●",
            Status::NotStarted => "○",
            Status::Other(_) => "?",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        match s {
            "Not Started" => Status::NotStarted,
            "In Progress" => Status::InProgress,
            "Completed" => Status::Completed,
            other => Status::Other(other.to_string()),
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::from(s.as_str())
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        s.as_str().to_string()
    }
}

/// Task priority. Unrecognised text is kept in `Other` and sorts with `Low`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(s) => s,
        }
    }

    /// Sort bucket: High < Medium < everything else.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            _ => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        match s {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            other => Priority::Other(other.to_string()),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::from(s.as_str())
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.as_str().to_string()
    }
}

/// Hours assumed for a new task when none is given
pub const DEFAULT_TIME_NEEDED: f64 = 1.0;

/// A stored study task.
///
/// Status, priority and time estimate are optional on read-back because an
/// update replaces every field, including with nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub subject: Option<String>,
    pub status: Option<Status>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub time_needed: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Task fields as written to the store by create and update.
///
/// `title` stays optional here so a missing title reaches the store and is
/// rejected by its NOT NULL constraint. This is also the body of
/// `PUT /api/tasks/{id}`, where a missing key and `null` both clear the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub time_needed: Option<f64>,
}

impl TaskInput {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Body of `POST /api/tasks`.
///
/// Status, priority and time needed are `None` when the key is missing and
/// `Some(None)` when it is sent as `null`. Only missing keys get defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<Status>>,
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "present")]
    pub priority: Option<Option<Priority>>,
    #[serde(default, deserialize_with = "present")]
    pub time_needed: Option<Option<f64>>,
}

impl NewTask {
    /// Resolve into the row to insert, filling defaults for missing keys
    pub fn into_input(self) -> TaskInput {
        TaskInput {
            title: self.title,
            subject: self.subject,
            status: self.status.unwrap_or_else(|| Some(Status::default())),
            due_date: self.due_date,
            priority: self.priority.unwrap_or_else(|| Some(Priority::default())),
            time_needed: self.time_needed.unwrap_or(Some(DEFAULT_TIME_NEEDED)),
        }
    }
}

/// Unset fields of a `TaskInput` count as missing keys.
impl From<TaskInput> for NewTask {
    fn from(input: TaskInput) -> Self {
        Self {
            title: input.title,
            subject: input.subject,
            status: input.status.map(Some),
            due_date: input.due_date,
            priority: input.priority.map(Some),
            time_needed: input.time_needed.map(Some),
        }
    }
}

/// The settings singleton (always row id 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(with = "hhmm")]
    pub study_start_time: Option<NaiveTime>,
    #[serde(with = "hhmm")]
    pub study_end_time: Option<NaiveTime>,
    pub excluded_days: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            study_start_time: NaiveTime::from_hms_opt(9, 0, 0),
            study_end_time: NaiveTime::from_hms_opt(17, 0, 0),
            excluded_days: Some(String::new()),
        }
    }
}

/// Request body for overwriting the settings singleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default, with = "hhmm")]
    pub study_start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm")]
    pub study_end_time: Option<NaiveTime>,
    /// `None` when the key is missing, `Some(None)` when sent as `null`
    #[serde(default, deserialize_with = "present")]
    pub excluded_days: Option<Option<String>>,
}

impl SettingsUpdate {
    /// Resolve into the record that gets written. A missing `excluded_days`
    /// becomes empty text; an explicit `null` is stored as NULL.
    pub fn into_settings(self) -> Settings {
        Settings {
            study_start_time: self.study_start_time,
            study_end_time: self.study_end_time,
            excluded_days: self.excluded_days.unwrap_or_else(|| Some(String::new())),
        }
    }
}

/// Marks a key as sent, keeping an explicit `null` as `Some(None)`.
/// Pair with `#[serde(default)]` so a missing key stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some).map_err(serde::de::Error::custom),
    }
}

pub fn parse_date(s: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| crate::StrideError::InvalidDate(s.to_string()))
}

pub fn parse_time(s: &str) -> crate::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| crate::StrideError::InvalidTime(s.to_string()))
}

pub fn format_time(t: &NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Clock times as `HH:MM` text.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&super::format_time(t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_time(s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
