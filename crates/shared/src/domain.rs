use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned record identifier. The backend hands out either integers or
/// opaque strings depending on its store, so both are accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Ok(match raw.parse::<i64>() {
            Ok(value) => Self::Number(value),
            Err(_) => Self::Text(raw.to_string()),
        })
    }
}

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub RecordId);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(RecordId::Number(value))
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                raw.parse().map(Self)
            }
        }
    };
}

id_newtype!(DivisionId);
id_newtype!(TeacherId);
id_newtype!(SubjectId);
id_newtype!(ClassroomId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Classroom,
    Lab,
}

impl FromStr for RoomType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "classroom" => Ok(Self::Classroom),
            "lab" => Ok(Self::Lab),
            other => Err(format!("unknown room type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubjectType {
    #[default]
    Lecture,
    Lab,
}

impl FromStr for SubjectType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lecture" => Ok(Self::Lecture),
            "lab" => Ok(Self::Lab),
            other => Err(format!("unknown subject type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub subject_type: SubjectType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionPayload {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherPayload {
    pub name: String,
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassroomPayload {
    pub number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// Days offered by the settings form, in canonical order.
    pub const SELECTABLE: [Weekday; 6] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    pub const WORKWEEK: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    pub fn is_selectable(self) -> bool {
        Self::SELECTABLE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mon => "Mon",
            Self::Tue => "Tue",
            Self::Wed => "Wed",
            Self::Thu => "Thu",
            Self::Fri => "Fri",
            Self::Sat => "Sat",
            Self::Sun => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        [
            Self::Mon,
            Self::Tue,
            Self::Wed,
            Self::Thu,
            Self::Fri,
            Self::Sat,
            Self::Sun,
        ]
        .into_iter()
        .find(|day| day.as_str().eq_ignore_ascii_case(raw))
        .ok_or_else(|| format!("unknown weekday `{raw}`"))
    }
}

pub const DEFAULT_START_HOUR: u8 = 9;
pub const DEFAULT_END_HOUR: u8 = 17;
pub const DEFAULT_LUNCH_START_HOUR: u8 = 12;
pub const MAX_HOUR: u8 = 23;

/// The singleton timetable settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDocument {
    pub days: Vec<Weekday>,
    pub start_hour: u8,
    pub end_hour: u8,
    pub lunch_start_hour: u8,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            days: Weekday::WORKWEEK.to_vec(),
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            lunch_start_hour: DEFAULT_LUNCH_START_HOUR,
        }
    }
}

impl SettingsDocument {
    /// Copy with `days` de-duplicated and sorted Mon..Sun, as sent on the wire.
    pub fn canonicalized(&self) -> Self {
        let mut days = self.days.clone();
        days.sort();
        days.dedup();
        Self {
            days,
            ..self.clone()
        }
    }

    /// Overlays the present fields. Repeated days keep their first position.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(days) = patch.days {
            let mut unique = Vec::with_capacity(days.len());
            for day in days {
                if !unique.contains(&day) {
                    unique.push(day);
                }
            }
            self.days = unique;
        }
        if let Some(hour) = patch.start_hour {
            self.start_hour = hour;
        }
        if let Some(hour) = patch.end_hour {
            self.end_hour = hour;
        }
        if let Some(hour) = patch.lunch_start_hour {
            self.lunch_start_hour = hour;
        }
    }
}

/// A settings document as stored server side, where any field may be absent
/// or carry a value of the wrong shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub days: Option<Vec<Weekday>>,
    pub start_hour: Option<u8>,
    pub end_hour: Option<u8>,
    pub lunch_start_hour: Option<u8>,
}

impl SettingsPatch {
    /// Returns `None` when the server holds no document (`null` or non-object).
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let days = object.get("days").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|day| day.parse().ok())
                .collect()
        });
        // Whole-number floats such as `9.0` count as hours too.
        let hour = |key: &str| {
            let value = object.get(key)?;
            let whole = match value.as_i64() {
                Some(whole) => whole,
                None => {
                    let float = value.as_f64()?;
                    if float.fract() != 0.0 {
                        return None;
                    }
                    float as i64
                }
            };
            u8::try_from(whole).ok()
        };

        Some(Self {
            days,
            start_hour: hour("start_hour"),
            end_hour: hour("end_hour"),
            lunch_start_hour: hour("lunch_start_hour"),
        })
    }
}
