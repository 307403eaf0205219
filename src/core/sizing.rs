//! Task sizing and cycle duration types.
//!
//! These are the value types stored in `.cycles-config.json` and accepted as
//! tool arguments. Their serialized forms match the strings users type
//! (`"junior"`, `"0.5h"`, `"weeks"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How task sizes are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    /// Pick one tier; difficulty, duration and detail follow from it.
    Simple,
    /// Specify difficulty, duration and detail level individually.
    Granular,
}

/// Difficulty level. Also used as the simple-mode tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Junior,
    Mid,
    Senior,
}

/// Simple mode tiers share the difficulty vocabulary.
pub type SimpleTier = Difficulty;

/// Estimated task duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskDuration {
    #[serde(rename = "0.5h")]
    HalfHour,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "8h")]
    EightHours,
}

/// How much guidance a generated task document contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    High,
    Medium,
    Low,
}

/// Unit of a cycle's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Weeks,
    Months,
    Quarters,
}

/// Length of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDuration {
    pub unit: DurationUnit,
    pub value: u32,
}

/// Fully resolved sizing for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSizing {
    pub difficulty: Difficulty,
    pub duration: TaskDuration,
    pub detail_level: DetailLevel,
}

impl Difficulty {
    /// Lowercase name as used in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Mid => "mid",
            Self::Senior => "senior",
        }
    }

    /// Capitalized name for documents ("Junior").
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Mid => "Mid",
            Self::Senior => "Senior",
        }
    }

    /// Sizing implied by a simple-mode tier.
    pub fn tier_sizing(self) -> TaskSizing {
        match self {
            Self::Junior => TaskSizing {
                difficulty: Self::Junior,
                duration: TaskDuration::OneHour,
                detail_level: DetailLevel::High,
            },
            Self::Mid => TaskSizing {
                difficulty: Self::Mid,
                duration: TaskDuration::TwoHours,
                detail_level: DetailLevel::Medium,
            },
            Self::Senior => TaskSizing {
                difficulty: Self::Senior,
                duration: TaskDuration::FourHours,
                detail_level: DetailLevel::Low,
            },
        }
    }
}

impl TaskDuration {
    /// Label such as `"0.5h"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HalfHour => "0.5h",
            Self::OneHour => "1h",
            Self::TwoHours => "2h",
            Self::FourHours => "4h",
            Self::EightHours => "8h",
        }
    }

    /// Duration in hours.
    pub fn hours(self) -> f64 {
        match self {
            Self::HalfHour => 0.5,
            Self::OneHour => 1.0,
            Self::TwoHours => 2.0,
            Self::FourHours => 4.0,
            Self::EightHours => 8.0,
        }
    }
}

impl DetailLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl SizingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Granular => "granular",
        }
    }
}

impl DurationUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Quarters => "quarters",
        }
    }

    /// Allowed range of values for this unit.
    pub fn value_range(self) -> std::ops::RangeInclusive<u32> {
        match self {
            Self::Weeks => 1..=3,
            Self::Months => 1..=2,
            Self::Quarters => 1..=1,
        }
    }
}

impl CycleDuration {
    /// Create a duration, rejecting values outside the unit's range.
    pub fn new(unit: DurationUnit, value: u32) -> Result<Self, String> {
        let duration = Self { unit, value };
        duration.validate()?;
        Ok(duration)
    }

    /// Check the value against the unit's allowed range.
    pub fn validate(&self) -> Result<(), String> {
        let range = self.unit.value_range();
        if range.contains(&self.value) {
            Ok(())
        } else {
            Err(format!(
                "cycle duration of {} {} is out of range ({}-{})",
                self.value,
                self.unit.as_str(),
                range.start(),
                range.end()
            ))
        }
    }
}

impl Default for CycleDuration {
    fn default() -> Self {
        Self { unit: DurationUnit::Weeks, value: 1 }
    }
}

impl fmt::Display for CycleDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.value > 1 { "s" } else { "" };
        match self.unit {
            DurationUnit::Weeks => write!(f, "{} week{plural}", self.value),
            DurationUnit::Months => write!(f, "{} month{plural}", self.value),
            DurationUnit::Quarters => write!(f, "1 quarter (3 months)"),
        }
    }
}

macro_rules! impl_from_str_via_serde {
    ($($ty:ty => $what:literal),* $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    serde_json::from_value(serde_json::Value::String(s.to_string()))
                        .map_err(|_| format!("invalid {}: '{}'", $what, s))
                }
            }
        )*
    };
}

impl_from_str_via_serde! {
    SizingMode => "sizing mode",
    Difficulty => "difficulty",
    TaskDuration => "task duration",
    DetailLevel => "detail level",
    DurationUnit => "duration unit",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_duration_hours() {
        assert!((TaskDuration::HalfHour.hours() - 0.5).abs() < f64::EPSILON);
        assert!((TaskDuration::OneHour.hours() - 1.0).abs() < f64::EPSILON);
        assert!((TaskDuration::EightHours.hours() - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_cycle_duration() {
        let fmt = |unit, value| CycleDuration { unit, value }.to_string();
        assert_eq!(fmt(DurationUnit::Weeks, 1), "1 week");
        assert_eq!(fmt(DurationUnit::Weeks, 2), "2 weeks");
        assert_eq!(fmt(DurationUnit::Months, 1), "1 month");
        assert_eq!(fmt(DurationUnit::Months, 2), "2 months");
        assert_eq!(fmt(DurationUnit::Quarters, 1), "1 quarter (3 months)");
    }

    #[test]
    fn test_tier_sizing() {
        let junior = Difficulty::Junior.tier_sizing();
        assert_eq!(junior.duration, TaskDuration::OneHour);
        assert_eq!(junior.detail_level, DetailLevel::High);

        let senior = Difficulty::Senior.tier_sizing();
        assert_eq!(senior.difficulty, Difficulty::Senior);
        assert_eq!(senior.duration, TaskDuration::FourHours);
        assert_eq!(senior.detail_level, DetailLevel::Low);
    }

    #[test]
    fn test_cycle_duration_ranges() {
        assert!(CycleDuration::new(DurationUnit::Weeks, 3).is_ok());
        assert!(CycleDuration::new(DurationUnit::Weeks, 4).is_err());
        assert!(CycleDuration::new(DurationUnit::Months, 0).is_err());
        assert!(CycleDuration::new(DurationUnit::Quarters, 2).is_err());
    }

    #[test]
    fn test_parse_from_str() {
        assert_eq!("0.5h".parse::<TaskDuration>(), Ok(TaskDuration::HalfHour));
        assert_eq!("granular".parse::<SizingMode>(), Ok(SizingMode::Granular));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TaskDuration::TwoHours).unwrap();
        assert_eq!(json, "\"2h\"");
        let unit: DurationUnit = serde_json::from_str("\"quarters\"").unwrap();
        assert_eq!(unit, DurationUnit::Quarters);
    }
}
