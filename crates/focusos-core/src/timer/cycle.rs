use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleType {
    Work,
    ShortBreak,
    LongBreak,
}

impl CycleType {
    pub const ALL: [CycleType; 3] = [CycleType::Work, CycleType::ShortBreak, CycleType::LongBreak];

    pub fn as_str(&self) -> &'static str {
        match self {
            CycleType::Work => "work",
            CycleType::ShortBreak => "short_break",
            CycleType::LongBreak => "long_break",
        }
    }

    pub fn is_work(&self) -> bool {
        matches!(self, CycleType::Work)
    }

    pub fn is_break(&self) -> bool {
        !self.is_work()
    }
}

impl fmt::Display for CycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CycleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(CycleType::Work),
            "short_break" => Ok(CycleType::ShortBreak),
            "long_break" => Ok(CycleType::LongBreak),
            other => Err(format!("unknown cycle type: {other}")),
        }
    }
}

/// Whether the clock is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
}
