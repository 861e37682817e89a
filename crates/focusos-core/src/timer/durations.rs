//! Cycle durations resolved from user preferences.

use serde::{Deserialize, Serialize};

use super::cycle::CycleType;

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;

/// Raw duration preferences as stored on a profile. Any field may be
/// missing or nonsensical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationProfile {
    #[serde(default)]
    pub work_minutes: Option<i64>,
    #[serde(default)]
    pub short_break_minutes: Option<i64>,
    #[serde(default)]
    pub long_break_minutes: Option<i64>,
}

impl DurationProfile {
    /// Fill the fields missing here from `fallback`.
    pub fn or(self, fallback: DurationProfile) -> Self {
        Self {
            work_minutes: self.work_minutes.or(fallback.work_minutes),
            short_break_minutes: self.short_break_minutes.or(fallback.short_break_minutes),
            long_break_minutes: self.long_break_minutes.or(fallback.long_break_minutes),
        }
    }
}

/// The three cycle durations in minutes. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationPolicy {
    pub work: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl DurationPolicy {
    /// Resolve a policy from profile preferences. Never fails: absent,
    /// zero, negative or out-of-range values fall back to the defaults.
    pub fn resolve(profile: &DurationProfile) -> Self {
        Self {
            work: positive_or(profile.work_minutes, DEFAULT_WORK_MINUTES),
            short_break: positive_or(profile.short_break_minutes, DEFAULT_SHORT_BREAK_MINUTES),
            long_break: positive_or(profile.long_break_minutes, DEFAULT_LONG_BREAK_MINUTES),
        }
    }

    pub fn minutes(&self, cycle: CycleType) -> u32 {
        match cycle {
            CycleType::Work => self.work,
            CycleType::ShortBreak => self.short_break,
            CycleType::LongBreak => self.long_break,
        }
    }

    pub fn seconds(&self, cycle: CycleType) -> u64 {
        u64::from(self.minutes(cycle)).saturating_mul(60)
    }
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK_MINUTES,
            short_break: DEFAULT_SHORT_BREAK_MINUTES,
            long_break: DEFAULT_LONG_BREAK_MINUTES,
        }
    }
}

fn positive_or(value: Option<i64>, default: u32) -> u32 {
    value
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}
