//! Which cycle comes next.

use super::cycle::CycleType;

/// Every n-th completed work cycle earns a long break.
pub const WORK_CYCLES_PER_LONG_BREAK: u32 = 4;

/// Decide the cycle that follows `just_completed`.
///
/// `completed_work_cycles` is the counter *after* the just-completed cycle
/// was counted.
pub fn next_cycle(just_completed: CycleType, completed_work_cycles: u32) -> CycleType {
    match just_completed {
        CycleType::Work if completed_work_cycles % WORK_CYCLES_PER_LONG_BREAK == 0 => {
            CycleType::LongBreak
        }
        CycleType::Work => CycleType::ShortBreak,
        CycleType::ShortBreak | CycleType::LongBreak => CycleType::Work,
    }
}
