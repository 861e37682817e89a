mod cycle;
mod driver;
mod durations;
mod engine;
mod rotator;
mod ticker;

pub use cycle::{CycleType, RunState};
pub use driver::FocusDriver;
pub use durations::{
    DurationPolicy, DurationProfile, DEFAULT_LONG_BREAK_MINUTES, DEFAULT_SHORT_BREAK_MINUTES,
    DEFAULT_WORK_MINUTES,
};
pub use engine::{Completion, FocusTimer, TimerState};
pub use rotator::{next_cycle, WORK_CYCLES_PER_LONG_BREAK};
pub use ticker::{Ticker, TICK_PERIOD};
