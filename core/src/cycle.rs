//! Day/night cycle arithmetic.

/// Repeating day/night schedule measured in simulation steps.
///
/// Every cycle starts with daylight; the final `night_length` steps of each
/// cycle are night.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DayNightCycle {
    cycle_length: u32,
    night_length: u32,
}

impl DayNightCycle {
    /// Standard schedule: 40-step cycles whose last 10 steps are night.
    pub const STANDARD: Self = Self::new(40, 10);

    /// Creates a schedule with explicit lengths.
    #[must_use]
    pub const fn new(cycle_length: u32, night_length: u32) -> Self {
        Self {
            cycle_length,
            night_length,
        }
    }

    /// Total steps in one cycle.
    #[must_use]
    pub const fn cycle_length(&self) -> u32 {
        self.cycle_length
    }

    /// Steps of night at the end of each cycle.
    #[must_use]
    pub const fn night_length(&self) -> u32 {
        self.night_length
    }

    /// Steps of daylight at the start of each cycle.
    #[must_use]
    pub const fn day_length(&self) -> u32 {
        self.cycle_length.saturating_sub(self.night_length)
    }

    /// Steps left before the current cycle's night begins.
    ///
    /// The value is zero or negative while it is already night.
    #[must_use]
    pub fn steps_until_night(&self, step: u32) -> i64 {
        if self.cycle_length == 0 {
            return 0;
        }

        let phase = step % self.cycle_length;
        i64::from(self.day_length()) - i64::from(phase)
    }

    /// Whether `step` falls into the night part of its cycle.
    #[must_use]
    pub fn is_night(&self, step: u32) -> bool {
        self.steps_until_night(step) <= 0
    }
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::STANDARD
    }
}
