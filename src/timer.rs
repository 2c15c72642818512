use std::num::NonZeroU32;

/// Quick-select durations offered next to the timer display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    TenMinutes,
    OneMinute,
    FifteenSeconds,
    SixSeconds,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::TenMinutes,
        Preset::OneMinute,
        Preset::FifteenSeconds,
        Preset::SixSeconds,
    ];

    pub fn seconds(self) -> NonZeroU32 {
        let secs = match self {
            Preset::TenMinutes => NonZeroU32::new(600),
            Preset::OneMinute => NonZeroU32::new(60),
            Preset::FifteenSeconds => NonZeroU32::new(15),
            Preset::SixSeconds => NonZeroU32::new(6),
        };
        secs.unwrap_or(NonZeroU32::MIN)
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::TenMinutes => "10分",
            Preset::OneMinute => "1分",
            Preset::FifteenSeconds => "15秒",
            Preset::SixSeconds => "6秒",
        }
    }

    /// Maps the number keys 1-4 onto the presets in display order.
    pub fn from_digit(c: char) -> Option<Preset> {
        let idx = c.to_digit(10)? as usize;
        idx.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// What a single tick did to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed
    Idle,
    /// One second was taken off the remaining time
    Counted,
    /// Remaining time was already zero: the bell should ring and the timer
    /// has been rearmed to its preset
    Expired,
}

/// Countdown timer.
///
/// Remaining time is held as a single total of seconds; minutes and seconds
/// shown on screen are derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    remaining: u32,
    running: bool,
    preset: NonZeroU32,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(Preset::TenMinutes.seconds())
    }
}

impl CountdownTimer {
    pub fn new(preset: NonZeroU32) -> Self {
        Self {
            remaining: preset.get(),
            running: false,
            preset,
        }
    }

    /// Stop any run and rearm with a new preset.
    pub fn set_preset(&mut self, preset: NonZeroU32) {
        self.preset = preset;
        self.stop();
    }

    /// Returns true if this call started the timer.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stop and rearm with the current preset.
    pub fn stop(&mut self) {
        self.running = false;
        self.remaining = self.preset.get();
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        if self.remaining == 0 {
            self.stop();
            return TickOutcome::Expired;
        }

        self.remaining -= 1;
        TickOutcome::Counted
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn preset(&self) -> NonZeroU32 {
        self.preset
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn minutes(&self) -> u32 {
        self.remaining / 60
    }

    pub fn seconds(&self) -> u32 {
        self.remaining % 60
    }

    /// `MM:SS`, zero padded
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn secs(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn default_is_ten_minutes_stopped() {
        let timer = CountdownTimer::default();

        assert_eq!(timer.display(), "10:00");
        assert_eq!(timer.preset().get(), 600);
        assert!(!timer.is_running());
    }

    #[test]
    fn ticks_do_nothing_while_stopped() {
        let mut timer = CountdownTimer::default();

        assert_matches!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining_secs(), 600);
    }

    #[test]
    fn each_tick_takes_one_second() {
        let mut timer = CountdownTimer::new(secs(61));
        timer.start();

        assert_matches!(timer.tick(), TickOutcome::Counted);
        assert_eq!(timer.display(), "01:00");
        assert_matches!(timer.tick(), TickOutcome::Counted);
        assert_eq!(timer.display(), "00:59");
    }

    #[test]
    fn expiry_rings_once_and_rearms() {
        let mut timer = CountdownTimer::new(Preset::SixSeconds.seconds());
        timer.start();

        for expected in (0..6).rev() {
            assert_matches!(timer.tick(), TickOutcome::Counted);
            assert_eq!(timer.remaining_secs(), expected);
            assert!(timer.is_running());
        }

        assert_matches!(timer.tick(), TickOutcome::Expired);
        assert_eq!(timer.display(), "00:06");
        assert!(!timer.is_running());

        // Rearmed, not counting
        assert_matches!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.display(), "00:06");
    }

    #[test]
    fn preset_while_running_stops_and_rearms() {
        let mut timer = CountdownTimer::default();
        timer.start();
        timer.tick();
        timer.tick();

        timer.set_preset(Preset::OneMinute.seconds());

        assert!(!timer.is_running());
        assert_eq!(timer.display(), "01:00");
        assert_eq!(timer.preset().get(), 60);
    }

    #[test]
    fn pause_then_start_resumes_where_it_left_off() {
        let mut timer = CountdownTimer::new(Preset::FifteenSeconds.seconds());
        timer.start();
        for _ in 0..4 {
            timer.tick();
        }

        timer.pause();
        assert_eq!(timer.remaining_secs(), 11);
        assert_matches!(timer.tick(), TickOutcome::Idle);

        assert!(timer.start());
        assert_eq!(timer.remaining_secs(), 11);
        timer.tick();
        assert_eq!(timer.remaining_secs(), 10);
    }

    #[test]
    fn start_is_idempotent() {
        let mut timer = CountdownTimer::default();

        assert!(timer.start());
        assert!(!timer.start());
        assert!(timer.is_running());
    }

    #[test]
    fn stop_keeps_preset_and_resets_remaining() {
        let mut timer = CountdownTimer::new(secs(90));
        timer.start();
        timer.tick();
        timer.stop();

        assert_eq!(timer.display(), "01:30");
        assert_eq!(timer.preset().get(), 90);
        assert!(!timer.is_running());
    }

    #[test]
    fn preset_digits_map_in_display_order() {
        assert_eq!(Preset::from_digit('1'), Some(Preset::TenMinutes));
        assert_eq!(Preset::from_digit('4'), Some(Preset::SixSeconds));
        assert_eq!(Preset::from_digit('0'), None);
        assert_eq!(Preset::from_digit('5'), None);
        assert_eq!(Preset::from_digit('x'), None);
    }

    #[test]
    fn preset_values_and_labels() {
        let values: Vec<u32> = Preset::ALL.iter().map(|p| p.seconds().get()).collect();
        assert_eq!(values, vec![600, 60, 15, 6]);
        assert_eq!(Preset::FifteenSeconds.label(), "15秒");
    }
}
