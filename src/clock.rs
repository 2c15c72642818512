use chrono::{DateTime, Local, Timelike};

/// Source of wall-clock time for the header and the script's date token
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at a given instant, for tests and previews
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Header label, e.g. `9:05:03`
pub fn time_label(t: &DateTime<Local>) -> String {
    format!("{}:{:02}:{:02}", t.hour(), t.minute(), t.second())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn label_pads_minutes_and_seconds_only() {
        let t = Local.with_ymd_and_hms(2024, 4, 2, 9, 5, 3).unwrap();
        assert_eq!(time_label(&t), "9:05:03");

        let t = Local.with_ymd_and_hms(2024, 4, 2, 21, 30, 0).unwrap();
        assert_eq!(time_label(&t), "21:30:00");
    }

    #[test]
    fn fixed_clock_does_not_move() {
        let t = Local.with_ymd_and_hms(2024, 4, 2, 9, 5, 3).unwrap();
        let clock = FixedClock(t);
        assert_eq!(clock.now(), clock.now());
    }
}
