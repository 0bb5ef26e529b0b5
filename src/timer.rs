use std::time::{Duration, Instant};

/// Reports how long its scope took to stderr when dropped.
pub struct Timer {
    location: &'static str,
    label: &'static str,
    start: Instant,
}

impl Timer {
    pub fn new(location: &'static str, label: &'static str) -> Self {
        Self {
            location,
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        eprintln!(
            "[{}] {}: time elapsed {:?}",
            self.location,
            self.label,
            self.elapsed(),
        );
    }
}

macro_rules! time {
    ($label:expr, $b:block) => {{
        let _timer = $crate::timer::Timer::new(
            concat!(file!(), ":", line!()),
            $label,
        );
        $b
    }};
    ($label:expr, $e:expr) => {{
        time!($label, { $e })
    }};
    ($e:expr) => {{
        time!(::std::stringify!($e), { $e })
    }};
}
