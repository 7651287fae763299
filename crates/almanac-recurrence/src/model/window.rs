use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-open `[lower, upper)` query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub lower: DateTime<Utc>,
    pub upper: DateTime<Utc>,
}

impl DateWindow {
    #[must_use]
    pub const fn new(lower: DateTime<Utc>, upper: DateTime<Utc>) -> Self {
        Self { lower, upper }
    }

    /// Returns `true` when no instant lies inside the window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower >= self.upper
    }

    /// Returns `true` if `lower <= instant < upper`.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.lower <= instant && instant < self.upper
    }

    /// Returns `true` if `lower < instant < upper`.
    #[must_use]
    pub fn contains_strictly(&self, instant: DateTime<Utc>) -> bool {
        self.lower < instant && instant < self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_membership() {
        let lower = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let upper = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let window = DateWindow::new(lower, upper);

        assert!(!window.is_empty());
        assert!(window.contains(lower));
        assert!(!window.contains(upper));
        assert!(!window.contains_strictly(lower));
        assert!(window.contains_strictly(lower + chrono::TimeDelta::seconds(1)));
        assert!(DateWindow::new(upper, lower).is_empty());
        assert!(DateWindow::new(lower, lower).is_empty());
    }
}
