//! Northern hemisphere season banding used by the synthetic generator

/// Meteorological season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Season for a calendar month (1-12). Anything outside 3-11 is winter.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    /// Baseline daily high (°C)
    pub fn baseline_max_temp(self) -> f64 {
        match self {
            Season::Summer => 25.0,
            Season::Spring | Season::Fall => 15.0,
            Season::Winter => 5.0,
        }
    }

    /// Base amount (mm) on a wet day, before random variation
    pub fn base_precipitation(self) -> f64 {
        match self {
            Season::Summer => 3.0,
            Season::Spring => 5.0,
            Season::Fall => 4.0,
            Season::Winter => 2.0,
        }
    }
}
