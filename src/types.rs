//! Typed rows and control values.
//!
//! `LaunchRecord` is one immutable row of the dataset. `SiteSelection` and
//! `PayloadRange` are the values carried by the two dashboard controls.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire value of the "all sites" dropdown option.
pub const ALL_SITES: &str = "ALL";

/// Slider bounds and step, in kilograms.
pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 10_000.0;
pub const SLIDER_STEP: f64 = 1_000.0;

// -- Rows --

/// Launch outcome (`class` column: 0 = failure, 1 = success).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Self::Failure),
            1 => Some(Self::Success),
            _ => None,
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Self::Failure => 0,
            Self::Success => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Failure => "Failure",
            Self::Success => "Success",
        }
    }
}

/// A single launch attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub flight_number: Option<i64>,
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version: Option<String>,
    pub booster_category: String,
}

impl LaunchRecord {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

// -- Controls --

/// Value of the site dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            Self::All
        } else {
            Self::Site(value.to_string())
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            Self::All => ALL_SITES,
            Self::Site(site) => site,
        }
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            Self::All => true,
            Self::Site(selected) => selected == site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All Sites"),
            Self::Site(site) => f.write_str(site),
        }
    }
}

impl Serialize for SiteSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_value())
    }
}

impl<'de> Deserialize<'de> for SiteSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Inclusive payload range `[low, high]` in kilograms. Always `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    /// Builds a range, swapping the bounds if they arrive reversed.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, mass: f64) -> bool {
        mass >= self.low && mass <= self.high
    }

    /// Moves the low bound by `steps` slider steps, clamped to the slider
    /// and never past the high bound.
    pub fn step_low(self, steps: i32) -> Self {
        let low = (self.low + SLIDER_STEP * steps as f64).clamp(SLIDER_MIN, SLIDER_MAX);
        Self {
            low: low.min(self.high),
            high: self.high,
        }
    }

    /// Moves the high bound by `steps` slider steps, clamped to the slider
    /// and never below the low bound.
    pub fn step_high(self, steps: i32) -> Self {
        let high = (self.high + SLIDER_STEP * steps as f64).clamp(SLIDER_MIN, SLIDER_MAX);
        Self {
            low: self.low,
            high: high.max(self.low),
        }
    }
}

impl Default for PayloadRange {
    fn default() -> Self {
        Self::new(SLIDER_MIN, SLIDER_MAX)
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.0}, {:.0}] kg", self.low, self.high)
    }
}

impl Serialize for PayloadRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.low, self.high].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PayloadRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [a, b] = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Self::new(a, b))
    }
}
