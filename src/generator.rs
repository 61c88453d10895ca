//! Synthetic launch generator for demo mode, benchmarks and tests.
//!
//! Generates realistic-ish launch records across the four Falcon 9 sites,
//! with booster generations that succeed more often as they mature.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::Dataset;
use crate::types::{LaunchRecord, Outcome};

/// Launch sites and their relative weight.
pub const SITES: &[(&str, u32)] = &[
    ("CCAFS LC-40", 26),
    ("VAFB SLC-4E", 10),
    ("KSC LC-39A", 13),
    ("CCAFS SLC-40", 7),
];

/// Booster categories: (name, version prefix, success probability, max payload kg).
pub const BOOSTERS: &[(&str, &str, f64, f64)] = &[
    ("v1.0", "F9 v1.0", 0.2, 700.0),
    ("v1.1", "F9 v1.1", 0.35, 4_500.0),
    ("FT", "F9 FT", 0.7, 6_800.0),
    ("B4", "F9 B4", 0.55, 9_600.0),
    ("B5", "F9 B5", 0.95, 9_600.0),
];

/// Tracks the flight sequence and an owned RNG.
pub struct LaunchGenerator {
    rng: StdRng,
    flight_seq: i64,
}

impl LaunchGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            flight_seq: 0,
        }
    }

    /// Deterministic generator for repeatable tests and benches.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            flight_seq: 0,
        }
    }

    /// Generate a single launch.
    pub fn generate_launch(&mut self) -> LaunchRecord {
        let total: u32 = SITES.iter().map(|(_, w)| w).sum();
        let mut pick = self.rng.gen_range(0..total);
        let mut site = SITES[0].0;
        for (name, weight) in SITES {
            if pick < *weight {
                site = *name;
                break;
            }
            pick -= weight;
        }

        // Later flights fly later booster generations.
        self.flight_seq += 1;
        let generation = ((self.flight_seq as usize / 12) + self.rng.gen_range(0..2)).min(BOOSTERS.len() - 1);
        let (category, prefix, p_success, max_payload) = BOOSTERS[generation];

        let payload = (self.rng.gen_range(0.0..max_payload) / 10.0).round() * 10.0;
        let outcome = if self.rng.gen_bool(p_success) {
            Outcome::Success
        } else {
            Outcome::Failure
        };

        LaunchRecord {
            flight_number: Some(self.flight_seq),
            launch_site: site.to_string(),
            payload_mass_kg: payload,
            outcome,
            booster_version: Some(format!("{prefix} B{:04}", 1000 + self.flight_seq)),
            booster_category: category.to_string(),
        }
    }

    /// Generate `count` launches.
    pub fn generate_launches(&mut self, count: usize) -> Vec<LaunchRecord> {
        (0..count).map(|_| self.generate_launch()).collect()
    }

    /// Generate a full dataset of `count` launches.
    pub fn generate_dataset(&mut self, count: usize) -> Dataset {
        Dataset::from_records(self.generate_launches(count))
    }
}

impl Default for LaunchGenerator {
    fn default() -> Self {
        Self::new()
    }
}
