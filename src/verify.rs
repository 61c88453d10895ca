//! Self-check over a loaded dataset.
//!
//! Runs the dashboard's chart properties against real data for every
//! dropdown option and a spread of payload ranges:
//!
//! 1. Pie slice count (one per site for All, two for a single site)
//! 2. Scatter points stay inside the selected payload range
//! 3. Site-filtered scatter is a subset of the All-sites scatter
//! 4. Full dataset bounds return the whole (site-filtered) dataset
//! 5. A range outside every record returns an empty chart
//! 6. All sites over 0..10000 kg: success sums per site, every light record plotted

use crate::charts::{filter_records, pie_chart, scatter_chart};
use crate::controls::Dropdown;
use crate::dataset::Dataset;
use crate::types::{PayloadRange, SiteSelection, SLIDER_MAX, SLIDER_MIN, SLIDER_STEP};

pub enum TestResult {
    Pass(String),
    Fail(String),
    Skip(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.pass + self.fail + self.skip
    }

    pub fn ok(&self) -> bool {
        self.fail == 0
    }
}

// ── Test Runner ──

pub fn run(dataset: &Dataset) -> Summary {
    println!("=== Launch Dashboard Self-Check ===");
    println!(
        "Dataset: {} records, {} sites, payload {:.0}..{:.0} kg",
        dataset.len(),
        dataset.sites().len(),
        dataset.min_payload(),
        dataset.max_payload()
    );
    println!();

    let mut summary = Summary::default();

    macro_rules! run_test {
        ($name:expr, $result:expr) => {
            match $result {
                TestResult::Pass(msg) => { println!("  [PASS] {}: {msg}", $name); summary.pass += 1; }
                TestResult::Fail(msg) => { println!("  [FAIL] {}: {msg}", $name); summary.fail += 1; }
                TestResult::Skip(msg) => { println!("  [SKIP] {}: {msg}", $name); summary.skip += 1; }
            }
        };
    }

    run_test!("pie slice count", test_pie_slice_count(dataset));
    run_test!("scatter within range", test_scatter_within_range(dataset));
    run_test!("site scatter subset of all", test_site_subset(dataset));
    run_test!("full bounds return everything", test_full_bounds(dataset));
    run_test!("out-of-range payload is empty", test_out_of_range(dataset));
    run_test!("all sites over slider range", test_all_sites_example(dataset));

    println!();
    println!("=== Self-Check Results ===");
    println!(
        "  PASS: {}  FAIL: {}  SKIP: {}  Total: {}",
        summary.pass,
        summary.fail,
        summary.skip,
        summary.total()
    );

    summary
}

/// Every slider-aligned `[low, high]` pair plus the dataset's own bounds.
fn sample_ranges(dataset: &Dataset) -> Vec<PayloadRange> {
    let steps = ((SLIDER_MAX - SLIDER_MIN) / SLIDER_STEP) as i32;
    let mut ranges = Vec::new();
    for lo in 0..=steps {
        for hi in lo..=steps {
            ranges.push(PayloadRange::new(
                SLIDER_MIN + lo as f64 * SLIDER_STEP,
                SLIDER_MIN + hi as f64 * SLIDER_STEP,
            ));
        }
    }
    ranges.push(dataset.payload_bounds());
    ranges
}

fn selections(dataset: &Dataset) -> Vec<SiteSelection> {
    Dropdown::for_sites(dataset.sites()).selections().cloned().collect()
}

// ── Properties ──

fn test_pie_slice_count(dataset: &Dataset) -> TestResult {
    for site in selections(dataset) {
        let pie = pie_chart(dataset, &site);
        let expected = match site {
            SiteSelection::All => dataset.sites().len(),
            SiteSelection::Site(_) => 2,
        };
        if pie.slices.len() != expected {
            return TestResult::Fail(format!(
                "{site}: {} slices, expected {expected}",
                pie.slices.len()
            ));
        }
    }
    TestResult::Pass(format!("{} selections checked", dataset.sites().len() + 1))
}

fn test_scatter_within_range(dataset: &Dataset) -> TestResult {
    let ranges = sample_ranges(dataset);
    let mut checked = 0usize;
    for site in selections(dataset) {
        for range in &ranges {
            let chart = scatter_chart(dataset, &site, *range);
            if let Some(p) = chart.points().find(|p| !range.contains(p.payload_mass_kg)) {
                return TestResult::Fail(format!(
                    "{site} {range}: point at {} kg",
                    p.payload_mass_kg
                ));
            }
            checked += 1;
        }
    }
    TestResult::Pass(format!("{checked} charts checked"))
}

fn test_site_subset(dataset: &Dataset) -> TestResult {
    if dataset.sites().is_empty() {
        return TestResult::Skip("dataset has no sites".into());
    }
    for range in sample_ranges(dataset) {
        let all: Vec<_> = filter_records(dataset, &SiteSelection::All, range).collect();
        for name in dataset.sites() {
            let site = SiteSelection::Site(name.clone());
            let subset: Vec<_> = filter_records(dataset, &site, range).collect();
            let contained = subset
                .iter()
                .all(|r| all.iter().any(|a| std::ptr::eq(*a, *r)));
            if !contained || subset.len() > all.len() {
                return TestResult::Fail(format!("{name} {range}: not a subset of All Sites"));
            }
        }
    }
    TestResult::Pass(format!("{} sites checked", dataset.sites().len()))
}

fn test_full_bounds(dataset: &Dataset) -> TestResult {
    let bounds = dataset.payload_bounds();
    for site in selections(dataset) {
        let expected = dataset
            .records()
            .iter()
            .filter(|r| site.matches(&r.launch_site))
            .count();
        let got = scatter_chart(dataset, &site, bounds).point_count();
        if got != expected {
            return TestResult::Fail(format!("{site}: {got} points, expected {expected}"));
        }
    }
    TestResult::Pass(format!("{bounds} returns all {} records", dataset.len()))
}

fn test_out_of_range(dataset: &Dataset) -> TestResult {
    let far = dataset.max_payload().max(9_999_999.0) + 1.0;
    let range = PayloadRange::new(far, far + 1.0);
    for site in selections(dataset) {
        let chart = scatter_chart(dataset, &site, range);
        if !chart.is_empty() {
            return TestResult::Fail(format!("{site} {range}: {} points", chart.point_count()));
        }
    }
    TestResult::Pass(format!("{range} is empty for every selection"))
}

fn test_all_sites_example(dataset: &Dataset) -> TestResult {
    let pie = pie_chart(dataset, &SiteSelection::All);
    for slice in &pie.slices {
        let successes = dataset
            .records()
            .iter()
            .filter(|r| r.launch_site == slice.label && r.is_success())
            .count() as f64;
        if slice.value != successes {
            return TestResult::Fail(format!(
                "{}: slice {} != {} successes",
                slice.label, slice.value, successes
            ));
        }
    }

    let range = PayloadRange::new(SLIDER_MIN, SLIDER_MAX);
    let expected = dataset
        .records()
        .iter()
        .filter(|r| r.payload_mass_kg <= SLIDER_MAX && r.payload_mass_kg >= SLIDER_MIN)
        .count();
    let got = scatter_chart(dataset, &SiteSelection::All, range).point_count();
    if got != expected {
        return TestResult::Fail(format!("{got} points, expected {expected}"));
    }
    TestResult::Pass(format!("{} slices, {got} points", pie.slices.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::LaunchGenerator;

    #[test]
    fn generated_dataset_passes_every_check() {
        let ds = LaunchGenerator::with_seed(17).generate_dataset(56);
        let summary = run(&ds);
        assert!(summary.ok(), "{summary:?}");
        assert_eq!(summary.total(), 6);
        assert_eq!(summary.skip, 0);
    }

    #[test]
    fn empty_dataset_skips_subset_check() {
        let summary = run(&Dataset::from_records(Vec::new()));
        assert!(summary.ok());
        assert_eq!(summary.skip, 1);
    }

    #[test]
    fn sample_ranges_cover_slider_grid() {
        let ds = LaunchGenerator::with_seed(1).generate_dataset(5);
        // 11 slider positions -> 66 ordered pairs, plus the dataset bounds.
        assert_eq!(sample_ranges(&ds).len(), 67);
    }
}
