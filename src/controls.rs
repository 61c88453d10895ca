//! Page layout: control definitions and graph panels.
//!
//! Derived once from the dataset at startup. Front ends read it to build
//! their widgets; the HTTP page receives it as JSON.

use serde::Serialize;

use crate::dataset::Dataset;
use crate::dispatch::{ControlId, OutputId};
use crate::types::{PayloadRange, SiteSelection, SLIDER_MAX, SLIDER_MIN, SLIDER_STEP};

pub const PAGE_TITLE: &str = "SpaceX Launch Records Dashboard";
pub const SLIDER_MARKS: [f64; 5] = [0.0, 2_500.0, 5_000.0, 7_500.0, 10_000.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: SiteSelection,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dropdown {
    pub id: &'static str,
    pub options: Vec<DropdownOption>,
    pub value: SiteSelection,
    pub placeholder: &'static str,
    pub searchable: bool,
}

impl Dropdown {
    /// "All Sites" followed by one option per distinct site.
    pub fn for_sites(sites: &[String]) -> Self {
        let mut options = Vec::with_capacity(sites.len() + 1);
        options.push(DropdownOption {
            label: "All Sites".to_string(),
            value: SiteSelection::All,
        });
        options.extend(sites.iter().map(|site| DropdownOption {
            label: site.clone(),
            value: SiteSelection::Site(site.clone()),
        }));
        Self {
            id: ControlId::SiteDropdown.as_str(),
            options,
            value: SiteSelection::All,
            placeholder: "Select a Launch Site here",
            searchable: true,
        }
    }

    pub fn selections(&self) -> impl Iterator<Item = &SiteSelection> {
        self.options.iter().map(|o| &o.value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderMark {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeSlider {
    pub id: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: PayloadRange,
    pub marks: Vec<SliderMark>,
}

impl RangeSlider {
    /// Fixed 0..10000 kg slider whose initial value is the dataset's bounds.
    pub fn payload(initial: PayloadRange) -> Self {
        Self {
            id: ControlId::PayloadSlider.as_str(),
            label: "Payload range (Kg):",
            min: SLIDER_MIN,
            max: SLIDER_MAX,
            step: SLIDER_STEP,
            value: initial,
            marks: SLIDER_MARKS
                .iter()
                .map(|&value| SliderMark {
                    value,
                    label: format!("{value:.0}"),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphPanel {
    pub id: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageLayout {
    pub title: &'static str,
    pub dropdown: Dropdown,
    pub slider: RangeSlider,
    pub graphs: Vec<GraphPanel>,
}

impl PageLayout {
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            title: PAGE_TITLE,
            dropdown: Dropdown::for_sites(dataset.sites()),
            slider: RangeSlider::payload(dataset.payload_bounds()),
            graphs: vec![
                GraphPanel {
                    id: OutputId::SuccessPieChart.as_str(),
                },
                GraphPanel {
                    id: OutputId::SuccessPayloadScatterChart.as_str(),
                },
            ],
        }
    }
}
