//! View-update functions and the chart specifications they produce.
//!
//! Both updaters are pure: they read the immutable dataset and the current
//! control values and build a fresh figure every time.

use serde::Serialize;
use serde_json::{json, Value};

use crate::dataset::Dataset;
use crate::types::{LaunchRecord, Outcome, PayloadRange, SiteSelection};

pub const PAYLOAD_AXIS_TITLE: &str = "Payload Mass (kg)";
pub const CLASS_AXIS_TITLE: &str = "class";

/// What the pie trace prints on each slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextInfo {
    #[serde(rename = "percent")]
    Percent,
    #[serde(rename = "percent+label")]
    PercentLabel,
}

impl TextInfo {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::PercentLabel => "percent+label",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
    pub text_info: TextInfo,
}

impl PieChart {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Share of slice `idx` in percent, 0 when the pie is empty.
    pub fn percent(&self, idx: usize) -> f64 {
        let total = self.total();
        match self.slices.get(idx) {
            Some(slice) if total > 0.0 => slice.value / total * 100.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub class: u8,
}

/// All points sharing one booster version category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    pub fn points(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.series.iter().flat_map(|s| s.points.iter())
    }
}

/// Render-ready chart specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    Pie(PieChart),
    Scatter(ScatterChart),
}

impl Figure {
    pub fn title(&self) -> &str {
        match self {
            Self::Pie(pie) => &pie.title,
            Self::Scatter(scatter) => &scatter.title,
        }
    }

    /// Plotly.js figure object: `{ data: [traces], layout: {...} }`.
    pub fn to_plotly(&self) -> Value {
        match self {
            Self::Pie(pie) => json!({
                "data": [{
                    "type": "pie",
                    "labels": pie.slices.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
                    "values": pie.slices.iter().map(|s| s.value).collect::<Vec<_>>(),
                    "textinfo": pie.text_info.as_str(),
                }],
                "layout": { "title": { "text": pie.title } },
            }),
            Self::Scatter(scatter) => {
                let traces: Vec<Value> = scatter
                    .series
                    .iter()
                    .map(|series| {
                        json!({
                            "type": "scatter",
                            "mode": "markers",
                            "name": series.name,
                            "legendgroup": series.name,
                            "x": series.points.iter().map(|p| p.payload_mass_kg).collect::<Vec<_>>(),
                            "y": series.points.iter().map(|p| p.class).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                json!({
                    "data": traces,
                    "layout": {
                        "title": { "text": scatter.title },
                        "xaxis": { "title": { "text": scatter.x_title } },
                        "yaxis": { "title": { "text": scatter.y_title } },
                        "legend": { "title": { "text": "Booster Version Category" } },
                    },
                })
            }
        }
    }
}

// -- Filtering --

/// Records at the selected site(s) whose payload lies in `range`.
pub fn filter_records<'a>(
    dataset: &'a Dataset,
    site: &'a SiteSelection,
    range: PayloadRange,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    dataset
        .records()
        .iter()
        .filter(move |r| range.contains(r.payload_mass_kg) && site.matches(&r.launch_site))
}

// -- Updaters --

/// Success share per site (`All`) or success vs failure at one site.
pub fn pie_chart(dataset: &Dataset, site: &SiteSelection) -> PieChart {
    match site {
        SiteSelection::All => {
            let slices = dataset
                .sites()
                .iter()
                .map(|name| {
                    let successes: f64 = dataset
                        .records()
                        .iter()
                        .filter(|r| &r.launch_site == name)
                        .map(|r| r.outcome.class() as f64)
                        .sum();
                    PieSlice {
                        label: name.clone(),
                        value: successes,
                    }
                })
                .collect();
            PieChart {
                title: "Total Success Launches by Site".to_string(),
                slices,
                text_info: TextInfo::Percent,
            }
        }
        SiteSelection::Site(name) => {
            let (mut failures, mut successes) = (0u64, 0u64);
            for record in dataset.records().iter().filter(|r| &r.launch_site == name) {
                match record.outcome {
                    Outcome::Failure => failures += 1,
                    Outcome::Success => successes += 1,
                }
            }
            PieChart {
                title: format!("Total Success vs Failure for {name}"),
                slices: vec![
                    PieSlice {
                        label: Outcome::Failure.label().to_string(),
                        value: failures as f64,
                    },
                    PieSlice {
                        label: Outcome::Success.label().to_string(),
                        value: successes as f64,
                    },
                ],
                text_info: TextInfo::PercentLabel,
            }
        }
    }
}

/// Payload mass vs outcome, one series per booster version category.
pub fn scatter_chart(dataset: &Dataset, site: &SiteSelection, range: PayloadRange) -> ScatterChart {
    let mut series: Vec<ScatterSeries> = Vec::new();
    for record in filter_records(dataset, site, range) {
        let point = ScatterPoint {
            payload_mass_kg: record.payload_mass_kg,
            class: record.outcome.class(),
        };
        match series.iter_mut().find(|s| s.name == record.booster_category) {
            Some(existing) => existing.points.push(point),
            None => series.push(ScatterSeries {
                name: record.booster_category.clone(),
                points: vec![point],
            }),
        }
    }

    let title = match site {
        SiteSelection::All => "Payload vs. Outcome for All Sites".to_string(),
        SiteSelection::Site(name) => format!("Payload vs. Outcome for {name}"),
    };

    ScatterChart {
        title,
        x_title: PAYLOAD_AXIS_TITLE.to_string(),
        y_title: CLASS_AXIS_TITLE.to_string(),
        series,
    }
}
