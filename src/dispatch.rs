//! Control-change dispatch.
//!
//! Each output panel is bound to the controls it reads and a pure handler.
//! When a control changes, every binding that declares it as an input is
//! re-run against the current control values; the rest are left alone.
//! Handlers run synchronously and never re-enter the dispatcher.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::charts::{pie_chart, scatter_chart, Figure};
use crate::dataset::Dataset;
use crate::types::{PayloadRange, SiteSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlId {
    #[serde(rename = "site-dropdown")]
    SiteDropdown,
    #[serde(rename = "payload-slider")]
    PayloadSlider,
}

impl ControlId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SiteDropdown => "site-dropdown",
            Self::PayloadSlider => "payload-slider",
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "site-dropdown" => Ok(Self::SiteDropdown),
            "payload-slider" => Ok(Self::PayloadSlider),
            other => anyhow::bail!("unknown control {other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputId {
    #[serde(rename = "success-pie-chart")]
    SuccessPieChart,
    #[serde(rename = "success-payload-scatter-chart")]
    SuccessPayloadScatterChart,
}

impl OutputId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuccessPieChart => "success-pie-chart",
            Self::SuccessPayloadScatterChart => "success-payload-scatter-chart",
        }
    }
}

/// Current value of every control on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

impl ControlState {
    /// All sites, full dataset payload range.
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            site: SiteSelection::All,
            payload: dataset.payload_bounds(),
        }
    }
}

/// A user interaction with one control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SiteSelected(SiteSelection),
    PayloadChanged(PayloadRange),
}

impl ControlEvent {
    pub fn control(&self) -> ControlId {
        match self {
            Self::SiteSelected(_) => ControlId::SiteDropdown,
            Self::PayloadChanged(_) => ControlId::PayloadSlider,
        }
    }
}

pub type Handler = fn(&Dataset, &ControlState) -> Figure;

/// Output panel + the controls it reads + the function that renders it.
pub struct Binding {
    pub output: OutputId,
    pub inputs: &'static [ControlId],
    pub handler: Handler,
}

impl Binding {
    pub fn depends_on(&self, control: ControlId) -> bool {
        self.inputs.contains(&control)
    }
}

/// A freshly rendered figure for one output.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub output: OutputId,
    pub figure: Figure,
}

fn render_pie(dataset: &Dataset, state: &ControlState) -> Figure {
    Figure::Pie(pie_chart(dataset, &state.site))
}

fn render_scatter(dataset: &Dataset, state: &ControlState) -> Figure {
    Figure::Scatter(scatter_chart(dataset, &state.site, state.payload))
}

pub struct Dispatcher {
    dataset: Arc<Dataset>,
    bindings: Vec<Binding>,
}

impl Dispatcher {
    /// Dispatcher with the dashboard's two chart bindings registered.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let mut dispatcher = Self::empty(dataset);
        dispatcher.bind(
            OutputId::SuccessPieChart,
            &[ControlId::SiteDropdown],
            render_pie,
        );
        dispatcher.bind(
            OutputId::SuccessPayloadScatterChart,
            &[ControlId::SiteDropdown, ControlId::PayloadSlider],
            render_scatter,
        );
        dispatcher
    }

    pub fn empty(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            bindings: Vec::new(),
        }
    }

    pub fn bind(&mut self, output: OutputId, inputs: &'static [ControlId], handler: Handler) {
        self.bindings.push(Binding {
            output,
            inputs,
            handler,
        });
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Render every output, as on first page load.
    pub fn initial(&self, state: &ControlState) -> Vec<Update> {
        self.bindings.iter().map(|b| self.run(b, state)).collect()
    }

    /// Apply `event` to `state`, then re-render the outputs that read the
    /// changed control.
    pub fn apply(&self, state: &mut ControlState, event: ControlEvent) -> Vec<Update> {
        let control = event.control();
        match event {
            ControlEvent::SiteSelected(site) => state.site = site,
            ControlEvent::PayloadChanged(range) => state.payload = range,
        }
        self.fire(control, state)
    }

    /// Re-render the outputs that read `control`, given the full state.
    pub fn fire(&self, control: ControlId, state: &ControlState) -> Vec<Update> {
        tracing::debug!(%control, site = %state.site, payload = %state.payload, "dispatch");
        self.bindings
            .iter()
            .filter(|b| b.depends_on(control))
            .map(|b| self.run(b, state))
            .collect()
    }

    fn run(&self, binding: &Binding, state: &ControlState) -> Update {
        Update {
            output: binding.output,
            figure: (binding.handler)(&self.dataset, state),
        }
    }
}
