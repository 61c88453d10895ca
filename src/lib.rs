//! Launch records dashboard.
//!
//! Loads the launch CSV once, then renders two charts that follow the site
//! dropdown and the payload slider:
//!
//! - `success-pie-chart`: success share by site, or success vs failure at one site
//! - `success-payload-scatter-chart`: payload mass vs outcome, coloured by booster category
//!
//! The binary (`main.rs`) serves them as a web page, a terminal dashboard,
//! or runs the self-check.

pub mod charts;
pub mod config;
pub mod controls;
pub mod dataset;
pub mod dispatch;
pub mod generator;
pub mod server;
pub mod tui;
pub mod types;
pub mod verify;
