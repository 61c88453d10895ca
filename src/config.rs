//! Command-line configuration.

use std::net::{IpAddr, Ipv4Addr};

use clap::{Parser, Subcommand};

use crate::dataset::{DataSource, DEFAULT_DATA_URL};

#[derive(Parser, Debug)]
#[command(name = "launch-dashboard")]
#[command(about = "Launch records dashboard: success by site and payload vs outcome")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// CSV dataset to load (http(s) URL or local path)
    #[arg(long, global = true, env = "LAUNCH_DASHBOARD_DATA", default_value = DEFAULT_DATA_URL)]
    pub data: String,

    /// Use N generated launches instead of loading a dataset
    #[arg(long, global = true, value_name = "N")]
    pub demo: Option<usize>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve the dashboard page over HTTP (default)
    Serve {
        /// Address to bind
        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
        host: IpAddr,

        /// Port for the web server
        #[arg(short, long, env = "LAUNCH_DASHBOARD_PORT", default_value_t = 8050)]
        port: u16,
    },
    /// Interactive terminal dashboard
    Tui,
    /// Check chart properties against the dataset and exit
    Check,
}

impl Default for Command {
    fn default() -> Self {
        Self::Serve {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8050,
        }
    }
}

impl Args {
    pub fn mode(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }

    pub fn source(&self) -> DataSource {
        DataSource::parse(&self.data)
    }
}
