//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "powerbi-actions")]
#[command(version)]
#[command(about = "Publish reports and manage datasets, gateways and ownership in Power BI", long_about = None)]
pub struct Cli {
    /// Environment block to use from the configuration file (e.g. dev, prod)
    #[arg(short, long, global = true, env = "POWER_BI_ENV")]
    pub env: Option<String>,

    /// Configuration file; relative paths are taken from the current directory
    #[arg(short, long, global = true, env = "POWER_BI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory report paths in the configuration are relative to
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Check the environment configuration without authenticating
    Validate,
    /// Print the resolved environment configuration
    ShowConfig,
    /// Publish the reports found under the configured path
    Publish {
        /// Report type; selects the `<type>_path` configuration field
        #[arg(long)]
        report_type: Option<String>,
    },
    /// Refresh a dataset
    Refresh {
        #[arg(long)]
        dataset_id: Option<String>,
    },
    /// Show report details
    Details {
        #[arg(long)]
        report_id: Option<String>,
    },
    /// Delete a report
    Delete {
        #[arg(long)]
        report_id: Option<String>,
    },
    /// Take ownership of a report
    TakeOwnership {
        #[arg(long)]
        new_owner: String,
        #[arg(long)]
        report_id: Option<String>,
    },
    /// List the reports of the configured workspace
    List,
    /// Update report parameters
    UpdateParameters {
        #[arg(long)]
        report_id: Option<String>,
        /// JSON object of parameter values; defaults to the configured parameters
        #[arg(long)]
        parameters: Option<String>,
    },
    /// Update the configured gateway
    UpdateGateways,
    /// Bind a dataset to a gateway
    BindGateway {
        #[arg(long)]
        dataset_id: Option<String>,
        #[arg(long)]
        gateway_id: Option<String>,
    },
    /// Bind a dataset to a datasource
    BindDatasource {
        #[arg(long)]
        datasource_id: String,
        #[arg(long)]
        dataset_id: Option<String>,
    },
}

impl Command {
    /// Whether the command needs an authenticated session
    pub fn needs_session(&self) -> bool {
        !matches!(self, Command::Validate | Command::ShowConfig)
    }
}
