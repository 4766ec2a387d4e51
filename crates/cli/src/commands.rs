//! Subcommand dispatch

use crate::cli::{Cli, Command};
use anyhow::{bail, Context, Result};
use config::{ConfigValidator, Credentials};
use powerbi_client::{PowerBiSession, SessionOptions};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use types::{Diagnostics, PowerBiError, TracingDiagnostics};

/// Run the parsed command line
pub fn run(cli: Cli, debug_mode: bool) -> Result<()> {
    let environment = cli
        .env
        .clone()
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| {
            PowerBiError::InvalidArgument("environment name must be provided (--env)".to_string())
        })?;

    let diagnostics: Arc<dyn Diagnostics> = Arc::new(TracingDiagnostics::new(debug_mode));
    let options = session_options(&cli, diagnostics)?;

    if !cli.command.needs_session() {
        return run_offline(&cli.command, &environment, &options);
    }

    let credentials = Credentials::from_env().context("Failed to read credentials")?;
    let session = PowerBiSession::new(&environment, credentials, options)
        .with_context(|| format!("Failed to start session for environment '{}'", environment))?;

    run_action(&session, cli.command)
}

fn session_options(cli: &Cli, diagnostics: Arc<dyn Diagnostics>) -> Result<SessionOptions> {
    let mut options = SessionOptions::default().with_diagnostics(diagnostics);

    if let Some(base_dir) = &cli.base_dir {
        options = options.with_base_dir(absolute(base_dir)?);
    }
    if let Some(config_path) = &cli.config {
        options = options.with_config_path(absolute(config_path)?);
    }
    Ok(options)
}

/// Paths typed on the command line are relative to the working directory
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

fn run_offline(command: &Command, environment: &str, options: &SessionOptions) -> Result<()> {
    let config = options
        .resolver
        .resolve(options.config_path.as_deref(), environment, options.diagnostics.as_ref())
        .context("Failed to resolve configuration")?;

    match command {
        Command::ShowConfig => print_json(&config),
        Command::Validate => {
            let report = ConfigValidator::report(&config, options.resolver.base_dir());
            report.emit(options.diagnostics.as_ref());
            report.into_result()?;
            Ok(())
        }
        other => bail!("command {:?} requires an authenticated session", other),
    }
}

fn run_action(session: &PowerBiSession, command: Command) -> Result<()> {
    match command {
        Command::Publish { report_type } => session.publish_report(report_type.as_deref())?,
        Command::Refresh { dataset_id } => session.refresh_dataset(dataset_id.as_deref())?,
        Command::Details { report_id } => {
            let details = session.get_report_details(report_id.as_deref())?;
            print_json(&details)?;
        }
        Command::Delete { report_id } => session.delete_report(report_id.as_deref())?,
        Command::TakeOwnership {
            new_owner,
            report_id,
        } => session.take_ownership(report_id.as_deref(), &new_owner)?,
        Command::List => {
            let reports = session.list_reports()?;
            print_json(&reports)?;
        }
        Command::UpdateParameters {
            report_id,
            parameters,
        } => {
            let parameters = parameters.as_deref().map(parse_parameters).transpose()?;
            session.update_parameters(report_id.as_deref(), parameters.as_ref())?;
        }
        Command::UpdateGateways => session.update_gateways()?,
        Command::BindGateway {
            dataset_id,
            gateway_id,
        } => session.bind_to_gateway(dataset_id.as_deref(), gateway_id.as_deref())?,
        Command::BindDatasource {
            datasource_id,
            dataset_id,
        } => session.bind_to_datasource(dataset_id.as_deref(), &datasource_id)?,
        Command::Validate | Command::ShowConfig => {
            bail!("command {:?} does not use a session", command)
        }
    }
    Ok(())
}

/// Parse `--parameters`, which must be a JSON object
pub fn parse_parameters(raw: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(raw).context("--parameters is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!(PowerBiError::InvalidArgument(
            "--parameters must be a JSON object".to_string()
        )),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
