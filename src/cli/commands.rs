//! Command dispatch

use std::io::Write;
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::OutputFormat;
use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{PolicyConfig, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Resolve settings: config file or layered lookup, then CLI flags on top.
pub fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load(cli.treelog.parent())?,
    };
    if cli.core_features {
        settings.render.core_features = true;
    }
    if cli.strict {
        settings.policy = PolicyConfig::strict();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(cli), fields(treelog = %cli.treelog.display()))]
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(out) = &cli.output {
        if out == &cli.treelog {
            return Err(CliError::InvalidArgs(format!(
                "output would overwrite the treelog: {}",
                out.display()
            )));
        }
    }

    let settings = resolve_settings(cli)?;
    let container = ServiceContainer::new(settings);

    let format: OutputFormat = cli.format.into();
    let (rendered, warnings) =
        container
            .visualize
            .render(&cli.treelog, format, &container.settings.render)?;
    for warning in &warnings {
        output::warning(warning);
    }

    match &cli.output {
        Some(path) => write_file(&container, path, &rendered),
        None => write_stdout(&rendered),
    }
}

fn write_file(container: &ServiceContainer, path: &Path, content: &str) -> CliResult<()> {
    container
        .fs
        .ensure_parent(path)
        .and_then(|_| container.fs.write(path, content))
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::action("Wrote", &path.display());
    Ok(())
}

fn write_stdout(content: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| InfraError::io("write stdout", e))?;
    Ok(())
}
