//! Command dispatch

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::CommentService;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, OutputFormat, Settings};
use crate::domain::BuildOrder;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    if let Commands::Completion { shell } = command {
        print_completions(*shell);
        return Ok(());
    }

    let container = build_container(cli)?;
    match command {
        Commands::Show {
            format,
            order,
            indent,
        } => show(&container, *format, *order, *indent),
        Commands::Add { text, parent } => add(&container, text, *parent),
        Commands::Check { order } => check(&container, *order),
        Commands::Config { command } => config(cli, &container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("determine current directory", e))),
    }
}

/// Layered settings for the project directory, with `--data` on top.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = project_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(data) = &cli.data {
        settings.data_file = data.clone();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?))
}

fn service(container: &ServiceContainer, order: Option<BuildOrder>) -> CommentService {
    match order {
        Some(order) => CommentService::new(Arc::clone(&container.source), order),
        None => container.comment_service(),
    }
}

#[instrument(level = "debug", skip(container))]
fn show(
    container: &ServiceContainer,
    format: Option<OutputFormat>,
    order: Option<BuildOrder>,
    indent: Option<usize>,
) -> CliResult<()> {
    let service = service(container, order);
    let settings = &container.settings;

    let rendered = match format.unwrap_or(settings.format) {
        OutputFormat::Text => service.render_text(indent.unwrap_or(settings.indent))?,
        OutputFormat::Tree => service.render_tree()?,
        OutputFormat::Json => {
            let threads = service.threads()?;
            serde_json::to_string_pretty(&threads).map_err(|e| {
                ApplicationError::OperationFailed {
                    context: "serialize threads".into(),
                    source: Box::new(e),
                }
            })?
        }
    };
    output::info(rendered.trim_end());
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn add(container: &ServiceContainer, text: &str, parent: Option<i64>) -> CliResult<()> {
    let comment = container.comment_service().add(text, parent)?;
    output::action("Added", &comment);
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn check(container: &ServiceContainer, order: Option<BuildOrder>) -> CliResult<()> {
    let service = service(container, order);
    let summary = service.summary()?;
    output::header(&format!("Forest ({} order)", service.order()));
    output::detail(&format!("comments: {}", summary.comments));
    output::detail(&format!("roots:    {}", summary.roots));
    output::detail(&format!("depth:    {}", summary.depth));
    output::detail(&format!("leaves:   {}", summary.leaves));
    output::success("every comment reached its thread");
    Ok(())
}

fn config(cli: &Cli, container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(container.settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::action("global", &p.display()),
                None => output::action("global", "<no config directory>"),
            }
            output::action("local", &local_config_path(&project_dir(cli)?).display());
            output::action("data", &container.settings.data_file.display());
        }
    }
    Ok(())
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
