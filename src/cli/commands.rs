//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::OutputFormat;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Category;
use crate::infrastructure::{InfraError, ServiceContainer};

const STDIN_MARKER: &str = "-";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".to_string()));
    };

    match command {
        Commands::Completion { shell } => {
            print_completions(*shell);
            Ok(())
        }
        Commands::Config { command } => cmd_config(cli, command),
        Commands::Sort {
            input,
            format,
            output,
        } => {
            let container = build_container(cli)?;
            let format = format.unwrap_or(container.settings.format);
            cmd_sort(&container, input, format, output.as_deref())
        }
        Commands::Tree { input } => {
            let container = build_container(cli)?;
            cmd_sort(&container, input, OutputFormat::Tree, None)
        }
        Commands::Search {
            input,
            query,
            with_ancestors,
            format,
            output,
        } => {
            let container = build_container(cli)?;
            let format = format.unwrap_or(container.settings.format);
            let keep_ancestors = *with_ancestors || container.settings.keep_ancestors;
            cmd_search(
                &container,
                input,
                query,
                keep_ancestors,
                format,
                output.as_deref(),
            )
        }
        Commands::Check { input } => {
            let container = build_container(cli)?;
            cmd_check(&container, input)
        }
    }
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let cwd = std::env::current_dir()
        .map_err(|e| InfraError::io("resolve working directory", e))?;
    let settings = Settings::load(Some(&cwd), cli.config_file.as_deref())?;
    if cli.no_color || !settings.color {
        output::disable_colors();
    }
    Ok(settings)
}

fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?))
}

/// Load categories from a file, or from stdin for `-`.
fn read_input(container: &ServiceContainer, input: &Path) -> CliResult<Vec<Category>> {
    if input == Path::new(STDIN_MARKER) {
        let content =
            io::read_to_string(io::stdin()).map_err(|e| InfraError::io("read stdin", e))?;
        return Ok(container.catalog.parse(&content, "<stdin>")?);
    }
    Ok(container.catalog.load(input)?)
}

fn emit(container: &ServiceContainer, content: &str, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            container.catalog.write(path, content)?;
            output::action("Written", &path.display());
        }
        None if content.is_empty() => {}
        None => output::info(content),
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_sort(
    container: &ServiceContainer,
    input: &Path,
    format: OutputFormat,
    output: Option<&Path>,
) -> CliResult<()> {
    let categories = read_input(container, input)?;
    let rendered = container
        .catalog
        .render(&categories, format, &container.render_options())?;
    emit(container, &rendered, output)
}

#[instrument(level = "debug", skip(container))]
fn cmd_search(
    container: &ServiceContainer,
    input: &Path,
    query: &str,
    keep_ancestors: bool,
    format: OutputFormat,
    output: Option<&Path>,
) -> CliResult<()> {
    let categories = read_input(container, input)?;
    let found = container.catalog.search(&categories, query, keep_ancestors);
    debug!("search: {} of {} categories match", found.len(), categories.len());
    let rendered = container
        .catalog
        .render(&found, format, &container.render_options())?;
    emit(container, &rendered, output)
}

#[instrument(level = "debug", skip(container))]
fn cmd_check(container: &ServiceContainer, input: &Path) -> CliResult<()> {
    let categories = read_input(container, input)?;
    let orphans = container.catalog.orphans(&categories);

    if orphans.is_empty() {
        output::success(&format!(
            "{} categories, all reachable from a root",
            categories.len()
        ));
        return Ok(());
    }

    output::header(&format!("Orphans ({} of {})", orphans.len(), categories.len()));
    for orphan in &orphans {
        output::failure(&format!("{} [{}]: {}", orphan.label, orphan.id, orphan.reason));
    }
    Err(CliError::Orphans(orphans.len()))
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::detail(&format!(
                    "global: {} ({})",
                    path.display(),
                    exists_label(&path)
                )),
                None => output::detail("global: unavailable (no home directory)"),
            }
            let cwd = std::env::current_dir()
                .map_err(|e| InfraError::io("resolve working directory", e))?;
            let local = local_config_path(&cwd);
            output::detail(&format!("local: {} ({})", local.display(), exists_label(&local)));
            if let Some(path) = &cli.config_file {
                output::detail(&format!("explicit: {} ({})", path.display(), exists_label(path)));
            }
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn exists_label(path: &Path) -> &'static str {
    if path.exists() {
        "found"
    } else {
        "missing"
    }
}
