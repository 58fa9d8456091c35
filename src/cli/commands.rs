//! Command dispatch
//!
//! Every data command loads the census once, then reads from it.

use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use colored::Color;
use serde_json::json;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, Census, ViewState};
use crate::cli::args::{parse_focus, Cli, Commands, ConfigCommands, Dimensions};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::StatAttribute;
use crate::infrastructure::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

const BAR_WIDTH: usize = 40;

pub async fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let settings = load_settings(cli)?;
                output::info(&settings.to_toml()?);
                Ok(())
            }
            ConfigCommands::Template => {
                output::info(&Settings::template());
                Ok(())
            }
            ConfigCommands::Path => config_path(&config_dir(cli)?),
        },
        Commands::Select { json } => {
            let (_, census) = load_census(cli).await?;
            select(&census, *json)
        }
        Commands::Tree { dims, focus } => {
            let (settings, census) = load_census(cli).await?;
            let view = focused_view(&census, &settings, dims, focus.as_deref())?;
            tree(&view);
            Ok(())
        }
        Commands::Bars { dims, focus, json } => {
            let (settings, census) = load_census(cli).await?;
            let view = focused_view(&census, &settings, dims, focus.as_deref())?;
            bars(&view, *json)
        }
        Commands::Export { dims, pretty } => {
            let (settings, census) = load_census(cli).await?;
            let tree = census.build_hierarchy(
                dims.group.unwrap_or(settings.grouping),
                dims.stat.unwrap_or(settings.stat),
            );
            let rendered = if *pretty {
                serde_json::to_string_pretty(&tree)?
            } else {
                serde_json::to_string(&tree)?
            };
            output::info(&rendered);
            Ok(())
        }
    }
}

fn config_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(|e| CliError::Io {
            context: "cannot determine current directory".into(),
            source: e,
        }),
    }
}

/// Settings from config layers, then command-line overrides.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = config_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(file) = &cli.file {
        settings.data_path = file.clone();
    }
    if cli.include_unconfirmed {
        settings.include_unconfirmed_settlements = true;
    }
    Ok(settings)
}

#[instrument(level = "debug", skip(cli))]
async fn load_census(cli: &Cli) -> CliResult<(Settings, Census)> {
    let settings = load_settings(cli)?;
    let container = ServiceContainer::new(settings.clone());
    let census = container.census_service().load().await;
    if census.is_empty() {
        output::warning(&format!(
            "no characters selected from {}",
            settings.data_path.display()
        ));
    }
    Ok((settings, census))
}

fn focused_view(
    census: &Census,
    settings: &Settings,
    dims: &Dimensions,
    focus: Option<&str>,
) -> CliResult<ViewState> {
    let mut view = census.view(
        dims.group.unwrap_or(settings.grouping),
        dims.stat.unwrap_or(settings.stat),
    );
    if let Some(focus) = focus {
        let names = parse_focus(focus);
        debug!("focus: {:?}", names);
        view.zoom_to(&names).map_err(ApplicationError::from)?;
    }
    Ok(view)
}

fn select(census: &Census, json: bool) -> CliResult<()> {
    let characters = census.selected_characters();
    if json {
        output::info(&serde_json::to_string_pretty(characters)?);
        return Ok(());
    }

    let stats = census.stats();
    output::header(&format!("{} characters selected", stats.selected));
    output::detail(&format!(
        "input={} duplicates={} unmatched_locations={} invalid_gender={}",
        stats.input, stats.duplicates, stats.unmatched_locations, stats.invalid_gender
    ));
    for c in characters {
        output::info(&format!(
            "{:<32} {:<24} {:<12} {}",
            c.name, c.location, c.race, c.gender
        ));
    }
    Ok(())
}

fn tree(view: &ViewState) {
    let titles = view.titles();
    output::header(&titles.title);
    output::info(&view.focus_node().sorted_by_aggregate().to_tree_string());
}

fn bars(view: &ViewState, json: bool) -> CliResult<()> {
    let titles = view.titles();
    let bars = view.bars();

    if json {
        let value = json!({
            "title": titles.title,
            "barTitle": titles.bar_title,
            "colorRange": view.color_range(),
            "domainMax": view.bar_domain_max(),
            "bars": bars
                .iter()
                .map(|b| json!({
                    "name": b.name,
                    "value": b.value,
                    "drillable": b.drillable,
                    "barId": b.bar_id(),
                    "circleId": b.circle_id(),
                }))
                .collect::<Vec<_>>(),
        });
        output::info(&serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    output::header(&titles.title);
    output::action("chart", &titles.bar_title);
    let max = view.bar_domain_max();
    let color = terminal_color(view.stat());
    for b in &bars {
        output::bar(&b.name, b.value, max, BAR_WIDTH, color);
    }
    Ok(())
}

fn terminal_color(stat: StatAttribute) -> Color {
    match stat {
        StatAttribute::Health => Color::Red,
        StatAttribute::Magicka => Color::Blue,
        StatAttribute::Stamina => Color::Green,
    }
}

fn config_path(config_dir: &Path) -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::action("global", &path.display()),
        None => output::action("global", &"(no home directory)"),
    }
    output::action("local", &local_config_path(config_dir).display());
    Ok(())
}
