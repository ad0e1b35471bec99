//! CLI command implementations for loandash.
//!
//! Provides subcommand handlers for:
//! - `loandash watch` — interactive dashboard driven by line commands
//! - `loandash show` — one refresh cycle, painted or as JSON
//! - `loandash health` — endpoint reachability, config files, journal
//! - `loandash history` — latest refresh-journal entries
//! - `loandash config show|init` — configuration management

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::analytics::logger::{RefreshJournal, RefreshLogEntry};
use crate::client::StatsClient;
use crate::config::{self, schema::DashConfig};
use crate::dashboard::input::{self, Command, ParseError};
use crate::dashboard::{DashboardController, RefreshState};
use crate::filters::FilterStore;
use crate::format;
use crate::view::chart::ChartArena;
use crate::view::paint::{self, TextCharts};

/// Output format for `loandash show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

type TerminalDashboard = DashboardController<StatsClient, TextCharts>;

/// Resolve config, apply display settings and wire up the controller.
fn build_dashboard(filters: &[String]) -> Result<TerminalDashboard> {
    let cfg = config::load();
    apply_display(&cfg);

    let store = parse_filters(filters)?;
    let client = StatsClient::from_config(&cfg.endpoint);
    let charts = ChartArena::new(TextCharts::new(cfg.display.bar_width));

    Ok(DashboardController::new(client, charts)
        .with_filters(store)
        .with_journal(RefreshJournal::from_config(&cfg.logging)))
}

fn apply_display(cfg: &DashConfig) {
    if !cfg.display.color {
        colored::control::set_override(false);
    }
}

/// Build a filter store from `KEY=VALUE` arguments; a later value for the
/// same key wins.
pub fn parse_filters(raw: &[String]) -> Result<FilterStore> {
    let mut store = FilterStore::new();
    for arg in raw {
        let (key, value) = arg
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .with_context(|| format!("invalid filter '{arg}', expected KEY=VALUE"))?;
        if store.get(key) != Some(value) {
            store.toggle(key, value);
        }
    }
    Ok(store)
}

// ---------------------------------------------------------------------------
// loandash show
// ---------------------------------------------------------------------------

/// Run one refresh cycle and print the result.
pub fn run_show(filters: &[String], format: OutputFormat) -> Result<()> {
    let mut dash = build_dashboard(filters)?;
    let state = dash.refresh().clone();

    match format {
        OutputFormat::Table => print!("{}", paint::paint(dash.screen(), dash.charts().backend())),
        OutputFormat::Json => {
            if let Some(stats) = dash.latest() {
                println!("{}", serde_json::to_string_pretty(stats)?);
            }
        }
    }

    match state {
        RefreshState::Failed(err) => Err(err).context("refresh failed"),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// loandash watch
// ---------------------------------------------------------------------------

/// Interactive session: paint, read a command, refresh, repaint.
pub fn run_watch(filters: &[String]) -> Result<()> {
    let dash = build_dashboard(filters)?;
    let mut dash = dash.with_loading_hook(|on| {
        if on {
            println!("{}", "Loading statistics…".yellow());
        }
    });

    dash.refresh();
    repaint(&dash);
    println!("{}", "Type 'help' for commands.".dimmed());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} ", ">".bold().cyan());
        io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("failed to read from stdin")?;

        let command = match input::parse(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(err) => {
                println!("{}", err.to_string().yellow());
                continue;
            }
        };

        let refreshed = match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", input::HELP);
                false
            }
            Command::Refresh => {
                dash.refresh();
                true
            }
            Command::Filter(event) => {
                dash.apply(&event);
                true
            }
            Command::Click { slot, target } => {
                let hit = dash.click(slot, &target).is_some();
                if !hit {
                    println!(
                        "{}",
                        format!("nothing selectable at {} {target:?}", slot.name()).yellow()
                    );
                }
                hit
            }
            Command::Dismiss(dimension) => {
                let hit = dash.dismiss(&dimension).is_some();
                if !hit {
                    println!("{}", badge_miss_hint(dash.filters(), Some(&dimension)).yellow());
                }
                hit
            }
            Command::Reset => {
                let hit = dash.reset().is_some();
                if !hit {
                    println!("{}", badge_miss_hint(dash.filters(), None).yellow());
                }
                hit
            }
        };

        if refreshed {
            repaint(&dash);
        }
    }

    Ok(())
}

/// Why `rm` (with a dimension) or `reset` (without) found nothing to act on.
///
/// Badges are only redrawn by a successful cycle, so after a failure the
/// store can hold filters that no badge shows.
fn badge_miss_hint(filters: &FilterStore, dimension: Option<&str>) -> String {
    let active = match dimension {
        Some(dim) => filters.entries().any(|(key, _)| key == dim),
        None => !filters.is_empty(),
    };
    match (active, dimension) {
        (true, _) => "active filters are not displayed since the last refresh failed; \
                      run 'refresh' first"
            .to_string(),
        (false, Some(dim)) => format!("no active filter on '{dim}'"),
        (false, None) => "no active filters".to_string(),
    }
}

fn repaint(dash: &TerminalDashboard) {
    println!();
    print!("{}", paint::paint(dash.screen(), dash.charts().backend()));
}

// ---------------------------------------------------------------------------
// loandash health
// ---------------------------------------------------------------------------

/// Check endpoint reachability, config files and the refresh journal.
pub fn run_health() -> Result<()> {
    println!("{}", "loandash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.loandash/config.toml found"
        } else {
            "not found (run `loandash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".loandash.toml found"
        } else {
            "none (optional)"
        },
    );

    let client = StatsClient::from_config(&cfg.endpoint);
    let reachable = client.is_reachable();
    print_health_item(
        "Statistics endpoint",
        reachable,
        &if reachable {
            format!("reachable at {}", client.endpoint())
        } else {
            format!("not reachable at {}", client.endpoint())
        },
    );

    let journal = RefreshJournal::from_config(&cfg.logging);
    match journal.path() {
        None => print_health_item("Refresh journal", false, "disabled"),
        Some(path) if path.exists() => {
            let entries = journal.read_all();
            let failures = entries.iter().filter(|e| e.is_failure()).count();
            print_health_item(
                "Refresh journal",
                true,
                &format!("{} entries, {} failed", entries.len(), failures),
            );
        }
        Some(_) => print_health_item("Refresh journal", true, "no journal file yet"),
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// loandash history
// ---------------------------------------------------------------------------

/// Print the latest refresh cycles, oldest first.
pub fn run_history(limit: usize) -> Result<()> {
    let cfg = config::load();
    apply_display(&cfg);
    let journal = RefreshJournal::from_config(&cfg.logging);
    let entries = journal.read_recent(limit);

    if entries.is_empty() {
        println!(
            "{}",
            "No refresh cycles recorded yet. Run `loandash show` or `loandash watch`.".yellow()
        );
        return Ok(());
    }

    println!("{}", "Recent refresh cycles".bold().cyan());
    println!(
        "  {:<25} {:<9} {:>8} {}",
        "Timestamp", "Outcome", "Latency", "Filters / detail"
    );
    println!("  {}", "-".repeat(68));
    for entry in &entries {
        println!("{}", history_line(entry));
    }
    Ok(())
}

fn history_line(entry: &RefreshLogEntry) -> String {
    let outcome = if entry.is_failure() {
        entry.outcome.red()
    } else {
        entry.outcome.green()
    };
    let filters = if entry.query.is_empty() {
        "(no filters)".to_string()
    } else {
        entry.query.clone()
    };
    let detail = match (&entry.error, entry.records) {
        (Some(error), _) => format!(" {}", error.red()),
        (None, Some(records)) => format!(" {}", format!("{records} rows").dimmed()),
        (None, None) => String::new(),
    };
    format!(
        "  {:<25} {:<9} {:>6}ms {filters}{detail}",
        format::truncate(&entry.timestamp, 25),
        outcome,
        entry.latency_ms,
    )
}

// ---------------------------------------------------------------------------
// loandash config show | init
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective loandash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.loandash/config.toml");
    print_source(project_exists, ".loandash.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "LOANDASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.loandash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to point loandash at your statistics endpoint.".dimmed()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
