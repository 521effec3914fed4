use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use eli5y_highlight::{DialectKind, Highlighter, RenderConfig, RenderedView};
use eli5y_protocol::{encode_snapshot, GroupIndex, Selection, TokenIndex, ViewMode};
use eli5y_state::{Action, AppState, StateConfig};

#[derive(Parser)]
#[command(author, version, about = "Renders a parsed formula payload as annotated markup")]
struct Cli {
    /// Parse payload JSON. Reads stdin when omitted.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    #[arg(short, long, default_value = "macro")]
    mode: ViewMode,

    /// Token index in micro mode, group index otherwise.
    #[arg(short, long, value_name = "N")]
    select: Option<u32>,

    /// Overrides the dialect from the config file.
    #[arg(short, long)]
    dialect: Option<Dialect>,

    /// TOML file with optional [render] and [state] tables.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write an rkyv snapshot of the ingested formula.
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Print the whole rendered view as JSON.
    #[arg(long)]
    json: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Dialect {
    Latex,
    Html,
}

impl From<Dialect> for DialectKind {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Latex => DialectKind::Latex,
            Dialect::Html => DialectKind::Html,
        }
    }
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ToolConfig {
    render: RenderConfig,
    state: StateConfig,
}

impl ToolConfig {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading config {path:?}"))?;
        let config: ToolConfig =
            toml::from_str(&text).with_context(|| format!("parsing config {path:?}"))?;
        config.render.validate()?;
        Ok(config)
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::default(),
    };
    if let Some(dialect) = cli.dialect {
        config.render.dialect = dialect.into();
    }
    debug!(?config, "configuration loaded");

    let payload = read_input(cli.input.as_deref())?;
    let formula = eli5y_ingest::from_json(&payload).context("ingesting payload")?;
    info!(
        id = %formula.id,
        groups = formula.groups.len(),
        tokens = formula.tokens.len(),
        "formula ingested"
    );

    if let Some(path) = &cli.snapshot {
        let bytes = encode_snapshot(&formula)?;
        fs::write(path, &bytes).with_context(|| format!("writing snapshot {path:?}"))?;
        info!(bytes = bytes.len(), "snapshot written to {path:?}");
    }

    let mut state = AppState::new(config.state);
    state.apply(Action::Captured(formula));
    state.apply(Action::SetMode(cli.mode));
    if let Some(index) = cli.select {
        state.apply(select_action(cli.mode, index));
        if state.selection() == Selection::None {
            warn!(index, mode = cli.mode.as_str(), "selection out of range, rendering without one");
        }
    }

    let highlighter = Highlighter::new(config.render);
    let Some(view) = state.view() else {
        // Only reachable with history_cap = 0
        anyhow::bail!("nothing to render: history keeps no formulas");
    };
    let rendered = highlighter.render(view.formula, view.mode, view.selection);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        print!("{}", plain_report(&rendered));
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading payload {path:?}")),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("reading payload from stdin")?;
            Ok(text)
        }
    }
}

fn select_action(mode: ViewMode, index: u32) -> Action {
    match mode {
        ViewMode::Micro => Action::SelectToken(TokenIndex(index)),
        ViewMode::Macro | ViewMode::Custom => Action::SelectGroup(GroupIndex(index)),
    }
}

/// Markup on the first line, then one line per narrative run with its color.
fn plain_report(view: &RenderedView) -> String {
    let mut out = format!("{}\n", view.markup);
    for segment in &view.segments {
        match segment.color {
            Some(color) => out.push_str(&format!("{color} {:?}\n", segment.text)),
            None => out.push_str(&format!("------- {:?}\n", segment.text)),
        }
    }
    out
}
