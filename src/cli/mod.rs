//! Command-line interface for jymp
//!
//! Without a `--select` flag the run is interactive: pick a selection mode,
//! then files, then a compression mode. With `--select` the same pipeline
//! runs without prompts.

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod clipboard;
mod interactive;

use crate::classify::Classifier;
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{CompressionMode, Config, SelectionMode};
use crate::render::{Assembler, Assembly};
use crate::scan::FileScanner;
use crate::select::{
    FileTree, HttpOracle, ManualChoice, OracleError, RelevanceOracle, Selection, SelectionError,
    SelectionStrategy,
};
use crate::utils::format_with_commas;

/// Combine project files into one prompt and copy it to the clipboard
#[derive(Parser)]
#[command(name = "jymp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    #[arg(short, long, value_name = "PATH")]
    path: Option<PathBuf>,

    /// Path to config file (jymp.toml or .jymp.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore file with one glob per line (default: .jympignore)
    #[arg(long, value_name = "FILE")]
    ignore_file: Option<PathBuf>,

    /// Selection mode: full|query|manual (skips the interactive menus)
    #[arg(short = 's', long, value_name = "MODE")]
    select: Option<String>,

    /// Goal for query selection
    #[arg(short = 'g', long, value_name = "TEXT")]
    goal: Option<String>,

    /// File or folder for manual selection, repeatable; `*` selects everything
    #[arg(long = "pick", value_name = "PATH")]
    picks: Vec<String>,

    /// Compression mode: none|basic|advanced|both
    #[arg(short = 'z', long, value_name = "MODE")]
    compress: Option<String>,

    /// Skip files larger than this (bytes)
    #[arg(long, value_name = "BYTES")]
    max_file_bytes: Option<u64>,

    /// Never call the relevance oracle; use keyword matching only
    #[arg(long)]
    no_oracle: bool,

    /// Oracle model name
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Oracle chat-completions endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Write the prompt to this file instead of the clipboard
    #[arg(short = 'o', long, value_name = "FILE", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the prompt to stdout instead of the clipboard
    #[arg(long)]
    stdout: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    show_config: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

/// Where the finished prompt goes.
enum Destination {
    Clipboard,
    Stdout,
    File(PathBuf),
}

/// Where the prompt actually ended up.
struct Delivered {
    phrase: &'static str,
    target: Option<PathBuf>,
    on_stdout: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "jymp", &mut std::io::stdout());
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let anchor = match cli.path.as_ref() {
        Some(path) if path.is_dir() => path.clone(),
        _ => cwd.clone(),
    };
    let file_config = load_config(&anchor, cli.config.as_deref())?;

    let compression = cli.compress.as_deref().map(parse_compression).transpose()?;
    let selection_mode = cli.select.as_deref().map(parse_selection_mode).transpose()?;

    let overrides = CliOverrides {
        path: cli.path.clone(),
        ignore_file: cli.ignore_file.clone(),
        max_file_bytes: cli.max_file_bytes,
        compression,
        fallback_count: None,
        oracle_enabled: if cli.no_oracle { Some(false) } else { None },
        oracle_endpoint: cli.endpoint.clone(),
        oracle_model: cli.model.clone(),
    };
    let config = merge_cli_with_config(file_config, overrides);

    if cli.show_config {
        print!("{}", toml::to_string_pretty(&config).context("failed to render config")?);
        return Ok(());
    }

    let root = config.path.clone().unwrap_or(cwd);
    let mut scanner = FileScanner::new(root.clone()).ignore_file(config.ignore_file.clone());
    let candidates = scanner.scan()?;
    let stats = scanner.stats();
    tracing::debug!(
        walked = stats.files_walked,
        ignored = stats.files_ignored,
        pruned = stats.dirs_pruned,
        vanished = stats.files_vanished,
        user_rules = stats.user_rules,
        "scan complete"
    );
    if candidates.is_empty() {
        bail!("No files found under {}", root.display());
    }

    let term = Term::stderr();
    let (selection, mode) = match selection_mode {
        Some(mode) => {
            let strategy = strategy_from_flags(mode, &cli, &config, &candidates)?;
            let selection = run_strategy(&strategy, &candidates, &config)?;
            (selection, config.compression)
        }
        None => {
            let Some(selection) = select_interactively(&term, &candidates, &config)? else {
                term.write_line("Bye!")?;
                return Ok(());
            };
            let mode = match compression {
                Some(mode) => mode,
                None => interactive::choose_compression(&term, config.compression)?,
            };
            (selection, mode)
        }
    };

    if selection.is_empty() {
        bail!("No files selected");
    }

    let assembly = assemble(&root, &selection, Classifier::new(config.max_file_bytes), mode)?;

    let destination = match (&cli.output, cli.stdout) {
        (Some(path), _) => Destination::File(path.clone()),
        (None, true) => Destination::Stdout,
        (None, false) => Destination::Clipboard,
    };
    let delivered = deliver(&assembly.document, &destination)?;
    print_report(&selection, &assembly, &delivered)
}

fn parse_selection_mode(mode: &str) -> Result<SelectionMode> {
    match mode.to_ascii_lowercase().as_str() {
        "full" => Ok(SelectionMode::Full),
        "query" | "ai" | "prompt" => Ok(SelectionMode::Query),
        "manual" => Ok(SelectionMode::Manual),
        invalid => bail!("Invalid selection mode '{invalid}'. Use: full|query|manual"),
    }
}

fn parse_compression(mode: &str) -> Result<CompressionMode> {
    match mode.to_ascii_lowercase().as_str() {
        "none" => Ok(CompressionMode::None),
        "basic" => Ok(CompressionMode::Basic),
        "advanced" | "llmlingua" => Ok(CompressionMode::Advanced),
        "both" => Ok(CompressionMode::Both),
        invalid => bail!("Invalid compression mode '{invalid}'. Use: none|basic|advanced|both"),
    }
}

fn strategy_from_flags(
    mode: SelectionMode,
    cli: &Cli,
    config: &Config,
    candidates: &[String],
) -> Result<SelectionStrategy> {
    match mode {
        SelectionMode::Full => Ok(SelectionStrategy::Full),
        SelectionMode::Query => {
            let Some(goal) = cli.goal.as_deref().map(str::trim).filter(|g| !g.is_empty()) else {
                bail!("--goal is required with --select query");
            };
            Ok(SelectionStrategy::RelevanceQuery {
                goal: goal.to_string(),
                fallback_count: config.fallback_count,
            })
        }
        SelectionMode::Manual => {
            if cli.picks.is_empty() {
                bail!("--pick is required with --select manual");
            }
            let tree = FileTree::build(candidates);
            let choices = cli
                .picks
                .iter()
                .map(|pick| {
                    ManualChoice::resolve(pick, &tree)
                        .with_context(|| format!("'{pick}' is not a discovered file or folder"))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(SelectionStrategy::ManualTree { choices })
        }
    }
}

/// Build the oracle only when a query strategy will use it. A missing
/// credential or a disabled oracle is not an error; selection falls back.
fn build_oracle(config: &Config) -> Option<HttpOracle> {
    match HttpOracle::from_config(&config.oracle) {
        Ok(oracle) => Some(oracle),
        Err(OracleError::Disabled) => None,
        Err(err) => {
            tracing::warn!(error = %err, "relevance oracle unavailable, using keyword match");
            None
        }
    }
}

fn run_strategy(
    strategy: &SelectionStrategy,
    candidates: &[String],
    config: &Config,
) -> Result<Selection, SelectionError> {
    let oracle = match strategy {
        SelectionStrategy::RelevanceQuery { .. } => build_oracle(config),
        _ => None,
    };
    strategy.select(candidates, oracle.as_ref().map(|o| o as &dyn RelevanceOracle))
}

/// `None` when the user picks Exit.
fn select_interactively(
    term: &Term,
    candidates: &[String],
    config: &Config,
) -> Result<Option<Selection>> {
    let Some(mode) = interactive::choose_mode(term)? else {
        return Ok(None);
    };

    let selection = match mode {
        SelectionMode::Full => run_strategy(&SelectionStrategy::Full, candidates, config)?,
        SelectionMode::Query => {
            let goal = interactive::ask_goal(term)?;
            let strategy = SelectionStrategy::RelevanceQuery {
                goal,
                fallback_count: config.fallback_count,
            };
            run_strategy(&strategy, candidates, config)?
        }
        SelectionMode::Manual => {
            let tree = FileTree::build(candidates);
            loop {
                let choices = interactive::pick_entries(term, &tree)?;
                let strategy = SelectionStrategy::ManualTree { choices };
                match run_strategy(&strategy, candidates, config) {
                    Ok(selection) => break selection,
                    Err(err @ SelectionError::NothingSelected) => {
                        term.write_line(&format!("{}", style(err).red()))?;
                    }
                }
            }
        }
    };
    Ok(Some(selection))
}

fn assemble(
    root: &Path,
    selection: &Selection,
    classifier: Classifier,
    mode: CompressionMode,
) -> Result<Assembly> {
    let progress = ProgressBar::new(selection.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    progress.set_message("processing files");

    let assembly = Assembler::new(classifier, mode).assemble_with(root, selection.paths(), |_| {
        progress.inc(1);
    });
    progress.finish_and_clear();
    Ok(assembly)
}

fn deliver(document: &str, destination: &Destination) -> Result<Delivered> {
    deliver_with(document, destination, clipboard::copy_to_clipboard, &mut io::stdout().lock())
}

/// Send the document to its destination. A failed clipboard copy falls back
/// to `out`.
fn deliver_with<C, W>(
    document: &str,
    destination: &Destination,
    copy: C,
    out: &mut W,
) -> Result<Delivered>
where
    C: FnOnce(&str) -> Result<&'static str>,
    W: Write,
{
    let printed = |out: &mut W| -> Result<Delivered> {
        out.write_all(document.as_bytes())?;
        out.flush()?;
        Ok(Delivered { phrase: "printed to stdout", target: None, on_stdout: true })
    };

    match destination {
        Destination::File(path) => {
            fs::write(path, document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(Delivered { phrase: "written to", target: Some(path.clone()), on_stdout: false })
        }
        Destination::Stdout => printed(out),
        Destination::Clipboard => match copy(document) {
            Ok(_) => Ok(Delivered { phrase: "copied to clipboard", target: None, on_stdout: false }),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard unavailable, printing prompt to stdout");
                printed(out)
            }
        },
    }
}

fn print_report(selection: &Selection, assembly: &Assembly, delivered: &Delivered) -> Result<()> {
    // Keep stdout clean when it carries the document.
    let term = if delivered.on_stdout { Term::stderr() } else { Term::stdout() };
    let delivered = match &delivered.target {
        Some(path) => format!("{} {}", delivered.phrase, path.display()),
        None => delivered.phrase.to_string(),
    };

    term.write_line("")?;
    term.write_line(&format!("{}", style("Files in prompt:").yellow()))?;
    for path in selection.paths() {
        term.write_line(&format!("{}", style(format!(" - {path}")).cyan()))?;
    }

    term.write_line("")?;
    term.write_line(&format!(
        "{}",
        style(format!(
            "Combined {} files ({} characters). Prompt {delivered}!",
            selection.len(),
            format_with_commas(assembly.total_chars as u64)
        ))
        .green()
    ))?;

    if let Some(summary) = &assembly.summary {
        term.write_line(&format!(
            "Compression: {} over {} files, final size {} characters ({:.1}% smaller)",
            summary.method,
            summary.file_count,
            format_with_commas(summary.final_size as u64),
            summary.ratio * 100.0
        ))?;
    }
    Ok(())
}
