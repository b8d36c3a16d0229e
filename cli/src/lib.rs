//! vesti-aux CLI

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use tracing_subscriber::EnvFilter;

use vesti_aux_core::download::HttpDownloader;
use vesti_aux_core::engine::EngineType;
use vesti_aux_core::fetch::fetch_fonts;
use vesti_aux_core::fonts::{load_manifest, FontSource, DEFAULT_FONTS};
use vesti_aux_core::output::{write_json_pretty, write_ndjson};
use vesti_aux_core::postprocess::{run_postprocess, PostProcessOutcome, PostProcessPlan};
use vesti_aux_core::process::{DryRunRunner, SystemRunner};
use vesti_aux_core::workdir::dummy_dir;

/// CLI entrypoint for vesti-aux.
#[derive(Debug, Parser)]
#[command(
    name = "vesti-aux",
    version,
    about = "Build helpers for vesti documents: aux-tool passes and font fetching"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run bibtex and makeindex in the dummy directory (skipped for tectonic)
    Postprocess(PostprocessArgs),
    /// Download font archives and unpack them into the dummy directory
    FetchFonts(FetchArgs),
    /// List the engine tags vesti reports
    Engines(EnginesArgs),
}

#[derive(Debug, Args)]
struct PostprocessArgs {
    /// Engine driving the build (latex, pdf, xe, lua, tect)
    #[arg(short = 'e', long = "engine", env = "VESTI_ENGINE", value_parser = parse_engine)]
    engine: EngineType,

    /// Directory holding the aux and idx files
    #[arg(long = "dummy-dir", value_hint = ValueHint::DirPath)]
    dummy_dir: Option<PathBuf>,

    /// Run the tools even when the engine handles them itself
    #[arg(long = "force", action = ArgAction::SetTrue)]
    force: bool,

    /// Print the commands instead of running them
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Auxiliary file handed to bibtex
    #[arg(long = "aux", value_hint = ValueHint::FilePath)]
    aux: Option<String>,

    /// Main index file
    #[arg(long = "index", value_hint = ValueHint::FilePath)]
    index: Option<String>,

    /// makeindex style for the main index
    #[arg(long = "style", value_hint = ValueHint::FilePath)]
    style: Option<String>,

    /// Unstyled symbol index file
    #[arg(long = "symbol-index", value_hint = ValueHint::FilePath)]
    symbol_index: Option<String>,
}

#[derive(Debug, Args)]
struct FetchArgs {
    /// Where archives are staged and unpacked
    #[arg(long = "dummy-dir", value_hint = ValueHint::DirPath)]
    dummy_dir: Option<PathBuf>,

    /// JSON list of {"name", "url"} objects replacing the built-in fonts
    #[arg(short = 'm', long = "manifest", value_hint = ValueHint::FilePath)]
    manifest: Option<PathBuf>,

    /// Give up on a download after this many seconds
    #[arg(long = "timeout")]
    timeout: Option<u64>,

    /// Emit a single JSON array of fetch reports
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON fetch reports
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

#[derive(Debug, Args)]
struct EnginesArgs {
    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn parse_engine(raw: &str) -> Result<EngineType, String> {
    raw.parse().map_err(|err: anyhow::Error| err.to_string())
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Postprocess(args) => run_postprocess_cmd(args),
        Command::FetchFonts(args) => run_fetch(args),
        Command::Engines(args) => run_engines(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep the first one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn build_plan(args: &PostprocessArgs) -> PostProcessPlan {
    let mut plan = PostProcessPlan::default();
    if let Some(aux) = &args.aux {
        plan.aux_file = aux.clone();
    }
    if let Some(index) = &args.index {
        plan.index_file = index.clone();
    }
    if let Some(style) = &args.style {
        plan.index_style = style.clone();
    }
    if let Some(symbol_index) = &args.symbol_index {
        plan.symbol_index = symbol_index.clone();
    }
    plan
}

fn run_postprocess_cmd(args: PostprocessArgs) -> Result<()> {
    let plan = build_plan(&args);
    let dir = args.dummy_dir.clone().unwrap_or_else(dummy_dir);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.force || !args.engine.runs_aux_tools_internally() {
        writeln!(handle, "Run bibtex and makeindex")?;
        handle.flush()?;
    }

    let outcome = if args.dry_run {
        let mut runner = DryRunRunner::new(&mut handle);
        run_postprocess(args.engine, &dir, &plan, &mut runner, args.force)?
    } else {
        run_postprocess(args.engine, &dir, &plan, &mut SystemRunner, args.force)?
    };

    if let PostProcessOutcome::Skipped { engine } = outcome {
        tracing::info!(%engine, "nothing to do");
    }
    Ok(())
}

fn resolve_sources(manifest: Option<&PathBuf>) -> Result<Vec<FontSource>> {
    match manifest {
        Some(path) => load_manifest(path),
        None => Ok(DEFAULT_FONTS.to_vec()),
    }
}

fn run_fetch(args: FetchArgs) -> Result<()> {
    let sources = resolve_sources(args.manifest.as_ref())?;
    let dir = args.dummy_dir.clone().unwrap_or_else(dummy_dir);
    let downloader = HttpDownloader::new(args.timeout.map(Duration::from_secs))?;

    let machine_output = args.json || args.ndjson;
    let reports = if machine_output {
        let stderr = io::stderr();
        let mut notices = stderr.lock();
        fetch_fonts(&sources, &dir, &downloader, &mut notices)?
    } else {
        let stdout = io::stdout();
        let mut notices = stdout.lock();
        fetch_fonts(&sources, &dir, &downloader, &mut notices)?
    };

    let stdout = io::stdout();
    let handle = stdout.lock();
    if args.ndjson {
        write_ndjson(&reports, handle).context("writing ndjson reports")?;
    } else if args.json {
        write_json_pretty(&reports, handle).context("writing json reports")?;
    }

    Ok(())
}

fn run_engines(args: EnginesArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let use_color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => handle.is_terminal(),
    };
    write_engines(&mut handle, use_color)
}

fn write_engines(mut w: impl Write, color: bool) -> Result<()> {
    let tag_width = EngineType::ALL
        .iter()
        .map(|e| e.tag().len())
        .max()
        .unwrap_or(0);
    let program_width = EngineType::ALL
        .iter()
        .map(|e| e.program().len())
        .max()
        .unwrap_or(0);

    for engine in EngineType::ALL {
        let tag = format!("{:<tag_width$}", engine.tag());
        let rendered = apply_color(&tag, color, AnsiColor::Cyan);
        if engine.runs_aux_tools_internally() {
            let program = format!("{:<program_width$}", engine.program());
            let note = apply_color("native, no aux tools", color, AnsiColor::Green);
            writeln!(w, "{rendered}  {program}  {note}")?;
        } else {
            writeln!(w, "{rendered}  {}", engine.program())?;
        }
    }
    Ok(())
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Green,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Green => "32",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}
