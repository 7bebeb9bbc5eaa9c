use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use poptrends::{
    dashboard::DashboardOutcome,
    render::{JsonRenderer, TerminalRenderer, ViewRenderer},
    Dashboard, DashboardConfig,
};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Terminal,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "poptrends")]
#[command(about = "Exploratory analysis of regional population trends")]
struct Args {
    /// population_trends.csv; without it only the upload prompt is shown
    csv: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also export the table and views as Parquet into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// YAML config (falls back to $POPTRENDS_CONFIG, then defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ─── 1) init logging (stderr, stdout is the report) ─────────────
    let default = if args.verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    // ─── 2) config ──────────────────────────────────────────────────
    let config = DashboardConfig::resolve(args.config.as_deref())?;
    let mut dashboard = Dashboard::new(config);
    if let Some(dir) = &args.export_dir {
        dashboard = dashboard.with_export_dir(dir);
    }

    // ─── 3) read the "upload" ───────────────────────────────────────
    let bytes = match &args.csv {
        Some(path) => {
            let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            info!(path = %path.display(), bytes = data.len(), "input read");
            Some(data)
        }
        None => None,
    };

    // ─── 4) render ──────────────────────────────────────────────────
    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut renderer: Box<dyn ViewRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalRenderer::new(out)),
        OutputFormat::Json => Box::new(JsonRenderer::new(out)),
    };

    let outcome = dashboard
        .run(bytes.as_deref(), renderer.as_mut())
        .context("population dashboard failed")?;
    if let DashboardOutcome::Rendered {
        rows,
        skipped,
        exported,
    } = outcome
    {
        info!(rows, skipped = ?skipped, exported = exported.len(), "done");
    }
    Ok(())
}
