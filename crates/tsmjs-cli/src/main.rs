use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use tsmjs_core::build::{BuildReport, BuildStatus};
use tsmjs_core::config::{self, CONFIG_FILE_NAME, TsmjsConfig};
use tsmjs_core::{Esbuild, pipeline, walk};

#[derive(Parser)]
#[command(
    name = "tsmjs",
    about = "Transpile a TypeScript tree to ES modules with esbuild, one file at a time",
    version
)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every source file under the source directory
    Build {
        /// Source root (overrides `src_dir`)
        #[arg(short, long)]
        src: Option<PathBuf>,

        /// Output directory (overrides `out_dir`)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// esbuild executable (overrides `esbuild.program`)
        #[arg(long)]
        esbuild: Option<PathBuf>,
    },

    /// List the files a build would compile
    List {
        /// Source root (overrides `src_dir`)
        #[arg(short, long)]
        src: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: ListFormat,
    },

    /// Initialize a new tsmjs configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum ListFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { src, out, esbuild } => cmd_build(&cli.config, src, out, esbuild),

        Commands::List { src, format } => cmd_list(&cli.config, src, format),

        Commands::Init { force } => cmd_init(&cli.config, force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "tsmjs", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the project config, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> Result<TsmjsConfig> {
    let cfg = config::load_config(path)?;
    if cfg.is_none() {
        log::debug!("{} not found, using defaults", path.display());
    }
    Ok(cfg.unwrap_or_default())
}

fn cmd_build(
    config_path: &Path,
    src: Option<PathBuf>,
    out: Option<PathBuf>,
    esbuild: Option<PathBuf>,
) -> Result<()> {
    let mut cfg = load_config(config_path)?;
    if let Some(src) = src {
        cfg.src_dir = src;
    }
    if let Some(out) = out {
        cfg.out_dir = out;
    }
    if let Some(program) = esbuild {
        cfg.esbuild.program = program;
    }

    eprintln!(
        "Building {} → {}",
        cfg.src_dir.display(),
        cfg.out_dir.display()
    );

    let tool = Esbuild::from_config(&cfg.esbuild);
    let report = pipeline::run(&cfg, tool)
        .with_context(|| format!("build of {} aborted", cfg.src_dir.display()))?;

    print_failures(&report);

    let failed = report.failed().count();
    if failed > 0 {
        anyhow::bail!("{} of {} files failed to compile", failed, report.len());
    }

    eprintln!(
        "Compiled {} files into {}",
        report.len(),
        cfg.out_dir.display()
    );
    Ok(())
}

fn print_failures(report: &BuildReport) {
    for outcome in report.failed() {
        eprintln!("  failed {}: {}", outcome.entry_point.display(), outcome.status);
        if let BuildStatus::Failed { stderr, .. } = &outcome.status {
            for line in stderr.lines() {
                eprintln!("    {}", line);
            }
        }
    }
}

fn cmd_list(config_path: &Path, src: Option<PathBuf>, format: ListFormat) -> Result<()> {
    let cfg = load_config(config_path)?;
    let src_dir = src.unwrap_or(cfg.src_dir);

    let files = walk::collect(&src_dir)
        .with_context(|| format!("failed to list {}", src_dir.display()))?;

    match format {
        ListFormat::Text => {
            for file in &files {
                println!("{}", file.display());
            }
        }
        ListFormat::Json => {
            let paths: Vec<String> = files
                .iter()
                .map(|f| f.to_string_lossy().into_owned())
                .collect();
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
    }

    Ok(())
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
