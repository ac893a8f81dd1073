mod batch;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use log::info;

use specmin_core::compact;
use specmin_core::config::{self, CONFIG_FILE_NAME, SpecminConfig};
use specmin_core::parse;

#[derive(Parser)]
#[command(name = "specmin", about = "Compact OpenAPI specs into prompt-sized text", version)]
struct Cli {
    /// Config file to use instead of `.specmin.yaml`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compact a single OpenAPI spec
    Compact {
        /// Path to the OpenAPI spec file (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory to write `<stem>.txt` and `<stem>.json` into; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print the types JSON when writing to stdout
        #[arg(long)]
        types: bool,
    },

    /// Compact every spec file in a directory
    Batch {
        /// Directory containing spec files
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of worker threads
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Validate an OpenAPI spec
    Validate {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new specmin configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compact {
            input,
            output,
            types,
        } => cmd_compact(cli.config.as_deref(), input, output, types),

        Commands::Batch {
            input,
            output,
            jobs,
        } => cmd_batch(cli.config.as_deref(), input, output, jobs),

        Commands::Validate { input } => cmd_validate(cli.config.as_deref(), input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "specmin", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the config from `--config`, or from the current directory.
/// An explicit path must exist; the default one may be absent.
fn load_config(explicit: Option<&Path>) -> Result<SpecminConfig> {
    match explicit {
        Some(path) => config::load_config(path)?
            .with_context(|| format!("config file {} not found", path.display())),
        None => Ok(config::load_config(Path::new(CONFIG_FILE_NAME))?.unwrap_or_default()),
    }
}

fn cmd_compact(
    config_path: Option<&Path>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    types: bool,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let out = batch::compact_file(&input, &cfg.options)?;

    match output {
        Some(dir) => {
            let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("spec");
            batch::write_outputs(&dir, stem, &out)?;
            eprintln!(
                "Compacted {} endpoints and {} types into {}",
                out.endpoints.len(),
                out.types.len(),
                dir.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(out.text.as_bytes())?;
            if types {
                writeln!(stdout, "{}", out.types_json()?)?;
            }
        }
    }
    Ok(())
}

fn cmd_batch(
    config_path: Option<&Path>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    jobs: Option<usize>,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));

    let summary = batch::run(&input, &output, &cfg.options, jobs)?;
    eprintln!(
        "Compacted {} files into {} ({} failed)",
        summary.succeeded,
        output.display(),
        summary.failed
    );

    if summary.all_failed() {
        anyhow::bail!("every spec in {} failed to compact", input.display());
    }
    Ok(())
}

fn cmd_validate(config_path: Option<&Path>, input: PathBuf) -> Result<()> {
    let cfg = load_config(config_path)?;
    let doc = batch::load_document(&input)?;
    parse::validate(&doc, &cfg.options)
        .with_context(|| format!("{} failed validation", input.display()))?;

    let paths = doc.paths().map(|p| p.len()).unwrap_or(0);
    let operations = doc
        .paths()
        .into_iter()
        .flatten()
        .filter_map(|(_, item)| item.as_object())
        .flat_map(|methods| methods.keys())
        .filter(|method| cfg.options.handles_method(method))
        .count();

    eprintln!("Valid spec: {}", doc.server_url().unwrap_or_default());
    eprintln!("  Paths: {paths}");
    eprintln!("  Operations: {operations}");
    info!("validated {}", input.display());

    // A full pass surfaces unresolvable references too.
    let out = compact(&doc, &cfg.options)?;
    if !out.warnings.is_empty() {
        eprintln!("  Unresolvable references: {}", out.warnings.len());
    }
    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
