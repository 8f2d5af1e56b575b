//! monomorph - CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::warn;

use monomorph::frontend::{read_tree, write_tree};
use monomorph::util::config::{load_config, MonoConfig};
use monomorph::util::diagnostic::{EmitterConfig, TextEmitter};
use monomorph::util::logger;
use monomorph::util::span::SourceFile;
use monomorph::{MonoError, Monomorphizer, NAME, VERSION};

/// Expand generic functions and struct types into concrete declarations
#[derive(Parser, Debug)]
#[command(name = "monomorph")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./monomorph.toml when present)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Monomorphize a JSON syntax tree
    Expand {
        /// Syntax tree of one compilation unit
        #[arg(value_name = "TREE")]
        file: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Source text the tree was parsed from, for error snippets
        #[arg(long, value_name = "SRC")]
        source: Option<PathBuf>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the instantiations a tree would generate, without rewriting it
    Plan {
        /// Syntax tree of one compilation unit
        #[arg(value_name = "TREE")]
        file: PathBuf,

        /// Source text the tree was parsed from, for error snippets
        #[arg(long, value_name = "SRC")]
        source: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(args.config.as_deref(), &cwd)?;

    if args.verbose {
        logger::init_debug();
    } else {
        logger::init_with_level(config.log.effective_level());
    }

    match args.command {
        Commands::Expand {
            file,
            output,
            source,
            compact,
        } => {
            let tree = read_tree(&file)?;
            let result = Monomorphizer::with_config(config.transform.clone()).run(tree);
            let (tree, _) = result.unwrap_or_else(|err| fail(&err, source.as_deref(), &config));

            let json = write_tree(&tree, config.output.pretty && !compact)?;
            match output {
                Some(out) => fs::write(&out, json)
                    .with_context(|| format!("Failed to write output: {}", out.display()))?,
                None => println!("{}", json),
            }
        }
        Commands::Plan { file, source } => {
            let tree = read_tree(&file)?;
            let plan = Monomorphizer::with_config(config.transform.clone())
                .plan(&tree)
                .unwrap_or_else(|err| fail(&err, source.as_deref(), &config));
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}

/// Render a transform error as a diagnostic and exit
fn fail(
    err: &MonoError,
    source: Option<&Path>,
    config: &MonoConfig,
) -> ! {
    let source_file = source.and_then(|path| match fs::read_to_string(path) {
        Ok(text) => Some(SourceFile::new(path.display().to_string(), text)),
        Err(e) => {
            warn!("cannot read source {}: {}; rendering without a snippet", path.display(), e);
            None
        }
    });
    let emitter = TextEmitter::with_config(EmitterConfig {
        use_colors: config.diagnostics.colors,
        show_source: config.diagnostics.show_source,
        ..EmitterConfig::default()
    });
    eprint!(
        "{}",
        emitter.render_with_source(&err.to_diagnostic(), source_file.as_ref())
    );
    process::exit(1);
}
