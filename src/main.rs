//! Toolfetch CLI
//!
//! Thin argument layer over the installers; every subcommand builds an
//! explicit config and hands it to the library.

use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use toolfetch::installer::RefreshOutcome;
use toolfetch::logging::{init_logger, log_error, log_info, log_install};
use toolfetch::{iree, mlmodel, renode};

#[derive(Parser)]
#[command(
    name = "toolfetch",
    version,
    about = "Download and install prebuilt externals for the build tree"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the IREE host compiler from a snapshot release
    IreeCompiler {
        /// Snapshot tag to download
        #[arg(long, default_value = iree::DEFAULT_TAG)]
        tag_name: String,
        /// URL to check for IREE releases
        #[arg(long, default_value = iree::DEFAULT_RELEASE_URL)]
        release_url: String,
        /// Path to install the IREE compiler (default: build/iree_compiler)
        #[arg(long)]
        installed_dir: Option<PathBuf>,
    },
    /// Download and install a Renode release package
    Renode {
        /// Release to download; if not set, the latest build is used
        #[arg(long)]
        release_name: Option<String>,
        /// URL to check for Renode builds
        #[arg(long, default_value = renode::DEFAULT_RELEASE_URL)]
        release_url: String,
        /// Renode installed directory (default: build/renode)
        #[arg(long)]
        renode_dir: Option<PathBuf>,
        /// Scratch directory for downloads (default: build/tmp)
        #[arg(long)]
        tmp_dir: Option<PathBuf>,
    },
    /// Generate a model input binary from an image or raw buffer
    GenInput {
        /// Model input image (or raw .bin buffer)
        #[arg(short, long)]
        input: PathBuf,
        /// Output binary name
        #[arg(short, long)]
        output: PathBuf,
        /// Model input shape (example: "1,224,224,3")
        #[arg(short, long)]
        shape: String,
        /// The model is quantized
        #[arg(short, long)]
        quant: bool,
        /// Float model input range
        #[arg(short, long, default_value = "-1.0,1.0")]
        range: String,
    },
}

fn main() -> ExitCode {
    init_logger();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::IreeCompiler {
            tag_name,
            release_url,
            installed_dir,
        } => {
            let mut config = iree::default_config();
            config.selector = Some(tag_name);
            config.release_url = release_url;
            if let Some(dir) = installed_dir {
                config.tmp_dir = dir.join("tmp");
                config.install_dir = dir;
            }

            match iree::install(&config)? {
                RefreshOutcome::UpToDate => log_info("IREE compiler is up-to-date"),
                RefreshOutcome::Installed { .. } => log_install("IREE compiler is installed"),
            }
        }
        Commands::Renode {
            release_name,
            release_url,
            renode_dir,
            tmp_dir,
        } => {
            let mut config = renode::default_config();
            config.selector = release_name;
            config.release_url = release_url;
            if let Some(dir) = renode_dir {
                config.install_dir = dir;
            }
            if let Some(dir) = tmp_dir {
                config.tmp_dir = dir;
            }

            match renode::install(&config)? {
                RefreshOutcome::UpToDate => log_info("Renode is up-to-date"),
                RefreshOutcome::Installed { .. } => log_install("Renode is installed"),
            }
        }
        Commands::GenInput {
            input,
            output,
            shape,
            quant,
            range,
        } => {
            let shape = parse_shape(&shape)?;
            let range = parse_range(&range)?;
            mlmodel::generate_input(&input, &output, &shape, quant, range)?;
        }
    }

    Ok(())
}

fn parse_shape(raw: &str) -> Result<Vec<usize>, Box<dyn Error>> {
    raw.split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Invalid input shape '{}': {}", raw, e).into())
}

fn parse_range(raw: &str) -> Result<(f32, f32), Box<dyn Error>> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Invalid input range '{}': {}", raw, e))?;

    match values.as_slice() {
        [low, high] => Ok((*low, *high)),
        _ => Err(format!("Expected two comma-separated values in '{}'", raw).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shape() {
        assert_eq!(parse_shape("1, 224, 224, 3").unwrap(), vec![1, 224, 224, 3]);
        assert!(parse_shape("1,a,3").is_err());
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("-1.0, 1.0").unwrap(), (-1.0, 1.0));
        assert!(parse_range("0.5").is_err());
        assert!(parse_range("0,1,2").is_err());
    }
}
