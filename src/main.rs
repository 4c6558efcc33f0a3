use clap::{Parser, Subcommand};
use image_checker::{analysis, config, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "image-checker")]
#[command(about = "Inspect an image for EXIF metadata and LSB-hidden text")]
#[command(long_about = "\
Inspect an image for EXIF metadata and LSB-hidden text

Two independent checks run on the same file:

  Metadata       Make, Model, DateTimeOriginal, GPSLatitude, GPSLongitude,
                 Software; GPS converted to decimal degrees with a map link
  Steganography  least-significant bit of R, G, B per pixel in raster order,
                 read as Latin-1 bytes up to the first 0xFF 0xFF pair

A failure in one check never hides the other's result. Hidden text found in
ordinary photos is often noise; treat it as a hint, not proof.

Run 'image-checker gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./image-checker.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run both checks and save the JSON record
    Analyze {
        /// Image to inspect (JPEG or PNG)
        path: PathBuf,
        /// Do not write the JSON results file
        #[arg(long)]
        no_save: bool,
    },
    /// EXIF summary and GPS coordinates only
    Metadata {
        /// Image to inspect
        path: PathBuf,
    },
    /// LSB payload check only
    Stego {
        /// Image to inspect
        path: PathBuf,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Analyze { path, no_save } => {
            let config = load_config(cli.config.as_deref())?;
            let result = analysis::analyze(&path)?;
            output::print_analysis(&result, &config);
            if config.output.save_results && !no_save {
                let results_path = Path::new(&config.output.results_file);
                result.record().save(results_path)?;
                println!("\nResults saved to {}", results_path.display());
            }
        }
        Command::Metadata { path } => {
            let config = load_config(cli.config.as_deref())?;
            let (summary, coordinates) = analysis::analyze_metadata_only(&path)?;
            output::print_metadata(&summary, coordinates.as_ref(), &config);
        }
        Command::Stego { path } => {
            let (report, image) = analysis::analyze_stego_only(&path)?;
            output::print_stego(&report, image.as_ref());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve config relative to the current working directory.
fn load_config(explicit: Option<&Path>) -> Result<config::AnalyzerConfig, config::ConfigError> {
    let cwd = std::env::current_dir()?;
    config::load_config(explicit, &cwd)
}
