//! domains2providers: CLI tool for generating Clash rule providers.

use clap::{Parser, Subcommand};
use domains2providers::fetch::{Fetcher, DEFAULT_RETRIES};
use domains2providers::geosite::{collect_ads, GeositeData};
use domains2providers::{CategoryConfig, Pipeline, Provider, ProviderWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "domains2providers")]
#[command(version)]
#[command(about = "Generate Clash rule providers from domain and IP lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct FetchArgs {
    /// Categories YAML file (built-in sources when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Retries after a failed download
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    retries: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every category and write its provider
    Raw {
        /// Output directory for provider files
        #[arg(short, long, default_value = "generated")]
        output_dir: PathBuf,

        #[command(flatten)]
        fetch: FetchArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert a geosite data directory into providers
    Geosite {
        /// domain-list-community checkout or its data/ directory
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory for provider files
        #[arg(short, long, default_value = "generated")]
        output_dir: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run geosite conversion and category fetching
    All {
        /// domain-list-community checkout or its data/ directory
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory for provider files
        #[arg(short, long, default_value = "generated")]
        output_dir: PathBuf,

        #[command(flatten)]
        fetch: FetchArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a categories file
    Check {
        /// Categories YAML file
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Raw {
            output_dir,
            fetch,
            verbose,
        } => {
            init_logging(verbose);
            generate_raw(&output_dir, &fetch)
        }
        Commands::Geosite {
            data,
            output_dir,
            verbose,
        } => {
            init_logging(verbose);
            generate_geosite(&data, &output_dir)
        }
        Commands::All {
            data,
            output_dir,
            fetch,
            verbose,
        } => {
            init_logging(verbose);
            let geosite = generate_geosite(&data, &output_dir);
            let raw = generate_raw(&output_dir, &fetch);
            geosite.and(raw)
        }
        Commands::Check { config } => {
            init_logging(false);
            check_config(&config)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> domains2providers::Result<CategoryConfig> {
    match path {
        Some(path) => CategoryConfig::load(path),
        None => Ok(CategoryConfig::builtin()),
    }
}

fn write_providers(
    output_dir: &Path,
    providers: &[Provider],
) -> Result<(), Box<dyn std::error::Error>> {
    let writer = ProviderWriter::new(output_dir)?;
    let (_, failed) = writer.write_all(providers);
    if !failed.is_empty() {
        return Err(format!("failed to write: {}", failed.join(", ")).into());
    }
    Ok(())
}

fn generate_raw(output_dir: &Path, args: &FetchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref())?;
    let fetcher = Fetcher::with_config(Duration::from_secs(args.timeout), args.retries)?;

    let (providers, failed) = Pipeline::new(fetcher).providers(&config.categories);
    write_providers(output_dir, &providers)?;

    println!(
        "Generated {} of {} categories in {:?}",
        providers.len(),
        config.len(),
        output_dir
    );
    if !failed.is_empty() {
        return Err(format!("failed categories: {}", failed.join(", ")).into());
    }
    Ok(())
}

fn generate_geosite(data: &Path, output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let geosite = GeositeData::load_dir(data)?;
    let (mut providers, failed) = geosite.providers();
    providers.push(collect_ads(&providers));
    write_providers(output_dir, &providers)?;

    println!(
        "Generated {} providers from {} geosite lists in {:?}",
        providers.len(),
        geosite.len(),
        output_dir
    );
    if !failed.is_empty() {
        return Err(format!("failed lists: {}", failed.join(", ")).into());
    }
    Ok(())
}

fn check_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = CategoryConfig::load(path)?;
    for category in &config.categories {
        println!(
            "{:<20} {:<8} {} source(s), {} blacklist source(s)",
            category.name,
            category.behavior.as_str(),
            category.sources.len(),
            category.blacklist.len()
        );
    }
    println!("{} categories OK", config.len());
    Ok(())
}
