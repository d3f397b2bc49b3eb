// Command line front end for the toTravel core: replays date-field edits and
// queries the passport index dataset.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use totravel::{
    models::{CountryDirectory, CountryNameResolver, VisaCategory},
    processing::{lookup_requirement, RequirementDataset, VisaRequirementClassifier},
    utils::TravelError,
    validation::{commit_date, DateConstraints, DateMaskValidator},
    Config,
};

#[derive(Parser)]
#[command(name = "totravel", version, about = "Passport and visa helper")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay edits of a DD.MM.YYYY field; each value is the field text after one edit
    Mask {
        edits: Vec<String>,
        /// Earliest accepted date
        #[arg(long, value_parser = parse_date)]
        min: Option<NaiveDate>,
        /// Other end of the date range
        #[arg(long, value_parser = parse_date)]
        opposite: Option<NaiveDate>,
        /// The field is the start of the range
        #[arg(long)]
        start: bool,
    },
    /// Strictly parse a completed DD.MM.YYYY value
    Commit { text: String },
    /// Show the category of a requirement code
    Classify { code: String },
    /// List destinations of a passport by visa category
    Categorize {
        #[arg(long)]
        passport: String,
        /// Passport index CSV, also written to the cache (defaults to the cached dataset)
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Flag CDN codes.json used for country names
        #[arg(long)]
        codes: Option<PathBuf>,
    },
    /// Show the requirement for one passport and destination
    Lookup {
        #[arg(long)]
        passport: String,
        #[arg(long)]
        destination: String,
        /// Passport index CSV, also written to the cache (defaults to the cached dataset)
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    commit_date(value)
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
        .ok_or_else(|| format!("expected DD.MM.YYYY or YYYY-MM-DD, got {:?}", value))
}

fn load_dataset(config: &Config, path: Option<PathBuf>) -> Result<RequirementDataset, TravelError> {
    match path {
        Some(path) => RequirementDataset::import_csv(&path, config.dataset_cache_path()),
        None => Ok(RequirementDataset::load_cache(config.dataset_cache_path())?.unwrap_or_default()),
    }
}

fn load_directory(config: &Config, path: Option<PathBuf>) -> Result<CountryDirectory, TravelError> {
    let path = path.unwrap_or_else(|| config.codes_cache_path());
    if path.exists() {
        CountryDirectory::from_codes_file(path)
    } else {
        Ok(CountryDirectory::default())
    }
}

fn main() -> Result<(), TravelError> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    match cli.command {
        Command::Mask {
            edits,
            min,
            opposite,
            start,
        } => {
            let validator = DateMaskValidator::with_constraints(DateConstraints {
                minimum_date: min,
                opposite_date: opposite,
                is_start_boundary: start,
            });
            let mut text = String::new();
            for edit in edits {
                let outcome = validator.format_and_validate(&text, &edit);
                println!(
                    "{:<12} -> {:<10} {}",
                    edit,
                    outcome.text,
                    if outcome.is_valid { "ok" } else { "REJECTED" }
                );
                text = outcome.text;
            }
            match commit_date(&text) {
                Some(date) => println!("Date: {}", date),
                None => println!("Date: incomplete"),
            }
        }
        Command::Commit { text } => match commit_date(&text) {
            Some(date) => println!("{}", date),
            None => println!("invalid"),
        },
        Command::Classify { code } => {
            println!("{}", VisaCategory::classify(&code));
        }
        Command::Categorize {
            passport,
            dataset,
            codes,
        } => {
            let dataset = load_dataset(&config, dataset)?;
            let directory = load_directory(&config, codes)?;
            info!("{} rows, {} country names", dataset.len(), directory.len());

            let classifier = VisaRequirementClassifier::new(&directory);
            let destinations = classifier.categorize(&passport, dataset.entries());
            if destinations.is_empty() {
                println!("No destinations for passport {}", passport);
            }
            for category in VisaCategory::ALL {
                let entries = destinations.get(category);
                if entries.is_empty() {
                    continue;
                }
                println!("\n{} ({}):", category.label().to_uppercase(), entries.len());
                for entry in entries {
                    let name = directory.resolve_name(&entry.destination_country_code);
                    match entry.allowed_stay_days() {
                        Some(days) => println!("  {} ({} days)", name, days),
                        None => println!("  {}", name),
                    }
                }
            }
        }
        Command::Lookup {
            passport,
            destination,
            dataset,
        } => {
            let dataset = load_dataset(&config, dataset)?;
            match lookup_requirement(&passport, &destination, dataset.entries()) {
                Some(entry) => println!("{} ({})", entry.requirement_code, entry.category()),
                None => println!("No data for {} -> {}", passport, destination),
            }
        }
    }

    Ok(())
}
