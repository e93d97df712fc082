//! Transcriptgen CLI - semester ledgers to academic statements
//!
//! # Main Commands
//!
//! ```bash
//! transcriptgen generate --ledger sem1.csv --ledger sem2.csv \
//!     --themes themes.csv --out-dir statements \
//!     --start-date 2020-09-01 --end-date 2025-06-30 --statement-date 2025-07-03 \
//!     --specialty-code "1-40 01 01" --specialty-name "ПОИТ" \
//!     --area-code "1-40 01 01-01" --area-name "Веб-технологии"
//! transcriptgen rank --ledger sem1.csv --ledger sem2.csv    # ranking only
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! transcriptgen parse sem1.csv         # Ledger rows as JSON
//! transcriptgen decode "1.Математика/120:5:ЭК"   # Decode one key
//! ```
//!
//! The `generate` exit code is the run status: 0 success, 1 transform
//! failure, 2 enrichment failure, 3 render failure.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

use transcriptgen::{
    decode_key, parse_raw_mark, read_ledger, run, transform_ledgers, GenerateOptions, Mark,
    StatementMetadata,
};

#[derive(Parser)]
#[command(name = "transcriptgen")]
#[command(about = "Reconcile semester grade ledgers into academic statements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: ledgers → statements + ranking sheet
    Generate {
        /// Per-semester ledger CSV (repeat in semester order)
        #[arg(short, long = "ledger", required = true)]
        ledgers: Vec<PathBuf>,

        /// CSV with ФИО and diploma-theme columns
        #[arg(short, long)]
        themes: PathBuf,

        /// Statement template file (built-in template if omitted)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Directory for the statements and the ranking sheet
        #[arg(short, long, default_value = "statements")]
        out_dir: PathBuf,

        /// First day of the study period (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        /// Last day of the study period (YYYY-MM-DD)
        #[arg(long)]
        end_date: NaiveDate,

        /// Statement issue date (YYYY-MM-DD)
        #[arg(long)]
        statement_date: NaiveDate,

        /// Specialty code
        #[arg(long)]
        specialty_code: String,

        /// Specialty name
        #[arg(long)]
        specialty_name: String,

        /// Specialty-area code
        #[arg(long)]
        area_code: String,

        /// Specialty-area name
        #[arg(long)]
        area_name: String,
    },

    /// Compute the descending average-mark ranking only
    Rank {
        /// Per-semester ledger CSV (repeat in semester order)
        #[arg(short, long = "ledger", required = true)]
        ledgers: Vec<PathBuf>,

        /// CSV output file (default: stdout table)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a ledger file and output its rows as JSON
    Parse {
        /// Input ledger CSV
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode one encoded discipline key
    Decode {
        /// Key of the form <term>.<name>/<hours>:<credits>:<form>
        key: String,

        /// Raw mark cell to attach (integer grade or зч)
        #[arg(short, long, default_value = "зч")]
        mark: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            ledgers,
            themes,
            template,
            out_dir,
            start_date,
            end_date,
            statement_date,
            specialty_code,
            specialty_name,
            area_code,
            area_name,
        } => {
            let options = GenerateOptions {
                ledger_paths: ledgers,
                themes_path: themes,
                template_path: template,
                save_dir: out_dir,
                metadata: StatementMetadata {
                    start_date,
                    end_date,
                    statement_date,
                    specialty_code,
                    specialty_name,
                    specialty_area_code: area_code,
                    specialty_area_name: area_name,
                },
            };
            ExitCode::from(run(&options).code())
        }
        Commands::Rank { ledgers, output } => report_result(rank_command(&ledgers, output)),
        Commands::Parse { input, output } => report_result(parse_command(&input, output)),
        Commands::Decode { key, mark } => report_result(decode_command(&key, &mark)),
    }
}

fn report_result(result: Result<(), Box<dyn std::error::Error>>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn rank_command(
    ledgers: &[PathBuf],
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = transform_ledgers(ledgers)?;
    let ranking = outcome.ranking;

    match output {
        Some(path) => {
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(["ФИО", "Средний балл"])?;
            for entry in &ranking {
                writer.write_record([entry.full_name.as_str(), &entry.average.to_string()])?;
            }
            writer.flush()?;
            println!("Ranking written to {}", path.display());
        }
        None => {
            for entry in &ranking {
                println!("{:<40} {:.2}", entry.full_name, entry.average);
            }
        }
    }
    Ok(())
}

fn parse_command(
    input: &PathBuf,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = read_ledger(input)?;

    let rows: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            for (header, cell) in table.headers.iter().zip(row) {
                obj.insert(header.clone(), json!(cell));
            }
            Value::Object(obj)
        })
        .collect();

    let json = serde_json::to_string_pretty(&rows)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!(
                "{} rows written to {} (encoding: {}, delimiter: '{}')",
                table.rows.len(),
                path.display(),
                table.encoding,
                table.delimiter,
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn decode_command(key: &str, mark: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mark = Mark::Single(parse_raw_mark("<cli>", mark)?);
    let record = decode_key(key, mark)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
