// src/main.rs
mod contract;
mod extractors;
mod pdf;
mod server;
mod storage;
mod utils;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use contract::models::ContractData;
use contract::report::{self, ConsolidatedSummary};
use extractors::ContractExtractor;
use storage::StorageManager;
use utils::config::{AmountPolicy, ExtractorConfig, ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use utils::error::StorageError;
use utils::AppError;

/// Command Line Interface for the contract statement extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    /// How to handle beneficiary amounts that are not valid numbers
    /// (overrides CONTRACT_AMOUNT_POLICY)
    #[arg(long, value_enum, global = true)]
    amount_policy: Option<AmountPolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a contract statement PDF into JSON
    Extract {
        /// PDF file to read
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for extracted content
        #[arg(short, long, default_value = "./output")]
        output_dir: String,

        /// Print the JSON to stdout instead of saving it
        #[arg(long)]
        print: bool,

        /// Debug mode - save the raw and annotated extracted text
        #[arg(short, long)]
        debug: bool,
    },
    /// Consolidated totals and per-period series of a dataset (JSON or PDF)
    Summary {
        #[arg(long)]
        data: PathBuf,
    },
    /// Payment history of one contract unit across all periods
    Beneficiary {
        #[arg(long)]
        data: PathBuf,

        /// Contract unit id as printed in the statement
        #[arg(long)]
        unit: String,
    },
    /// Find the period for a reference date (dd/mm/yyyy, separators optional)
    Competency {
        #[arg(long)]
        data: PathBuf,

        #[arg(long)]
        date: String,
    },
    /// Serve the extraction endpoint over HTTP
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        bind: std::net::SocketAddr,

        /// Dataset returned by GET /data.json before any upload
        #[arg(long)]
        default_dataset: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
        max_upload_bytes: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (RUST_LOG overrides --verbose)
    utils::logging::setup_logging(if args.verbose { "debug" } else { "info" });
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Resolve extraction settings (CLI flag, then environment)
    let config = ExtractorConfig::resolve(args.amount_policy)?;
    let extractor = ContractExtractor::new(config);

    match args.command {
        Command::Extract { input, output_dir, print, debug } => {
            run_extract(&extractor, &input, &output_dir, print, debug).await
        }
        Command::Summary { data } => {
            let data = load_data(&extractor, &data).await?;
            print_json(&serde_json::json!({
                "contractNumber": data.contract_info.contract_number_or_unknown(),
                "summary": ConsolidatedSummary::from_blocks(&data.blocks),
                "periods": report::period_series(&data),
            }))
        }
        Command::Beneficiary { data, unit } => {
            let data = load_data(&extractor, &data).await?;
            match report::beneficiary_history(&data, &unit) {
                Some(history) => print_json(&history),
                None => Err(AppError::Config(format!("Contract unit {} not found in the data", unit))),
            }
        }
        Command::Competency { data, date } => {
            let data = load_data(&extractor, &data).await?;
            let index = report::find_competency(&data, &date).map_err(|e| AppError::Config(e.to_string()))?;
            print_json(&data.blocks[index])
        }
        Command::Serve { bind, default_dataset, max_upload_bytes } => {
            server::serve(ServerConfig {
                bind,
                default_dataset,
                max_upload_bytes,
                extractor: config,
            })
            .await
        }
    }
}

async fn run_extract(
    extractor: &ContractExtractor,
    input: &Path,
    output_dir: &str,
    print: bool,
    debug: bool,
) -> Result<(), AppError> {
    let bytes = tokio::fs::read(input).await?;
    tracing::info!("Read {} ({} bytes)", input.display(), bytes.len());

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let text = pdf::acquire_text(bytes).await?;

    // Save the raw and annotated text before parsing so failures can be inspected
    let debug_dir = Path::new(output_dir).join("debug");
    if debug {
        std::fs::create_dir_all(&debug_dir)?;
        let raw_path = debug_dir.join(format!("{}_raw.txt", stem));
        std::fs::write(&raw_path, &text)?;
        tracing::info!("Saved raw text to: {}", raw_path.display());

        let annotated_path = debug_dir.join(format!("{}_annotated.txt", stem));
        if let Err(e) = utils::text_debug::save_debug_text(&text, &annotated_path) {
            tracing::warn!("Failed to create annotated debug text: {}", e);
        }
    }

    let data = match extractor.extract_text(&text) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("Failed to extract contract data from {}: {}", input.display(), e);
            if debug {
                let failure_path = debug_dir.join("extraction_failure.txt");
                let failure_info = format!("Failed to extract {}: {}\n", input.display(), e);
                if let Err(e) = std::fs::write(&failure_path, failure_info) {
                    tracing::error!("Failed to save failure info: {}", e);
                }
            }
            return Err(e.into());
        }
    };

    if print {
        return print_json(&data);
    }

    let storage = StorageManager::new(output_dir)?;
    let path = storage.save_contract(&data, &stem)?;
    tracing::info!("Saved contract data to: {}", path.display());
    match storage.save_contract_metadata(&data, &stem) {
        Ok(path) => tracing::info!("Saved metadata to: {}", path.display()),
        Err(e) => tracing::error!("Failed to save metadata: {}", e),
    }

    tracing::info!(
        "Processing finished. Blocks: {}, Beneficiary rows: {}",
        data.blocks.len(),
        data.beneficiary_count()
    );
    Ok(())
}

/// PDFs are extracted on the fly; anything else is read as a saved dataset.
async fn load_data(extractor: &ContractExtractor, path: &Path) -> Result<ContractData, AppError> {
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        let bytes = tokio::fs::read(path).await?;
        Ok(extractor.extract_pdf(bytes).await?)
    } else {
        Ok(storage::load_dataset(path)?)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
