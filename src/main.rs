mod generator;
mod models;
mod output;
mod storage;
mod types;
mod verify;

use std::io::stderr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tokio::task::spawn_blocking;
use tracing::{debug, info};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::generator::{
    FixtureGenerator, GenerationError, GenerationSummary, GeneratorConfig, IdStrategy, SelectionWeights
};
use crate::models::{ClientSnapshot, EmittedTransaction, TransactionType};
use crate::output::{ensure_distinct_outputs, CsvSink, OutputError};
use crate::types::{ClientId, Monetary};
use crate::verify::verify_files;

/// Generate consistent transaction fixtures for payments engines, and check engine output against them
#[derive(Parser, Debug)]
#[command(name = "ledger-fixture-generator", version, about, long_about = None)]
struct Cli {
    /// Log level written to stderr: error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "info", value_parser = parse_log_level)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a transaction log and the expected final account states
    Generate(GenerateArgs),
    /// Compare an engine's account output with the expected account states
    Verify(VerifyArgs)
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of transactions to generate
    #[arg(short = 'n', long, default_value_t = 100)]
    count: usize,

    /// Largest amount a single deposit may carry
    #[arg(long, value_name = "AMOUNT", default_value = "50000")]
    max_amount: Monetary,

    /// Number of clients created before generation starts
    #[arg(long, default_value_t = 2000)]
    clients: ClientId,

    /// Relative weights for deposit,withdrawal,dispute,resolve,chargeback
    #[arg(long, value_name = "WEIGHTS", default_value = "2,1,1,0.5,0.05")]
    weights: SelectionWeights,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Use sequential integer transaction ids instead of UUIDs
    #[arg(long)]
    sequential_ids: bool,

    /// Where to write the transaction log
    #[arg(long, value_name = "PATH", default_value = "data/transactions.csv")]
    transactions: PathBuf,

    /// Where to write the expected account states
    #[arg(long, value_name = "PATH", default_value = "data/expected_accounts.csv")]
    expected: PathBuf,

    /// Fail instead of replacing output files that already exist
    #[arg(long)]
    no_clobber: bool
}

impl GenerateArgs {
    fn to_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            count: self.count,
            max_amount: self.max_amount,
            initial_clients: self.clients,
            weights: self.weights,
            seed: self.seed,
            id_strategy: if self.sequential_ids { IdStrategy::Sequential } else { IdStrategy::Uuid }
        }
    }
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Expected account states written by `generate`
    #[arg(long, value_name = "PATH", default_value = "data/expected_accounts.csv")]
    expected: PathBuf,

    /// Account states produced by the engine under test
    #[arg(long, value_name = "PATH")]
    actual: PathBuf
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level);

    match cli.command {
        Command::Generate(args) => generate(args).await,
        Command::Verify(args) => verify(args).await
    }
}

async fn generate(args: GenerateArgs) -> Result<()> {
    let config = args.to_config();

    info!(
        "Generating {} transactions over {} initial clients (max amount {}, weights {}, seed {:?})",
        config.count, config.initial_clients, config.max_amount, config.weights, config.seed
    );

    let timer = Instant::now();
    let summary = spawn_blocking(move || write_fixture(&args, &config)).await??;
    let duration = timer.elapsed();

    info!("Generated {} transactions in: {duration:?}", summary.transactions);
    info!(
        "deposit: {}, withdrawal: {}, dispute: {}, resolve: {}, chargeback: {}",
        summary.count_of(TransactionType::Deposit),
        summary.count_of(TransactionType::Withdrawal),
        summary.count_of(TransactionType::Dispute),
        summary.count_of(TransactionType::Resolve),
        summary.count_of(TransactionType::Chargeback)
    );
    info!(
        "Substituted {} deposits, created {} clients, wrote {} expected account rows",
        summary.fallbacks, summary.clients_created, summary.snapshots
    );

    Ok(())
}

fn write_fixture(args: &GenerateArgs, config: &GeneratorConfig) -> Result<GenerationSummary, GenerationError> {
    let mut generator = FixtureGenerator::new(config)?;
    let clobber = !args.no_clobber;

    ensure_distinct_outputs(&args.transactions, &args.expected)?;

    if let Some(existing) = [&args.transactions, &args.expected].into_iter().find(|path| !clobber && path.exists()) {
        return Err(OutputError::DuplicateFileExists(existing.clone()).into());
    }

    let mut transactions = CsvSink::create(&args.transactions, &EmittedTransaction::HEADER, clobber)?;
    let mut snapshots = CsvSink::create(&args.expected, &ClientSnapshot::HEADER, clobber)?;

    let summary = generator.run(&mut transactions, &mut snapshots)?;

    debug!(
        "Ledger tracks {} clients, catalog holds {} deposits and withdrawals",
        generator.ledger().len(),
        generator.catalog().len()
    );

    Ok(summary)
}

async fn verify(args: VerifyArgs) -> Result<()> {
    let timer = Instant::now();
    let report = verify_files(args.expected, args.actual).await?;

    info!("Verified accounts in: {:?}", timer.elapsed());
    println!(
        "Success: {} expected clients matched, {} additional clients in default state",
        report.clients_checked, report.extra_clients
    );

    Ok(())
}

fn parse_log_level(level: &str) -> Result<LevelFilter, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(format!("invalid log level '{level}', expected one of: error, warn, info, debug, trace"))
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the verification result, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
