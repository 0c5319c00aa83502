use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use trendvec_common::{logger, AppConfig, TrendvecError};
use trendvec_vector::{
    build_with_progress, load_records, sample_records, search, Embedder, HashEmbedder,
    IndexStore, SearchResult,
};

/// Query used by the `test` command
const SELF_TEST_QUERY: &str = "white sneakers";

/// Catalogs smaller than this build without a progress bar
const PROGRESS_THRESHOLD: usize = 1000;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "trendvec")]
#[command(about = "Trendvec - local product vector index with exact cosine search", long_about = None)]
struct Cli {
    /// Directory holding the index artifacts
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log to the console only, without writing trendvec.log
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and write the embeddings/metadata artifacts
    Create {
        /// JSON array of records (defaults to the built-in sample products)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Embedding dimension
        #[arg(long)]
        dim: Option<usize>,
    },

    /// Search the stored index
    Search {
        /// Query text
        query: String,

        /// Number of results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Search the stored index for "white sneakers"
    Test,

    /// Show index statistics
    Stats,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("❌ {}", e);
        let code = e
            .downcast_ref::<TrendvecError>()
            .map(TrendvecError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env at project root
    load_dotenv_from_project_root();

    let mut config = AppConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    config.ensure_directories()?;

    // Setup logging
    if cli.no_log_file {
        logger::setup_console_logging(&config.log_level)?;
    } else {
        logger::setup_logging(&config.log_dir, &config.log_level)?;
    }
    tracing::debug!("Configuration loaded: {:?}", config);

    match cli.command {
        Some(Commands::Create { input, dim }) => {
            let dim = positive_arg("--dim", dim, config.embedding_dim)?;
            create_index(&config, input, dim).await?;
        }
        Some(Commands::Search { query, top_k }) => {
            let top_k = positive_arg("--top-k", top_k, config.default_top_k)?;
            run_search(&config, &query, top_k).await?;
        }
        Some(Commands::Test) => {
            run_search(&config, SELF_TEST_QUERY, config.default_top_k).await?;
        }
        Some(Commands::Stats) => {
            print_stats(&config).await?;
        }
        None => {
            println!("🔧 Setting up the TrendZone vector index...");
            create_index(&config, None, config.embedding_dim).await?;
            run_search(&config, SELF_TEST_QUERY, config.default_top_k).await?;
            println!("\n✅ Setup completed!");
        }
    }

    Ok(())
}

/// Resolve an optional numeric flag, rejecting 0
fn positive_arg(
    flag: &str,
    value: Option<usize>,
    default: usize,
) -> std::result::Result<usize, TrendvecError> {
    match value {
        Some(0) => Err(TrendvecError::invalid_input(format!(
            "{} must be greater than 0",
            flag
        ))),
        Some(v) => Ok(v),
        None => Ok(default),
    }
}

async fn create_index(config: &AppConfig, input: Option<PathBuf>, dim: usize) -> Result<()> {
    let records = match input {
        Some(path) => load_records(&path).await?,
        None => sample_records(),
    };

    let embedder = HashEmbedder::new(dim)?;

    let progress = if records.len() >= PROGRESS_THRESHOLD {
        let bar = ProgressBar::new(records.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} records ({eta})")?
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let index = build_with_progress(&embedder, records, |_| {
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    })?;
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let store = IndexStore::new(config);
    let manifest = store.save(&index, &embedder.name()).await?;

    println!("✅ Embeddings saved to {}", store.embeddings_path().display());
    println!("✅ Metadata saved to {}", store.metadata_path().display());
    println!("📊 Created index with {} vectors", manifest.count);

    Ok(())
}

async fn run_search(config: &AppConfig, query: &str, top_k: usize) -> Result<()> {
    let store = IndexStore::new(config);
    println!("🔍 Loading embeddings...");
    let index = store.load().await?;

    println!("🔍 Searching for: {}", query);
    let results = search(query, &index, top_k)?;

    println!("📋 Search results:");
    print_results(&results);

    Ok(())
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("  (no results)");
        return;
    }

    for (rank, result) in results.iter().enumerate() {
        let record = &result.record;
        println!("  {}. {} (Score: {:.3})", rank + 1, record.name, result.score);
        println!("     Category: {}", record.category);
        if let Some(price) = record.price {
            println!("     Price: ${}", price);
        }
    }
}

async fn print_stats(config: &AppConfig) -> Result<()> {
    let store = IndexStore::new(config);
    let index = store.load().await?;

    println!("📊 Records:   {}", index.len());
    println!("📐 Dimension: {}", index.dim());
    if let Some(manifest) = store.manifest().await? {
        println!("🧮 Embedder:  {}", manifest.embedder);
        println!("🕒 Created:   {}", manifest.created_at.to_rfc3339());
        println!("🔒 SHA-256:   {}", manifest.embeddings_sha256);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_arg() {
        assert_eq!(positive_arg("--dim", None, 64).unwrap(), 64);
        assert_eq!(positive_arg("--dim", Some(128), 64).unwrap(), 128);

        let err = positive_arg("--top-k", Some(0), 3).unwrap_err();
        assert!(matches!(err, TrendvecError::InvalidInput(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from(["trendvec", "search", "white sneakers", "-k", "2"]).unwrap();
        match cli.command {
            Some(Commands::Search { query, top_k }) => {
                assert_eq!(query, "white sneakers");
                assert_eq!(top_k, Some(2));
            }
            _ => panic!("expected search command"),
        }
    }
}
