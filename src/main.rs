// Passage Lens - text analysis for a single pasted passage
//
// Paste a passage and get back its word counts, the predominant emotion,
// books it might come from, and a three-sentence summary.
//
// Architecture:
// - Web server (axum): one page with a form, plus a JSON endpoint
// - Analysis flow: word counts -> emotion -> book search -> summary
// - Language data: tokenizer abbreviations, VADER lexicon, stopword list,
//   fetched into a local data directory on first run
// - Book search (reqwest): Google Books volumes API, key from a secrets file

mod analysis;
mod books;
mod cli;
mod config;
mod logging;
mod nlp;
mod resources;
mod secrets;
mod sentiment;
mod startup;
mod summarize;
mod util;
mod web;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use analysis::{Analyzer, SummaryLength};
use books::BookSearchClient;
use cli::RunMode;
use config::Config;
use resources::LanguageData;
use secrets::Secrets;

#[tokio::main]
async fn main() -> Result<()> {
    // Config subcommands are handled synchronously and exit early
    let Some(mode) = cli::handle_cli() else {
        return Ok(());
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env()?;

    // Keep stdout clean for one-shot output
    let console = match mode {
        RunMode::Serve => logging::Console::Stdout,
        RunMode::Analyze(_) | RunMode::FetchData => logging::Console::Stderr,
    };
    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _log_guard = logging::init(&config.logging, console);

    match mode {
        RunMode::Serve => serve(config).await,
        RunMode::Analyze(file) => analyze_once(config, file).await,
        RunMode::FetchData => fetch_data(config).await,
    }
}

/// Everything the analysis flow needs, loaded once
struct Loaded {
    analyzer: Analyzer,
    language: Arc<LanguageData>,
    secrets: Secrets,
}

async fn load_all(config: &Config) -> Result<Loaded> {
    let client =
        BookSearchClient::http_client(&config.books).context("Failed to create HTTP client")?;

    resources::ensure_all(config, &client)
        .await
        .context("Failed to fetch language data")?;
    let language = Arc::new(resources::load(config).context("Failed to load language data")?);

    let secrets = Secrets::load(&config.secrets_path).context("Failed to load secrets")?;
    tracing::info!("Loaded API key (fingerprint {})", secrets.fingerprint());

    let books = BookSearchClient::new(client, &config.books, secrets.api_key());
    let analyzer = Analyzer::new(
        language.clone(),
        books,
        SummaryLength {
            sentences: config.summary.sentences,
            limit: config.summary.max_sentences,
        },
    );

    Ok(Loaded {
        analyzer,
        language,
        secrets,
    })
}

async fn serve(config: Config) -> Result<()> {
    let Loaded {
        analyzer,
        language,
        secrets,
    } = load_all(&config).await?;

    // Print startup banner AFTER initialization (shows actual status)
    let modules = startup::module_status(&config, &language, &secrets);
    startup::print_startup(&config, &modules);
    startup::log_startup(&config, &modules);

    // Oneshot channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let state = web::AppState { analyzer };
    let mut server = tokio::spawn(web::start_server(
        config.bind_addr,
        state,
        config.max_passage_bytes,
        shutdown_rx,
    ));

    tokio::select! {
        // Server stopped on its own (e.g. bind failure)
        result = &mut server => {
            return result.context("Web server task failed")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
        }
    }

    tracing::info!("Shutting down...");

    // If the send fails, the server has already shut down (which is fine)
    let _ = shutdown_tx.send(());
    server.await.context("Web server task failed")??;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn analyze_once(config: Config, file: Option<PathBuf>) -> Result<()> {
    let passage = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read passage from stdin")?;
            text
        }
    };

    let Loaded { analyzer, .. } = load_all(&config).await?;
    let outcome = analyzer
        .analyze(&passage)
        .await
        .context("Analysis failed")?;

    print!("{}", analysis::render::render_text(&outcome));
    Ok(())
}

async fn fetch_data(config: Config) -> Result<()> {
    let client =
        BookSearchClient::http_client(&config.books).context("Failed to create HTTP client")?;

    let created = resources::ensure_all(&config, &client)
        .await
        .context("Failed to fetch language data")?;

    if created.is_empty() {
        println!("Language data already present in {}", config.data_dir.display());
    } else {
        for package in &created {
            println!(
                "Fetched {} -> {}",
                package.name(),
                package.path_in(&config.data_dir).display()
            );
        }
    }
    Ok(())
}
