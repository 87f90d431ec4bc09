// Startup module - displays banner and subsystem status
//
// Shows the version, where configuration came from, and what each
// subsystem loaded, before the server starts taking requests.

use crate::config::{Config, VERSION};
use crate::resources::LanguageData;
use crate::secrets::Secrets;

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Subsystem status for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: String,
}

/// Status of every subsystem after language data and secrets are loaded
pub fn module_status(config: &Config, language: &LanguageData, secrets: &Secrets) -> Vec<ModuleStatus> {
    vec![
        ModuleStatus {
            name: "tokenizer",
            enabled: true,
            description: format!("{} abbreviations", language.tokenizer.abbreviation_count()),
        },
        ModuleStatus {
            name: "sentiment",
            enabled: language.analyzer.lexicon_len() > 0,
            description: format!("VADER lexicon, {} entries", language.analyzer.lexicon_len()),
        },
        ModuleStatus {
            name: "stopwords",
            enabled: !language.stopwords.is_empty(),
            description: format!(
                "{} words ({})",
                language.stopwords.len(),
                config.language.stopwords.as_str()
            ),
        },
        ModuleStatus {
            name: "books",
            enabled: true,
            description: format!(
                "top {} via {} (key {})",
                config.books.max_results,
                config.books.api_url,
                secrets.fingerprint()
            ),
        },
        ModuleStatus {
            name: "summary",
            enabled: config.summary.sentences > 0,
            description: format!(
                "LSA, {} sentences from the first {}",
                config.summary.sentences, config.summary.max_sentences
            ),
        },
        ModuleStatus {
            name: "file-log",
            enabled: config.logging.file.enabled,
            description: if config.logging.file.enabled {
                format!(
                    "{} ({})",
                    config.logging.file.dir.display(),
                    config.logging.file.rotation.as_str()
                )
            } else {
                "JSON log files".to_string()
            },
        },
    ]
}

/// Print the startup banner and subsystem status
pub fn print_startup(config: &Config, modules: &[ModuleStatus]) {
    use colors::*;

    // Banner
    println!();
    println!("  {BOLD}{CYAN}Passage Lens{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Word counts, emotion, book matches and summaries for any passage{RESET}");
    println!();

    // Config file status
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!("  {DIM}Data:{RESET}   {}", config.data_dir.display());
    println!();

    println!("  {DIM}Loading modules...{RESET}");
    for module in modules {
        print_module_status(module);
    }
    println!();

    println!(
        "  {MAGENTA}▸{RESET} Open {BOLD}http://{}{RESET}",
        config.bind_addr
    );
    println!();
}

/// Print a single module's status
fn print_module_status(module: &ModuleStatus) {
    use colors::*;

    let (icon, style) = if module.enabled {
        (format!("{GREEN}✓{RESET}"), "")
    } else {
        (format!("{DIM}○{RESET}"), DIM)
    };

    println!(
        "    {icon} {style}{:<12}{RESET} {DIM}{}{RESET}",
        module.name, module.description
    );
}

/// Record the same startup information in the log
pub fn log_startup(config: &Config, modules: &[ModuleStatus]) {
    tracing::info!("Passage Lens v{}", VERSION);

    for module in modules {
        let icon = if module.enabled { "✓" } else { "○" };
        tracing::info!("  {} {} - {}", icon, module.name, module.description);
    }

    tracing::info!("▸ Listening on {}", config.bind_addr);
}
