//! solcat - classify "what helped" text from the command line
//!
//! # Commands
//! - `detect <text>`: known solutions, categories, and keyword suggestions
//! - `check <name>`: specificity verdict for a proposed solution name
//! - `validate [--file path]`: batch specificity check, one name per line
//! - `categories [--group]`: the category registry
//!
//! # Output
//! JSON on stdout. Diagnostics go to stderr and are controlled by `RUST_LOG`.
//! A failed `detect` still prints an empty detection result; other commands
//! print `{"error": "..."}`. Either way the exit code is 1.

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use solution_classifier::backend::{default_catalog_path, CatalogBackend};
use solution_classifier::filter::GenericFilter;
use solution_classifier::specificity::SpecificityScorer;
use solution_classifier::{
    get_categories_by_group, Category, ClassifierError, Confidence, DetectionResult, DetectorSettings,
    MatchType, RuleSet, SolutionDetector,
};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "solcat", version, about = "Recognize and categorize solutions in free text")]
struct Cli {
    /// Solution catalog JSON (default: ~/.solution-classifier/catalog.json)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Rule override JSON; omitted fields keep built-in values
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect known solutions and categories in free text
    Detect {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Check whether a proposed solution name is specific enough
    Check {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Validate many names, one per line (stdin when --file is absent)
    Validate {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List categories
    Categories {
        /// Group categories for browsing
        #[arg(long)]
        group: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryRow {
    key: &'static str,
    display_name: &'static str,
    description: &'static str,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let detect_text = match &cli.command {
        Command::Detect { text } => Some(text.join(" ")),
        _ => None,
    };

    if let Err(e) = run(cli).await {
        error!("Error: {}", e);
        println!("{}", failure_output(detect_text.as_deref(), &e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ClassifierError> {
    let rules = match &cli.rules {
        Some(path) => {
            debug!("Loading rules from {:?}", path);
            RuleSet::from_file(path)?
        }
        None => RuleSet::default(),
    };
    info!("Using rules version {}", rules.version);

    match cli.command {
        Command::Detect { text } => {
            let text = text.join(" ");
            let result = detect(cli.catalog, &rules, &text).await?;
            print_detection_summary(&result);
            println!("{}", serde_json::to_string(&result)?);
        }
        Command::Check { name } => {
            let name = name.join(" ");
            let scorer = scorer(&rules)?;
            let check = scorer.check_specificity(&name);
            let verdict = if check.is_acceptable() {
                "ACCEPT".green()
            } else {
                "REJECT".red()
            };
            info!(
                "{} {} (score {})",
                verdict,
                name.bold(),
                check.specificity_score
            );
            for reason in &check.failure_reasons {
                info!("  - {}", reason.yellow());
            }
            println!("{}", serde_json::to_string(&check)?);
        }
        Command::Validate { file } => {
            let content = match file {
                Some(path) => fs::read_to_string(&path)?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let names: Vec<&str> = content.lines().collect();
            let report = scorer(&rules)?.validate_solutions(&names);
            info!(
                "{} valid, {} invalid ({:.0}% pass)",
                report.stats.valid.to_string().green(),
                report.stats.invalid.to_string().red(),
                report.stats.pass_rate * 100.0
            );
            println!("{}", serde_json::to_string(&report)?);
        }
        Command::Categories { group } => {
            let row = |c: &Category| CategoryRow {
                key: c.key(),
                display_name: c.display_name(),
                description: c.description(),
            };
            if group {
                let grouped: BTreeMap<&'static str, Vec<CategoryRow>> = get_categories_by_group()
                    .into_iter()
                    .map(|(g, cats)| (g.display_name(), cats.iter().map(row).collect()))
                    .collect();
                println!("{}", serde_json::to_string(&grouped)?);
            } else {
                let rows: Vec<CategoryRow> = Category::ALL
                    .iter()
                    .map(row)
                    .collect();
                println!("{}", serde_json::to_string(&rows)?);
            }
        }
    }

    Ok(())
}

/// Detection degrades to an empty result; other commands report the error.
fn failure_output(detect_text: Option<&str>, e: &ClassifierError) -> String {
    match detect_text {
        Some(text) => serde_json::to_string(&DetectionResult::empty(text.trim())).unwrap_or_default(),
        None => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

fn scorer(rules: &RuleSet) -> Result<SpecificityScorer, ClassifierError> {
    let filter = Arc::new(GenericFilter::new(rules)?);
    Ok(SpecificityScorer::new(rules, filter))
}

async fn detect(
    catalog: Option<PathBuf>,
    rules: &RuleSet,
    text: &str,
) -> Result<DetectionResult, ClassifierError> {
    let path = match catalog {
        Some(path) => path,
        None => default_catalog_path()?,
    };
    debug!("Loading catalog from {:?}", path);

    let backend = match CatalogBackend::load(&path) {
        Ok(backend) => backend,
        Err(ClassifierError::CatalogNotFound(path)) => {
            warn!("Catalog not found at {:?}, returning empty", path);
            return Ok(DetectionResult::empty(text.trim()));
        }
        Err(e) => return Err(e),
    };
    info!("Loaded {} solutions from catalog", backend.solution_count());

    let detector = SolutionDetector::new(Arc::new(backend), rules, &DetectorSettings::default())?;
    Ok(detector.detect_from_input(text).await)
}

fn print_detection_summary(result: &DetectionResult) {
    for category in &result.categories {
        let confidence = match category.confidence {
            Confidence::High => category.confidence.as_str().green(),
            Confidence::Medium => category.confidence.as_str().yellow(),
            Confidence::Low => category.confidence.as_str().red(),
        };
        info!("{} {} [{}]", "◆".blue(), category.display_name.bold(), confidence);
    }
    for solution in &result.solutions {
        let marker = match solution.match_type {
            MatchType::Exact => "=".green(),
            MatchType::Partial => "~".yellow(),
            MatchType::Suggested => "?".white(),
        };
        info!(
            "{} {} ({})",
            marker,
            solution.title.bold(),
            solution.category_display_name
        );
    }
}
