//! OwwJurnal CLI
//!
//! Local entry point. The functions themselves run in `owwjurnal-server`
//! or `owwjurnal-lambda`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use owwjurnal::{
    client::{
        FileCache, FunctionsClient, HeroIllustration, HeroLoader, RecommendationPanel,
        SearchSession, copy_citation_for,
    },
    error::{AppError, Result},
    models::{
        CitationFormat, Config, FacetValue, JournalRecord, Language, ResearchType,
        SintaAccreditation, Source,
        catalog::{demo_catalog, find_by_id},
    },
    services::{SystemClipboard, generate_citation_named},
};

/// OwwJurnal - academic journal search for Indonesian students
#[derive(Parser, Debug)]
#[command(
    name = "owwjurnal",
    version,
    about = "Journal search, citations and AI thesis recommendations"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the journal catalog
    Search {
        /// Free-text query matched against title, abstract and authors
        #[arg(default_value = "")]
        query: String,

        /// Source filter (google_scholar, sinta, garuda, pubmed, arxiv), repeatable
        #[arg(long = "source")]
        sources: Vec<String>,

        /// SINTA accreditation filter (S1..S6), repeatable
        #[arg(long = "sinta")]
        accreditation: Vec<String>,

        #[arg(long)]
        year_from: Option<i32>,

        #[arg(long)]
        year_to: Option<i32>,

        /// Research type filter (kualitatif, kuantitatif, mixed), repeatable
        #[arg(long = "type")]
        research_type: Vec<String>,

        /// Language filter (id, en, other), repeatable
        #[arg(long = "lang")]
        language: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a citation for a catalog record
    Cite {
        /// Record id
        id: String,

        /// apa, mla, ieee, harvard or chicago
        #[arg(short, long, default_value = "apa")]
        format: String,

        /// Also copy the citation to the system clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Ask the recommendation function for journals supporting a thesis
    Recommend {
        /// Thesis title
        title: String,

        /// kualitatif, kuantitatif or mixed
        #[arg(long = "type", default_value = "kuantitatif")]
        research_type: String,
    },

    /// Resolve the hero illustration URL (cached after the first success)
    Illustration,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn facet_values<T: std::str::FromStr>(raw: &[String]) -> Vec<FacetValue<T>> {
    raw.iter().map(|value| FacetValue::parse(value)).collect()
}

fn print_record(record: &JournalRecord) {
    println!(
        "[{}] {} ({}) - {} - {}",
        record.id,
        record.title,
        record.year,
        record.authors.join(", "),
        record.source.label()
    );
}

fn functions_client(config: &Config) -> Result<FunctionsClient> {
    FunctionsClient::new(&config.client, &config.gateway.user_agent)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Search {
            query,
            sources,
            accreditation,
            year_from,
            year_to,
            research_type,
            language,
            json,
        } => {
            let mut session = SearchSession::new(demo_catalog());
            session.input = query;
            session.update_facets(|facets| {
                facets.sources = facet_values::<Source>(&sources);
                facets.sinta_accreditation = facet_values::<SintaAccreditation>(&accreditation);
                facets.year_from = year_from;
                facets.year_to = year_to;
                facets.research_type = facet_values::<ResearchType>(&research_type);
                facets.language = facet_values::<Language>(&language);
            });
            session.search();
            let results = session.results();

            if json {
                println!("{}", serde_json::to_string_pretty(results)?);
            } else {
                for record in results {
                    print_record(record);
                }
                log::info!(
                    "{} result(s), {} active filter(s)",
                    results.len(),
                    session.active_filter_count()
                );
            }
        }

        Command::Cite { id, format, copy } => {
            let catalog = demo_catalog();
            let record = find_by_id(&catalog, &id)
                .ok_or_else(|| AppError::validation(format!("No journal with id {id}")))?;

            if copy {
                match format.parse::<CitationFormat>() {
                    Ok(parsed) => {
                        let notification = copy_citation_for(
                            record,
                            parsed,
                            &SystemClipboard::new(),
                            &config.messages,
                        )
                        .await;
                        if notification.is_error() {
                            log::error!("{}", notification);
                        } else {
                            log::info!("{}", notification);
                        }
                    }
                    Err(e) => log::warn!("Not copying: {}", e),
                }
            }
            println!("{}", generate_citation_named(record, &format));
        }

        Command::Recommend {
            title,
            research_type,
        } => {
            let kind = research_type.parse::<ResearchType>().map_err(|_| {
                AppError::validation(config.messages.invalid_research_type.clone())
            })?;
            let client = functions_client(&config)?;

            let mut panel = RecommendationPanel::new(config.messages.clone());
            panel.thesis_title = title;
            panel.research_type = kind;

            if let Some(notification) = panel.submit(&client).await {
                if notification.is_error() {
                    log::error!("{}", notification);
                    return Err(AppError::validation(notification.description));
                }
                log::info!("{}", notification);
            }

            if !panel.analysis().is_empty() {
                println!("{}\n", panel.analysis());
            }
            for record in panel.recommendations() {
                print_record(record);
                if let Some(score) = record.relevance_score {
                    println!("    relevance: {score}");
                }
            }
        }

        Command::Illustration => {
            let loader = HeroLoader::new(
                Arc::new(functions_client(&config)?),
                Arc::new(FileCache::new(&config.client.cache_path)),
                config.client.cache_key.clone(),
            );
            match loader.load().await {
                HeroIllustration::Remote(url) => println!("{url}"),
                HeroIllustration::Fallback => {
                    log::warn!("Illustration unavailable, using the built-in fallback");
                    println!("fallback");
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            if config.gateway.api_key_from_env().is_none() {
                log::warn!(
                    "{} is not set; recommendations will answer 503",
                    config.gateway.api_key_env
                );
            }

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
