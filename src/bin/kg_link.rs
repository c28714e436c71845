//! Entity linking and fact validation CLI
//!
//! # Usage
//!
//! ```bash
//! # Resolve mentions, optionally with the sentence they came from
//! kg_link resolve Barca UK 2015 --context "Barca beat Real Madrid in 2015"
//!
//! # Validate a triple
//! kg_link validate "Cristiano Ronaldo" dbo:team "Real Madrid CF" --strong
//!
//! # Two-hop path search
//! kg_link path "Lionel Messi" Spain
//!
//! # Graph metadata
//! kg_link inspect types "FC Barcelona"
//! ```
//!
//! Configuration comes from `KG_LINKER_CONFIG` (YAML) and the endpoint
//! environment overrides; `--seed` switches resolution to the curated store.
//! Output is JSON on stdout, logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

use kg_linker::config::{LinkerConfig, ValidationMode};
use kg_linker::entity_linking::{EntityLinker, Mention};
use kg_linker::knowledge_graph::{FactValidator, GraphInspector, PathReasoner};

#[derive(Parser)]
#[command(name = "kg_link")]
#[command(version)]
#[command(about = "Link entity mentions and validate facts against a knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML seed for the in-memory store (selects curated anchor resolution)
    #[arg(long, global = true, env = "KG_LINKER_SEED")]
    seed: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve mentions to canonical entities
    Resolve {
        mentions: Vec<String>,

        /// Sentence the mentions were extracted from
        #[arg(long, short)]
        context: Option<String>,
    },

    /// Validate a subject-predicate-object triple
    Validate {
        subject: String,
        predicate: String,
        object: String,

        /// Ignore weak predicates when checking proximity
        #[arg(long)]
        strong: bool,
    },

    /// Find a path of at most two hops between two entities
    Path { start: String, end: String },

    /// Read graph metadata
    Inspect {
        #[command(subcommand)]
        query: InspectQuery,
    },
}

#[derive(Subcommand)]
enum InspectQuery {
    /// Predicates connecting subject to object
    Predicates {
        subject: String,
        object: String,
        #[arg(long)]
        exclude_weak: bool,
    },
    /// Ontology types of an entity
    Types { entity: String },
    /// English abstract
    Abstract { entity: String },
    /// Cross-reference links; `--only` keeps links with no other predicate
    Links {
        entity: String,
        #[arg(long)]
        only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kg_linker=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = LinkerConfig::from_env().context("Failed to load configuration")?;
    if let Some(seed) = cli.seed {
        config.store.seed_path = Some(seed);
    }

    let output = match cli.command {
        Commands::Resolve { mentions, context } => {
            let linker = EntityLinker::from_config(&config)?;
            let mentions: Vec<Mention> = mentions
                .into_iter()
                .map(|text| match &context {
                    Some(sentence) => Mention::new(text).with_context(sentence.clone()),
                    None => Mention::new(text),
                })
                .collect();

            let resolutions = linker.resolve_many(&mentions).await;
            let results: Vec<_> = mentions
                .iter()
                .zip(&resolutions)
                .map(|(mention, resolution)| {
                    json!({
                        "mention": mention.text,
                        "label": resolution.label(),
                        "types": resolution.type_tags(),
                        "resolution": resolution,
                    })
                })
                .collect();
            json!(results)
        }

        Commands::Validate {
            subject,
            predicate,
            object,
            strong,
        } => {
            let mut validator = FactValidator::from_config(&config)?;
            if strong {
                validator = validator.with_mode(ValidationMode::Strong);
            }
            let verdict = validator.validate(&subject, &predicate, &object).await;
            json!({
                "subject": subject,
                "predicate": predicate,
                "object": object,
                "result": verdict,
            })
        }

        Commands::Path { start, end } => {
            let reasoner = PathReasoner::from_config(&config)?;
            let path = reasoner.find_path(&start, &end).await;
            json!({ "start": start, "end": end, "found": !path.is_empty(), "path": path })
        }

        Commands::Inspect { query } => {
            let inspector = GraphInspector::from_config(&config)?;
            match query {
                InspectQuery::Predicates {
                    subject,
                    object,
                    exclude_weak,
                } => json!(inspector
                    .predicates_between(&subject, &object, exclude_weak)
                    .await?),
                InspectQuery::Types { entity } => json!(inspector.entity_types(&entity).await?),
                InspectQuery::Abstract { entity } => json!(inspector.abstract_of(&entity).await?),
                InspectQuery::Links { entity, only } => {
                    let links = if only {
                        inspector.wiki_only_links(&entity).await?
                    } else {
                        inspector.wiki_links(&entity).await?
                    };
                    json!(links)
                }
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
