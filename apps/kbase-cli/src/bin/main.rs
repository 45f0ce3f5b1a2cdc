use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kbase_core::config::Config;
use kbase_core::records::RecordSet;
use kbase_hybrid::context::{format_context, format_diagnostics, FormData, RagPrompt};
use kbase_hybrid::Retriever;
use kbase_vector::KnowledgeBaseBuilder;

const DEFAULT_RECORDS_PATH: &str = "data/company_info.json";

#[derive(Parser)]
#[command(name = "kbase", about = "Keyword + term-vector retrieval over company knowledge snippets")]
struct Cli {
    /// Record file (JSON); defaults to `data.records_path` from config
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the knowledge base and list its documents
    Build,
    /// Retrieve the snippets most relevant to a query
    Query {
        text: String,
        #[arg(long)]
        top_k: Option<usize>,
        /// Print scored documents as JSON
        #[arg(long)]
        json: bool,
        /// Show category, stage and score per result
        #[arg(long)]
        diagnostics: bool,
    },
    /// Print the RAG prompt for a query
    Prompt {
        text: String,
        /// Contact-form fields as a JSON file
        #[arg(long)]
        form: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "kbase=debug,kbase_hybrid=debug,kbase_vector=debug,kbase_keyword=debug" } else { "kbase=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.retrieval()?;
    let records_path = cli
        .records
        .clone()
        .or_else(|| config.records_path())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_PATH));
    info!(path = %records_path.display(), "loading records");
    let records = RecordSet::from_path(&records_path)
        .with_context(|| format!("Failed to load records from {}", records_path.display()))?;

    match cli.command {
        Command::Build => {
            let kb = KnowledgeBaseBuilder::default().build_knowledge_base(&records)?;
            println!("Knowledge base: {} documents (fingerprint {})", kb.len(), kb.fingerprint());
            for doc in kb.documents() {
                println!("  {:<28} {:<16} terms={}", doc.id, doc.category.as_str(), doc.vector.len());
            }
        }
        Command::Query { text, top_k, json, diagnostics } => {
            let retriever = Retriever::new(&settings)?;
            let k = top_k.unwrap_or(retriever.top_k());
            let results = retriever.retrieve_k(&text, &records, k)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if diagnostics {
                print!("{}", format_diagnostics(&results));
            } else {
                print!("{}", format_context(&results));
                if results.is_empty() { println!(); }
            }
        }
        Command::Prompt { text, form } => {
            let form: FormData = match form {
                Some(path) => {
                    let raw = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
                    serde_json::from_str(&raw).with_context(|| format!("Invalid form data in {}", path.display()))?
                }
                None => FormData::default(),
            };
            let retriever = Retriever::new(&settings)?;
            let results = retriever.retrieve(&text, &records)?;
            println!("{}", RagPrompt::render(&text, &format_context(&results), &form));
        }
    }
    Ok(())
}
