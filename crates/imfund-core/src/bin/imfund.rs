//! imfund CLI: sample one random research award and show its citations

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;

use imfund_core::citations;
use imfund_core::config::ImfundConfig;
use imfund_core::sampler::Sampler;
use imfund_core::sources::{CrossrefSource, NsfSource};
use imfund_core::{AwardRecord, AwardStatus, SampleRequest};

#[derive(Parser)]
#[command(name = "imfund", version, about = "Surface one uniformly-random research award")]
struct Cli {
    /// TOML config file overriding the built-in defaults
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sample one random award and print it with its extracted citations
    Random {
        /// Minimum total award amount in whole dollars
        #[arg(long)]
        min_amount: Option<u64>,

        /// Restrict sampling to awards in this lifecycle state
        #[arg(long, value_enum, default_value_t = StatusArg::Any)]
        status: StatusArg,

        /// Summarize the abstract with the configured LLM provider
        /// (requires OPENROUTER_API_KEY)
        #[arg(long)]
        summarize: bool,
    },

    /// Extract structured fields from one raw citation string
    Extract {
        /// The delimited citation string
        raw: String,
    },

    /// Resolve metadata for a DOI
    Resolve {
        /// Bare DOI, e.g. 10.1000/xyz123
        doi: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Any,
    Active,
    Completed,
}

impl From<StatusArg> for AwardStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Any => AwardStatus::Any,
            StatusArg::Active => AwardStatus::Active,
            StatusArg::Completed => AwardStatus::Completed,
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<ImfundConfig, String> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            ImfundConfig::from_toml_str(&text).map_err(|e| format!("invalid config: {}", e))
        }
        None => Ok(ImfundConfig::default()),
    }
}

fn print_award(award: &AwardRecord) {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    let mut row = |field: &str, value: Option<String>| {
        if let Some(value) = value {
            table.add_row(vec![field.to_string(), value]);
        }
    };
    row("Award", award.id.clone());
    row("Title", award.title.clone());
    row("Agency", award.agency.clone());
    row("PI", award.pi_name());
    row("Awardee", award.awardee_name.clone());
    row(
        "Amount",
        award.estimated_total_amt.map(|a| format!("${:.0}", a)),
    );
    row("Start", award.start_date.clone());
    row("Expires", award.exp_date.clone());
    println!("{table}");

    if let Some(abstract_text) = &award.abstract_text {
        println!("\n{}", abstract_text);
    }
}

fn print_citations(award: &AwardRecord, config: &ImfundConfig) {
    let citations = citations::extract_all(&award.publication_research, &config.extractor);
    if citations.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Year", "Authors", "Title", "Journal", "DOI"]);
    for citation in &citations {
        table.add_row(vec![
            &citation.year,
            &citation.authors,
            &citation.title,
            &citation.journal,
            &citation.identifier,
        ]);
    }
    println!("\nPublications:\n{table}");
}

async fn summarize_award(award: &AwardRecord) {
    let api_key = match std::env::var("OPENROUTER_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("OPENROUTER_API_KEY is not set; skipping summary");
            return;
        }
    };

    let title = award.title.as_deref().unwrap_or("(untitled)");
    let abstract_text = match &award.abstract_text {
        Some(text) => text,
        None => return,
    };

    let client = match imfund_llm::ChatClient::new(api_key, None, None) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("summary unavailable: {}", e);
            return;
        }
    };

    match client
        .complete(&imfund_llm::grant_overview_request(title, abstract_text))
        .await
    {
        Ok(response) => println!("\nSummary:\n{}", response.content),
        Err(e) => eprintln!("summary unavailable: {}", e),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Random {
            min_amount,
            status,
            summarize,
        } => {
            let request = SampleRequest {
                min_amount,
                status: status.into(),
            };
            let registry = NsfSource::new(&config.registry);
            let mut sampler = Sampler::new(registry, config.sampler.clone());

            match sampler.sample(&request).await {
                Some(award) => {
                    print_award(&award);
                    print_citations(&award, &config);
                    if summarize {
                        summarize_award(&award).await;
                    }
                    ExitCode::SUCCESS
                }
                None => {
                    eprintln!("no award found for this request");
                    ExitCode::FAILURE
                }
            }
        }

        Command::Extract { raw } => {
            let citation = citations::extract(&raw, &config.extractor);
            match serde_json::to_string_pretty(&citation) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }

        Command::Resolve { doi } => {
            let source = CrossrefSource::new(&config.registry);
            match source.resolve(&doi).await {
                Ok(work) => {
                    println!("{}", work.title);
                    if !work.authors.is_empty() {
                        println!("{}", work.authors.join(", "));
                    }
                    if let Some(journal) = &work.journal {
                        match work.year {
                            Some(year) => println!("{} ({})", journal, year),
                            None => println!("{}", journal),
                        }
                    }
                    if let Some(abstract_text) = &work.abstract_text {
                        println!("\n{}", abstract_text);
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("could not resolve {}: {}", doi, e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
