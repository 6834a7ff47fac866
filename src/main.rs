use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use medsafe::{
    build_checklists, classify_procedure, ingest_batch, is_garbled, load_dataset, read_document,
    save_checklists, save_dataset, Category, IncidentRecord, PipelineConfig, RawDocument,
};

#[derive(Parser)]
#[command(name = "medsafe")]
#[command(author, version, about = "Incident-report-to-checklist pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse report documents into the dataset and regenerate checklists
    Ingest {
        /// Report text files (extracted from PDFs by an upstream tool)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Dataset file (JSON)
        #[arg(long, default_value = "incident_dataset.json")]
        dataset: PathBuf,

        /// Generated checklists file (JSON)
        #[arg(long, default_value = "generated_checklists.json")]
        checklists: PathBuf,

        /// Department label stamped on new records
        #[arg(long, default_value = "PDF解析")]
        department: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Add one manually entered incident and regenerate checklists
    Add {
        /// Incident description
        #[arg(long)]
        description: String,

        /// Root cause
        #[arg(long, default_value = "")]
        cause: String,

        /// Remediation notes
        #[arg(long, default_value = "")]
        prevention: String,

        /// Category label; classified from the description when omitted
        #[arg(long)]
        category: Option<String>,

        /// Dataset file (JSON)
        #[arg(long, default_value = "incident_dataset.json")]
        dataset: PathBuf,

        /// Generated checklists file (JSON)
        #[arg(long, default_value = "generated_checklists.json")]
        checklists: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Regenerate checklists from the stored dataset without ingesting
    Build {
        /// Dataset file (JSON)
        #[arg(long, default_value = "incident_dataset.json")]
        dataset: PathBuf,

        /// Generated checklists file (JSON)
        #[arg(long, default_value = "generated_checklists.json")]
        checklists: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize the stored dataset without making changes
    Analyze {
        /// Dataset file (JSON)
        #[arg(long, default_value = "incident_dataset.json")]
        dataset: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            inputs,
            dataset,
            checklists,
            department,
            verbose,
        } => {
            setup_logging(verbose);
            ingest_documents(inputs, dataset, checklists, department)
        }
        Commands::Add {
            description,
            cause,
            prevention,
            category,
            dataset,
            checklists,
            verbose,
        } => {
            setup_logging(verbose);
            add_incident(description, cause, prevention, category, dataset, checklists)
        }
        Commands::Build {
            dataset,
            checklists,
            verbose,
        } => {
            setup_logging(verbose);
            regenerate(dataset, checklists)
        }
        Commands::Analyze { dataset, verbose } => {
            setup_logging(verbose);
            analyze_dataset(dataset)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn ingest_documents(
    inputs: Vec<PathBuf>,
    dataset_path: PathBuf,
    checklists_path: PathBuf,
    department: String,
) -> Result<()> {
    let config = PipelineConfig::default();
    let mut dataset = load_dataset(&dataset_path);
    info!("Loaded dataset with {} records", dataset.len());

    let mut documents = Vec::with_capacity(inputs.len());
    for input in &inputs {
        match read_document(input) {
            Ok(bytes) => documents.push(RawDocument {
                source: input.display().to_string(),
                department: department.clone(),
                bytes,
            }),
            Err(err) => warn!(path = %input.display(), %err, "skipping unreadable file"),
        }
    }

    let summary = ingest_batch(&mut dataset, &documents, &config);
    info!(
        "Ingest complete: {} attempted, {} accepted, {} skipped",
        summary.attempted, summary.accepted, summary.skipped
    );

    save_dataset(&dataset_path, &dataset).context("Failed to save dataset")?;
    write_checklists(&dataset_path, &checklists_path, &config)
}

fn add_incident(
    description: String,
    cause: String,
    prevention: String,
    category: Option<String>,
    dataset_path: PathBuf,
    checklists_path: PathBuf,
) -> Result<()> {
    if description.trim().is_empty() {
        bail!("description must not be empty");
    }

    let config = PipelineConfig::default();
    let incident_type = match category {
        Some(label) => Category::from_label(&label)
            .with_context(|| format!("Unknown category: {}", label))?,
        None => classify_procedure(&description, &config.classifier),
    };

    let record = IncidentRecord {
        record_id: Uuid::new_v4().to_string(),
        source: "手動入力".to_string(),
        date: Local::now().date_naive(),
        department: "手動入力".to_string(),
        incident_type,
        description: description.trim().to_string(),
        cause: cause.trim().to_string(),
        prevention: prevention.trim().to_string(),
        impact: "不明".to_string(),
    };

    let mut dataset = load_dataset(&dataset_path);
    dataset.append(record);
    info!("Added manual incident, dataset now has {} records", dataset.len());

    save_dataset(&dataset_path, &dataset).context("Failed to save dataset")?;
    write_checklists(&dataset_path, &checklists_path, &config)
}

fn regenerate(dataset_path: PathBuf, checklists_path: PathBuf) -> Result<()> {
    let config = PipelineConfig::default();
    write_checklists(&dataset_path, &checklists_path, &config)
}

fn write_checklists(
    dataset_path: &Path,
    checklists_path: &Path,
    config: &PipelineConfig,
) -> Result<()> {
    let dataset = load_dataset(dataset_path);
    let result = build_checklists(dataset.records(), config);
    info!(
        "Built checklists for {} categories from {} records ({} accepted)",
        result.document.len(),
        result.total_records,
        result.accepted_records
    );
    save_checklists(checklists_path, &result.document).context("Failed to save checklists")?;
    info!("Checklists written to {:?}", checklists_path);
    Ok(())
}

fn analyze_dataset(dataset_path: PathBuf) -> Result<()> {
    let config = PipelineConfig::default();
    let dataset = load_dataset(&dataset_path);

    let accepted: Vec<_> = dataset
        .records()
        .iter()
        .filter(|r| !is_garbled(&r.description, &config.normalizer))
        .collect();

    println!("Dataset Analysis");
    println!("================");
    println!("Total records: {}", dataset.len());
    println!("Readable records: {}", accepted.len());
    println!("Dataset version: {}", dataset.version);
    println!();

    println!("Records per category (reclassified from descriptions)");
    println!("-----------------------------------------------------");
    for category in Category::ALL {
        let count = accepted
            .iter()
            .filter(|r| classify_procedure(&r.description, &config.classifier) == category)
            .count();
        if count > 0 {
            println!("{}: {}", category.label(), count);
        }
    }

    println!();
    println!("Latest records");
    println!("--------------");
    for record in accepted.iter().rev().take(10) {
        let preview: String = record.description.chars().take(40).collect();
        println!("[{}] {}: {}", record.date, record.incident_type.label(), preview);
    }

    Ok(())
}
