//! icl: command-line interface for the inductive concept learning pipeline
//!
//! `encode` turns an RDF document into a triplet corpus for a KGE trainer,
//! `decode` maps the trainer's embeddings back to RDF terms, and `train`
//! learns concept classifiers from a YAML config.

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use inductive_concepts::codec::{NamespaceTable, TripletCodec};
use inductive_concepts::embedding::{save_embedding_map, EmbeddingTable, EntityLabelIndex};
use inductive_concepts::pipeline::{self, PipelineReport, TrainingOutcome};
use inductive_concepts::rdf::{RdfFormat, RdfParser};
use inductive_concepts::PipelineConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "icl", version, about = "Inductive concept learning over RDF embeddings")]
struct Cli {
    /// Output format for reports
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, clap::ValueEnum)]
enum InputFormat {
    Turtle,
    Ntriples,
    Rdfxml,
}

impl From<InputFormat> for RdfFormat {
    fn from(f: InputFormat) -> Self {
        match f {
            InputFormat::Turtle => RdfFormat::Turtle,
            InputFormat::Ntriples => RdfFormat::NTriples,
            InputFormat::Rdfxml => RdfFormat::RdfXml,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an RDF document as a tab-separated triplet corpus
    Encode {
        /// RDF input file
        input: PathBuf,

        /// Triplet corpus to write
        #[arg(long, short)]
        output: PathBuf,

        /// Namespace table to write; extended if it already exists
        #[arg(long)]
        namespaces: PathBuf,

        /// Input syntax; guessed from the file extension when omitted
        #[arg(long = "input-format")]
        input_format: Option<InputFormat>,

        /// Base IRI for relative references
        #[arg(long)]
        base_iri: Option<String>,
    },
    /// Map trained entity embeddings back to RDF terms
    Decode {
        /// Embedding table, one row per entity id
        #[arg(long)]
        embeddings: PathBuf,

        /// Entity id → label index (TSV or JSON, optionally gzipped)
        #[arg(long)]
        labels: PathBuf,

        /// Namespace table written by `encode`
        #[arg(long)]
        namespaces: PathBuf,

        /// JSON file to write
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Train and evaluate concept classifiers
    Train {
        /// Pipeline config (YAML)
        #[arg(long, short)]
        config: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            namespaces,
            input_format,
            base_iri,
        } => run_encode(
            &input,
            &output,
            &namespaces,
            input_format.map(RdfFormat::from),
            base_iri.as_deref(),
        ),
        Commands::Decode {
            embeddings,
            labels,
            namespaces,
            output,
        } => run_decode(&embeddings, &labels, &namespaces, &output),
        Commands::Train { config } => run_train(&config, &cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_encode(
    input: &Path,
    output: &Path,
    namespaces: &Path,
    format: Option<RdfFormat>,
    base_iri: Option<&str>,
) -> anyhow::Result<()> {
    let graph = RdfParser::parse_file(input, format, base_iri)
        .with_context(|| format!("reading {}", input.display()))?;

    let table = if namespaces.exists() {
        NamespaceTable::load(namespaces)
            .with_context(|| format!("reading {}", namespaces.display()))?
    } else {
        NamespaceTable::new()
    };

    let mut codec = TripletCodec::with_namespaces(table);
    let written = codec.write_triplets(&graph, output)?;
    codec.namespaces().save(namespaces)?;

    println!(
        "Wrote {} triplets to {} ({} namespaces)",
        written,
        output.display(),
        codec.namespaces().len()
    );
    Ok(())
}

fn run_decode(
    embeddings: &Path,
    labels: &Path,
    namespaces: &Path,
    output: &Path,
) -> anyhow::Result<()> {
    let table = EmbeddingTable::load(embeddings)
        .with_context(|| format!("reading {}", embeddings.display()))?;
    let labels = EntityLabelIndex::load(labels)
        .with_context(|| format!("reading {}", labels.display()))?;
    let namespaces = NamespaceTable::load(namespaces)
        .with_context(|| format!("reading {}", namespaces.display()))?;

    let codec = TripletCodec::with_namespaces(namespaces);
    let map = codec.decode_embeddings(&table, &labels)?;
    save_embedding_map(&map, output)?;

    println!(
        "Decoded {} embeddings of dimension {} to {}",
        map.len(),
        table.dim(),
        output.display()
    );
    Ok(())
}

fn run_train(config: &Path, format: &OutputFormat) -> anyhow::Result<()> {
    let config = PipelineConfig::load(config)
        .with_context(|| format!("reading {}", config.display()))?;
    let report = pipeline::run(&config)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &PipelineReport) {
    println!(
        "{} embeddings, dimension {}",
        report.num_embeddings, report.embedding_dim
    );

    if report.concepts.is_empty() && report.multiclass.is_none() {
        println!("(no concepts configured)");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Task", "Train", "Test", "Loss", "Accuracy", "Macro F1",
    ]);

    for concept in &report.concepts {
        table.add_row(outcome_row(&concept.name, &concept.outcome));
    }
    if let Some(multiclass) = &report.multiclass {
        let name = format!("{} (on {})", multiclass.classes.join(" / "), multiclass.backbone);
        table.add_row(outcome_row(&name, &multiclass.outcome));
    }

    println!("{}", table);

    if let Some(multiclass) = &report.multiclass {
        let mut confusion = Table::new();
        confusion.set_content_arrangement(ContentArrangement::Dynamic);
        let mut header = vec!["truth \\ predicted".to_string()];
        header.extend(multiclass.classes.iter().cloned());
        confusion.set_header(header);

        for (class, row) in multiclass
            .outcome
            .evaluation
            .confusion
            .outer_iter()
            .enumerate()
        {
            let mut cells = vec![multiclass.classes[class].clone()];
            cells.extend(row.iter().map(|n| n.to_string()));
            confusion.add_row(cells);
        }
        println!("{}", confusion);
    }
}

fn outcome_row(name: &str, outcome: &TrainingOutcome) -> Vec<String> {
    let test = if outcome.evaluated_on_training_set {
        format!("{} (scored on train)", outcome.test_examples)
    } else {
        outcome.test_examples.to_string()
    };

    vec![
        name.to_string(),
        outcome.train_examples.to_string(),
        test,
        format!("{:.4}", outcome.final_loss),
        format!("{:.3}", outcome.evaluation.accuracy),
        format!("{:.3}", outcome.evaluation.macro_f1()),
    ]
}
