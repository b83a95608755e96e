//! formula-trace CLI: walk formula precedents/dependents of a document.
//!
//! Usage:
//!   formula-trace trace <document> --node <id> [--attribute <name>] --step <precedents|dependents>...
//!   formula-trace show <document>
//!
//! Set RUST_LOG=formula_tracer=debug to see each trace step.

use clap::{Parser, Subcommand};
use formula_tracer::{
    Direction, Document, DocumentView, NodeId, Selection, TraceReport, TracerConfig, TracerEngine,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "formula-trace",
    version,
    about = "Trace formula precedents and dependents in a document"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run trace steps from a selected node or attribute
    Trace {
        /// Document file (.json, .yaml or .yml)
        document: PathBuf,
        /// Id of the node to start from
        #[arg(long)]
        node: String,
        /// Start from this attribute of the node instead of the node itself
        #[arg(long)]
        attribute: Option<String>,
        /// One trace step per occurrence, in order
        #[arg(long = "step", required = true)]
        steps: Vec<Direction>,
        /// Config file (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the final highlights and connectors as JSON
        #[arg(long)]
        json: bool,
    },
    /// List nodes, attributes and their formula references
    Show {
        /// Document file (.json, .yaml or .yml)
        document: PathBuf,
    },
}

fn load_document(path: &Path) -> Result<Document, String> {
    Document::load(path).map_err(|e| format!("Failed to load {}: {}", path.display(), e))
}

fn resolve_selection(doc: &Document, node: &str, attribute: Option<&str>) -> Result<Selection, String> {
    let node_id = NodeId::from_string(node);
    if doc.get_node(&node_id).is_none() {
        return Err(format!("node '{}' not found", node));
    }
    match attribute {
        Some(name) => doc
            .find_attribute(&node_id, name)
            .map(Selection::Attribute)
            .ok_or_else(|| format!("node '{}' has no attribute '{}'", node, name)),
        None => Ok(Selection::Node(node_id)),
    }
}

fn print_report(doc: &Document, index: usize, report: &TraceReport) {
    let mut header = format!("step {}: {}", index + 1, report.direction);
    if report.restarted {
        header.push_str(" (new session)");
    }
    if report.switched {
        header.push_str(" (direction switched)");
    }
    println!("{}", header);
    if report.is_noop() {
        println!("  nothing new");
    }
    for element in &report.new_highlights {
        println!("  highlight  {}", doc.element_label(element));
    }
    for pair in &report.new_connectors {
        let from = doc.get_node(&pair.from).map(|n| n.text.as_str()).unwrap_or(pair.from.as_str());
        let to = doc.get_node(&pair.to).map(|n| n.text.as_str()).unwrap_or(pair.to.as_str());
        println!("  connect    {} -> {}", from, to);
    }
}

fn cmd_trace(
    document: &Path,
    node: &str,
    attribute: Option<&str>,
    steps: &[Direction],
    config: Option<PathBuf>,
    json: bool,
) -> Result<(), String> {
    let config = TracerConfig::load_or_default(config.as_deref()).map_err(|e| e.to_string())?;
    let doc = load_document(document)?;
    let selection = resolve_selection(&doc, node, attribute)?;

    let engine = TracerEngine::new();
    let id = engine.upsert_document(doc.clone());
    let mut view = DocumentView::new().with_style(config.connector);
    view.select(selection);

    for (i, direction) in steps.iter().enumerate() {
        let report = engine.trace(&id, *direction, &mut view).map_err(|e| e.to_string())?;
        if !json {
            print_report(&doc, i, &report);
        }
    }

    if json {
        let highlights: Vec<_> = view.highlights().map(|h| h.iter().collect()).unwrap_or_default();
        let connectors: Vec<_> = view.connectors().map(|c| c.iter().collect()).unwrap_or_default();
        let out = serde_json::json!({
            "highlights": highlights,
            "connectors": connectors,
        });
        let text = serde_json::to_string_pretty(&out).map_err(|e| e.to_string())?;
        println!("{}", text);
    }
    Ok(())
}

fn cmd_show(document: &Path) -> Result<(), String> {
    let doc = load_document(document)?;
    println!("{} ({} nodes)", doc.name, doc.node_count());
    for node in doc.nodes() {
        match &node.formula {
            Some(f) => println!("{:<24}  {:<20}  {}", node.id.as_str(), node.text, f),
            None => println!("{:<24}  {}", node.id.as_str(), node.text),
        }
        for r in &node.references {
            println!("    <- {}", doc.element_label(r));
        }
        for attr in &node.attributes {
            println!("    @{} = {}", attr.name, attr.value);
            for r in &attr.references {
                println!("        <- {}", doc.element_label(r));
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Trace {
            document,
            node,
            attribute,
            steps,
            config,
            json,
        } => cmd_trace(&document, &node, attribute.as_deref(), &steps, config, json),
        Commands::Show { document } => cmd_show(&document),
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
