use anyhow::Result;
use citenet::graph::{CitationGraph, PetCitationGraph};
use citenet::pipeline::{self, PipelineConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "citenet")]
#[command(about = "Normalize citation-network dumps and build citation graphs")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the dumps, build the graphs, and persist the selected outputs
    Preprocess(PreprocessArgs),
    /// Summarize a raw dataset written by `preprocess --raw`
    Inspect(InspectArgs),
    /// Summarize a persisted citation graph
    GraphInfo(GraphInfoArgs),
}

#[derive(Args)]
struct PreprocessArgs {
    /// Root directory holding the dumps and receiving outputs (default: ./.data)
    #[arg(short, long)]
    data_path: Option<PathBuf>,

    /// Skip the V10 (DBLP JSON-lines) dump
    #[arg(long)]
    no_v10: bool,

    /// Skip the V8 (ACM tagged text) dump
    #[arg(long)]
    no_v8: bool,

    /// Don't write the citation graph
    #[arg(long)]
    no_graph: bool,

    /// Write the normalized raw dataset
    #[arg(long)]
    raw: bool,

    /// Also write the subgraph induced by the first N papers
    #[arg(long)]
    light: Option<usize>,
}

#[derive(Args)]
struct InspectArgs {
    /// Directory containing the raw dataset files
    #[arg(short, long)]
    dir: PathBuf,

    /// Only read paper indices and references
    #[arg(long)]
    net_struct: bool,
}

#[derive(Args)]
struct GraphInfoArgs {
    /// Graph file written by `preprocess`
    #[arg(short, long)]
    file: PathBuf,
}

fn run_preprocess(args: PreprocessArgs) -> Result<()> {
    let config = PipelineConfig {
        dump_graph: !args.no_graph,
        dump_raw_data: args.raw,
        v10: !args.no_v10,
        v8: !args.no_v8,
        dump_light: args.light,
        data_path: args.data_path,
    };

    let reports = pipeline::run(&config)?;

    for report in &reports {
        println!();
        report
            .stats
            .print_summary(&format!("{} summary", report.format));
        println!("Graph vertices:      {}", report.vertices);
        println!("Graph edges:         {}", report.edges);
        println!("Time:                {:.2}s", report.duration_secs);
        if let Some(dir) = &report.raw_dir {
            println!("Raw dataset:         {}", dir.display());
        }
        if let Some(path) = &report.graph_path {
            println!("Graph file:          {}", path.display());
        }
        if let Some(path) = &report.light_graph_path {
            println!("Light graph file:    {}", path.display());
        }
    }

    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let raw = citenet::raw::load_raw(&args.dir, args.net_struct)?;

    println!("=== {} ===", args.dir.display());
    println!("Papers:              {}", raw.keys.len());
    println!("References:          {}", raw.references.len());
    if let Some(first_authors) = &raw.first_authors {
        println!("First authors:       {}", first_authors.len());
    }
    if let Some(collaboration) = &raw.collaboration_authors {
        println!("Authors:             {}", collaboration.len());
    }
    Ok(())
}

fn run_graph_info(args: GraphInfoArgs) -> Result<()> {
    let graph = PetCitationGraph::load(&args.file)?;

    println!("=== {} ===", args.file.display());
    println!("Vertices:            {}", graph.vertex_count());
    println!("Edges:               {}", graph.edge_count());
    let names: Vec<&str> = graph.attribute_names().collect();
    println!("Attributes:          {}", names.join(", "));
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Preprocess(args) => run_preprocess(args),
        Commands::Inspect(args) => run_inspect(args),
        Commands::GraphInfo(args) => run_graph_info(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
