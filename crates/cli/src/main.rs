use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use compass_graph::{DependencyGraph, Direction, Edge, EdgeDirection};
use compass_indexer::{build_graph, build_index};
use compass_protocol::{
    NeighborEntry, NeighborsResponse, SearchHit, SearchResponse, TrialMetrics,
};
use compass_ranker::ChunkIndex;
use compass_scoring::{check_gold_against_graph, load_gold, parse_transcript, score, ScoreConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "compass")]
#[command(about = "Navigate codebases by structure, not just semantics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the dependency graph from a source tree
    Extract(ExtractArgs),

    /// Show graph statistics (file count, edge counts by relation)
    Stats(StatsArgs),

    /// Show all files structurally connected to FILE_PATH
    Neighbors(NeighborsArgs),

    /// Build the BM25 chunk index for a source tree
    Index(IndexArgs),

    /// Search the indexed tree using BM25 keyword ranking
    Search(SearchArgs),

    /// Score one trial transcript against a gold standard
    Score(ScoreArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// Path to the target repo root
    #[arg(long)]
    repo: PathBuf,

    /// Output JSON file for the edge list
    #[arg(long, default_value = "edges.json")]
    output: PathBuf,
}

#[derive(Args)]
struct StatsArgs {
    /// Path to edges.json from `compass extract`
    #[arg(long, default_value = "edges.json")]
    edges: PathBuf,

    /// Output as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct NeighborsArgs {
    /// Repo-relative file path, e.g. "app/db/repositories/base.py"
    file_path: String,

    /// Path to edges.json from `compass extract`
    #[arg(long, default_value = "edges.json")]
    edges: PathBuf,

    /// Filter by edge direction
    #[arg(long, value_enum, default_value_t = DirectionArg::Both)]
    direction: DirectionArg,

    /// Output as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct IndexArgs {
    /// Path to the target repo root
    #[arg(long)]
    repo: PathBuf,

    /// Output JSON file for the index
    #[arg(long, default_value = "index.json")]
    output: PathBuf,
}

#[derive(Args)]
struct SearchArgs {
    /// Natural language or code keywords
    query: String,

    /// Path to index.json from `compass index`
    #[arg(long, default_value = "index.json")]
    index: PathBuf,

    /// Number of results to return
    #[arg(long, default_value_t = compass_protocol::DEFAULT_TOP_K)]
    top: usize,

    /// Output as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ScoreArgs {
    /// Path to the trial's transcript.jsonl
    #[arg(long)]
    transcript: PathBuf,

    /// Path to the task's gold_standard.json
    #[arg(long)]
    gold: PathBuf,

    /// Path to write metrics.json (printed summary only when omitted)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Experimental condition label
    #[arg(long, default_value = "unknown")]
    condition: String,

    /// Run number within the condition
    #[arg(long, default_value_t = 1)]
    run: u32,

    /// Absolute repo root to strip from event paths
    #[arg(long)]
    repo_root: Option<String>,

    /// Optional edges.json; when given, gold paths are checked against the
    /// graph's node set before scoring
    #[arg(long)]
    edges: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    In,
    Out,
    Both,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::In => Direction::In,
            DirectionArg::Out => Direction::Out,
            DirectionArg::Both => Direction::Both,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Extract(args) => run_extract(&args),
        Commands::Stats(args) => run_stats(&args),
        Commands::Neighbors(args) => run_neighbors(&args),
        Commands::Index(args) => run_index(&args),
        Commands::Search(args) => run_search(&args),
        Commands::Score(args) => run_score(&args),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run_extract(args: &ExtractArgs) -> Result<()> {
    let build = build_graph(&args.repo)
        .with_context(|| format!("extracting edges from {}", args.repo.display()))?;

    let json = serde_json::to_string_pretty(&build.edges)?;
    fs::write(&args.output, json)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Saved {} edges to {}",
        build.report.edge_total(),
        args.output.display()
    );
    for (relation, count) in &build.report.edges {
        println!("  {relation}: {count}");
    }
    if !build.report.files_skipped.is_empty() {
        println!(
            "Skipped {} files with parse errors:",
            build.report.files_skipped.len()
        );
        for file in &build.report.files_skipped {
            println!("  {file}");
        }
    }

    Ok(())
}

fn run_stats(args: &StatsArgs) -> Result<()> {
    let graph = load_graph(&args.edges)?;
    let stats = graph.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Graph statistics:\n");
        println!("  Files: {}", stats.files);
        println!("\n  Edges:");
        for (relation, count) in &stats.edges {
            println!("    {relation:<15} {count:>4}");
        }
    }

    Ok(())
}

fn run_neighbors(args: &NeighborsArgs) -> Result<()> {
    let graph = load_graph(&args.edges)?;
    let neighbors = graph.neighbors(&args.file_path, args.direction.into());

    if neighbors.is_empty() {
        eprintln!(
            "No structural neighbors found for '{}'.\n\
             Check the file path or run 'compass stats' to verify the graph is loaded.",
            args.file_path
        );
        std::process::exit(1);
    }

    let response = NeighborsResponse {
        total: neighbors.len(),
        neighbors: neighbors
            .iter()
            .map(|n| NeighborEntry {
                direction: n.direction.as_str().to_string(),
                relation: n.relation.as_str().to_string(),
                neighbor_path: n.path.clone(),
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("Structural neighbors of '{}':\n", args.file_path);
        for neighbor in &neighbors {
            let arrow = if neighbor.direction == EdgeDirection::Out {
                "→"
            } else {
                "←"
            };
            println!("  {arrow} [{}]  {}", neighbor.relation, neighbor.path);
        }
        println!("\nTotal: {} structural connections", response.total);
    }

    Ok(())
}

fn run_index(args: &IndexArgs) -> Result<()> {
    let build = build_index(&args.repo)
        .with_context(|| format!("indexing {}", args.repo.display()))?;

    build
        .index
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Indexed {} chunks from {} files into {}",
        build.report.chunks,
        build.report.files_processed,
        args.output.display()
    );

    Ok(())
}

fn run_search(args: &SearchArgs) -> Result<()> {
    let index = ChunkIndex::load(&args.index)
        .with_context(|| format!("loading index {}", args.index.display()))?;

    let ranked = index.query(&args.query, args.top);
    if ranked.is_empty() {
        eprintln!("No results found for query: '{}'", args.query);
        std::process::exit(1);
    }

    if args.json {
        let response = SearchResponse {
            results: ranked
                .iter()
                .map(|r| SearchHit {
                    file_path: r.file_path.clone(),
                    score: r.score,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("Top {} files for '{}':\n", ranked.len(), args.query);
        for (i, result) in ranked.iter().enumerate() {
            println!(
                "  {:2}. (score {:.3})  {}",
                i + 1,
                result.score,
                result.file_path
            );
        }
    }

    Ok(())
}

fn run_score(args: &ScoreArgs) -> Result<()> {
    let gold = load_gold(&args.gold)
        .with_context(|| format!("loading gold standard {}", args.gold.display()))?;

    if let Some(edges) = &args.edges {
        let graph = load_graph(edges)?;
        check_gold_against_graph(&gold, &graph)
            .context("gold standard is inconsistent with the extracted graph")?;
    }

    let log = parse_transcript(&args.transcript)
        .with_context(|| format!("reading {}", args.transcript.display()))?;

    let config = ScoreConfig {
        condition: args.condition.clone(),
        run_number: args.run,
        repo_root: args.repo_root.clone(),
    };
    let metrics = score(&log, &gold, &config)?;

    if let Some(output) = &args.output {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output, serde_json::to_string_pretty(&metrics)?)
            .with_context(|| format!("writing {}", output.display()))?;
    }

    print_score_summary(&metrics);
    Ok(())
}

fn print_score_summary(metrics: &TrialMetrics) {
    println!("Task: {}", metrics.task_id);
    println!(
        "  ACS:               {:.2}%  ({}/{} required files)",
        metrics.acs * 100.0,
        metrics.required_files_hit.len(),
        metrics.files_required
    );
    println!(
        "  Edit completeness: {:.2}%  ({}/{} required files edited)",
        metrics.edit_completeness * 100.0,
        metrics.required_files_edited.len(),
        metrics.files_required
    );
    match metrics.fctc {
        Some(step) => println!("  FCTC:              step {step}"),
        None => println!("  FCTC:              not reached"),
    }
    println!(
        "  Tool adoption:     {} ({} calls)",
        if metrics.tool_adoption.used { "yes" } else { "no" },
        metrics.tool_adoption.calls
    );
    println!("  Total tool calls:  {}", metrics.total_tool_calls);
    println!("  Files accessed:    {}", metrics.files_accessed.len());
    if metrics.log_truncated {
        println!("  NOTE: event log was truncated; metrics cover the parsed prefix");
    }
    if !metrics.required_files_missed.is_empty() {
        println!("  Missed files:      {:?}", metrics.required_files_missed);
    }
}

fn load_graph(edges_path: &Path) -> Result<DependencyGraph> {
    let raw = fs::read_to_string(edges_path).with_context(|| {
        format!(
            "reading {} (run 'compass extract' first)",
            edges_path.display()
        )
    })?;
    let edges: Vec<Edge> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", edges_path.display()))?;

    Ok(DependencyGraph::from_edges(edges))
}
