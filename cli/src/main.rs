//! mlg-walker CLI: random walks and walk corruption from the command line
//!
//! Loads an edge list (and optional node dates), runs the walker and prints
//! the walks by node name.

mod input;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use mlg_walker::{
    corrupt, random_walks, walk_names, DateAnchor, Direction, Graph, Similarity, WalkBatch,
    WalkerConfig,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mlg-walker", version, about = "Random walks and walk corruption over graphs")]
struct Cli {
    /// YAML or JSON config file; flags override its values
    #[arg(long, global = true, env = "MLG_WALKER_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Only log warnings and errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, clap::ValueEnum)]
enum Anchor {
    Start,
    Current,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random walks
    Walk {
        #[command(flatten)]
        walk: WalkArgs,
    },
    /// Generate random walks and corrupt them with negative samples
    Corrupt {
        #[command(flatten)]
        walk: WalkArgs,

        /// Per-position corruption probability
        #[arg(long)]
        r: Option<f32>,

        /// Exponent applied to weighted degrees for the negative table
        #[arg(long)]
        ns_exponent: Option<f32>,

        /// Negative table size
        #[arg(long)]
        negative_size: Option<usize>,

        /// Seed for the negative table and corruption draws
        #[arg(long)]
        corrupt_seed: Option<u64>,
    },
    /// Print node and edge counts of the loaded graph
    Stats {
        #[command(flatten)]
        graph: GraphArgs,
    },
}

#[derive(Args)]
struct GraphArgs {
    /// Edge list: `source target [weight]` per line
    #[arg(long)]
    edges: PathBuf,

    /// Node dates: `node date` per line
    #[arg(long)]
    dates: Option<PathBuf>,

    /// Treat edges as directed
    #[arg(long)]
    directed: bool,
}

#[derive(Args)]
struct WalkArgs {
    #[command(flatten)]
    graph: GraphArgs,

    /// Walks per start node
    #[arg(long)]
    n_walks: Option<usize>,

    /// Nodes per walk, including the start node
    #[arg(long)]
    walk_len: Option<usize>,

    /// Node2vec return parameter
    #[arg(long)]
    p: Option<f32>,

    /// Node2vec in-out parameter
    #[arg(long)]
    q: Option<f32>,

    /// Restart probability
    #[arg(long)]
    alpha: Option<f32>,

    /// Never step to nodes dated at or after the anchor (needs --dates)
    #[arg(long)]
    no_future: bool,

    /// Date that gates each step
    #[arg(long)]
    anchor: Option<Anchor>,

    /// Also accept nodes dated exactly at the anchor date
    #[arg(long)]
    inclusive: bool,

    /// Ignore edge weights
    #[arg(long)]
    unweighted: bool,

    /// Start node name (repeatable); defaults to every node
    #[arg(long = "start")]
    start_nodes: Vec<String>,

    /// Walk seed
    #[arg(long)]
    seed: Option<u64>,
}

impl WalkArgs {
    fn apply(&self, config: &mut WalkerConfig) {
        let walk = &mut config.walk;
        if let Some(n) = self.n_walks {
            walk.n_walks = n;
        }
        if let Some(len) = self.walk_len {
            walk.walk_len = len;
        }
        if let Some(p) = self.p {
            walk.p = p;
        }
        if let Some(q) = self.q {
            walk.q = q;
        }
        if let Some(alpha) = self.alpha {
            walk.alpha = alpha;
        }
        walk.no_future |= self.no_future;
        walk.inclusive_dates |= self.inclusive;
        if let Some(anchor) = &self.anchor {
            walk.date_anchor = match anchor {
                Anchor::Start => DateAnchor::Start,
                Anchor::Current => DateAnchor::Current,
            };
        }
        if self.unweighted {
            walk.weight = None;
            config.corrupt.weight = None;
        }
        if !self.start_nodes.is_empty() {
            walk.start_nodes = Some(self.start_nodes.clone());
        }
        if self.seed.is_some() {
            walk.seed = self.seed;
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => WalkerConfig::load(path)?,
        None => WalkerConfig::default(),
    };

    match &cli.command {
        Commands::Stats { graph } => {
            let g = load(graph, &config)?;
            println!("Nodes: {}", g.node_count());
            println!("Edges: {}", g.edge_count());
            println!("Directed: {}", g.is_directed());
            Ok(())
        }
        Commands::Walk { walk } => {
            walk.apply(&mut config);
            let g = load(&walk.graph, &config)?;
            let walks = random_walks(&g, &config.walk)?;
            print_walks(&g, &walks, None, &cli.format)
        }
        Commands::Corrupt {
            walk,
            r,
            ns_exponent,
            negative_size,
            corrupt_seed,
        } => {
            walk.apply(&mut config);
            if let Some(r) = r {
                config.corrupt.r = *r;
            }
            if let Some(e) = ns_exponent {
                config.corrupt.ns_exponent = *e;
            }
            if let Some(size) = negative_size {
                config.corrupt.negative_size = *size;
            }
            if corrupt_seed.is_some() {
                config.corrupt.seed = *corrupt_seed;
            }

            let g = load(&walk.graph, &config)?;
            let mut walks = random_walks(&g, &config.walk)?;
            let similarity = corrupt(&g, &mut walks, &config.corrupt)?;
            print_walks(&g, &walks, Some(&similarity), &cli.format)
        }
    }
}

fn load(args: &GraphArgs, config: &WalkerConfig) -> Result<Graph> {
    let direction = if args.directed {
        Direction::Directed
    } else {
        Direction::Undirected
    };
    let graph = input::load_graph(
        &args.edges,
        args.dates.as_deref(),
        direction,
        &config.walk.date_attribute,
    )?;
    info!(
        "Loaded {}: {} nodes, {} edges",
        args.edges.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

#[derive(serde::Serialize)]
struct WalkRecord<'a> {
    start: &'a str,
    walk: usize,
    nodes: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<f32>>,
}

fn print_walks(
    graph: &Graph,
    walks: &WalkBatch,
    similarity: Option<&Similarity>,
    format: &OutputFormat,
) -> Result<()> {
    let names = walk_names(graph, walks);
    let labels: Option<Vec<Vec<Vec<f32>>>> = similarity.map(|sim| {
        sim.outer_iter()
            .map(|per_start| {
                per_start
                    .outer_iter()
                    .map(|row| row.iter().copied().collect())
                    .collect()
            })
            .collect()
    });
    let labels = labels.as_ref();

    let records: Vec<WalkRecord<'_>> = names
        .iter()
        .enumerate()
        .flat_map(|(s, per_start)| {
            per_start.iter().enumerate().map(move |(w, nodes)| WalkRecord {
                start: nodes.first().map(String::as_str).unwrap_or_default(),
                walk: w,
                nodes: nodes.as_slice(),
                labels: labels.map(|l| l[s][w].clone()),
            })
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Csv => {
            if similarity.is_some() {
                println!("start,walk,nodes,labels");
            } else {
                println!("start,walk,nodes");
            }
            for rec in &records {
                let mut cells = vec![
                    format_csv_value(rec.start),
                    rec.walk.to_string(),
                    format_csv_value(&rec.nodes.join(" ")),
                ];
                if let Some(labels) = &rec.labels {
                    cells.push(format_labels(labels));
                }
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Table => {
            if records.is_empty() {
                println!("(no walks)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            if similarity.is_some() {
                table.set_header(vec!["start", "walk", "nodes", "labels"]);
            } else {
                table.set_header(vec!["start", "walk", "nodes"]);
            }

            for rec in &records {
                let mut cells = vec![
                    rec.start.to_string(),
                    rec.walk.to_string(),
                    rec.nodes.join(" -> "),
                ];
                if let Some(labels) = &rec.labels {
                    cells.push(format_labels(labels));
                }
                table.add_row(cells);
            }

            println!("{}", table);
            println!("{} walk(s)", records.len());
        }
    }

    Ok(())
}

fn format_labels(labels: &[f32]) -> String {
    labels
        .iter()
        .map(|&l| if l == mlg_walker::POSITIVE { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
