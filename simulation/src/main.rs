//! hopnet - topology simulator
//!
//! Builds a network of nodes and delayed links and walks messages across
//! it with a greedy, hop-budgeted router.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};

use hopnet_logging::{HopnetSubscriberBuilder, LogConfig};
use hopnet_simulation::{
    LinkId, Message, NodeId, SimConfig, Simulation, TopologyBuilder, TraversalEvent, UniformDelay,
    scenarios,
};

#[derive(Parser)]
#[command(
    name = "hopnet",
    about = "Topology simulator with a greedy, hop-budgeted message walk",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON simulation config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Sleep for each traversed link's delay
    #[arg(long, global = true)]
    pace: bool,

    /// Write JSONL traces to this directory instead of the console
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pre-built scenario
    Scenario {
        #[arg(value_enum)]
        name: ScenarioName,

        /// Number of nodes (random scenario)
        #[arg(short, long, default_value = "10")]
        nodes: u64,

        /// Link probability (random scenario)
        #[arg(short, long, default_value = "0.25")]
        probability: f64,

        /// Seed for the graph and the sends (random scenario)
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Number of pings (random scenario)
        #[arg(long, default_value = "10")]
        sends: usize,
    },

    /// Create and visualize a topology
    Topology {
        #[arg(short, long, value_enum, default_value = "line")]
        kind: TopologyKind,

        #[arg(short, long, default_value = "6")]
        nodes: u64,

        /// Connection probability for random topology
        #[arg(short, long, default_value = "0.4")]
        probability: f64,

        /// Seed for random topology
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },

    /// Interactive editor
    Interactive {
        /// Nodes to create up front
        #[arg(short, long, default_value = "0")]
        nodes: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScenarioName {
    Direct,
    Line,
    Backtrack,
    Isolated,
    Random,
}

#[derive(Clone, Copy, ValueEnum)]
enum TopologyKind {
    Line,
    Ring,
    Star,
    Full,
    Random,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = match &cli.log_dir {
        Some(dir) => LogConfig::recording(dir.clone()),
        None if cli.verbose => LogConfig::development(),
        None => LogConfig::interactive(),
    };
    let _guard = HopnetSubscriberBuilder::new().with_config(log_config).init();

    let mut config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    config.pace_real_time |= cli.pace;

    match cli.command {
        Commands::Scenario {
            name,
            nodes,
            probability,
            seed,
            sends,
        } => {
            match name {
                ScenarioName::Direct => scenarios::run_direct_scenario(config)?,
                ScenarioName::Line => scenarios::run_line_scenario(config)?,
                ScenarioName::Backtrack => scenarios::run_backtrack_scenario(config)?,
                ScenarioName::Isolated => scenarios::run_isolated_scenario(config)?,
                ScenarioName::Random => {
                    scenarios::run_random_scenario(config, nodes, probability, seed, sends)?
                }
            };
        }
        Commands::Topology {
            kind,
            nodes,
            probability,
            seed,
        } => {
            let builder =
                TopologyBuilder::new(nodes).with_delay_model(UniformDelay::from_config(&config.delay)?);
            let topology = match kind {
                TopologyKind::Line => builder.line(),
                TopologyKind::Ring => builder.ring(),
                TopologyKind::Star => builder.star(),
                TopologyKind::Full => builder.full_mesh(),
                TopologyKind::Random => builder.random(probability, seed),
            };
            println!("{}", topology.visualize());
        }
        Commands::Interactive { nodes } => {
            run_interactive(config, nodes)?;
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

const HELP: &str = "\
Commands:
  node [id]                     - Place a node (next free id if omitted)
  remove <id>                   - Delete a node and its links
  link <a> <b>                  - Draw a link between two nodes
  unlink <link>                 - Erase a link (e.g. 'unlink L3')
  ping <from> <to> [budget]     - Send PING from one node to another
  send <from> <to> <cmd> [data] - Send a custom message
  show                          - Show the topology
  stats                         - Show statistics
  events [n]                    - Show the last n events (default 20)
  inbox                         - Show delivered messages
  help                          - Show this help
  quit                          - Exit";

fn run_interactive(config: SimConfig, nodes: u64) -> anyhow::Result<()> {
    let mut sim = Simulation::from_config(config)?;
    for _ in 0..nodes {
        sim.add_next_node()?;
    }

    println!("{}", sim.topology.visualize());
    println!("Interactive mode. {}\n", HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            continue;
        };

        match execute(&mut sim, command, args) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("  Error: {:#}", e),
        }
    }

    Ok(())
}

/// Parse and validate a node id; unknown nodes never reach the router
fn node_arg(sim: &Simulation, args: &[&str], index: usize) -> anyhow::Result<NodeId> {
    let Some(text) = args.get(index) else {
        bail!("missing node id");
    };
    let id: NodeId = text
        .parse()
        .with_context(|| format!("invalid node id {:?}", text))?;
    if !sim.topology.contains_node(id) {
        bail!("unknown node {}", id);
    }
    Ok(id)
}

fn execute(sim: &mut Simulation, command: &str, args: &[&str]) -> anyhow::Result<Flow> {
    match command {
        "node" | "n" => {
            let node = match args.first() {
                Some(text) => {
                    let id: NodeId = text
                        .parse()
                        .with_context(|| format!("invalid node id {:?}", text))?;
                    sim.add_node(id)?
                }
                None => sim.add_next_node()?,
            };
            println!("  Node {} placed", node.id);
        }
        "remove" | "rm" => {
            let id = node_arg(sim, args, 0)?;
            let removed = sim.remove_node(id)?;
            println!("  Node {} deleted with {} link(s)", id, removed.len());
        }
        "link" | "l" => {
            let a = node_arg(sim, args, 0)?;
            let b = node_arg(sim, args, 1)?;
            let link = sim.connect(a, b)?;
            println!("  {} {}", link.id, link);
        }
        "unlink" => {
            let Some(text) = args.first() else {
                bail!("usage: unlink <link>");
            };
            let id: LinkId = text
                .parse()
                .with_context(|| format!("invalid link id {:?}", text))?;
            let link = sim.disconnect(id)?;
            println!("  {} erased", link);
        }
        "ping" | "p" => {
            let from = node_arg(sim, args, 0)?;
            let to = node_arg(sim, args, 1)?;
            let report = match args.get(2) {
                Some(text) => {
                    let budget: u32 = text
                        .parse()
                        .with_context(|| format!("invalid hop budget {:?}", text))?;
                    sim.send_message(from, to, &Message::ping(from), Some(budget))?
                }
                None => sim.ping(from, to)?,
            };
            println!("  {}", report);
        }
        "send" => {
            if args.len() < 3 {
                bail!("usage: send <from> <to> <command> [data]");
            }
            let from = node_arg(sim, args, 0)?;
            let to = node_arg(sim, args, 1)?;
            let message = Message::new(from, args[2], args[3..].join(" "))?;
            let report = sim.send_message(from, to, &message, None)?;
            println!("  {}", report);
        }
        "show" | "topology" => {
            println!("{}", sim.topology.visualize());
        }
        "stats" => {
            let stats = &sim.stats;
            println!("  Sent:        {}", stats.messages_sent);
            println!("  Delivered:   {}", stats.messages_delivered);
            println!("  Max depth:   {}", stats.max_depth_exceeded);
            println!("  Dead ends:   {}", stats.dead_ends);
            println!("  Malformed:   {}", stats.malformed_deliveries);
            println!("  Hops:        {}", stats.total_hops);
            println!("  Backtracks:  {}", stats.total_backtracks);
            println!("  Latency:     {}ms", stats.total_latency_ms);
        }
        "events" => {
            let count = match args.first() {
                Some(text) => text
                    .parse()
                    .with_context(|| format!("invalid count {:?}", text))?,
                None => 20,
            };
            let skip = sim.event_log.len().saturating_sub(count);
            for event in sim.event_log.iter().skip(skip) {
                println!("  {}", describe(event));
            }
        }
        "inbox" => {
            for message in sim.inbox.messages() {
                println!(
                    "  from {}: {} {:?}",
                    message.sender, message.command, message.data
                );
            }
        }
        "help" | "h" | "?" => println!("{}", HELP),
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        other => bail!("unknown command {:?}, try 'help'", other),
    }
    Ok(Flow::Continue)
}

fn describe(event: &TraversalEvent) -> String {
    match event {
        TraversalEvent::Visit { node, hop } => format!("visit {} (hop {})", node, hop),
        TraversalEvent::Forward {
            from,
            to,
            link,
            delay,
        } => format!("{} -> {} via {} ({}ms)", from, to, link, delay),
        TraversalEvent::Backtrack {
            from,
            to,
            link,
            delay,
        } => format!("{} -> {} via {} ({}ms, backtrack)", from, to, link, delay),
        TraversalEvent::Delivered { node, hops } => {
            format!("delivered at {} after {} hop(s)", node, hops)
        }
        TraversalEvent::BudgetExhausted { node, hops } => {
            format!("hop budget exhausted at {} after {} hop(s)", node, hops)
        }
        TraversalEvent::DeadEnd { node, hops } => {
            format!("dead end at {} after {} hop(s)", node, hops)
        }
    }
}
