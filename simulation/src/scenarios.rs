//! Pre-defined simulation scenarios for hopnet
//!
//! Each scenario builds a small topology, runs a few walks, prints what
//! happened and hands the finished [`Simulation`] back for inspection.

use hopnet_core::NodeId;
use hopnet_routing::{Envelope, RouteReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::{DelayConfig, SimConfig};
use crate::delay::UniformDelay;
use crate::simulation::Simulation;
use crate::topology::{TopologyBuilder, from_edges};

fn print_report(label: &str, report: &RouteReport) {
    println!("  {}: {}", label, report);
    if report.backtracks > 0 {
        let visited: Vec<String> = report.visited.iter().map(|n| n.to_string()).collect();
        println!("    visited sequence: [{}]", visited.join(", "));
    }
}

/// Two nodes, one link: `0 -> 1` with a budget of one hop
pub fn run_direct_scenario(config: SimConfig) -> anyhow::Result<Simulation> {
    info!("=== Running Direct Link Scenario ===");

    let topology = from_edges(&[(0, 1)])?;
    println!("{}", topology.visualize());

    let mut sim = Simulation::new(topology, config);
    let envelope = Envelope::ping(NodeId(0), NodeId(1)).with_hop_budget(1);
    let report = sim.route(&envelope, &mut ())?;
    print_report("0 -> 1, budget 1", &report);

    println!("\n  {}", sim.state_summary());
    Ok(sim)
}

/// Line `0 - 1 - 2`: enough budget delivers, one hop short does not
pub fn run_line_scenario(config: SimConfig) -> anyhow::Result<Simulation> {
    info!("=== Running Line Scenario ===");

    let topology = TopologyBuilder::new(3).line();
    println!("{}", topology.visualize());

    let mut sim = Simulation::new(topology, config);
    for budget in [2, 1] {
        let envelope = Envelope::ping(NodeId(0), NodeId(2)).with_hop_budget(budget);
        let report = sim.route(&envelope, &mut ())?;
        print_report(&format!("0 -> 2, budget {}", budget), &report);
    }

    println!("\n  {}", sim.state_summary());
    Ok(sim)
}

/// Leaves and dead ends.
///
/// ```text
///   C(2) - A(0) - B(1) - D(3)        0 - 1 - 3
///                                        |
///                                        2
/// ```
///
/// On the left, D reaches C through B and A. On the right, the walk from
/// 0 to 3 first enters the leaf 2, backtracks to 1 and then goes on to 3.
pub fn run_backtrack_scenario(config: SimConfig) -> anyhow::Result<Simulation> {
    info!("=== Running Backtrack Scenario ===");

    println!("--- Leaf to leaf through the center ---");
    let star = from_edges(&[(0, 1), (0, 2), (1, 3)])?;
    println!("{}", star.visualize());
    let mut sim = Simulation::new(star, config.clone());
    let report = sim.ping(NodeId(3), NodeId(2))?;
    print_report("D(3) -> C(2)", &report);
    println!("  {}", sim.state_summary());

    println!("\n--- Dead-end branch ---");
    let branch = from_edges(&[(0, 1), (1, 2), (1, 3)])?;
    println!("{}", branch.visualize());
    let mut sim = Simulation::new(branch, config);
    let report = sim.ping(NodeId(0), NodeId(3))?;
    print_report("0 -> 3", &report);

    println!("\n  {}", sim.state_summary());
    Ok(sim)
}

/// A node without links cannot send anywhere
pub fn run_isolated_scenario(config: SimConfig) -> anyhow::Result<Simulation> {
    info!("=== Running Isolated Node Scenario ===");

    let mut topology = from_edges(&[(0, 1)])?;
    topology.add_node(NodeId(2))?;
    println!("{}", topology.visualize());

    let mut sim = Simulation::new(topology, config);
    let report = sim.ping(NodeId(2), NodeId(0))?;
    print_report("2 -> 0", &report);

    println!("\n  {}", sim.state_summary());
    Ok(sim)
}

/// Random graph with random delays, `sends` pings between random pairs.
///
/// The delay range comes from `config.delay`; when it is `[0, 0]` the
/// scenario uses `[1, 20]` so link order matters.
pub fn run_random_scenario(
    config: SimConfig,
    nodes: u64,
    probability: f64,
    seed: u64,
    sends: usize,
) -> anyhow::Result<Simulation<UniformDelay>> {
    info!(nodes, probability, seed, sends, "=== Running Random Scenario ===");

    let delay_config = if config.delay.max_ms == 0 {
        DelayConfig {
            min_ms: 1,
            max_ms: 20,
            seed: Some(seed),
        }
    } else {
        DelayConfig {
            seed: config.delay.seed.or(Some(seed)),
            ..config.delay.clone()
        }
    };
    let delays = UniformDelay::from_config(&delay_config)?;

    let topology = TopologyBuilder::new(nodes)
        .with_delay_model(delays)
        .random(probability, seed);
    println!("{}", topology.visualize());

    let mut sim = Simulation::new(topology, config);
    if nodes == 0 {
        return Ok(sim);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..sends {
        let from = NodeId(rng.random_range(0..nodes));
        let to = NodeId(rng.random_range(0..nodes));
        let report = sim.ping(from, to)?;
        print_report(&format!("{} -> {}", from, to), &report);
    }

    let stats = &sim.stats;
    println!("\n=== Results ===");
    println!("  Sent:          {}", stats.messages_sent);
    println!("  Delivered:     {}", stats.messages_delivered);
    println!("  Max depth:     {}", stats.max_depth_exceeded);
    println!("  Dead ends:     {}", stats.dead_ends);
    println!("  Delivery rate: {:.1}%", stats.delivery_rate() * 100.0);
    println!("  Average hops:  {:.2}", stats.average_hops());
    println!("  Total latency: {}ms", stats.total_latency_ms);

    Ok(sim)
}
