#![warn(clippy::all, clippy::pedantic)]
use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use clap::Parser;
use csv::Writer;
use log::LevelFilter;
use serde::Deserialize;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use flownet::logistics::{self, Solution};
use flownet::report::{self, Analysis, EdgeFlow};
use flownet::{Capacity, FlowNetwork, Id, Node};

/// Maximum flow analysis of a terminal -> warehouse -> store network
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// CSV edge list with `from,to,capacity` columns (`inf` for unbounded); the built-in
    /// logistics network is used when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write the flow assignment to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of rows in the ranking tables
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// More logging, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: String,
    to: String,
    capacity: Capacity<i64>,
}

fn lib_error(e: flownet::Error) -> Box<dyn Error> {
    e.to_string().into()
}

// Function to read the network from an edge list CSV file
fn read_network_csv(path: &Path) -> Result<FlowNetwork<Node<String>, i64>, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let edges = rdr
        .deserialize::<EdgeRecord>()
        .map(|r| r.map(|e| (Node::WithId(e.from), Node::WithId(e.to), e.capacity)))
        .collect::<Result<Vec<_>, _>>()?;
    FlowNetwork::from_edges(edges).map_err(lib_error)
}

// Function to write the flow assignment
fn write_csv<I>(
    network: &FlowNetwork<Node<I>, i64>,
    solution: &Solution<I, i64>,
    path: &Path,
) -> Result<(), Box<dyn Error>>
where
    I: Id + Display,
{
    let mut wtr = Writer::from_path(path)?;
    for ((from, to), flow) in &solution.assignment {
        let capacity = network.capacity(from, to).unwrap_or(Capacity::Finite(0));
        wtr.serialize(EdgeFlow {
            from,
            to,
            flow: *flow,
            capacity,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_edge_flows<I: Id + Display>(title: &str, flows: &[EdgeFlow<Node<I>, i64>]) {
    println!("\n{title}");
    println!("{:-<70}", "");
    println!("{:<20} {:<20} {:<20}", "From", "To", "Flow/Capacity");
    for e in flows {
        println!("{:<20} {:<20} {}/{}", e.from, e.to, e.flow, e.capacity);
    }
}

fn print_report<I: Id + Display>(
    network: &FlowNetwork<Node<I>, i64>,
    solution: &Solution<I, i64>,
    analysis: &Analysis<I, i64>,
) {
    let Solution { tiers, assignment, .. } = solution;

    println!("{:=<70}", "");
    println!("Maximum flow: {} units", analysis.max_flow);
    println!("{:=<70}", "");

    print_edge_flows(
        "Sources to relays",
        &report::edge_flows(network, assignment, &tiers.sources, &tiers.relays),
    );
    print_edge_flows(
        "Relays to sinks",
        &report::edge_flows(network, assignment, &tiers.relays, &tiers.sinks),
    );

    println!("\nSource to sink flows (proportional)");
    println!("{:-<70}", "");
    println!("{:<20} {:<20} {:<20}", "Source", "Sink", "Flow");
    for ((source, sink), flow) in &analysis.source_to_sink {
        println!("{source:<20} {sink:<20} {flow}");
    }

    println!("\nFlow per source");
    println!("{:-<70}", "");
    for (source, total) in &analysis.source_totals {
        println!("{source:<20} {total}");
    }
    if let Some((source, total)) = analysis.top_source() {
        println!("Largest: {source} ({total} units)");
    }

    println!("\nLowest capacity routes");
    println!("{:-<70}", "");
    for r in &analysis.lowest_capacity_routes {
        println!(
            "{} -> {}: {} (used {}, {:.1}%)",
            r.from, r.to, r.capacity, r.flow, r.utilization
        );
    }

    println!("\nLeast supplied sinks");
    println!("{:-<70}", "");
    for s in &analysis.least_supplied_sinks {
        println!("{}: {}", s.sink, s.supplied);
        for (from, spare) in &s.headroom {
            println!("    +{spare} via {from}");
        }
    }

    println!("\nBottlenecks");
    println!("{:-<70}", "");
    if analysis.has_bottlenecks() {
        for r in &analysis.saturated_routes {
            println!("{} -> {} (capacity {})", r.from, r.to, r.capacity);
        }
    } else {
        println!("none, every route has spare capacity");
    }
}

fn run<I: Id + Display>(
    mut network: FlowNetwork<Node<I>, i64>,
    cli: &Cli,
) -> Result<(), Box<dyn Error>> {
    let solution = logistics::solve(&mut network).map_err(lib_error)?;
    let analysis = Analysis::new(&network, &solution, cli.top).map_err(lib_error)?;

    print_report(&network, &solution, &analysis);

    if let Some(path) = &cli.output {
        write_csv(&network, &solution, path)?;
        log::info!("flow assignment written to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
        .map_err(|e| e.to_string())?;

    match &cli.input {
        Some(path) => run(read_network_csv(path)?, &cli),
        None => run(logistics::logistics_network().map_err(lib_error)?, &cli),
    }
}
