#![warn(clippy::all, clippy::pedantic)]
use std::error::Error;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use displaydoc::Display;
use itertools::Itertools;
use log::LevelFilter;
use maxflow::{Algorithm, Edge, FlowGraph, MinCut, VertexId};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::input::{parse_batch, read_csv, Capacity, InputError, Problem};

mod input;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Problem count, then `order size source sink` and edge triples per problem
    Batch,
    /// `tail,head,capacity` rows for a single problem
    Csv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    EdmondsKarp,
    PushRelabel,
    /// Run both solvers and fail if they disagree
    Both,
}

impl AlgorithmArg {
    fn algorithms(self) -> &'static [Algorithm] {
        match self {
            AlgorithmArg::EdmondsKarp => &[Algorithm::EdmondsKarp],
            AlgorithmArg::PushRelabel => &[Algorithm::PushRelabel],
            AlgorithmArg::Both => &Algorithm::ALL,
        }
    }
}

/// Compute maximum flows with Edmonds-Karp or push-relabel
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Input file, standard input if omitted
    input: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Batch)]
    format: Format,

    #[arg(short, long, value_enum, default_value_t = AlgorithmArg::PushRelabel)]
    algorithm: AlgorithmArg,

    /// Source vertex (csv format)
    #[arg(long, required_if_eq("format", "csv"))]
    source: Option<VertexId>,

    /// Sink vertex (csv format)
    #[arg(long, required_if_eq("format", "csv"))]
    sink: Option<VertexId>,

    /// Number of vertices (csv format), defaults to the largest id seen
    #[arg(long)]
    order: Option<usize>,

    /// Check feasibility, conservation and the min-cut bound of every result
    #[arg(long)]
    verify: bool,

    /// Print the edges of a minimum cut after each value
    #[arg(long)]
    cut: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Display)]
enum CliError {
    /// {0}
    Input(InputError),
    /// problem {problem}: {error}
    Flow {
        problem: usize,
        error: maxflow::Error,
    },
    /// problem {problem}: solvers disagree, {first} != {second}
    Disagreement {
        problem: usize,
        first: Capacity,
        second: Capacity,
    },
    /// problem {problem}: {algorithm} produced an invalid flow ({reason})
    Verification {
        problem: usize,
        algorithm: Algorithm,
        reason: &'static str,
    },
}

impl Error for CliError {}

impl From<InputError> for CliError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

fn read_input(path: Option<&PathBuf>) -> io::Result<Box<dyn Read>> {
    Ok(match path {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    })
}

fn verify(
    graph: &FlowGraph<Capacity>,
    problem: &Problem,
    value: Capacity,
) -> Result<(), &'static str> {
    if !graph.is_feasible() {
        return Err("capacity constraint violated");
    }
    if !graph.is_conserved(problem.source, problem.sink) {
        return Err("flow not conserved");
    }
    if graph.flow_value(problem.source) != value {
        return Err("flow value differs from reported value");
    }
    match graph.min_cut(problem.source) {
        Ok(cut) if cut.capacity == value => Ok(()),
        _ => Err("residual cut capacity differs from flow value"),
    }
}

/// Solves one problem with every selected algorithm. The cut, if requested, is taken from the
/// last solver's flow once all of them agree.
fn solve(
    idx: usize,
    problem: &Problem,
    cli: &Cli,
) -> Result<(Capacity, Option<MinCut<Capacity>>), CliError> {
    let flow_err = |error| CliError::Flow {
        problem: idx,
        error,
    };

    let mut solved: Option<(Capacity, FlowGraph<Capacity>)> = None;
    for &algorithm in cli.algorithm.algorithms() {
        // every solver gets a freshly built graph
        let mut graph = FlowGraph::from_edges(problem.order, problem.edges.iter().copied())
            .map_err(flow_err)?;
        log::info!(
            "problem {idx}: {} vertices, {} edges, {algorithm}",
            graph.order(),
            graph.edge_count()
        );

        let value = algorithm
            .solve(&mut graph, problem.source, problem.sink)
            .map_err(flow_err)?;

        if cli.verify {
            verify(&graph, problem, value).map_err(|reason| CliError::Verification {
                problem: idx,
                algorithm,
                reason,
            })?;
            log::debug!("problem {idx}: {algorithm} result verified");
        }

        if let Some(first) = solved.as_ref().map(|(first, _)| *first) {
            if first != value {
                return Err(CliError::Disagreement {
                    problem: idx,
                    first,
                    second: value,
                });
            }
        }
        solved = Some((value, graph));
    }

    let Some((value, graph)) = solved else {
        return Ok((0, None));
    };

    let cut = if cli.cut {
        let cut = graph.min_cut(problem.source).map_err(flow_err)?;
        log::info!("problem {idx}: source side {:?}", cut.source_side);
        Some(cut)
    } else {
        None
    };

    Ok((value, cut))
}

fn format_cut(capacity: Capacity, edges: &[Edge]) -> String {
    format!(
        "cut {capacity}: {}",
        edges
            .iter()
            .map(|(tail, head)| format!("{tail}->{head}"))
            .join(" ")
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let mut reader = read_input(cli.input.as_ref())?;
    let problems = match cli.format {
        Format::Batch => {
            let mut text = String::new();
            reader.read_to_string(&mut text)?;
            parse_batch(&text).map_err(CliError::from)?
        }
        Format::Csv => {
            let source = cli.source.ok_or("--source is required with --format csv")?;
            let sink = cli.sink.ok_or("--sink is required with --format csv")?;
            vec![read_csv(reader, source, sink, cli.order).map_err(CliError::from)?]
        }
    };

    for (idx, problem) in problems.iter().enumerate() {
        let (value, cut) = solve(idx + 1, problem, &cli)?;
        if let Some(cut) = cut {
            println!("{}", format_cut(cut.capacity, &cut.edges));
        }
        println!("{value}");
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn classic() -> Problem {
        parse_batch("1\n4 5 1 4\n1 2 3\n1 3 2\n2 3 1\n2 4 2\n3 4 3\n")
            .unwrap()
            .remove(0)
    }

    #[rstest]
    #[case::edmonds_karp("edmonds-karp")]
    #[case::push_relabel("push-relabel")]
    #[case::both("both")]
    fn one_cut_per_problem(#[case] algorithm: &str) {
        let cli = Cli::parse_from([
            "maxflow-cli",
            "--algorithm",
            algorithm,
            "--cut",
            "--verify",
        ]);
        let (value, cut) = solve(1, &classic(), &cli).unwrap();
        assert_eq!(value, 5);

        let cut = cut.unwrap();
        assert_eq!(cut.source_side, [1].into());
        assert_eq!(format_cut(cut.capacity, &cut.edges), "cut 5: 1->2 1->3");
    }

    #[test]
    fn no_cut_unless_requested() {
        let cli = Cli::parse_from(["maxflow-cli", "--algorithm", "both"]);
        assert_eq!(solve(1, &classic(), &cli).unwrap(), (5, None));
    }

    #[test]
    fn format_cut_lists_edges() {
        assert_eq!(format_cut(3, &[(1, 2), (4, 5)]), "cut 3: 1->2 4->5");
        assert_eq!(format_cut(0, &[]), "cut 0: ");
    }
}
