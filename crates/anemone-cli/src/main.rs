use anemone::{Extent, Graph, SimOptions, Simulation, TreeNode, layout_hierarchy};
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Layout(anemone::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<anemone::Error> for CliError {
    fn from(value: anemone::Error) -> Self {
        Self::Layout(value)
    }
}

const USAGE: &str = "\
anemone <command> [options] [input.json]

Commands:
  cluster    radial cluster layout for a tree document
  simulate   force-directed layout for a {nodes, links} document

Options:
  --radius <px>    cluster: maximum radius (default 300)
  --width <px>     simulate: canvas width (default 800)
  --height <px>    simulate: canvas height (default 600)
  --steps <n>      simulate: fixed step count instead of settling
  --seed <u64>     simulate: seed for randomized placement
  --randomize      simulate: scatter initial positions (seeded)
  --pretty         pretty-print the JSON output
  -o, --out <path> write output to a file ('-' = stdout, the default)

Input is read from the positional file, or stdin when absent or '-'.";

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Cluster,
    Simulate,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    radius: f64,
    width: f64,
    height: f64,
    steps: Option<usize>,
    seed: Option<u64>,
    randomize: bool,
    pretty: bool,
    out: Option<String>,
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        radius: 300.0,
        width: 800.0,
        height: 600.0,
        ..Args::default()
    };

    let mut it = argv.iter().skip(1);
    let Some(command) = it.next() else {
        return Err(CliError::Usage(USAGE));
    };
    args.command = match command.as_str() {
        "cluster" => Command::Cluster,
        "simulate" => Command::Simulate,
        "-h" | "--help" | "help" => return Err(CliError::Usage(USAGE)),
        _ => return Err(CliError::Usage(USAGE)),
    };

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--radius" => {
                args.radius = parse_value(it.next(), "missing value for --radius")?;
            }
            "--width" => {
                args.width = parse_value(it.next(), "missing value for --width")?;
            }
            "--height" => {
                args.height = parse_value(it.next(), "missing value for --height")?;
            }
            "--steps" => {
                args.steps = Some(parse_value(it.next(), "missing value for --steps")?);
            }
            "--seed" => {
                args.seed = Some(parse_value(it.next(), "missing value for --seed")?);
            }
            "--randomize" => args.randomize = true,
            "--pretty" => args.pretty = true,
            "-o" | "--out" => {
                args.out = it.next().cloned();
                if args.out.is_none() {
                    return Err(CliError::Usage("missing value for --out"));
                }
            }
            "-" => args.input = None,
            other if other.starts_with('-') => return Err(CliError::Usage(USAGE)),
            other => {
                if args.input.is_some() {
                    return Err(CliError::Usage("more than one input file given"));
                }
                args.input = Some(other.to_string());
            }
        }
    }

    Ok(args)
}

fn parse_value<T: std::str::FromStr>(
    raw: Option<&String>,
    missing: &'static str,
) -> Result<T, CliError> {
    let Some(raw) = raw else {
        return Err(CliError::Usage(missing));
    };
    raw.parse()
        .map_err(|_| CliError::Usage("invalid numeric option value"))
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        Some(path) if path != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(out: Option<&str>, payload: &str) -> Result<(), CliError> {
    match out {
        Some(path) if path != "-" => std::fs::write(path, payload)?,
        _ => println!("{payload}"),
    }
    Ok(())
}

#[derive(Serialize)]
struct SimulateOut {
    alpha: f64,
    steps: usize,
    settled: bool,
    positions: std::collections::BTreeMap<String, anemone::Point>,
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let raw = read_input(args.input.as_deref())?;

    match args.command {
        Command::Cluster => {
            let root: Option<TreeNode> = serde_json::from_str(&raw)?;
            let Some(root) = root else {
                return Err(anemone::Error::MalformedTree {
                    message: "input document has no root node".to_string(),
                }
                .into());
            };
            let placed = layout_hierarchy(&root, args.radius)?;
            write_output(args.out.as_deref(), &to_json(&placed, args.pretty)?)
        }
        Command::Simulate => {
            let graph: Graph = serde_json::from_str(&raw)?;
            let opts = SimOptions {
                random_seed: args.seed.unwrap_or(0),
                randomize: args.randomize,
                ..SimOptions::default()
            };
            let extent = Extent {
                width: args.width,
                height: args.height,
            };
            let mut sim = Simulation::new(&graph, extent, &opts)?;
            let steps = match args.steps {
                Some(n) => {
                    for _ in 0..n {
                        sim.step();
                    }
                    n
                }
                None => sim.settle(),
            };
            let out = SimulateOut {
                alpha: sim.alpha(),
                steps,
                settled: sim.is_settled(),
                positions: sim.positions(),
            };
            write_output(args.out.as_deref(), &to_json(&out, args.pretty)?)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
