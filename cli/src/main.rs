use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use algoscope_core::algorithm::parameters::ParameterKind;
use algoscope_core::{ChannelSink, Engine, EngineConfig, RawParameters, RunReport, Snapshot, Step, TimedSink};

mod render;

#[derive(Parser)]
#[command(name = "algoscope")]
#[command(author, version, about = "Step-by-step classical algorithms in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON engine configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available algorithms and their parameters
    List {
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run one algorithm and print every step
    Run {
        /// Algorithm id, e.g. quickSort or astar
        id: String,
        /// Parameter as key=value; repeatable
        #[arg(short = 'p', long = "param", value_parser = parse_pair)]
        params: Vec<(String, String)>,
        /// Seed for the generated input
        #[arg(long)]
        seed: Option<u64>,
        /// Print steps as JSON lines
        #[arg(long)]
        json: bool,
    },
}

fn parse_pair(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", s))?;
    Ok((key.trim().to_owned(), value.trim().to_owned()))
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn init_logging(config: &EngineConfig) {
    let filter = config.log_filter.as_deref().unwrap_or("warn");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn list(engine: &Engine, json: bool) -> Result<()> {
    let descriptors = engine.registry().descriptors();
    if json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }
    for descriptor in descriptors {
        println!("{:<22}{} ({:?})", descriptor.id.as_str(), descriptor.name, descriptor.category);
        println!("{:<22}{}", "", descriptor.description);
        for param in &descriptor.parameters {
            let detail = match &param.kind {
                ParameterKind::Number { min, max, default } => {
                    format!("{}..={}, default {}", min, max, default)
                }
                ParameterKind::Choice { options, default } => {
                    let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
                    format!("one of {}, default {}", values.join("|"), default)
                }
            };
            println!("{:<22}  {} ({}): {}", "", param.id, param.name, detail);
        }
    }
    Ok(())
}

fn print_step(step: &Step, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(step)?);
    } else {
        println!("{}", render::step_line(step));
    }
    Ok(())
}

fn print_report(report: &RunReport, last: Option<&Snapshot>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }
    if let Some(Snapshot::Grid(view)) = last {
        for row in render::grid_map(view) {
            println!("{}", row);
        }
    }
    match report.outcome.completed() {
        Some(outcome) => println!("{} ({} steps)", outcome.summary(), report.steps),
        None => println!("{} stopped after {} steps", report.algorithm, report.steps),
    }
    Ok(())
}

async fn run(engine: &mut Engine, id: &str, raw: RawParameters, json: bool) -> Result<()> {
    let (sink, mut steps) = ChannelSink::channel();
    let sink = TimedSink::from_config(sink, engine.config());
    engine.start(id, raw, Box::new(sink)).await?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut last: Option<Snapshot> = None;
    let mut interrupted = false;

    loop {
        tokio::select! {
            step = steps.recv() => match step {
                Some(step) => {
                    print_step(&step, json)?;
                    last = Some(step.snapshot);
                }
                // the run dropped its sink
                None => break,
            },
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!("Could not listen for Ctrl-C: {}", e);
                }
                info!("Interrupted, stopping {}", id);
                interrupted = true;
                break;
            }
        }
    }

    let report = if interrupted { engine.stop().await? } else { engine.wait().await? };
    match report {
        Some(report) => print_report(&report, last.as_ref(), json),
        None => Err(anyhow!("run of {} produced no report", id)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    init_logging(&config);

    match cli.command {
        Commands::List { json } => {
            let engine = Engine::with_builtins(config)?;
            list(&engine, json)
        }
        Commands::Run { id, params, seed, json } => {
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            let mut engine = Engine::with_builtins(config)?;
            let raw: RawParameters = params.into_iter().collect();
            run(&mut engine, &id, raw, json).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("arraySize=12").unwrap(), ("arraySize".to_owned(), "12".to_owned()));
        assert_eq!(parse_pair("speed = 0").unwrap(), ("speed".to_owned(), "0".to_owned()));
        assert!(parse_pair("speed").is_err());
    }

    #[test]
    fn test_cli_accepts_repeated_params() {
        let args = [
            "algoscope", "run", "prim", "-p", "gridSize=6", "--param", "density=50", "--seed", "3",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Run { id, params, seed, json } => {
                assert_eq!(id, "prim");
                assert_eq!(params.len(), 2);
                assert_eq!(seed, Some(3));
                assert!(!json);
            }
            Commands::List { .. } => panic!("parsed the wrong subcommand"),
        }
    }
}
