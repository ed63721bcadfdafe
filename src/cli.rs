use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use fortytwo::game::SystemClock;
use fortytwo::{DatabaseBuilder, Game, GenerateOptions, SolutionTable, TARGET};

/// Log level for the application
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Fortytwo - reach 42 with five numbers
#[derive(Parser, Debug)]
#[command(name = "fortytwo")]
#[command(about = "Play the 42-points puzzle or build its solution database")]
#[command(version)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (default: warn)
    #[arg(short, long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count the solutions of every problem and write them as JSON
    ///
    /// Only reordering or regrouping of `+` and `*` makes two answers the same,
    /// so totals run into the hundreds for many problems: `a-b+b` and `a*b/b`
    /// style variants, and every placement of a zero, count separately.
    BuildDatabase {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Value the expressions must reach
        #[arg(long, default_value_t = TARGET)]
        target: u64,
    },
    /// Play one round, reading one answer per line from stdin
    Play {
        /// Solution database produced by `build-database`
        #[arg(short, long)]
        database: PathBuf,

        /// Generation method: random, database, custom or probability
        #[arg(short, long, default_value = "database")]
        method: String,

        #[arg(long)]
        minimum: Option<u64>,

        #[arg(long)]
        maximum: Option<u64>,

        #[arg(long)]
        minimum_solutions: Option<u64>,

        #[arg(long)]
        maximum_solutions: Option<u64>,

        /// Numbers for the custom method, e.g. "1 1 6 7 12"
        #[arg(long, value_delimiter = ' ')]
        problem: Option<Vec<u64>>,

        /// JSON array of weights for the probability method
        #[arg(long)]
        weights: Option<PathBuf>,

        /// Seed for a reproducible problem
        #[arg(long)]
        seed: Option<u64>,

        /// Player id recorded with each answer
        #[arg(long, default_value_t = fortytwo::DEFAULT_PLAYER, allow_hyphen_values = true)]
        player: i64,
    },
}

/// Configuration for a play session
pub struct PlayConfig {
    pub database: PathBuf,
    pub method: String,
    pub options: GenerateOptions,
    pub seed: Option<u64>,
    pub player: i64,
}

/// Parsed command line
pub enum CliConfig {
    BuildDatabase { output: PathBuf, target: u64 },
    Play(PlayConfig),
}

fn read_weights(path: &Path) -> Result<Vec<f64>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open weights file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid weights file {}", path.display()))
}

/// Parse command line arguments and return configuration
pub fn parse_args() -> Result<(CliConfig, LogLevel)> {
    let args = CliArgs::parse();

    let config = match args.command {
        Command::BuildDatabase { output, target } => CliConfig::BuildDatabase { output, target },
        Command::Play {
            database,
            method,
            minimum,
            maximum,
            minimum_solutions,
            maximum_solutions,
            problem,
            weights,
            seed,
            player,
        } => {
            let prob = weights.as_deref().map(read_weights).transpose()?;
            CliConfig::Play(PlayConfig {
                database,
                method,
                options: GenerateOptions {
                    minimum,
                    maximum,
                    minimum_solutions,
                    maximum_solutions,
                    problem,
                    prob,
                },
                seed,
                player,
            })
        }
    };

    Ok((config, args.log_level))
}

/// Initialize logging based on the provided log level
pub fn init_logging(log_level: &LogLevel) -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log_level.to_log_level_filter())
        .init();
    Ok(())
}

fn build_database(output: &Path, target: u64) -> Result<()> {
    let table = DatabaseBuilder::with_target(target)
        .build()
        .context("Failed to build solution table")?;
    table
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Wrote {} solvable problems to {}",
        table.len(),
        output.display()
    );
    Ok(())
}

fn play(config: PlayConfig) -> Result<()> {
    let table = SolutionTable::load(&config.database)
        .with_context(|| format!("Failed to load {}", config.database.display()))?;
    let table = Arc::new(table);
    let mut game = match config.seed {
        Some(seed) => Game::with_parts(table, StdRng::seed_from_u64(seed), SystemClock),
        None => Game::new(table),
    };

    let problem = game.generate_problem(&config.method, &config.options)?;
    game.start()?;
    println!(
        "Problem {} ({} known solutions). One answer per line, `:stop` to finish.",
        problem,
        game.total_solution_number()?
    );

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        match line.trim() {
            ":stop" => break,
            ":solutions" => {
                for (i, text) in game.current_solutions()?.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, text);
                }
            }
            "" => {}
            answer => match game.solve(answer, config.player) {
                Ok(interval) => println!(
                    "Accepted after {:.2?} ({}/{})",
                    interval,
                    game.current_solution_number()?,
                    game.total_solution_number()?
                ),
                Err(err) => {
                    warn!("Rejected '{}': {}", answer, err);
                    println!("Rejected: {}", err);
                }
            },
        }
        io::stdout().flush().context("Failed to flush stdout")?;
    }

    let statistics = game.player_statistics()?.clone();
    let elapsed = game.stop()?;
    println!("Finished in {:.2?}", elapsed);
    for (player, intervals) in statistics {
        println!("Player {}: {} solutions {:.2?}", player, intervals.len(), intervals);
    }
    Ok(())
}

/// Run the main application logic
pub fn run() -> Result<()> {
    let (config, log_level) = parse_args()?;

    // Initialize logging
    init_logging(&log_level)?;

    match config {
        CliConfig::BuildDatabase { output, target } => {
            info!("Building database for target {}", target);
            build_database(&output, target)
        }
        CliConfig::Play(config) => play(config),
    }
}
