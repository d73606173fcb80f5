use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Args, CommandFactory as _, Parser, Subcommand};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use stablecheck::case::Case;
use stablecheck::config::{Config, DEFAULT_CONFIG_FILE, OracleConfig};
use stablecheck::format::OutputFormat;
use stablecheck::reference::Builtin;
use stablecheck::{Instance, OracleError, run_result_oracle, run_trace_oracle, telemetry};

/// Randomized verification oracle for stable-matching implementations
///
/// Generates random complete preference lists, runs a candidate
/// implementation, and checks its output: the result oracle checks that the
/// matching is complete, valid, and has no blocking pair; the trace oracle
/// checks that every proposer offered in strict preference order without
/// repeats.
///
/// QUICK START:
///
///   stablecheck result --candidate gale-shapley
///   stablecheck trace --candidate skip-first-choice --seed 7
///
///   # Check output produced by another program:
///   stablecheck check --case case.json
#[derive(Parser)]
#[command(name = "stablecheck")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(after_help = "See 'stablecheck <command> --help' for more information on a specific command.")]
struct Cli {
    /// Config file (default: ./stablecheck.toml, if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the result oracle: check final matchings for stability
    Result(RunArgs),

    /// Run the trace oracle: check proposal traces for greedy order
    Trace(RunArgs),

    /// Print a random instance as JSON
    ///
    /// With the trial seed from a failure report this rebuilds the failing
    /// instance exactly.
    Generate {
        /// Participants per side (default: from config)
        #[arg(long)]
        size: Option<usize>,

        /// Seed (default: random, printed to stderr)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check a case file: an instance plus a matching and/or trace
    Check {
        /// Path to the JSON case file
        #[arg(long, value_name = "PATH")]
        case: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Implementation to check
    #[arg(long, value_enum, default_value_t = Builtin::GaleShapley)]
    candidate: Builtin,

    /// Number of trials (overrides config)
    #[arg(long)]
    trials: Option<usize>,

    /// Participants per side (overrides config)
    #[arg(long)]
    size: Option<usize>,

    /// Master seed (overrides config)
    #[arg(long, env = "STABLECHECK_SEED")]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

fn main() -> ExitCode {
    telemetry::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every check passed.
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Result(args) => {
            let config = oracle_config(cli.config.as_ref(), &args)?;
            let report = run_result_oracle(&config, &args.candidate);
            print(&args.format.render(&report)?)?;
            Ok(report.is_pass())
        }
        Commands::Trace(args) => {
            let config = oracle_config(cli.config.as_ref(), &args)?;
            let report = run_trace_oracle(&config, &args.candidate);
            print(&args.format.render(&report)?)?;
            Ok(report.is_pass())
        }
        Commands::Generate { size, seed } => {
            let config = load_config(cli.config.as_ref())?.oracle;
            let size = size.unwrap_or(config.size);
            let seed = seed.or(config.seed).unwrap_or_else(|| {
                let seed = rand::random();
                eprintln!("seed: {seed}");
                seed
            });
            let instance = Instance::random(&mut StdRng::seed_from_u64(seed), size)
                .context("instance generation failed")?;
            print(&serde_json::to_string_pretty(&instance)?)?;
            Ok(true)
        }
        Commands::Check { case, format } => {
            let report = Case::load(&case)?.check();
            print(&format.render(&report)?)?;
            Ok(report.is_pass())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "stablecheck", &mut std::io::stdout());
            Ok(true)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, OracleError> {
    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
    Ok(Config::load(path.unwrap_or(&default))?)
}

fn oracle_config(path: Option<&PathBuf>, args: &RunArgs) -> Result<OracleConfig, OracleError> {
    let config = load_config(path)?
        .oracle
        .overridden(args.trials, args.size, args.seed);
    config.validate()?;
    Ok(config)
}

fn print(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").context("failed to write to stdout")?;
    Ok(())
}
