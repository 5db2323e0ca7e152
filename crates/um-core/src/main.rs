//! Umbrella Inference Core - approximate inference for the rain/umbrella HMM
//!
//! The main entry point for um-core, handling:
//! - Reading observation sequences
//! - Likelihood-weighted and Gibbs sampling of the final hidden state
//! - Model and sampling configuration
//! - Report output (text, JSON, markdown)

use clap::{Args, CommandFactory, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::IsTerminal;
use std::path::PathBuf;
use um_common::error::format_error_human;
use um_common::{OutputFormat, StructuredError};
use um_core::config::{
    load_config, validate_effective_sampling, ConfigOptions, ResolvedConfig, WeightingMode,
};
use um_core::exit_codes::ExitCode;
use um_core::inference::infer;
use um_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use um_core::log_event;
use um_core::observations::{read_observations, ObservationSource};
use um_core::report::InferenceReport;

/// Umbrella Inference Core - posterior of rain given umbrella sightings
#[derive(Parser)]
#[command(name = "um-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Model parameter file (JSON or TOML)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate P(rain at the last step) from an observation file
    Run(RunArgs),

    /// Validate the model configuration and, optionally, an observation file
    Check(CheckArgs),

    /// Print the effective model parameters
    Model,

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Observation file of 0/1 symbols ('-' for stdin)
    input: PathBuf,

    /// Trials for the likelihood-weighted sampler
    #[arg(long)]
    likelihood_samples: Option<usize>,

    /// Recorded samples for the Gibbs sampler, including the initial one
    #[arg(long)]
    gibbs_samples: Option<usize>,

    /// Leading Gibbs samples excluded from the estimate
    #[arg(long)]
    burn_in: Option<usize>,

    /// Likelihood weighting mode (per_trial or first_seen)
    #[arg(long)]
    weighting: Option<WeightingMode>,

    /// Drop the P(R_0) factor from the Gibbs conditional at the first step
    #[arg(long)]
    no_head_prior: bool,

    /// Seed for the random source
    #[arg(long, env = "UMBRELLA_SEED")]
    seed: Option<u64>,

    /// Sampling configuration file (JSON or TOML)
    #[arg(long)]
    sampling: Option<PathBuf>,

    /// Also report the exact forward-filtered posterior
    #[arg(long)]
    exact: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Observation file to validate ('-' for stdin)
    input: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let ctx = LogContext::new(generate_run_id());

    let result = match &cli.command {
        Commands::Run(args) => run_command(&cli.global, args, &ctx),
        Commands::Check(args) => check_command(&cli.global, args, &ctx),
        Commands::Model => model_command(&cli.global),
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "um-core", &mut std::io::stdout());
            Ok(())
        }
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = ExitCode::for_error(&err);
            if code.is_internal_error() {
                log_event!(
                    ctx,
                    ERROR,
                    event_names::INTERNAL_ERROR,
                    Stage::Report,
                    "Internal error",
                    error = err.to_string().as_str()
                );
            }
            print_error(&cli.global, &err);
            code
        }
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Report,
        "Run finished",
        exit_code = exit_code.as_i32() as i64
    );
    std::process::exit(exit_code.as_i32());
}

fn run_command(
    global: &GlobalOpts,
    args: &RunArgs,
    ctx: &LogContext,
) -> Result<(), um_common::Error> {
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "Starting inference run");

    let source = ObservationSource::from_arg(&args.input);
    let chain = read_observations(&source)?;
    log_event!(
        ctx,
        INFO,
        event_names::INPUT_LOADED,
        Stage::Load,
        "Observations loaded",
        source = source.to_string().as_str(),
        chain_length = chain.len()
    );

    let config = load_logged_config(
        ConfigOptions {
            model_path: global.model.clone(),
            sampling_path: args.sampling.clone(),
        },
        ctx,
    )?;

    let mut sampling = config.sampling.clone();
    if let Some(n) = args.likelihood_samples {
        sampling.likelihood_samples = n;
    }
    if let Some(n) = args.gibbs_samples {
        sampling.gibbs_samples = n;
    }
    if let Some(n) = args.burn_in {
        sampling.gibbs_burn_in = n;
    }
    if let Some(mode) = args.weighting {
        sampling.weighting = mode;
    }
    if args.no_head_prior {
        sampling.gibbs_head_prior = false;
    }
    validate_effective_sampling(&sampling)?;

    let seed = args
        .seed
        .or(sampling.seed)
        .unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);

    log_event!(
        ctx,
        INFO,
        event_names::INFER_STARTED,
        Stage::Infer,
        "Sampling",
        likelihood_samples = sampling.likelihood_samples,
        gibbs_samples = sampling.gibbs_samples,
        burn_in = sampling.gibbs_burn_in,
        weighting = sampling.weighting.as_str(),
        head_prior = sampling.gibbs_head_prior,
        seed = seed
    );
    let summary = infer(&chain, &config.model, &sampling, args.exact, &mut rng)?;
    log_event!(
        ctx,
        INFO,
        event_names::INFER_FINISHED,
        Stage::Infer,
        "Sampling finished",
        likelihood_p_true = summary.likelihood.posterior.p_true,
        likelihood_ess = summary.likelihood.effective_sample_size,
        gibbs_p_true = summary.gibbs.posterior.p_true,
        gibbs_ess = summary.gibbs.trace.ess
    );

    let report = InferenceReport::new(
        ctx.run_id.clone(),
        chain.len(),
        seed,
        summary,
        config.snapshot(),
    );
    print!("{}", report.render(global.format)?);
    log_event!(ctx, DEBUG, event_names::REPORT_WRITTEN, Stage::Report, "Report written");
    Ok(())
}

fn check_command(
    global: &GlobalOpts,
    args: &CheckArgs,
    ctx: &LogContext,
) -> Result<(), um_common::Error> {
    let config = load_logged_config(
        ConfigOptions {
            model_path: global.model.clone(),
            sampling_path: None,
        },
        ctx,
    )?;
    let snapshot = config.snapshot();

    let mut observations = None;
    if let Some(input) = &args.input {
        let source = ObservationSource::from_arg(input);
        let chain = read_observations(&source)?;
        observations = Some((source.to_string(), chain.len()));
    }

    match global.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "status": "ok",
                "model": snapshot,
                "observations": observations.as_ref().map(|(source, len)| serde_json::json!({
                    "source": source,
                    "chain_length": len,
                })),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text | OutputFormat::Md => {
            match &snapshot.model_path {
                Some(path) => println!("ok model {} ({})", path.display(), snapshot.model_source),
                None => println!("ok model {}", snapshot.model_source),
            }
            if let Some((source, len)) = observations {
                println!("ok observations {} ({} steps)", source, len);
            }
        }
    }
    Ok(())
}

fn model_command(global: &GlobalOpts) -> Result<(), um_common::Error> {
    let config = load_config(&ConfigOptions {
        model_path: global.model.clone(),
        sampling_path: None,
    })?;
    let json = serde_json::to_string_pretty(&config.model)?;
    match global.format {
        OutputFormat::Md => println!("```json\n{}\n```", json),
        OutputFormat::Text | OutputFormat::Json => println!("{}", json),
    }
    Ok(())
}

/// Load configuration and log where the model came from.
fn load_logged_config(
    options: ConfigOptions,
    ctx: &LogContext,
) -> Result<ResolvedConfig, um_common::Error> {
    let config = match load_config(&options) {
        Ok(config) => config,
        Err(err) => {
            log_event!(
                ctx,
                ERROR,
                event_names::CONFIG_ERROR,
                Stage::Load,
                "Configuration rejected",
                error = err.to_string().as_str()
            );
            return Err(err.into());
        }
    };

    match &config.model_path {
        Some(path) => log_event!(
            ctx,
            INFO,
            event_names::CONFIG_LOADED,
            Stage::Load,
            "Model loaded",
            path = path.display().to_string().as_str(),
            source = config.model_source.to_string().as_str(),
            sha256 = config.model_hash.as_deref().unwrap_or("")
        ),
        None => log_event!(
            ctx,
            INFO,
            event_names::CONFIG_DEFAULT_USED,
            Stage::Load,
            "Using built-in model parameters"
        ),
    }
    Ok(config)
}

fn print_error(global: &GlobalOpts, err: &um_common::Error) {
    match global.format {
        OutputFormat::Json => eprintln!("{}", StructuredError::from(err).to_json()),
        OutputFormat::Text | OutputFormat::Md => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(err, use_color));
        }
    }
}
