//! smcgen CLI - Labeled epistemic-entailment dataset generation via SMCDEL.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use smcgen::models::VerifierMode;
use smcgen::{
    sample_agents, CommandVerifier, Config, DatasetPipeline, HttpVerifier, ProblemGenerator,
    Render, RenderMode, Verifier,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "smcgen")]
#[command(author = "Infernet <dev@infernet.org>")]
#[command(version)]
#[command(about = "Labeled epistemic-entailment dataset generation via SMCDEL")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a labeled dataset
    Generate {
        /// Number of records to generate
        #[arg(short = 'n', long, default_value = "100")]
        count: usize,

        /// Path to output JSONL file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base RNG seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Print random problems in both renderings without calling the verifier
    Preview {
        /// Number of problems to print
        #[arg(short = 'n', long, default_value = "5")]
        count: usize,

        /// Base RNG seed
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },

    /// Submit one formal query to the verifier and print the verdict
    Solve {
        /// Query in the SMCDEL input language
        query: String,
    },

    /// Validate configuration file
    Validate,

    /// Show example configuration
    Example,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

fn build_verifier(config: &Config) -> Result<Arc<dyn Verifier>> {
    let v = &config.verifier;
    Ok(match v.mode {
        VerifierMode::Http => Arc::new(
            HttpVerifier::new(v.base_url.clone(), v.timeout_secs, v.max_retries)
                .context("Failed to create HTTP verifier")?,
        ),
        VerifierMode::Command => Arc::new(CommandVerifier::new(
            v.binary.clone(),
            v.timeout_secs,
            v.max_retries,
        )),
    })
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    })
}

fn print_example_config() {
    let example = r#"# smcgen configuration file

[verifier]
# "command" pipes queries to a local smcdel binary,
# "http" posts them to an smcdelweb endpoint.
mode = "command"
binary = "smcdel"
base_url = "https://w4eg.de/malvin/illc/smcdelweb"
timeout_secs = 30
max_retries = 3

[generator]
n_agents = 2
depth = 1
knowledge_depth = 1
n_announcements = 1
n_observations = 1
random_law = false
include_quantifiers = false
max_sanity_retries = 10

[[generator.predicates]]
template = "{agent} is muddy"
negated = "{agent} is not muddy"

[workers]
size = 4

[output]
path = "output/dataset.jsonl"
include_degenerate = false
"#;
    println!("{example}");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Example => {
            print_example_config();
            return Ok(());
        }

        Commands::Validate => {
            let config = Config::from_file(&cli.config)
                .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

            info!("Configuration is valid");
            info!("  Verifier:   {:?}", config.verifier.mode);
            info!("  Agents:     {}", config.generator.n_agents);
            info!("  Predicates: {}", config.generator.predicates.len());
            info!("  Workers:    {}", config.workers.size);
            return Ok(());
        }

        Commands::Solve { query } => {
            let config = Config::from_file(&cli.config)
                .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

            let verifier = build_verifier(&config)?;
            let verdict = verifier.verify(&query).await?;
            println!("{}", serde_json::to_string(&verdict)?);
        }

        Commands::Preview { count, seed } => {
            let config = Config::from_file(&cli.config)
                .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

            let mut rng = StdRng::seed_from_u64(seed);
            let agents = sample_agents(&mut rng, config.generator.n_agents);
            let generator = ProblemGenerator::new(&config.generator, agents);

            for i in 0..count {
                let problem = generator.random_problem(&mut rng);
                println!("--- problem {} ---", i + 1);
                println!("formal:  {}", problem.render(RenderMode::Formal));
                println!("natural: {}", problem.render(RenderMode::Natural));
            }
        }

        Commands::Generate {
            count,
            output,
            seed,
        } => {
            let config = Config::from_file(&cli.config)
                .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

            let output_path = output.unwrap_or_else(|| config.output.path.clone());
            let base_seed = resolve_seed(seed);

            let verifier = build_verifier(&config)?;

            // Agent names are part of the reproducible draw.
            let mut rng = StdRng::seed_from_u64(base_seed);
            let agents = sample_agents(&mut rng, config.generator.n_agents);

            let pipeline = DatasetPipeline::new(config, verifier, agents);
            let stats = pipeline.run(count, &output_path, base_seed).await?;

            println!("\n=== Generation Complete ===");
            println!("Requested:    {}", stats.total_requested);
            println!("Written:      {}", stats.total_written);
            println!("Entailed:     {}", stats.entailed);
            println!("Not entailed: {}", stats.not_entailed);
            println!("Degenerate:   {}", stats.degenerate);
            println!("Duplicates:   {}", stats.duplicates);
            println!("Failed:       {}", stats.failed);
            println!("Throughput:   {:.0}/hr", stats.throughput_per_hour);
            println!("Runtime:      {:.1}s", stats.runtime_secs);
            println!("Seed:         {base_seed}");
            println!("Output:       {output_path:?}");
        }
    }

    Ok(())
}
