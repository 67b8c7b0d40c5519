//! Career CLI
//!
//! Checks the game directory, generates a world from it, and manages hero
//! setups.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use career_cli::{load_params, parse_list, peek_settings, GenerationSummary, TerminalProgress};
#[cfg(feature = "cli")]
use career_core::models::player::Foot;
#[cfg(feature = "cli")]
use career_core::{
    ingest, DataLayout, GenerationParams, HeroInput, Hero, Ingested, NoProgress, ProgressSink,
    SetupStore,
};
#[cfg(feature = "cli")]
use rand::SeedableRng;
#[cfg(feature = "cli")]
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "career")]
#[command(about = "Build and inspect Career game worlds", long_about = None)]
struct Cli {
    /// Game directory (defaults to $CAREER_DATA_DIR, then the current directory)
    #[arg(long, global = true, env = "CAREER_DATA_DIR")]
    data: Option<PathBuf>,

    /// Show loading progress regardless of the settings file
    #[arg(long, global = true, default_value = "false")]
    progress: bool,

    /// Show the cause chain of every ingestion error
    #[arg(long, global = true, default_value = "false")]
    traceback: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Load every reference file and report problems
    Check {
        /// Random seed for squad generation
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Generate a world and print league and club tables
    Generate {
        /// Random seed for squad generation
        #[arg(long, default_value = "0")]
        seed: u64,

        /// YAML file overriding generation parameters
        #[arg(long)]
        params: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List saved setups, newest first
    Setups,

    /// Create a hero and save it as a setup
    NewSetup {
        /// Setup name
        name: String,

        #[arg(long)]
        full_name: String,

        #[arg(long)]
        shirt_name: Option<String>,

        /// Nation name, code or ranking
        #[arg(long)]
        nation: String,

        /// Six comma-separated attribute points summing to 300
        #[arg(long)]
        points: String,

        /// left or right
        #[arg(long, default_value = "right")]
        foot: Foot,

        /// Three comma-separated trait numbers
        #[arg(long)]
        traits: String,

        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Check a saved setup against the current database
    VerifySetup {
        /// Setup name
        name: String,

        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

#[cfg(feature = "cli")]
struct Session {
    layout: DataLayout,
    progress: bool,
    traceback: bool,
}

#[cfg(feature = "cli")]
impl Session {
    fn new(cli: &Cli) -> Self {
        let layout = DataLayout::resolve(cli.data.as_deref());
        let settings = peek_settings(&layout);
        Self {
            progress: cli.progress || settings.as_ref().is_some_and(|s| s.view_progress()),
            traceback: cli.traceback
                || settings.as_ref().is_some_and(|s| s.exception_traceback()),
            layout,
        }
    }

    /// Ingests or prints the report and exits with status 1.
    fn ingest(&self, params: &GenerationParams, seed: u64) -> Ingested {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut terminal = TerminalProgress::default();
        let mut quiet = NoProgress;
        let progress: &mut dyn ProgressSink =
            if self.progress { &mut terminal } else { &mut quiet };

        match ingest(&self.layout, params, &mut rng, progress) {
            Ok(ingested) => ingested,
            Err(report) => {
                eprintln!("{}", report.render(self.traceback));
                std::process::exit(1);
            }
        }
    }
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let session = Session::new(&cli);
    log::debug!("game directory: {}", session.layout.root().display());

    match cli.command {
        Commands::Check { seed } => {
            let ingested = session.ingest(&GenerationParams::default(), seed);
            println!(
                "Database OK: {} nations, {} leagues, {} clubs, {} players",
                ingested.world.nation_count(),
                ingested.world.league_count(),
                ingested.world.club_count(),
                ingested.world.player_count()
            );
        }

        Commands::Generate { seed, params, json } => {
            let params = load_params(params.as_deref())?;
            let ingested = session.ingest(&params, seed);
            let summary = GenerationSummary::from_world(&ingested.world, seed);
            if json {
                println!("{}", summary.to_json()?);
            } else {
                print!("{}", summary.render());
            }
        }

        Commands::Setups => {
            let store = SetupStore::for_layout(&session.layout);
            let names = store.list().context("Failed to list setups")?;
            if names.is_empty() {
                println!("No setups saved yet.");
            }
            for name in names {
                println!("{}", name);
            }
        }

        Commands::NewSetup { name, full_name, shirt_name, nation, points, foot, traits, seed } => {
            let ingested = session.ingest(&GenerationParams::default(), seed);
            let points = parse_list(&points)?;
            let points: [u32; 6] = points
                .try_into()
                .map_err(|p: Vec<u32>| anyhow::anyhow!("expected 6 points, got {}", p.len()))?;
            let input = HeroInput {
                full_name,
                shirt_name,
                nation,
                points,
                foot,
                traits: parse_list(&traits)?,
            };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let hero = Hero::from_input(&ingested.world, input, &mut rng)?;
            let path = SetupStore::for_layout(&session.layout).save(&name, &hero, &ingested.world)?;
            println!("Saved {} to {}", hero.full_name, path.display());
        }

        Commands::VerifySetup { name, seed } => {
            let ingested = session.ingest(&GenerationParams::default(), seed);
            let store = SetupStore::for_layout(&session.layout);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match store.load(&name, &ingested.world, &mut rng) {
                Ok(hero) => {
                    let rating = ingested.world.rating_model().rating(&hero);
                    println!(
                        "{} is valid: {} ({:.1}, potential {:.0})",
                        name, hero.full_name, rating, hero.potential
                    );
                }
                Err(err) if err.is_recoverable() => {
                    eprintln!("{}", err);
                    std::process::exit(2);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("career CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
