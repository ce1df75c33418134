//! plant-doctor command line.
//!
//! Run with:
//!   cargo run -- seed
//!   cargo run -- predict --plant Tomato --image leaf.jpg
//!   cargo run -- inspect --plant Potato

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use plant_doctor::demo::write_demo_model;
use plant_doctor::logging::init_logging;
use plant_doctor::{AppConfig, ModelStore, Plant, Session};
use plant_doctor::ui::{PreviewRegistry, ResultView};
use plant_doctor::workflow::PredictWorkflow;

/// Leaf-photo plant disease classification
#[derive(Parser, Debug)]
#[command(name = "plant-doctor", version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory with one artifact folder per plant
    #[arg(short, long, global = true)]
    model_root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a leaf photo and print the result line
    Predict {
        /// Potato, Cotton or Tomato
        #[arg(short, long)]
        plant: Plant,

        /// Image file (PNG, JPEG, BMP or GIF)
        #[arg(short, long)]
        image: PathBuf,

        /// Copies of the image stacked along the batch axis
        #[arg(short, long)]
        batch_size: Option<usize>,
    },

    /// Write random-weight demo models for every plant
    Seed {
        /// RNG seed for the weights
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Print the layer summary of a plant's model
    Inspect {
        #[arg(short, long)]
        plant: Plant,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(root) = cli.model_root {
        config.model_root = root;
    }
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    init_logging(level, true)?;

    match cli.command {
        Commands::Predict { plant, image, batch_size } => {
            if let Some(batch) = batch_size {
                config.batch_size = batch;
                config.validate()?;
            }
            let bytes = std::fs::read(&image)
                .with_context(|| format!("reading {}", image.display()))?;
            let name = image.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

            let mut session = Session::new(PredictWorkflow::from_config(&config), PreviewRegistry::new());
            session.select_plant(Some(plant));
            session.select_file(name, bytes);
            session.predict();

            if let Some(result) = &session.state().prediction {
                println!("Result: {}", result.text());
                if let ResultView::Scores { top_label, diagnosis, .. } = result {
                    if let Some(label) = top_label {
                        println!("Top class: {}", label);
                    }
                    if let Some(diagnosis) = diagnosis {
                        println!("{}", diagnosis.summary);
                        println!("{}", diagnosis.description);
                    }
                }
            }
        }

        Commands::Seed { seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            for plant in Plant::ALL {
                let dir = write_demo_model(&config.model_root, plant, config.input_size as usize, &mut rng)?;
                println!("wrote {}", dir.display());
            }
        }

        Commands::Inspect { plant } => {
            let store = ModelStore::new(&config.model_root);
            let network = store.try_load(plant)?;
            info!(plant = %plant, "inspecting");
            println!("{}", network.summary());
            if let Some(desc) = &network.metadata.description {
                println!("{}", desc);
            }
            if let Some(labels) = &network.metadata.output_labels {
                println!("labels: {}", labels.join(", "));
            }
        }
    }

    Ok(())
}
