use anyhow::Result;
use clap::{Parser, Subcommand};
use ontogeny_core::config::OntogenyConfig;
use ontogeny_core::genome::GenomeLogic;
use ontogeny_core::groups::GroupsCatalog;
use ontogeny_core::metrics::{init_logging, Metrics};
use ontogeny_data::Genome;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// RNG seed for every stochastic operation
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a fresh randomized (and seeded) genome as hex DNA
    Dna,
    /// Grow a brain and report its dimensions
    Grow {
        /// Grow from this hex DNA instead of a random genome
        #[arg(long)]
        dna: Option<String>,
        /// Write the anatomical matrix to this file
        #[arg(long)]
        anatomical: Option<String>,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Grow a brain and run it for a number of timesteps
    Run {
        /// Timesteps to simulate
        #[arg(long, default_value_t = 100)]
        steps: u64,
        /// Write per-step activations to this file
        #[arg(long)]
        functional: Option<String>,
        /// Enable synaptic learning during the run
        #[arg(long)]
        learn: bool,
    },
    /// Cross two random parents and report the child
    Offspring,
}

#[derive(Serialize)]
struct GrowReport {
    neurons: usize,
    input_neurons: usize,
    output_neurons: usize,
    synapses: usize,
    dna_bytes: usize,
}

fn load_config(path: &str) -> OntogenyConfig {
    match OntogenyConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path, error = %e, "config not loaded, using defaults");
            OntogenyConfig::default()
        }
    }
}

fn fresh_genome(groups: &GroupsCatalog, config: &OntogenyConfig, rng: &mut ChaCha8Rng) -> Genome {
    let mut genome = Genome::new(groups.schema());
    genome.randomize_with_rng(config.genome.randomize, rng);
    groups.seed(&mut genome, config.groups.seed_mode);
    genome
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = load_config(&args.config);
    let groups = GroupsCatalog::new(&config);
    let metrics = Metrics::new();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    match args.command {
        Command::Dna => {
            let genome = fresh_genome(&groups, &config, &mut rng);
            println!("{}", ontogeny_io::to_hex_dna(&genome));
        }
        Command::Grow {
            dna,
            anatomical,
            json,
        } => {
            let genome = match dna {
                Some(dna) => ontogeny_io::from_hex_dna(groups.schema(), &dna)?,
                None => fresh_genome(&groups, &config, &mut rng),
            };
            let grown = ontogeny_core::brain::grow_with_rng(&genome, &groups, &config, &mut rng);
            metrics.record_birth(grown.dimensions.neurons, grown.dimensions.synapses);

            let report = GrowReport {
                neurons: grown.dimensions.neurons,
                input_neurons: grown.dimensions.input_neurons,
                output_neurons: grown.dimensions.output_neurons,
                synapses: grown.dimensions.synapses,
                dna_bytes: genome.len(),
            };
            if json {
                println!("{}", ontogeny_io::serialization::to_json_pretty(&report)?);
            } else {
                println!(
                    "neurons: {} ({} in / {} out), synapses: {}, dna: {} bytes",
                    report.neurons,
                    report.input_neurons,
                    report.output_neurons,
                    report.synapses,
                    report.dna_bytes
                );
            }
            if let Some(path) = anatomical {
                ontogeny_io::write_anatomical_file(grown.brain.as_model(), &path)?;
                println!("anatomical matrix written to {path}");
            }
        }
        Command::Run {
            steps,
            functional,
            learn,
        } => {
            let genome = fresh_genome(&groups, &config, &mut rng);
            let mut grown =
                ontogeny_core::brain::grow_with_rng(&genome, &groups, &config, &mut rng);
            metrics.record_birth(grown.dimensions.neurons, grown.dimensions.synapses);

            let mut recorder = match functional {
                Some(path) => {
                    let file = std::fs::File::create(&path)?;
                    Some((
                        ontogeny_io::FunctionalRecorder::new(
                            std::io::BufWriter::new(file),
                            grown.brain.as_model(),
                        )?,
                        path,
                    ))
                }
                None => None,
            };

            let input_names: Vec<String> = grown
                .nerves
                .inputs()
                .iter()
                .map(|n| n.name.clone())
                .collect();
            for step in 0..steps {
                // A simple phase-shifted stimulus so the run shows structure.
                for (k, name) in input_names.iter().enumerate() {
                    let phase = ((step as f32 + 7.0 * k as f32) / 10.0).sin() * 0.5 + 0.5;
                    grown.set_input(name, phase);
                }
                grown.update(learn);
                metrics.record_update();
                if let Some((recorder, _)) = recorder.as_mut() {
                    recorder.record(grown.brain.as_model())?;
                }
            }

            for nerve in grown.nerves.outputs().to_vec() {
                println!("{}: {:.4}", nerve.name, grown.output(&nerve.name));
            }
            if let Some((recorder, path)) = recorder {
                let steps = recorder.steps();
                recorder.finish()?;
                println!("{steps} activation rows written to {path}");
            }
            tracing::info!(updates = metrics.updates(), "run complete");
        }
        Command::Offspring => {
            let parent_a = fresh_genome(&groups, &config, &mut rng);
            let parent_b = fresh_genome(&groups, &config, &mut rng);
            let child = parent_a.crossover_with_config(
                &parent_b,
                &config.genome,
                groups.crossover_levels(),
                true,
                &mut rng,
            );
            metrics.record_crossover();
            metrics.record_mutation();

            println!(
                "separation: {:.4}, mate probability: {:.4}",
                parent_a.separation(&parent_b),
                parent_a.mate_probability(&parent_b, config.genome.mate_power)
            );
            println!("child dna: {}", ontogeny_io::to_hex_dna(&child));
        }
    }
    Ok(())
}
