use anyhow::Result;
use clap::Parser;
use moocgen::graph::{load_graph, USER_COURSE_RELATIONS};
use moocgen::history::load_histories;
use moocgen::output::{shuffle_examples, write_dataset};
use moocgen::{Config, ExampleBuilder};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "moocgen")]
#[command(about = "Generate SFT dialogue examples from a MOOCCube knowledge graph")]
struct Args {
    /// Override the shuffle seed from config.toml
    #[arg(long)]
    seed: Option<u64>,

    /// Override the output path from config.toml
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only process the first N learners (smoke runs)
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    log::info!("Starting MoocGen dataset generation");

    let config = Config::load()?;
    log::info!("Configuration loaded successfully");
    log::info!("Entities dir: {}", config.entities_dir().display());
    log::info!("Relations dir: {}", config.relations_dir().display());

    let start = Instant::now();

    // Load the knowledge graph (aborts early if a required relation file
    // is missing)
    let (graph, load_stats) = load_graph(
        config.entities_dir(),
        config.relations_dir(),
        config.dataset.desc_max_chars,
    )?;

    // Aggregate enrollment records into per-learner sequences
    let enrollments = config.relations_dir().join(USER_COURSE_RELATIONS);
    log::info!("Aggregating enrollments from {}", enrollments.display());
    let (mut histories, history_stats) = load_histories(&enrollments, &graph)?;

    if let Some(limit) = args.limit {
        histories.truncate(limit);
        log::info!("Limiting run to the first {} learners", histories.len());
    }

    if histories.is_empty() {
        log::warn!("No learner histories found. Check relations_dir in config.toml.");
        return Ok(());
    }

    // Build dialogue examples
    let mut builder = ExampleBuilder::new(&graph, config.windowing.clone());
    let mut examples = builder.build_all(&histories)?;
    log::info!("Built {} examples from {} learners", examples.len(), histories.len());

    // Shuffle and write
    let seed = args.seed.or(config.output.shuffle_seed);
    shuffle_examples(&mut examples, seed);
    match seed {
        Some(seed) => log::info!("Shuffled dataset with seed {}", seed),
        None => log::info!("Shuffled dataset with entropy seed"),
    }

    let output_path = args.output.unwrap_or_else(|| config.output_path().to_path_buf());
    write_dataset(&output_path, &examples)?;

    let elapsed = start.elapsed();

    log::info!("=== Generation Complete ===");
    log::info!("Courses: {}", load_stats.courses);
    log::info!("Concepts: {}", load_stats.concepts);
    log::info!("Course-concept edges: {}", load_stats.course_concept_edges);
    log::info!("Prerequisite edges: {}", load_stats.prerequisite_edges);
    log::info!("Input lines skipped: {}", load_stats.skipped_lines + history_stats.malformed_lines);
    log::info!(
        "Enrollments: {} kept, {} dropped (unknown course)",
        history_stats.kept,
        history_stats.dropped_unknown_course
    );
    log::info!("Learners: {}", histories.len());
    log::info!("Examples written: {}", examples.len());
    log::info!("Output: {}", output_path.display());
    log::info!("Time: {:?}", elapsed);

    Ok(())
}
