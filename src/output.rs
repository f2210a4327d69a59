//! Output stage: final dataset shuffle and JSON serialization.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::builder::DialogueExample;
use crate::error::Result;

/// Permute the examples uniformly at random.
///
/// Order independence is purely cosmetic for downstream training; a fixed
/// seed makes the permutation reproducible.
pub fn shuffle_examples(examples: &mut [DialogueExample], seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    examples.shuffle(&mut rng);
}

/// Write the dataset as a pretty-printed JSON array.
pub fn write_dataset(path: &Path, examples: &[DialogueExample]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, examples)?;
    Ok(())
}
