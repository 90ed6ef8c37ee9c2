//! Persisted HSV thresholds: a flat JSON object with keys
//! `hmin, hmax, smin, smax, vmin, vmax`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::{info, warn};

use crate::color::HsvRange;
use crate::error::Result;

/// Load thresholds, falling back to the default range if the file is missing
/// or malformed. Missing keys take their default values.
pub fn load_thresholds(path: &Path) -> HsvRange {
    match try_load_thresholds(path) {
        Ok(range) => range,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot load thresholds, using defaults");
            HsvRange::default()
        }
    }
}

pub fn try_load_thresholds(path: &Path) -> Result<HsvRange> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn save_thresholds(path: &Path, range: &HsvRange) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, range)?;
    info!(path = %path.display(), "Saved thresholds");
    Ok(())
}
