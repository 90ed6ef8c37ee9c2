//! CSV results: the position series and fitted parameters, each with a
//! header row.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::Result;
use crate::fit::oscillator::OscillatorParams;
use crate::frame::PositionSample;
use crate::physics::FrequencyConvention;

/// Columns: `time,x,y`.
pub fn write_series<W: Write>(writer: W, series: &[PositionSample]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for sample in series {
        csv.serialize(sample)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn save_series(path: &Path, series: &[PositionSample]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_series(file, series)
}

pub fn read_series<R: Read>(reader: R) -> Result<Vec<PositionSample>> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut series = Vec::new();
    for record in csv.deserialize() {
        series.push(record?);
    }
    Ok(series)
}

pub fn load_series(path: &Path) -> Result<Vec<PositionSample>> {
    read_series(std::fs::File::open(path)?)
}

/// Columns: `A,gamma,omega,phi,C`, with `f` in place of `omega` under the
/// Hertz convention.
pub fn write_params<W: Write>(
    writer: W,
    params: &OscillatorParams,
    convention: FrequencyConvention,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["A", "gamma", convention.column(), "phi", "C"])?;
    csv.write_record([
        params.amplitude.to_string(),
        params.damping.to_string(),
        convention.frequency(params).to_string(),
        params.phase.to_string(),
        params.offset.to_string(),
    ])?;
    csv.flush()?;
    Ok(())
}

pub fn save_params(
    path: &Path,
    params: &OscillatorParams,
    convention: FrequencyConvention,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_params(file, params, convention)
}
