//! Reading complete bwm-ng logs.

use std::{fs, io::Read, path::Path};

use crate::{BwmNgError, Sample};

/// Delimiter used by the experiment scripts when invoking bwm-ng.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Read a bwm-ng log file and drop the last second (see [`drop_last_second`]).
pub fn read_samples(path: impl AsRef<Path>, delimiter: u8) -> Result<Vec<Sample>, BwmNgError> {
    let path = path.as_ref();
    log::trace!("Reading samples from {path:?}");
    let file = fs::File::open(path).map_err(|e| BwmNgError::from(e).in_file(path))?;
    read_samples_from_reader(file, delimiter).map_err(|e| e.in_file(path))
}

/// Read all samples from `reader` and drop the last second (see [`drop_last_second`]).
pub fn read_samples_from_reader<R: Read>(
    reader: R,
    delimiter: u8,
) -> Result<Vec<Sample>, BwmNgError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    for record in csv.records() {
        samples.push(Sample::from_record(&record?)?);
    }
    if samples.is_empty() {
        return Err(BwmNgError::Empty);
    }

    drop_last_second(&mut samples);
    if samples.is_empty() {
        return Err(BwmNgError::NoCompleteSample);
    }
    Ok(samples)
}

/// bwm-ng is usually killed while it is still writing the last sample window, so the statistics
/// of the latest second are mostly not intact. Removes every sample sharing the maximum timestamp,
/// keeping the order of all others.
pub fn drop_last_second(samples: &mut Vec<Sample>) {
    let Some(last_second) = samples.iter().map(|s| s.timestamp).max() else {
        return;
    };
    let before = samples.len();
    samples.retain(|s| s.timestamp != last_second);
    log::trace!(
        "Dropped {} samples of the last second {last_second}",
        before - samples.len()
    );
}
