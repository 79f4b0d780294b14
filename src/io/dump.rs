//! Plain-text dump of every bead, for offline analysis.
//!
//! One line per (particle, slice), particles outermost; each coordinate is
//! followed by two tabs.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::paths::PathState;

/// Write all beads of `state` to `writer`.
pub fn write_paths<W: Write>(state: &PathState, writer: &mut W) -> Result<()> {
    let beads = state.beads();
    for p in 0..state.n_part() {
        for t in 0..state.n_slice() {
            for d in 0..state.dim() {
                write!(writer, "{}\t\t", beads.coord(p, t, d))?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Append all beads of `state` to the file at `filename`, creating it if
/// needed.
pub fn append_paths<P: AsRef<Path>>(state: &PathState, filename: P) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(filename)?;
    let mut writer = BufWriter::new(file);
    write_paths(state, &mut writer)?;
    writer.flush()?;
    Ok(())
}
