use std::fs::File;
use std::io::Write;
use std::path::Path;

use color_eyre::{eyre::eyre, Result};
use memmap2::Mmap;
use tracing::info;

use crate::decode::PlanarFrame;

/// Memory-map an input file read-only.
pub fn map_input(path: &Path) -> Result<Mmap> {
    let file = File::open(path).map_err(|e| eyre!("Failed to open {}: {}", path.display(), e))?;
    // SAFETY: the mapping is read-only and dropped before the process exits;
    // concurrent truncation of the input is not supported.
    let map = unsafe { Mmap::map(&file)? };
    info!("Mapped {} ({} bytes)", path.display(), map.len());
    Ok(map)
}

/// Write the visible samples of `frame` as yuv422p10le: all Y rows, then U, then V.
pub fn write_planar<W: Write>(out: &mut W, frame: &PlanarFrame) -> Result<()> {
    let rows = frame.height as usize;
    let mut line = Vec::with_capacity(frame.width as usize * 2);

    let mut emit = |out: &mut W, samples: &[u16]| -> Result<()> {
        line.clear();
        for s in samples {
            line.extend_from_slice(&s.to_le_bytes());
        }
        out.write_all(&line)?;
        Ok(())
    };

    for y in 0..rows {
        emit(out, frame.luma_row(y))?;
    }
    for y in 0..rows {
        emit(out, frame.chroma_rows(y).0)?;
    }
    for y in 0..rows {
        emit(out, frame.chroma_rows(y).1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planes_are_written_in_order() {
        let mut frame = PlanarFrame::new(2, 1, 32).unwrap();
        frame.y[0] = 0x3FF;
        frame.y[1] = 0x001;
        frame.u[0] = 0x200;
        frame.v[0] = 0x100;

        let mut out = Vec::new();
        write_planar(&mut out, &frame).unwrap();
        assert_eq!(out, vec![0xFF, 0x03, 0x01, 0x00, 0x00, 0x02, 0x00, 0x01]);
    }
}
