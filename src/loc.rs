use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// How many leading bytes are probed for a NUL when detecting binaries
const BINARY_PROBE_LEN: usize = 8 * 1024;

/// Count lines with at least one non-whitespace byte.
///
/// Unreadable and binary files count as 0; the error never leaves here.
pub fn count_lines(path: &Path) -> u64 {
    let counted = File::open(path).and_then(|file| count_non_blank(BufReader::new(file)));
    match counted {
        Ok(lines) => lines,
        Err(err) => {
            debug!(path = %path.display(), "line count failed: {err}");
            0
        }
    }
}

/// Streams line by line; only the probe and the current line are buffered.
fn count_non_blank<R: BufRead>(mut reader: R) -> io::Result<u64> {
    let mut head = Vec::with_capacity(BINARY_PROBE_LEN);
    reader
        .by_ref()
        .take(BINARY_PROBE_LEN as u64)
        .read_to_end(&mut head)?;
    if memchr::memchr(0, &head).is_some() {
        return Ok(0);
    }

    let mut reader = Cursor::new(head).chain(reader);
    let mut line = Vec::new();
    let mut count = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if line.iter().any(|b| !b.is_ascii_whitespace()) {
            count += 1;
        }
    }
    Ok(count)
}

/// Count every file in parallel, keeping input order
pub fn count_all(paths: &[PathBuf]) -> Vec<u64> {
    paths.par_iter().map(|path| count_lines(path)).collect()
}
