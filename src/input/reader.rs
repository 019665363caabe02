use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Largest message accepted by `charla ask` (1 MB).
pub const MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Reads a message body from a file or stdin.
pub struct InputReader;

impl InputReader {
    pub fn read(file_path: Option<&str>) -> Result<String> {
        file_path.map_or_else(
            || Self::read_from(io::stdin().lock(), "stdin"),
            |path| Self::read_file(Path::new(path)),
        )
    }

    fn read_file(path: &Path) -> Result<String> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to access file: {}", path.display()))?;
        check_size(metadata.len() as usize)?;

        let file = fs::File::open(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Self::read_from(file, &path.display().to_string())
    }

    /// Reads at most one byte past the limit so oversized input is detected
    /// without buffering all of it.
    fn read_from(reader: impl Read, source: &str) -> Result<String> {
        let mut buffer = Vec::new();
        reader
            .take(MAX_INPUT_SIZE as u64 + 1)
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read from {source}"))?;
        check_size(buffer.len())?;

        String::from_utf8(buffer).with_context(|| format!("Input from {source} is not valid UTF-8"))
    }
}

fn check_size(size: usize) -> Result<()> {
    if size > MAX_INPUT_SIZE {
        bail!(
            "Error: Input size ({:.1} MB) exceeds maximum allowed size (1 MB).\n\n\
             Send a shorter message.",
            size as f64 / 1024.0 / 1024.0
        );
    }
    Ok(())
}
