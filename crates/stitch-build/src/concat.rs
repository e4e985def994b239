//! Order-preserving file concatenation.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

/// Append the inputs, in order, to a freshly created `output`.
///
/// A newline is written after every input so a file without a trailing
/// newline cannot glue its last statement to the next file's first. One
/// writer owns the output stream for the whole sequence; callers wanting
/// parallelism run one concatenation per output file.
///
/// Returns the number of bytes written.
pub async fn concat_files<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<u64> {
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = tokio::fs::File::create(output)
        .await
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    let mut written = 0u64;

    for input in inputs {
        let input = input.as_ref();
        let mut reader = tokio::fs::File::open(input)
            .await
            .with_context(|| format!("failed to open {}", input.display()))?;
        written += tokio::io::copy(&mut reader, &mut writer)
            .await
            .with_context(|| format!("failed to append {}", input.display()))?;
        writer.write_all(b"\n").await?;
        written += 1;
    }

    writer.flush().await?;
    debug!(output = %output.display(), bytes = written, files = inputs.len(), "concatenated");
    Ok(written)
}

#[cfg(test)]
#[path = "concat_tests.rs"]
mod tests;
