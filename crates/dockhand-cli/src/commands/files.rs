//! File sync commands: send, compare

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dockhand_config::GlobalConfig;
use dockhand_core::{FileRecord, FileSync};
use std::path::Path;

/// Build a record for `target` carrying the content of the local `source` file
fn record_from(target: &str, source: &Path) -> Result<FileRecord> {
    let content = std::fs::read(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;
    Ok(FileRecord::new(target, STANDARD.encode(content)))
}

pub async fn send(config: &GlobalConfig, target: &str, source: &Path) -> Result<()> {
    let record = record_from(target, source)?;
    let result = FileSync::new(config.files.mode).send_file(&record).await?;

    if result.processed {
        println!("Updated {}", target);
    } else if result.error.is_empty() {
        println!("{} is up to date", target);
    } else {
        bail!("Failed to write {}: {}", target, result.error);
    }
    Ok(())
}

pub async fn compare(config: &GlobalConfig, target: &str, source: &Path) -> Result<()> {
    let record = record_from(target, source)?;
    let result = FileSync::new(config.files.mode).compare_file(&record).await?;

    if result.is_same {
        println!("{} matches {}", target, source.display());
    } else {
        println!("{} differs from {}", target, source.display());
    }
    Ok(())
}
