//! JSON bundle handed to the report renderer.

use std::{io::Write, path::Path};

use anyhow::Result;
use tracing::info;

use super::StagedFile;
use crate::themes::ThemeReport;

/// Serialize the bundle next to `path` without replacing it yet.
pub fn stage_report(report: &ThemeReport, path: &Path) -> Result<StagedFile> {
    super::stage(path, |file| {
        serde_json::to_writer_pretty(&mut *file, report)?;
        file.write_all(b"\n")?;
        Ok(())
    })
}

pub fn write_report(report: &ThemeReport, path: &Path) -> Result<()> {
    stage_report(report, path)?.commit()?;
    info!(path = %path.display(), themes = report.themes.len(), "wrote theme report");
    Ok(())
}
