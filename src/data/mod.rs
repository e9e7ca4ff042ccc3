//! Data ingestion and persistence layer.

pub mod mapping;
pub mod report;
pub mod reviews;
pub mod taxonomy;

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// A fully written temporary sibling of `target`, not yet visible to readers.
///
/// Dropping it without [`StagedFile::commit`] deletes the temporary file.
#[derive(Debug)]
pub struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Rename the staged file over its target.
    pub fn commit(mut self) -> Result<()> {
        std::fs::rename(&self.temp, &self.target)
            .with_context(|| format!("replace {}", self.target.display()))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.temp);
        }
    }
}

/// Write the contents destined for `path` into a sibling temporary file.
///
/// Committing renames it into place, so readers never observe a
/// half-written file.
pub(crate) fn stage<F>(path: &Path, write: F) -> Result<StagedFile>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let staged = StagedFile {
        temp: temp_sibling(path),
        target: path.to_path_buf(),
        committed: false,
    };
    let mut file = File::create(&staged.temp)
        .with_context(|| format!("create {}", staged.temp.display()))?;
    write(&mut file)?;
    file.sync_all()?;
    Ok(staged)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn dropped_stage_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        std::fs::write(&target, "old").unwrap();

        let staged = stage(&target, |file| Ok(file.write_all(b"new")?)).unwrap();
        assert!(temp_sibling(&target).exists());
        drop(staged);

        assert!(!temp_sibling(&target).exists());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");
    }

    #[test]
    fn commit_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.csv");
        stage(&target, |file| Ok(file.write_all(b"new")?))
            .unwrap()
            .commit()
            .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
        assert!(!temp_sibling(&target).exists());
    }
}
