use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

use crate::defs::Election;
use crate::error::{Error, Result};

// name of the view-model dump written next to the pages
pub const MODEL_FILE: &str = "elections.json";

pub trait PageWriter {
    fn write_page(&mut self, path: &Path, html: &str) -> Result<()>;
    fn write_model(&mut self, elections: &[Election]) -> Result<()>;
}

/// Writes the site under a root directory. Each file is written to a
/// temporary file beside its target and then renamed into place.
pub struct SiteOutput {
    root: PathBuf,
    written: usize,
}

impl SiteOutput {
    pub fn new(root: &Path) -> Result<SiteOutput> {
        fs::create_dir_all(root).map_err(|e| Error::io(root, e))?;
        Ok(SiteOutput {
            root: root.to_path_buf(),
            written: 0,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn written(&self) -> usize {
        self.written
    }

    fn persist(&mut self, relative: &Path, contents: &[u8]) -> Result<()> {
        // only plain names: no root, prefix, `.` or `..` may steer the write
        let contained = relative.components().next().is_some()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !contained {
            return Err(Error::Config(format!(
                "{} would be written outside {}",
                relative.display(),
                self.root.display()
            )));
        }
        let target = self.root.join(relative);
        let dir = match target.parent() {
            Some(dir) => dir.to_path_buf(),
            None => self.root.clone(),
        };
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| Error::io(&dir, e))?;
        tmp.write_all(contents).map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(&target)
            .map_err(|e| Error::io(&target, e.error))?;
        self.written += 1;
        Ok(())
    }
}

impl PageWriter for SiteOutput {
    fn write_page(&mut self, path: &Path, html: &str) -> Result<()> {
        self.persist(path, html.as_bytes())
    }

    fn write_model(&mut self, elections: &[Election]) -> Result<()> {
        let path = self.root.join(MODEL_FILE);
        let json = serde_json::to_vec_pretty(elections).map_err(|e| Error::json(&path, e))?;
        self.persist(Path::new(MODEL_FILE), &json)
    }
}
