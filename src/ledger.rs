//! Append-only record of product URLs that finished archiving.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScrapeError};

#[derive(Debug)]
pub struct ProgressLedger {
    path: PathBuf,
    completed: HashSet<String>,
}

impl ProgressLedger {
    /// Reads the ledger file; a missing file is an empty ledger.
    pub fn load(path: &Path) -> Result<Self> {
        let completed: HashSet<String> = match fs::read_to_string(path) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(ScrapeError::io(path, e)),
        };
        Ok(Self { path: path.to_path_buf(), completed })
    }

    pub fn contains(&self, url: &str) -> bool {
        self.completed.contains(url)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Records `url` as done. Call only after the product is fully archived.
    pub fn append(&mut self, url: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ScrapeError::io(&self.path, e))?;
        writeln!(file, "{url}").map_err(|e| ScrapeError::io(&self.path, e))?;
        self.completed.insert(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_ledger() {
        let tmp = TempDir::new().unwrap();
        let ledger = ProgressLedger::load(&tmp.path().join("progreso_urls.txt")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn appends_survive_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("progreso_urls.txt");
        let mut ledger = ProgressLedger::load(&path).unwrap();
        ledger.append("https://shop.test/a").unwrap();
        ledger.append("https://shop.test/b").unwrap();
        assert!(ledger.contains("https://shop.test/a"));

        let reloaded = ProgressLedger::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("https://shop.test/b"));
    }

    #[test]
    fn duplicates_and_blank_lines_collapse() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("progreso_urls.txt");
        fs::write(&path, "https://shop.test/a\n\n  https://shop.test/a  \nhttps://shop.test/b\n").unwrap();

        let ledger = ProgressLedger::load(&path).unwrap();

        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains("https://shop.test/a"));
    }

    #[test]
    fn append_never_rewrites_existing_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("progreso_urls.txt");
        fs::write(&path, "https://shop.test/old\n").unwrap();

        let mut ledger = ProgressLedger::load(&path).unwrap();
        ledger.append("https://shop.test/new").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "https://shop.test/old\nhttps://shop.test/new\n"
        );
    }
}
