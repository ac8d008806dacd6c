// Disclaimer gate persistence — a single flag file, write-once.
//
// Once the user accepts, the flag is written to the local state directory
// under a fixed name with no expiry; nothing in this system ever clears it.
// The workflow controller reads it once at startup and writes it through a
// single setter.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Fixed flag file name inside the state directory.
pub const FLAG_FILE: &str = "disclaimer_accepted";

/// The acknowledgment text shown before first use.
pub const DISCLAIMER_TEXT: &str = "\
Phishscope is an assistive triage tool, not a guarantee. A \"looks safe\"\n\
verdict does not make an email safe, and a scam verdict is not proof of\n\
wrongdoing. Never share passwords or payment details based on an email,\n\
and verify unusual requests through a channel you already trust.";

/// Durable store for the accepted-disclaimer flag.
pub struct DisclaimerStore {
    path: PathBuf,
}

impl DisclaimerStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(FLAG_FILE),
        }
    }

    /// One-shot startup read.
    pub fn is_accepted(&self) -> bool {
        self.path.exists()
    }

    /// Persist acceptance. Safe to call repeatedly.
    pub fn mark_accepted(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state dir {}", parent.display()))?;
        }
        fs::write(&self.path, b"accepted\n")
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_roundtrip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = DisclaimerStore::new(dir.path());
        assert!(!store.is_accepted());

        store.mark_accepted().unwrap();
        assert!(store.is_accepted());

        // A fresh store over the same dir (simulated reload) sees the flag.
        let reloaded = DisclaimerStore::new(dir.path());
        assert!(reloaded.is_accepted());
    }

    #[test]
    fn test_mark_accepted_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = DisclaimerStore::new(dir.path());
        store.mark_accepted().unwrap();
        store.mark_accepted().unwrap();
        assert!(store.is_accepted());
    }

    #[test]
    fn test_creates_missing_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deeper").join("state");
        let store = DisclaimerStore::new(&nested);
        store.mark_accepted().unwrap();
        assert!(store.is_accepted());
    }
}
