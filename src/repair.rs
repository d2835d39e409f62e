// File: src/repair.rs
//! Per-file repair orchestration and batch processing.
//!
//! Sequencing per file: Read -> Split -> Extract -> Group&Unify -> Merge ->
//! Backup -> Write. Read, split and extract failures skip the file and the
//! batch continues. Backup failure is the one hard stop before the write:
//! the original is never overwritten without a safety copy.
use crate::config::Config;
use crate::error::RepairError;
use crate::model::adapter::{extract_events, rebuild_calendar};
use crate::model::merge::merge_deduplicated;
use crate::model::series::{group_into_series, unify_identifiers};
use crate::report::RunReporter;
use crate::splitter::split_container_blocks;
use anyhow::Result;
use icalendar::Calendar;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome counters for one batch run. `failed == 0` means a clean run;
/// the binary maps that to its exit status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub repaired: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: Result<(), RepairError>, reporter: &mut dyn RunReporter) {
        self.attempted += 1;
        match outcome {
            Ok(()) => self.repaired += 1,
            Err(e) => {
                self.failed += 1;
                reporter.error(&e.to_string());
            }
        }
    }
}

/// Runs the pure repair pipeline over raw file text.
///
/// Block-level parse rejections degrade to warnings; the call fails only
/// when the container structure is broken or no block parses at all.
pub fn repair_text(raw: &str, reporter: &mut dyn RunReporter) -> Result<Calendar, RepairError> {
    let blocks = split_container_blocks(raw)?;

    let mut shell = None;
    let mut records = Vec::new();
    for (idx, block) in blocks.iter().enumerate() {
        match extract_events(block) {
            Ok(extraction) => {
                if shell.is_none() {
                    shell = Some(extraction.shell);
                }
                records.extend(extraction.records);
            }
            Err(e) => reporter.warn(&format!("calendar block {} skipped: {}", idx + 1, e)),
        }
    }

    let Some(shell) = shell else {
        return Err(RepairError::Parse(
            "no calendar block could be parsed".to_string(),
        ));
    };

    let mut clusters = group_into_series(records);
    unify_identifiers(&mut clusters);
    let finals = merge_deduplicated(clusters, reporter);

    Ok(rebuild_calendar(shell, finals))
}

/// Drives the repair over one file or one folder, against an injected
/// per-run reporter. Holds no state between files beyond the summary.
pub struct Repairer<'a> {
    config: Config,
    reporter: &'a mut dyn RunReporter,
}

impl<'a> Repairer<'a> {
    pub fn new(config: Config, reporter: &'a mut dyn RunReporter) -> Self {
        Self { config, reporter }
    }

    /// Dispatches on the target kind. A single file must carry the
    /// configured extension; a folder is scanned non-recursively.
    pub fn repair_path(&mut self, target: &Path) -> Result<BatchSummary> {
        if target.is_file() {
            if !self.has_calendar_extension(target) {
                anyhow::bail!(
                    "{} does not carry the .{} extension",
                    target.display(),
                    self.config.extension
                );
            }
            let mut summary = BatchSummary::default();
            let outcome = self.repair_file(target);
            summary.record(outcome, self.reporter);
            Ok(summary)
        } else if target.is_dir() {
            self.repair_folder(target)
        } else {
            anyhow::bail!("{} is neither a file nor a folder", target.display())
        }
    }

    /// Repairs every calendar file directly inside `dir`, sorted by name
    /// so batch order (and logs) are deterministic. One file's failure
    /// never aborts the rest of the batch.
    pub fn repair_folder(&mut self, dir: &Path) -> Result<BatchSummary> {
        self.reporter
            .info(&format!("processing folder: {}", dir.display()));

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && self.has_calendar_extension(p))
            .collect();
        paths.sort();

        let mut summary = BatchSummary::default();
        if paths.is_empty() {
            self.reporter.warn(&format!(
                "no .{} files found in {}",
                self.config.extension,
                dir.display()
            ));
            return Ok(summary);
        }

        for path in paths {
            let outcome = self.repair_file(&path);
            summary.record(outcome, self.reporter);
        }
        Ok(summary)
    }

    /// Runs the full state machine for one file.
    pub fn repair_file(&mut self, path: &Path) -> Result<(), RepairError> {
        self.reporter
            .info(&format!("processing file: {}", path.display()));

        // Exporters disagree on encodings; convert lossily instead of
        // refusing the file.
        let raw_bytes = fs::read(path).map_err(|source| RepairError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = String::from_utf8_lossy(&raw_bytes);

        let repaired = repair_text(&raw, self.reporter)?;

        // Backup strictly precedes the write. If the copy fails the
        // original is left untouched and the write is never attempted.
        let backup = backup_path(path, &self.config.backup_suffix);
        fs::copy(path, &backup).map_err(|source| RepairError::Backup {
            path: backup.clone(),
            source,
        })?;
        self.reporter
            .info(&format!("backup created: {}", backup.display()));

        fs::write(path, repaired.to_string()).map_err(|source| RepairError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        self.reporter
            .info(&format!("file successfully overwritten: {}", path.display()));
        Ok(())
    }

    fn has_calendar_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.config.extension))
    }
}

/// Sibling backup path: the original file name with the suffix appended
/// ("meetings.ics" -> "meetings.ics.backup").
fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
