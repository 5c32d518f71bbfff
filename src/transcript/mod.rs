//! Run transcripts.
//!
//! Each run writes a timestamped log file `<program>_<YYYYmmdd_HHMMSS>.log`
//! into the log directory. Before a new transcript is opened, the oldest
//! files beyond the retention count are removed.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::config::{TRANSCRIPT_EXTENSION, TRANSCRIPT_TIMESTAMP_FORMAT};
use crate::error_handling::TranscriptError;

/// An open transcript file.
#[derive(Debug)]
pub struct Transcript {
    path: PathBuf,
    file: File,
    pruned: PruneOutcome,
}

/// What a pruning pass did.
///
/// Failures are kept rather than logged so the caller can report them once a
/// logger is installed.
#[derive(Debug, Default)]
pub struct PruneOutcome {
    /// Paths removed, oldest first.
    pub removed: Vec<PathBuf>,
    /// Paths that could not be removed, with the cause.
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl Transcript {
    /// Prunes old transcripts down to `retention` and opens a new one stamped
    /// with the local time.
    ///
    /// # Errors
    ///
    /// Returns a `TranscriptError` if the directory cannot be created or
    /// listed, or the new file cannot be opened.
    pub fn create(dir: &Path, program: &str, retention: u32) -> Result<Self, TranscriptError> {
        Self::create_at(dir, program, retention, Local::now().naive_local())
    }

    /// Like [`Transcript::create`] with an explicit timestamp.
    pub fn create_at(
        dir: &Path,
        program: &str,
        retention: u32,
        timestamp: NaiveDateTime,
    ) -> Result<Self, TranscriptError> {
        Self::open_with(dir, program, retention, timestamp, |path| fs::remove_file(path))
    }

    fn open_with<F>(
        dir: &Path,
        program: &str,
        retention: u32,
        timestamp: NaiveDateTime,
        remove: F,
    ) -> Result<Self, TranscriptError>
    where
        F: FnMut(&Path) -> io::Result<()>,
    {
        fs::create_dir_all(dir).map_err(|source| TranscriptError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let transcripts = list_transcripts(dir, program)?;
        let pruned = remove_oldest(transcripts, retention as usize, remove);

        let path = dir.join(transcript_file_name(program, timestamp));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| TranscriptError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self { path, file, pruned })
    }

    /// Path of the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Transcripts removed while this one was created.
    pub fn pruned(&self) -> &[PathBuf] {
        &self.pruned.removed
    }

    /// Old transcripts that could not be removed.
    pub fn prune_failures(&self) -> &[(PathBuf, io::Error)] {
        &self.pruned.failed
    }

    /// Another handle to the transcript, for the logger.
    pub fn try_clone_file(&self) -> io::Result<File> {
        self.file.try_clone()
    }
}

/// File name of the transcript for `program` started at `timestamp`.
pub fn transcript_file_name(program: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{program}_{}.{TRANSCRIPT_EXTENSION}",
        timestamp.format(TRANSCRIPT_TIMESTAMP_FORMAT)
    )
}

/// Lists the transcripts of `program` in `dir`, oldest first.
///
/// The fixed-width timestamp in the name makes name order chronological.
///
/// # Errors
///
/// Returns `TranscriptError::ListDir` if the directory cannot be read.
pub fn list_transcripts(dir: &Path, program: &str) -> Result<Vec<PathBuf>, TranscriptError> {
    let entries = fs::read_dir(dir).map_err(|source| TranscriptError::ListDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let prefix = format!("{program}_");
    let suffix = format!(".{TRANSCRIPT_EXTENSION}");
    let mut transcripts: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(&suffix))
        })
        .collect();
    transcripts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(transcripts)
}

/// Deletes the oldest transcripts so that at most `keep` remain.
///
/// A file that cannot be deleted is skipped and reported in
/// [`PruneOutcome::failed`].
///
/// # Errors
///
/// Returns `TranscriptError::ListDir` if the directory cannot be read.
pub fn prune_transcripts(
    dir: &Path,
    program: &str,
    keep: usize,
) -> Result<PruneOutcome, TranscriptError> {
    let transcripts = list_transcripts(dir, program)?;
    Ok(remove_oldest(transcripts, keep, |path| fs::remove_file(path)))
}

fn remove_oldest<F>(transcripts: Vec<PathBuf>, keep: usize, mut remove: F) -> PruneOutcome
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let excess = transcripts.len().saturating_sub(keep);
    let mut outcome = PruneOutcome {
        removed: Vec::with_capacity(excess),
        failed: Vec::new(),
    };
    for path in transcripts.into_iter().take(excess) {
        match remove(&path) {
            Ok(()) => outcome.removed.push(path),
            Err(e) => outcome.failed.push((path, e)),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp(day: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .and_then(|d| d.and_hms_opt(8, 0, second))
            .expect("valid timestamp")
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(
            transcript_file_name("monitor", stamp(9, 5)),
            "monitor_20261009_080005.log"
        );
    }

    #[test]
    fn test_list_ignores_other_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("monitor_20261001_080000.log"), "").expect("write");
        fs::write(dir.path().join("other_20261001_080000.log"), "").expect("write");
        fs::write(dir.path().join("monitor_20261001_080000.txt"), "").expect("write");
        fs::create_dir(dir.path().join("monitor_20261002_080000.log")).expect("mkdir");

        let listed = list_transcripts(dir.path(), "monitor").expect("list");
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_prune_removes_oldest() {
        let dir = tempfile::tempdir().expect("temp dir");
        for day in [3, 1, 5, 2, 4] {
            fs::write(dir.path().join(transcript_file_name("monitor", stamp(day, 0))), "")
                .expect("write");
        }

        let outcome = prune_transcripts(dir.path(), "monitor", 2).expect("prune");
        assert!(outcome.failed.is_empty());
        let removed_names: Vec<String> = outcome
            .removed
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            removed_names,
            vec![
                "monitor_20261001_080000.log",
                "monitor_20261002_080000.log",
                "monitor_20261003_080000.log"
            ]
        );
        assert_eq!(list_transcripts(dir.path(), "monitor").unwrap().len(), 2);
    }

    #[test]
    fn test_prune_with_room_removes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join(transcript_file_name("monitor", stamp(1, 0))), "").expect("write");
        assert!(prune_transcripts(dir.path(), "monitor", 5).unwrap().removed.is_empty());
    }

    #[test]
    fn test_create_prunes_before_opening() {
        let dir = tempfile::tempdir().expect("temp dir");
        for second in 0..4 {
            fs::write(
                dir.path().join(transcript_file_name("monitor", stamp(1, second))),
                "",
            )
            .expect("write");
        }

        let transcript = Transcript::create_at(dir.path(), "monitor", 3, stamp(2, 0)).expect("create");
        // four existing, retention three: exactly one removed
        assert_eq!(transcript.pruned().len(), 1);
        assert!(transcript.path().exists());

        let remaining = list_transcripts(dir.path(), "monitor").unwrap();
        assert_eq!(remaining.len(), 4);
        assert_eq!(remaining.last().map(PathBuf::as_path), Some(transcript.path()));
    }

    #[test]
    fn test_create_makes_missing_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let nested = dir.path().join("a").join("logs");
        let transcript = Transcript::create_at(&nested, "monitor", 1, stamp(1, 0)).expect("create");
        assert!(transcript.path().starts_with(&nested));
    }

    #[test]
    fn test_create_fails_when_directory_is_a_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "").expect("write");
        let err = Transcript::create_at(&blocker, "monitor", 1, stamp(1, 0)).unwrap_err();
        assert!(matches!(err, TranscriptError::CreateDir { .. }));
    }

    #[test]
    fn test_remove_failures_are_collected() {
        let paths: Vec<PathBuf> = (1..=4)
            .map(|day| PathBuf::from(transcript_file_name("monitor", stamp(day, 0))))
            .collect();
        let stuck = paths[1].clone();

        let outcome = remove_oldest(paths.clone(), 1, |path| {
            if path == stuck.as_path() {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
            } else {
                Ok(())
            }
        });

        assert_eq!(outcome.removed, vec![paths[0].clone(), paths[2].clone()]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, stuck);
        assert_eq!(outcome.failed[0].1.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_create_keeps_prune_failures_and_still_opens() {
        let dir = tempfile::tempdir().expect("temp dir");
        for day in 1..=3 {
            fs::write(dir.path().join(transcript_file_name("monitor", stamp(day, 0))), "")
                .expect("write");
        }

        let transcript = Transcript::open_with(dir.path(), "monitor", 1, stamp(9, 0), |_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
        })
        .expect("create");

        assert!(transcript.pruned().is_empty());
        assert_eq!(transcript.prune_failures().len(), 2);
        assert!(transcript.path().exists());
        // nothing was deleted
        assert_eq!(list_transcripts(dir.path(), "monitor").unwrap().len(), 4);
    }
}
