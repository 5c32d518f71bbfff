//! Transcript rotation on disk.

use std::fs;

use chrono::{NaiveDate, NaiveDateTime};

use cert_expiry_monitor::transcript::{
    list_transcripts, prune_transcripts, transcript_file_name, Transcript,
};

const PROGRAM: &str = "cert_expiry_monitor";

fn day(n: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date")
        + chrono::Duration::days(i64::from(n))
}

fn seed(dir: &std::path::Path, count: u32) {
    for n in 0..count {
        fs::write(dir.join(transcript_file_name(PROGRAM, day(n))), format!("run {n}\n"))
            .expect("seed transcript");
    }
}

#[test]
fn test_prune_removes_exactly_n_minus_r() {
    for (existing, retention) in [(10u32, 3usize), (5, 4), (90, 1), (2, 1)] {
        let dir = tempfile::tempdir().expect("temp dir");
        seed(dir.path(), existing);

        let outcome = prune_transcripts(dir.path(), PROGRAM, retention).expect("prune");
        assert_eq!(outcome.removed.len(), existing as usize - retention);
        assert!(outcome.failed.is_empty());

        let remaining = list_transcripts(dir.path(), PROGRAM).expect("list");
        assert_eq!(remaining.len(), retention);
        // the newest files survive
        let newest = dir.path().join(transcript_file_name(PROGRAM, day(existing - 1)));
        assert_eq!(remaining.last(), Some(&newest));
    }
}

#[test]
fn test_unrelated_files_are_never_pruned() {
    let dir = tempfile::tempdir().expect("temp dir");
    seed(dir.path(), 4);
    fs::write(dir.path().join("notes.txt"), "keep me").expect("write");
    fs::write(dir.path().join("other_tool_20250101_000000.log"), "keep me").expect("write");

    prune_transcripts(dir.path(), PROGRAM, 1).expect("prune");

    assert!(dir.path().join("notes.txt").exists());
    assert!(dir.path().join("other_tool_20250101_000000.log").exists());
}

#[test]
fn test_new_transcript_is_appendable() {
    let dir = tempfile::tempdir().expect("temp dir");
    seed(dir.path(), 3);

    let transcript = Transcript::create(dir.path(), PROGRAM, 2).expect("create transcript");
    assert_eq!(transcript.pruned().len(), 1);

    let mut handle = transcript.try_clone_file().expect("clone handle");
    use std::io::Write;
    writeln!(handle, "first line").expect("write");
    writeln!(handle, "second line").expect("write");

    let contents = fs::read_to_string(transcript.path()).expect("read transcript");
    assert_eq!(contents, "first line\nsecond line\n");
}
