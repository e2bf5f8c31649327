use filecollect::collect::{
    CollectConfig, CollectError, Collector, ControlChannel, MergeEvent, RunOutcome,
};
use filecollect::progress::FnProgress;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

#[test]
fn test_item_failure_does_not_abort_run() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::create_dir(a.path().join("notes")).unwrap();
    fs::write(a.path().join("notes/n1.txt"), b"1").unwrap();
    fs::write(b.path().join("notes.pdf"), b"2").unwrap();
    fs::write(a.path().join("zeta.mp3"), b"3").unwrap();
    fs::write(b.path().join("zeta.mp3"), b"4").unwrap();

    // A plain file where the nested item's directory must go
    let merged = out.path().join("merged");
    fs::create_dir_all(merged.join("notes")).unwrap();
    fs::write(merged.join("notes/notes"), b"in the way").unwrap();

    let lines = Arc::new(Mutex::new(Vec::new()));
    let progress = {
        let lines = Arc::clone(&lines);
        FnProgress::new(|_| {}, move |l| lines.lock().unwrap().push(l.to_string()))
    };
    let config = CollectConfig::new(vec![a.path().to_path_buf(), b.path().to_path_buf()])
        .with_custom_output(out.path().to_path_buf())
        .with_output_folder_name("merged")
        .with_progress_callback(Arc::new(progress));

    let summary = Collector::new(config).run(&ControlChannel::new()).unwrap();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.item_errors.len(), 1);
    assert_eq!(summary.item_errors[0].name, "n1.txt");
    assert_eq!(summary.item_errors[0].group, "notes");
    assert_eq!(summary.processed_items, 3);
    assert!(merged.join("notes/notes.pdf").is_file());
    assert!(merged.join("zeta/zeta_1.mp3").is_file());

    let lines = lines.lock().unwrap();
    assert!(lines.iter().any(|l| l.starts_with("Error processing n1.txt")));
    assert_eq!(
        lines.last().map(String::as_str),
        Some("Collection complete: 2 groups merged")
    );
}

#[test]
fn test_output_dir_failure_is_run_level() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(a.path().join("x.pdf"), b"1").unwrap();
    fs::write(b.path().join("x.pdf"), b"2").unwrap();
    fs::write(out.path().join("merged"), b"not a directory").unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let progress = {
        let events = Arc::clone(&events);
        FnProgress::new(|_| {}, move |l| events.lock().unwrap().push(l.to_string()))
    };
    let config = CollectConfig::new(vec![a.path().to_path_buf(), b.path().to_path_buf()])
        .with_custom_output(out.path().to_path_buf())
        .with_output_folder_name("merged")
        .with_progress_callback(Arc::new(progress));

    let result = Collector::new(config).run(&ControlChannel::new());

    assert!(matches!(result, Err(CollectError::CreateOutputDir { .. })));
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].starts_with("Collection failed"));
}

#[test]
fn test_missing_custom_path_is_rejected() {
    let mut config = CollectConfig::new(vec![std::path::PathBuf::from("/a")]);
    config.output_location = filecollect::collect::OutputLocation::CustomLocation;

    let result = Collector::new(config).run(&ControlChannel::new());
    assert!(matches!(result, Err(CollectError::MissingCustomPath)));
}

#[test]
fn test_run_failed_event_line() {
    let event = MergeEvent::RunFailed {
        error: CollectError::NoInputFolders.to_string(),
    };
    assert_eq!(event.to_string(), "Collection failed: No input folders supplied");
}
