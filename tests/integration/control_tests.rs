use filecollect::collect::{
    spawn_collect, CollectConfig, Collector, ControlChannel, MergeEvent, RunOutcome,
};
use filecollect::progress::ProgressCallback;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::{tempdir, TempDir};

/// Pauses or stops the run once `after` items have been processed.
struct Trigger {
    control: ControlChannel,
    after: usize,
    stop: bool,
    processed: AtomicUsize,
    events: Mutex<Vec<MergeEvent>>,
}

impl Trigger {
    fn new(control: ControlChannel, after: usize, stop: bool) -> Self {
        Self {
            control,
            after,
            stop,
            processed: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
        }
    }
}

impl ProgressCallback for Trigger {
    fn on_progress(&self, _percent: u8) {
        let processed = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        if processed == self.after {
            if self.stop {
                self.control.stop();
            } else {
                self.control.pause();
            }
        }
    }

    fn on_event(&self, event: &MergeEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Two roots holding `groups` groups of two distinct files each.
fn fixture(groups: usize) -> (TempDir, TempDir, TempDir) {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    for i in 0..groups {
        fs::write(a.path().join(format!("file{i}.txt")), format!("a{i}")).unwrap();
        fs::write(b.path().join(format!("file{i}.txt")), format!("b{i}")).unwrap();
    }
    (a, b, tempdir().unwrap())
}

fn config(a: &TempDir, b: &TempDir, out: &TempDir) -> CollectConfig {
    CollectConfig::new(vec![a.path().to_path_buf(), b.path().to_path_buf()])
        .with_custom_output(out.path().to_path_buf())
        .with_output_folder_name("merged")
}

fn count_files(dir: &std::path::Path) -> usize {
    let mut total = 0;
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        if entry.file_type().unwrap().is_dir() {
            total += count_files(&entry.path());
        } else {
            total += 1;
        }
    }
    total
}

#[test]
fn test_stop_mid_run_halts_at_next_item() {
    let (a, b, out) = fixture(5);
    let control = ControlChannel::new();
    let trigger = Arc::new(Trigger::new(control.clone(), 3, true));

    let collector = Collector::new(config(&a, &b, &out).with_progress_callback(trigger.clone()));
    let summary = collector.run(&control).unwrap();

    assert_eq!(summary.outcome, RunOutcome::Stopped);
    assert_eq!(summary.processed_items, 3);
    assert_eq!(summary.total_items, 10);
    assert_eq!(count_files(&out.path().join("merged")), 3);

    let events = trigger.events.lock().unwrap();
    assert_eq!(events.last(), Some(&MergeEvent::Stopped));
    assert!(!events
        .iter()
        .any(|e| matches!(e, MergeEvent::Completed { .. })));
}

#[test]
fn test_items_written_before_stop_are_intact() {
    let (a, b, out) = fixture(3);
    let control = ControlChannel::new();
    let trigger = Arc::new(Trigger::new(control.clone(), 2, true));

    let collector = Collector::new(config(&a, &b, &out).with_progress_callback(trigger));
    let summary = collector.run(&control).unwrap();

    assert_eq!(summary.outcome, RunOutcome::Stopped);
    let group = out.path().join("merged/file0");
    assert_eq!(fs::read(group.join("file0.txt")).unwrap(), b"a0");
    assert_eq!(fs::read(group.join("file0_1.txt")).unwrap(), b"b0");
    assert!(!out.path().join("merged/file1").exists());
}

#[test]
fn test_pause_blocks_worker_until_resume() {
    let (a, b, out) = fixture(2);
    let control = ControlChannel::new();
    let trigger = Arc::new(Trigger::new(control.clone(), 1, false));

    let collector = Collector::new(config(&a, &b, &out).with_progress_callback(trigger.clone()));
    let handle = spawn_collect(collector, control.clone()).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !control.is_paused() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(control.is_paused());

    thread::sleep(Duration::from_millis(50));
    assert!(!handle.is_finished());
    assert_eq!(trigger.processed.load(Ordering::SeqCst), 1);

    handle.control().resume();
    let summary = handle.join().unwrap();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.processed_items, 4);
}

#[test]
fn test_stop_releases_paused_worker() {
    let (a, b, out) = fixture(2);
    let control = ControlChannel::new();
    let trigger = Arc::new(Trigger::new(control.clone(), 1, false));

    let collector = Collector::new(config(&a, &b, &out).with_progress_callback(trigger));
    let handle = spawn_collect(collector, control.clone()).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !control.is_paused() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    control.stop();
    let summary = handle.join().unwrap();

    assert_eq!(summary.outcome, RunOutcome::Stopped);
    assert_eq!(summary.processed_items, 1);
}
