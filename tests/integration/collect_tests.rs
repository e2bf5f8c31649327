use filecollect::collect::{CollectConfig, Collector, ControlChannel, RunOutcome, RunSummary};
use filecollect::scanner::{FileCategory, ScanConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn run(roots: &[&TempDir], out: &TempDir, min_match: usize) -> RunSummary {
    let folders: Vec<PathBuf> = roots.iter().map(|r| r.path().to_path_buf()).collect();
    let config = CollectConfig::new(folders)
        .with_min_match(min_match)
        .with_custom_output(out.path().to_path_buf())
        .with_output_folder_name("merged");
    Collector::new(config).run(&ControlChannel::new()).unwrap()
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_end_to_end_report_group() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    write(&a.path().join("report.pdf"), b"report from a");
    write(&b.path().join("report.pdf"), b"report from b");
    write(&a.path().join("notes/todo.txt"), b"todo");

    let summary = run(&[&a, &b], &out, 2);

    let merged = out.path().join("merged");
    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(listing(&merged), vec!["report"]);
    assert_eq!(
        listing(&merged.join("report")),
        vec!["report.pdf", "report_1.pdf"]
    );
    assert_eq!(
        fs::read(merged.join("report/report.pdf")).unwrap(),
        b"report from a"
    );
    assert_eq!(
        fs::read(merged.join("report/report_1.pdf")).unwrap(),
        b"report from b"
    );
    assert_eq!(summary.groups_found, 2);
    assert_eq!(summary.groups_dropped, 1);
    assert_eq!(summary.groups_merged, 1);
}

#[test]
fn test_end_to_end_identical_reports_deduplicated() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    write(&a.path().join("report.pdf"), b"same bytes");
    write(&b.path().join("report.pdf"), b"same bytes");
    write(&a.path().join("notes/todo.txt"), b"todo");

    let summary = run(&[&a, &b], &out, 2);

    assert_eq!(
        listing(&out.path().join("merged/report")),
        vec!["report.pdf"]
    );
    assert_eq!(summary.files_copied, 1);
    assert_eq!(summary.duplicates_skipped, 1);
    assert_eq!(summary.processed_items, 2);
}

#[test]
fn test_threshold_exactly_min_match_is_written() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let c = tempdir().unwrap();
    let out = tempdir().unwrap();
    write(&a.path().join("three.mp3"), b"1");
    write(&b.path().join("three.mp3"), b"2");
    write(&c.path().join("three.mp3"), b"3");
    write(&a.path().join("two.mp3"), b"4");
    write(&b.path().join("two.mp3"), b"5");

    let summary = run(&[&a, &b, &c], &out, 3);

    assert_eq!(listing(&out.path().join("merged")), vec!["three"]);
    assert_eq!(summary.total_items, 3);
    assert_eq!(summary.files_copied, 3);
}

#[test]
fn test_same_content_in_two_groups_copied_once_per_group() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    write(&a.path().join("x.txt"), b"shared");
    write(&b.path().join("x.pdf"), b"shared");
    write(&a.path().join("y.txt"), b"shared");
    write(&b.path().join("y.pdf"), b"other");

    let summary = run(&[&a, &b], &out, 2);

    let merged = out.path().join("merged");
    // x.pdf sorts first, so the .txt copy is the duplicate
    assert_eq!(listing(&merged.join("x")), vec!["x.pdf"]);
    assert_eq!(listing(&merged.join("y")), vec!["y.pdf", "y.txt"]);
    assert_eq!(summary.files_copied, 3);
    assert_eq!(summary.duplicates_skipped, 1);
}

#[test]
fn test_collisions_get_increasing_suffixes() {
    let roots: Vec<TempDir> = (0..4).map(|_| tempdir().unwrap()).collect();
    let out = tempdir().unwrap();
    for (i, root) in roots.iter().enumerate() {
        write(&root.path().join("photo.jpg"), format!("photo {i}").as_bytes());
    }

    let refs: Vec<&TempDir> = roots.iter().collect();
    let summary = run(&refs, &out, 2);

    let group = out.path().join("merged/photo");
    assert_eq!(
        listing(&group),
        vec!["photo.jpg", "photo_1.jpg", "photo_2.jpg", "photo_3.jpg"]
    );
    let mut contents: Vec<Vec<u8>> = listing(&group)
        .iter()
        .map(|name| fs::read(group.join(name)).unwrap())
        .collect();
    contents.sort();
    let mut expected: Vec<Vec<u8>> = (0..4).map(|i| format!("photo {i}").into_bytes()).collect();
    expected.sort();
    assert_eq!(contents, expected);
    assert_eq!(summary.files_copied, 4);
}

#[test]
fn test_nested_files_keep_relative_path() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    write(&a.path().join("trip/day1.jpg"), b"a1");
    write(&b.path().join("2024/trip/day1.jpg"), b"b1");
    write(&b.path().join("trip.pdf"), b"itinerary");

    let summary = run(&[&a, &b], &out, 3);

    let group = out.path().join("merged/trip");
    assert_eq!(summary.groups_merged, 1);
    assert!(group.join("trip.pdf").is_file());
    assert!(group.join("trip/day1.jpg").is_file());
    assert!(group.join("2024/trip/day1.jpg").is_file());
}

#[test]
fn test_nested_files_share_collision_and_duplicate_rules() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    write(&a.path().join("trip/x.jpg"), b"one");
    write(&b.path().join("trip/x.jpg"), b"two");
    write(&b.path().join("trip/y.jpg"), b"one");

    let summary = run(&[&a, &b], &out, 2);

    let nested = out.path().join("merged/trip/trip");
    assert_eq!(listing(&nested), vec!["x.jpg", "x_1.jpg"]);
    assert_eq!(fs::read(nested.join("x.jpg")).unwrap(), b"one");
    assert_eq!(fs::read(nested.join("x_1.jpg")).unwrap(), b"two");
    assert_eq!(summary.files_copied, 2);
    assert_eq!(summary.duplicates_skipped, 1);
    assert_eq!(summary.processed_items, 3);
}

#[test]
fn test_category_filter_limits_items() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    write(&a.path().join("song.mp3"), b"a");
    write(&b.path().join("song.wav"), b"b");
    write(&b.path().join("song.txt"), b"lyrics");

    let config = CollectConfig::new(vec![a.path().to_path_buf(), b.path().to_path_buf()])
        .with_custom_output(out.path().to_path_buf())
        .with_output_folder_name("merged")
        .with_scan_config(ScanConfig::default().with_categories(vec![FileCategory::Audio]));
    let summary = Collector::new(config).run(&ControlChannel::new()).unwrap();

    assert_eq!(summary.total_items, 2);
    assert_eq!(
        listing(&out.path().join("merged/song")),
        vec!["song.mp3", "song.wav"]
    );
}

#[test]
fn test_unsupported_files_never_group() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    write(&a.path().join("main.rs"), b"fn main() {}");
    write(&b.path().join("main.rs"), b"fn main() {}");

    let summary = run(&[&a, &b], &out, 2);

    assert_eq!(summary.outcome, RunOutcome::NoQualifyingGroups);
    assert!(!out.path().join("merged").exists());
}

#[test]
fn test_missing_root_is_skipped() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    write(&a.path().join("x.pdf"), b"1");
    write(&b.path().join("x.pdf"), b"2");

    let config = CollectConfig::new(vec![
        a.path().to_path_buf(),
        a.path().join("does-not-exist"),
        b.path().to_path_buf(),
    ])
    .with_custom_output(out.path().to_path_buf())
    .with_output_folder_name("merged");
    let summary = Collector::new(config).run(&ControlChannel::new()).unwrap();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.files_copied, 2);
}

#[test]
fn test_default_output_next_to_first_input() {
    let parent = tempdir().unwrap();
    let a = parent.path().join("a");
    let b = parent.path().join("b");
    write(&a.join("doc.txt"), b"1");
    write(&b.join("doc.txt"), b"2");

    let config = CollectConfig::new(vec![a, b]).with_output_folder_name("merged");
    let summary = Collector::new(config).run(&ControlChannel::new()).unwrap();

    assert_eq!(summary.output_dir, Some(parent.path().join("merged")));
    assert!(parent.path().join("merged/doc/doc.txt").is_file());
}

#[test]
fn test_plan_writes_nothing() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    write(&a.path().join("img2.png"), b"1");
    write(&b.path().join("img2.png"), b"2");

    let config = CollectConfig::new(vec![a.path().to_path_buf(), b.path().to_path_buf()])
        .with_custom_output(out.path().to_path_buf())
        .with_output_folder_name("merged");
    let plan = Collector::new(config).plan().unwrap();

    assert_eq!(plan.groups.len(), 1);
    assert_eq!(plan.groups[0].base_name, "img2");
    assert_eq!(plan.filter.kept_items, 2);
    assert!(listing(out.path()).is_empty());
}
