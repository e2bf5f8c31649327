use filecollect::collect::{CollectConfig, Collector, ControlChannel, RunOutcome};
use filecollect::scanner::{FolderPolicy, ScanConfig};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn album(root: &Path, name: &str, images: &[(&str, &[u8])]) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (file, content) in images {
        fs::write(dir.join(file), content).unwrap();
    }
}

fn image_config(roots: &[&TempDir], out: &TempDir) -> CollectConfig {
    CollectConfig::new(roots.iter().map(|r| r.path().to_path_buf()).collect())
        .with_custom_output(out.path().to_path_buf())
        .with_output_folder_name("merged")
        .with_scan_config(ScanConfig::default().with_folder_policy(FolderPolicy::ImageFolders))
}

#[test]
fn test_image_folders_copied_as_units() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    album(a.path(), "cats", &[("1.jpg", b"a1"), ("2.png", b"a2")]);
    album(b.path(), "cats", &[("1.jpg", b"b1")]);

    let summary = Collector::new(image_config(&[&a, &b], &out))
        .run(&ControlChannel::new())
        .unwrap();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.total_items, 2);
    assert_eq!(summary.folders_copied, 2);
    assert_eq!(summary.files_copied, 0);

    let group = out.path().join("merged/cats");
    assert_eq!(fs::read(group.join("cats/1.jpg")).unwrap(), b"a1");
    assert_eq!(fs::read(group.join("cats/2.png")).unwrap(), b"a2");
    assert_eq!(fs::read(group.join("cats_1/1.jpg")).unwrap(), b"b1");
    assert_eq!(summary.bytes_copied, 6);
}

#[test]
fn test_same_folder_given_twice_copied_once() {
    let a = tempdir().unwrap();
    let out = tempdir().unwrap();
    album(a.path(), "dogs", &[("1.jpg", b"x")]);

    let summary = Collector::new(image_config(&[&a, &a], &out))
        .run(&ControlChannel::new())
        .unwrap();

    assert_eq!(summary.folders_copied, 1);
    assert_eq!(summary.folders_skipped, 1);
    assert!(!out.path().join("merged/dogs/dogs_1").exists());
}

#[test]
fn test_mixed_folder_is_enumerated() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    album(a.path(), "trip", &[("1.jpg", b"img"), ("notes.txt", b"txt")]);
    fs::write(b.path().join("trip.pdf"), b"pdf").unwrap();

    let summary = Collector::new(image_config(&[&a, &b], &out))
        .run(&ControlChannel::new())
        .unwrap();

    assert_eq!(summary.folders_copied, 0);
    assert_eq!(summary.files_copied, 3);
    let group = out.path().join("merged/trip");
    assert!(group.join("trip.pdf").is_file());
    assert!(group.join("trip/1.jpg").is_file());
    assert!(group.join("trip/notes.txt").is_file());
}

#[test]
fn test_image_folder_groups_with_root_file() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let out = tempdir().unwrap();
    album(a.path(), "beach", &[("1.jpg", b"1"), ("2.jpg", b"2")]);
    fs::write(b.path().join("beach.mp4"), b"video").unwrap();

    let summary = Collector::new(image_config(&[&a, &b], &out))
        .run(&ControlChannel::new())
        .unwrap();

    assert_eq!(summary.folders_copied, 1);
    assert_eq!(summary.files_copied, 1);
    let group = out.path().join("merged/beach");
    assert!(group.join("beach.mp4").is_file());
    assert!(group.join("beach/2.jpg").is_file());
}
