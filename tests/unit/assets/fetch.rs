use super::*;
use crate::foundation::error::ErrorKind;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("badgeforge_unit")
        .join(format!("{name}_{}", uuid::Uuid::new_v4().simple()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn fetch_relative_and_absolute() {
    let dir = scratch_dir("fetch");
    std::fs::write(dir.join("a.bin"), b"abc").unwrap();

    let fetcher = FsSourceFetcher::new(&dir);
    assert_eq!(fetcher.fetch("a.bin").unwrap(), b"abc");

    let abs = dir.join("a.bin");
    let other = FsSourceFetcher::new("/nonexistent-root");
    assert_eq!(other.fetch(abs.to_str().unwrap()).unwrap(), b"abc");
}

#[test]
fn missing_file_names_the_path() {
    let dir = scratch_dir("fetch_missing");
    let err = FsSourceFetcher::new(&dir).fetch("nope.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);
    assert!(format!("{err:#}").contains("nope.png"));
}

#[test]
fn empty_locator_is_rejected() {
    let err = FsSourceFetcher::new(".").fetch("  ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
