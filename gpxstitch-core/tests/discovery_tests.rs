// gpxstitch-core/tests/discovery_tests.rs

use gpxstitch_core::error::CoreError;
use gpxstitch_core::find_clips;
use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn create_clip(dir: &Path, name: &str, age_secs: u64) {
    let file = File::create(dir.join(name)).expect("Failed to create clip");
    file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
        .expect("Failed to set mtime");
}

#[test]
fn test_find_clips_orders_by_recording_time() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    create_clip(dir.path(), "GOPR0003.MP4", 10);
    create_clip(dir.path(), "GOPR0001.MP4", 300);
    create_clip(dir.path(), "gp010001.mp4", 200);
    create_clip(dir.path(), "._GOPR0001.MP4", 400);
    create_clip(dir.path(), "GOPR0001.THM", 400);
    std::fs::create_dir(dir.path().join("nested.mp4"))?;

    let clips = find_clips(dir.path())?;
    let names: Vec<&str> = clips.iter().map(|c| c.file_name.as_str()).collect();
    assert_eq!(names, vec!["GOPR0001.MP4", "gp010001.mp4", "GOPR0003.MP4"]);
    assert_eq!(clips[0].stem(), "GOPR0001");
    Ok(())
}

#[test]
fn test_identical_timestamps_fall_back_to_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let when = SystemTime::now() - Duration::from_secs(60);
    for name in ["b.mp4", "a.mp4"] {
        File::create(dir.path().join(name))?.set_modified(when)?;
    }

    let names: Vec<String> = find_clips(dir.path())?
        .into_iter()
        .map(|c| c.file_name)
        .collect();
    assert_eq!(names, vec!["a.mp4", "b.mp4"]);
    Ok(())
}

#[test]
fn test_empty_directory_has_no_clips() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("notes.txt")).unwrap();
    assert!(matches!(find_clips(dir.path()), Err(CoreError::NoClipsFound)));
}

#[test]
fn test_missing_directory_is_fatal() {
    let dir = tempdir().unwrap();
    let result = find_clips(&dir.path().join("absent"));
    assert!(matches!(result, Err(CoreError::DirectoryRead { .. })));
}
