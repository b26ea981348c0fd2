use podscribe::domain::EpisodeId;
use podscribe::infrastructure::storage::ScratchDir;

#[test]
fn given_root_when_creating_then_directory_exists_under_root_with_prefix() {
    let root = tempfile::tempdir().unwrap();

    let scratch = ScratchDir::create(Some(root.path()), EpisodeId::new()).unwrap();

    assert!(scratch.path().exists());
    assert!(scratch.path().starts_with(root.path()));
    let name = scratch.path().file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("podscribe-"));
    scratch.cleanup();
}

#[test]
fn given_files_inside_when_cleaning_up_then_directory_is_removed_recursively() {
    let root = tempfile::tempdir().unwrap();
    let scratch = ScratchDir::create(Some(root.path()), EpisodeId::new()).unwrap();
    let path = scratch.path().to_path_buf();
    std::fs::write(path.join("00000.wav"), b"chunk").unwrap();
    std::fs::write(path.join("00001.wav"), b"chunk").unwrap();

    scratch.cleanup();

    assert!(!path.exists());
}

#[test]
fn given_scratch_dropped_without_cleanup_then_directory_is_still_removed() {
    let root = tempfile::tempdir().unwrap();
    let path;
    {
        let scratch = ScratchDir::create(Some(root.path()), EpisodeId::new()).unwrap();
        path = scratch.path().to_path_buf();
        std::fs::write(path.join("00000.wav"), b"chunk").unwrap();
    }

    assert!(!path.exists());
}

#[test]
fn given_two_runs_when_creating_then_each_gets_its_own_directory() {
    let root = tempfile::tempdir().unwrap();

    let first = ScratchDir::create(Some(root.path()), EpisodeId::new()).unwrap();
    let second = ScratchDir::create(Some(root.path()), EpisodeId::new()).unwrap();

    assert_ne!(first.path(), second.path());
    first.cleanup();
    second.cleanup();
}
