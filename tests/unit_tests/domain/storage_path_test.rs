use murmur::domain::{RunId, StoragePath};

#[test]
fn given_two_runs_when_building_paths_then_paths_differ() {
    let first = StoragePath::for_run(&RunId::new(), "media");
    let second = StoragePath::for_run(&RunId::new(), "media");

    assert_ne!(first, second);
}

#[test]
fn given_run_id_when_building_path_then_is_flat_and_contains_id() {
    let run_id = RunId::new();

    let path = StoragePath::for_run(&run_id, "media");

    assert_eq!(path.as_str(), format!("{}-media", run_id));
    assert!(!path.as_str().contains('/'));
}
