use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "framebake_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn write_then_read_round_trips_through_disk() {
    let root = temp_dir("dir_storage_rw");
    let storage = DirStorage::new(&root);
    {
        let mut out = storage.create_output_stream("nested/data.txt").unwrap();
        out.write_all(b"baked").unwrap();
        out.flush().unwrap();
    }
    assert!(storage.exists("nested/data.txt"));

    let mut s = String::new();
    storage
        .create_input_stream("nested/data.txt")
        .unwrap()
        .read_to_string(&mut s)
        .unwrap();
    assert_eq!(s, "baked");

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_file_is_asset_not_found() {
    let storage = DirStorage::new(temp_dir("dir_storage_missing"));
    assert!(!storage.exists("absent.json"));
    let err = storage.create_input_stream("absent.json").err().unwrap();
    assert!(matches!(err, BakeError::AssetNotFound(_)));
}

#[test]
fn escaping_the_root_is_rejected() {
    let storage = DirStorage::new(temp_dir("dir_storage_escape"));
    assert!(matches!(
        storage.create_input_stream("../etc/passwd").err().unwrap(),
        BakeError::Validation(_)
    ));
    assert!(!storage.exists("/abs/path"));
}

#[test]
fn drive_prefixed_paths_are_rejected() {
    let storage = DirStorage::new(temp_dir("dir_storage_drive"));
    for path in ["C:/x.json", "c:x.json", "C:\\x.json"] {
        assert!(
            matches!(storage.resolve(path), Err(BakeError::Validation(_))),
            "{path}"
        );
    }
    assert!(storage.resolve("assets/./bird.json").is_ok());
}
