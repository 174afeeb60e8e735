use super::*;

fn artifact() -> ExportArtifact {
    ExportArtifact {
        file_name: "twibbon-x-1.png".to_string(),
        bytes: vec![1, 2, 3],
        width: 1,
        height: 1,
    }
}

#[test]
fn dir_sink_creates_directory_and_writes() {
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = DirSink::new(tmp.path().join("out/nested"));
    let where_ = sink.save(&artifact()).unwrap();
    assert!(where_.ends_with("twibbon-x-1.png"));
    assert_eq!(
        std::fs::read(tmp.path().join("out/nested/twibbon-x-1.png")).unwrap(),
        vec![1, 2, 3]
    );
}

#[test]
fn dir_sink_failure_is_export_failed() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();
    let mut sink = DirSink::new(&blocker);
    assert!(matches!(
        sink.save(&artifact()),
        Err(TwibbonError::ExportFailed(_))
    ));
}

#[test]
fn in_memory_sink_keeps_order() {
    let mut sink = InMemorySink::new();
    sink.save(&artifact()).unwrap();
    let mut second = artifact();
    second.file_name = "b.png".to_string();
    sink.save(&second).unwrap();
    let names: Vec<&str> = sink
        .artifacts()
        .iter()
        .map(|a| a.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["twibbon-x-1.png", "b.png"]);
}
