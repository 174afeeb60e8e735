use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = EditorConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, EditorConfig::default());
    assert_eq!(cfg.canvas, Canvas::default());
    assert_eq!(cfg.frame_info().unwrap().id, "milad-16");
    assert_eq!(cfg.notice_ttl(), Duration::from_secs(5));
    assert_eq!(cfg.upload.max_bytes, 10 * 1024 * 1024);
}

#[test]
fn picks_frame_by_id() {
    let json = r#"{
        "frame_id": "b",
        "catalog": [
            {"id": "a", "display_name": "A", "category": "Event", "source": "a.png"},
            {"id": "b", "display_name": "B", "category": "Health", "source": "b.svg"}
        ]
    }"#;
    let cfg = EditorConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.frame_info().unwrap().source, "b.svg");
}

#[test]
fn rejects_unknown_frame_and_bad_canvas() {
    assert!(EditorConfig::from_reader(r#"{"frame_id": "nope"}"#.as_bytes()).is_err());
    assert!(
        EditorConfig::from_reader(r#"{"canvas": {"width": 0, "height": 10}}"#.as_bytes()).is_err()
    );
    assert!(EditorConfig::from_reader(r#"{"catalog": []}"#.as_bytes()).is_err());
    assert!(EditorConfig::from_reader(r#"{"bogus": 1}"#.as_bytes()).is_err());
}

#[test]
fn partial_upload_section_keeps_defaults() {
    let cfg = EditorConfig::from_reader(r#"{"upload": {"max_bytes": 1024}}"#.as_bytes()).unwrap();
    assert_eq!(cfg.upload.max_bytes, 1024);
    assert_eq!(cfg.upload.allowed_types.len(), 4);
}

#[test]
fn from_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("editor.json");
    std::fs::write(&p, r#"{"canvas": {"width": 400, "height": 500}}"#).unwrap();
    let cfg = EditorConfig::from_path(&p).unwrap();
    assert_eq!(cfg.canvas, Canvas::new(400, 500).unwrap());
    assert!(EditorConfig::from_path(dir.path().join("missing.json")).is_err());
}
