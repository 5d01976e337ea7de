#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::ContainerKind;
use crate::geom::Point;

fn item(filename: &str, data: &[u8], x: f64) -> ImageItem {
    let mut item = ImageItem::new(filename, data.to_vec(), Point::new(x, 0.0), Size::new(50.0, 40.0), Size::new(500.0, 400.0));
    item.z_index = 1;
    item
}

fn manifest() -> Manifest {
    Manifest::new(Size::new(10_000.0, 10_000.0), Viewport { x: -20.0, y: 5.0, zoom: 1.5 }).unwrap()
}

fn tar_entries(archive: &[u8]) -> Vec<crate::archive::TarEntry> {
    extract(&gunzip(archive).unwrap()).unwrap()
}

// =============================================================
// Manifest
// =============================================================

#[test]
fn new_manifest_is_stamped() {
    let m = manifest();
    assert_eq!(m.version, "1.0.0");
    assert_eq!(m.metadata.version, "1.0.0");
    assert_eq!(m.metadata.created, m.metadata.modified);
    assert!(OffsetDateTime::parse(&m.metadata.created, &Rfc3339).is_ok());
}

#[test]
fn manifest_json_shape() {
    let mut m = manifest();
    m.images.push(item("a.png", b"PNGDATA", 0.0));
    let json: serde_json::Value = serde_json::to_value(&m).unwrap();
    assert_eq!(json["canvas"]["width"], 10_000.0);
    assert_eq!(json["canvas"]["viewport"]["zoom"], 1.5);
    let image = &json["images"][0];
    assert_eq!(image["filename"], "a.png");
    assert_eq!(image["originalSize"]["width"], 500.0);
    assert_eq!(image["zIndex"], 1);
    assert!(image.get("data").is_none());
    assert!(image.get("groupId").is_none());
}

#[test]
fn manifest_without_containers_parses() {
    let json = r#"{
        "version": "1.0.0",
        "metadata": {"version": "1.0.0", "created": "2024-01-01T00:00:00Z", "modified": "2024-01-01T00:00:00Z"},
        "canvas": {"width": 10000, "height": 10000, "viewport": {"x": 0, "y": 0, "zoom": 1}},
        "images": []
    }"#;
    let m: Manifest = serde_json::from_str(json).unwrap();
    assert!(m.groups.is_empty());
    assert!(m.artboards.is_empty());
}

// =============================================================
// Save
// =============================================================

#[test]
fn save_writes_manifest_then_blobs() {
    let mut m = manifest();
    m.images.push(item("a.png", b"AAA", 0.0));
    m.images.push(item("b.jpg", b"BBBB", 100.0));
    let entries = tar_entries(&save_project(&m).unwrap());
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["project.json", "images/a.png", "images/b.jpg"]);
    assert_eq!(entries[2].data, b"BBBB");
    let text = std::str::from_utf8(&entries[0].data).unwrap();
    assert!(text.contains("\n  \"version\""), "pretty printed with two-space indent");
}

#[test]
fn shared_filenames_write_one_blob() {
    let mut m = manifest();
    m.images.push(item("same.png", b"one", 0.0));
    m.images.push(item("same.png", b"one", 60.0));
    m.images.push(item("blank.png", b"", 120.0));
    let entries = tar_entries(&save_project(&m).unwrap());
    assert_eq!(entries.len(), 2);
}

// =============================================================
// Load
// =============================================================

#[test]
fn round_trip_restores_items_and_payloads() {
    let mut m = manifest();
    let mut a = item("a.png", b"AAA", 0.0);
    let group = Container {
        id: uuid::Uuid::new_v4(),
        kind: ContainerKind::Group,
        name: "Group 1".into(),
        position: Point::new(-20.0, -20.0),
        size: Size::new(200.0, 100.0),
        children: vec![a.id],
        z_index: 1,
        expanded: true,
        background_color: "rgba(240, 240, 240, 0.5)".into(),
        border_color: "#d0d0d0".into(),
        text_color: None,
    };
    a.group_id = Some(group.id);
    a.title = Some("Hero".into());
    m.images.push(a);
    m.images.push(item("b.webp", b"BB", 100.0));
    m.groups.push(group);

    let loaded = load_project(&save_project(&m).unwrap()).unwrap();
    assert!(loaded.missing.is_empty());
    assert_eq!(loaded.manifest, m);
}

#[test]
fn missing_blob_leaves_payload_empty() {
    let mut m = manifest();
    m.images.push(item("present.png", b"P", 0.0));
    m.images.push(item("absent.png", b"", 100.0));
    let loaded = load_project(&save_project(&m).unwrap()).unwrap();
    assert_eq!(loaded.manifest.images[0].data, b"P");
    assert!(loaded.manifest.images[1].data.is_empty());
    assert_eq!(loaded.missing, ["absent.png"]);
}

#[test]
fn archive_without_manifest_is_distinct_error() {
    let mut builder = TarBuilder::with_mtime(0);
    builder.add_file("images/a.png", b"A".to_vec()).unwrap();
    let archive = gzip(&builder.build()).unwrap();
    assert!(matches!(load_project(&archive).unwrap_err(), ArchiveError::MissingManifest));
}

#[test]
fn malformed_manifest_is_reported() {
    let mut builder = TarBuilder::with_mtime(0);
    builder.add_file("project.json", b"{not json".to_vec()).unwrap();
    let archive = gzip(&builder.build()).unwrap();
    assert!(matches!(load_project(&archive).unwrap_err(), ArchiveError::Manifest(_)));
}

#[test]
fn string_ids_from_older_archives_load_linked() {
    let json = r##"{
        "version": "1.0.0",
        "metadata": {"version": "1.0.0", "created": "2024-01-01T00:00:00Z", "modified": "2024-01-01T00:00:00Z"},
        "canvas": {"width": 10000, "height": 10000, "viewport": {"x": 0, "y": 0, "zoom": 1}},
        "images": [{
            "id": "0b7e2f8e-3c1a-4d2b-9f5e-6a7b8c9d0e1f",
            "filename": "a.png",
            "position": {"x": 10, "y": 10},
            "size": {"width": 50, "height": 40},
            "originalSize": {"width": 500, "height": 400},
            "zIndex": 1,
            "groupId": "group-1700000000001-zzz999yyy",
            "artboardId": "artboard-1700000000000-abc123def"
        }],
        "groups": [{
            "id": "group-1700000000001-zzz999yyy",
            "kind": "group",
            "name": "Group 1",
            "position": {"x": 0, "y": 0},
            "size": {"width": 100, "height": 100},
            "children": ["0b7e2f8e-3c1a-4d2b-9f5e-6a7b8c9d0e1f"],
            "zIndex": 1,
            "backgroundColor": "rgba(240, 240, 240, 0.5)",
            "borderColor": "#d0d0d0"
        }],
        "artboards": [{
            "id": "artboard-1700000000000-abc123def",
            "kind": "artboard",
            "name": "Artboard 1",
            "position": {"x": 0, "y": 0},
            "size": {"width": 200, "height": 200},
            "children": ["0b7e2f8e-3c1a-4d2b-9f5e-6a7b8c9d0e1f"],
            "zIndex": 1,
            "backgroundColor": "rgba(255, 255, 255, 0.95)",
            "borderColor": "#e0e0e0"
        }]
    }"##;
    let mut builder = TarBuilder::with_mtime(0);
    builder.add_file("project.json", json.as_bytes().to_vec()).unwrap();
    builder.add_file("images/a.png", b"A".to_vec()).unwrap();
    let loaded = load_project(&gzip(&builder.build()).unwrap()).unwrap();

    let m = &loaded.manifest;
    let image = &m.images[0];
    assert_eq!(image.id, uuid::Uuid::parse_str("0b7e2f8e-3c1a-4d2b-9f5e-6a7b8c9d0e1f").unwrap());
    assert_eq!(image.artboard_id, Some(m.artboards[0].id));
    assert_eq!(image.group_id, Some(m.groups[0].id));
    assert_eq!(m.artboards[0].id, crate::doc::id_from_str("artboard-1700000000000-abc123def"));
    assert_ne!(m.groups[0].id, m.artboards[0].id);
    assert_eq!(m.artboards[0].children, [image.id]);
    assert_eq!(image.data, b"A");
}

#[test]
fn non_gzip_input_fails() {
    assert!(matches!(load_project(b"plain").unwrap_err(), ArchiveError::Io(_)));
}

// =============================================================
// MIME
// =============================================================

#[test]
fn mime_types_by_extension() {
    assert_eq!(mime_type("a.jpg"), "image/jpeg");
    assert_eq!(mime_type("a.JPEG"), "image/jpeg");
    assert_eq!(mime_type("a.png"), "image/png");
    assert_eq!(mime_type("a.gif"), "image/gif");
    assert_eq!(mime_type("a.webp"), "image/webp");
    assert_eq!(mime_type("logo.svg"), "image/svg+xml");
    assert_eq!(mime_type("notes.txt"), "application/octet-stream");
    assert_eq!(mime_type("noext"), "application/octet-stream");
}
