use modeler_file_format::{
    load_into, load_scene, save_scene, LoadError, NodeRecord, ProjectMetadata, FORMAT_VERSION,
};
use modeler_kernel::geometry::point::Point3d;
use modeler_kernel::geometry::vector::Vec3;
use modeler_kernel::shapes::{
    Editable, ExtrudedPolygon, GroupShape, LineShape, PlaneShape, Primitive, PrimitiveKind,
    ShapeKind,
};
use modeler_kernel::store::ShapeStore;
use modeler_kernel::GeometryError;

// ── Helper Functions ─────────────────────────────────────────────────────

fn square() -> PlaneShape {
    PlaneShape::new([
        Point3d::new(0.0, 0.0, 0.0),
        Point3d::new(1.0, 0.0, 0.0),
        Point3d::new(0.0, 1.0, 0.0),
        Point3d::new(1.0, 1.0, 0.0),
    ])
}

fn make_store() -> ShapeStore {
    let mut store = ShapeStore::new();
    store.insert(Primitive::new(PrimitiveKind::Point, Point3d::new(1.0, 2.0, 3.0)));
    store.insert(Primitive::new(PrimitiveKind::Sphere, Point3d::new(0.0, 0.0, -5.0)));
    store.insert(LineShape::new(Point3d::ORIGIN, Point3d::new(2.0, 0.0, 0.0)));
    let plane = store.insert(square());
    store.translate_shape(plane, Vec3::new(0.0, 0.0, 1.0)).unwrap();
    store.insert(ExtrudedPolygon::from_plane(&square(), 1.0).unwrap());
    store
}

fn metadata() -> ProjectMetadata {
    ProjectMetadata::new("Test Scene")
}

fn parse(json: &str) -> serde_json::Value {
    serde_json::from_str(json).unwrap()
}

// ── Save ─────────────────────────────────────────────────────────────────

#[test]
fn save_includes_format_and_version() {
    let json = save_scene(&make_store(), &metadata()).unwrap();
    let value = parse(&json);
    assert_eq!(value["format"], "modeler-scene");
    assert_eq!(value["version"], FORMAT_VERSION);
    assert_eq!(value["project"]["name"], "Test Scene");
}

#[test]
fn save_writes_one_node_per_shape_without_control_points() {
    let json = save_scene(&make_store(), &metadata()).unwrap();
    let value = parse(&json);
    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    let types: Vec<&str> = nodes.iter().map(|n| n["type"].as_str().unwrap()).collect();
    assert_eq!(types, ["Point", "Sphere", "Line", "Plane", "ExtrudedPolygon"]);
}

#[test]
fn save_writes_world_corners() {
    let json = save_scene(&make_store(), &metadata()).unwrap();
    let value = parse(&json);
    let plane = &value["nodes"][3];
    assert_eq!(plane["corners"].as_array().unwrap().len(), 4);
    assert_eq!(plane["corners"][3][2], 1.0);
    assert_eq!(value["nodes"][4]["corners"].as_array().unwrap().len(), 8);
}

#[test]
fn save_empty_store() {
    let json = save_scene(&ShapeStore::new(), &metadata()).unwrap();
    assert!(parse(&json)["nodes"].as_array().unwrap().is_empty());
}

// ── Load ─────────────────────────────────────────────────────────────────

#[test]
fn load_round_trip() {
    let original = make_store();
    let meta = metadata();
    let json = save_scene(&original, &meta).unwrap();

    let mut restored = ShapeStore::new();
    let loaded_meta = load_into(&json, &mut restored).unwrap();
    assert_eq!(loaded_meta, meta);
    assert_eq!(restored.len(), original.len());

    let before: Vec<_> = original.shapes().map(|(_, s)| (s.kind(), s.world_corners())).collect();
    let after: Vec<_> = restored.shapes().map(|(_, s)| (s.kind(), s.world_corners())).collect();
    assert_eq!(before, after);
}

#[test]
fn load_restores_groups_and_colors() {
    let mut store = ShapeStore::new();
    let group = GroupShape::new(vec![
        Primitive::new(PrimitiveKind::Cube, Point3d::ORIGIN).into(),
        LineShape::new(Point3d::new(2.0, 0.0, 0.0), Point3d::new(3.0, 0.0, 0.0)).into(),
    ])
    .unwrap();
    let id = store.insert(group);
    store.set_color_index(id, 3).unwrap();
    store.translate_shape(id, Vec3::new(0.0, 0.0, 4.0)).unwrap();

    let json = save_scene(&store, &metadata()).unwrap();
    let value = parse(&json);
    assert_eq!(value["nodes"][0]["type"], "Group");
    assert_eq!(value["nodes"][0]["color_index"], 3);
    assert_eq!(value["nodes"][0]["children"][1]["type"], "Line");

    let mut restored = ShapeStore::new();
    load_into(&json, &mut restored).unwrap();
    let (_, shape) = restored.shapes().next().unwrap();
    assert_eq!(shape.kind(), ShapeKind::Group);
    assert_eq!(shape.color_index(), 3);
    assert_eq!(shape, store.shape(id).unwrap());
    assert!(restored.control_points_of(restored.ids_of_kind(ShapeKind::Group)[0]).is_empty());
}

#[test]
fn load_rebuilds_control_points_and_faces() {
    let json = save_scene(&make_store(), &metadata()).unwrap();
    let mut store = ShapeStore::new();
    load_into(&json, &mut store).unwrap();

    let solid = store.ids_of_kind(ShapeKind::ExtrudedPolygon)[0];
    assert_eq!(store.control_points_of(solid).len(), 8);
    let modeler_kernel::shapes::Shape::Extruded(polygon) = store.shape(solid).unwrap() else {
        panic!("expected an extruded polygon");
    };
    assert_eq!(polygon.faces().len(), 6);

    let plane = store.ids_of_kind(ShapeKind::Plane)[0];
    assert!(store.shape(plane).unwrap().placement().is_baked());
    assert_eq!(store.control_points().count(), 2 + 4 + 8);
}

#[test]
fn load_rejects_unknown_format() {
    let json = r#"{"format":"other","version":1,"project":{"name":"x","created":"2024-01-01T00:00:00Z","modified":"2024-01-01T00:00:00Z"},"nodes":[]}"#;
    assert!(matches!(load_scene(json), Err(LoadError::UnknownFormat(f)) if f == "other"));
}

#[test]
fn load_rejects_future_version() {
    let json = r#"{"format":"modeler-scene","version":99,"project":{"name":"x","created":"2024-01-01T00:00:00Z","modified":"2024-01-01T00:00:00Z"},"nodes":[]}"#;
    assert!(matches!(
        load_scene(json),
        Err(LoadError::FutureVersion {
            file_version: 99,
            supported_version: 1
        })
    ));
}

#[test]
fn load_rejects_old_version_without_migration() {
    let json = r#"{"format":"modeler-scene","version":0,"project":{"name":"x","created":"2024-01-01T00:00:00Z","modified":"2024-01-01T00:00:00Z"},"nodes":[]}"#;
    assert!(matches!(load_scene(json), Err(LoadError::MigrationFailed { .. })));
}

#[test]
fn load_rejects_invalid_json() {
    assert!(matches!(load_scene("{ not json"), Err(LoadError::ParseError(_))));
}

#[test]
fn load_rejects_unknown_node_type() {
    let json = r#"{"format":"modeler-scene","version":1,"project":{"name":"x","created":"2024-01-01T00:00:00Z","modified":"2024-01-01T00:00:00Z"},"nodes":[{"type":"SnowFigure"}]}"#;
    assert!(matches!(load_scene(json), Err(LoadError::ParseError(_))));
}

#[test]
fn load_into_is_all_or_nothing() {
    let json = r#"{"format":"modeler-scene","version":1,"project":{"name":"x","created":"2024-01-01T00:00:00Z","modified":"2024-01-01T00:00:00Z"},"nodes":[
        {"type":"Point","position":[0,0,0]},
        {"type":"Plane","corners":[[0,0,0],[1,0,0],[0,1,0]]}
    ]}"#;
    let mut store = ShapeStore::new();
    let err = load_into(json, &mut store).unwrap_err();
    assert!(matches!(
        err,
        LoadError::InvalidShape {
            index: 1,
            source: GeometryError::MissingState {
                expected: 4,
                found: 3
            }
        }
    ));
    assert!(store.is_empty());
}

#[test]
fn node_records_parse_by_tag() {
    let record: NodeRecord =
        serde_json::from_str(r#"{"type":"Line","corners":[[0,0,0],[1,1,1]]}"#).unwrap();
    let shape = record.to_shape().unwrap();
    assert_eq!(shape.kind(), ShapeKind::Line);
    assert_eq!(shape.world_corners()[1], Point3d::new(1.0, 1.0, 1.0));
}
