use quadwarp_mesh_model::blend::{FRAME, INNER, OUTER};
use quadwarp_mesh_model::quad::{BOTTOM_LEFT, BOTTOM_RIGHT, TOP_LEFT, TOP_RIGHT};
use quadwarp_mesh_model::{
    BlendMeshes, BlendQuadEditor, EditMode, GridSize, MeshData, PackScale, PointIndex, Rect, Vec2,
    WarpMeshes,
};

#[test]
fn new_warp_entry_is_presplit_with_center_selected() {
    let mut warps = WarpMeshes::new();
    let (name, entry) = warps.create(
        "warp",
        GridSize::new(1, 1),
        Rect::new(0.0, 0.0, 100.0, 100.0),
        Rect::UNIT,
    );
    assert_eq!(name, "warp");
    let mesh = entry.mesh.control_mesh();
    assert_eq!(mesh.num_cells(), GridSize::new(2, 2));
    assert_eq!(mesh.point(1, 1).unwrap().position, Vec2::new(50.0, 50.0));
    assert!(entry.mesh.interpolator().is_selected(1, 1));
    assert_eq!(entry.mesh.interpolator().selected().count(), 1);
}

#[test]
fn solo_entry_hides_the_others() {
    let mut warps = WarpMeshes::new();
    warps.create("A", GridSize::new(1, 1), Rect::UNIT, Rect::UNIT);
    let (_, b) = warps.create("B", GridSize::new(1, 1), Rect::UNIT, Rect::UNIT);
    b.is_solo = true;
    let visible: Vec<String> = warps.visible().into_keys().collect();
    assert_eq!(visible, vec!["B".to_string()]);
}

#[test]
fn copies_do_not_alias_their_source() {
    let mut blends = BlendMeshes::new();
    blends.create(
        "A",
        GridSize::new(1, 1),
        Rect::new(0.0, 0.0, 100.0, 100.0),
        Rect::UNIT,
    );
    let source = blends.get("A").unwrap().clone();
    let (name, copy) = blends.create_copy("warp_copy", &source);
    assert_eq!(name, "warp_copy");
    copy.mesh.quads[FRAME].translate(Vec2::new(25.0, 25.0));

    assert_eq!(blends.get("A").unwrap().mesh, source.mesh);
    assert_ne!(blends.get("warp_copy").unwrap().mesh, source.mesh);
    assert_ne!(
        blends.get("A").unwrap().id(),
        blends.get("warp_copy").unwrap().id()
    );

    let mut warps = WarpMeshes::new();
    warps.create("w", GridSize::new(1, 1), Rect::new(0.0, 0.0, 10.0, 10.0), Rect::UNIT);
    let id = warps.get("w").unwrap().id();
    let (copy_name, copy) = warps.duplicate("w", id).unwrap();
    assert_eq!(copy_name, "w0");
    copy.mesh.drag_point(1, 1, Vec2::new(3.0, 3.0));
    assert_eq!(
        warps.get("w").unwrap().mesh.control_mesh().point(1, 1).unwrap().position,
        Vec2::new(5.0, 5.0)
    );
}

#[test]
fn frame_edits_stay_rectangular_through_a_drag_session() {
    let mut blends = BlendMeshes::new();
    blends.create(
        "b",
        GridSize::new(1, 1),
        Rect::new(0.0, 0.0, 200.0, 100.0),
        Rect::UNIT,
    );
    let id = blends.get("b").unwrap().id();
    let before = blends.get("b").unwrap().mesh.clone();

    let mut editor = BlendQuadEditor::new();
    editor.set_mode(EditMode::Frame);
    let entry = blends.get_by_id_mut(id).unwrap();
    for (corner, delta) in [
        (TOP_LEFT, Vec2::new(5.0, -3.0)),
        (BOTTOM_RIGHT, Vec2::new(-10.0, 7.0)),
        (TOP_RIGHT, Vec2::new(2.0, 2.0)),
    ] {
        editor.move_point(&mut entry.mesh, PointIndex::new(FRAME, corner), delta);
        assert!(entry.mesh.quads.frame().is_axis_aligned());
    }
    let frame = entry.mesh.quads.frame();
    assert_eq!(frame[BOTTOM_LEFT], Vec2::new(5.0, 107.0));
    assert_eq!(frame[TOP_RIGHT], Vec2::new(192.0, -1.0));
    assert_eq!(entry.mesh.quads[OUTER], before.quads[OUTER]);
    assert_eq!(entry.mesh.quads[INNER], before.quads[INNER]);

    // Vertex mode leaves the frame alone under whole-mesh moves.
    editor.set_mode(EditMode::Vertex);
    let frame_before = *entry.mesh.quads.frame();
    editor.move_mesh(&mut entry.mesh, Vec2::new(1.0, 1.0));
    assert_eq!(*entry.mesh.quads.frame(), frame_before);
}

#[test]
fn picking_walks_entries_and_keeps_the_nearest() {
    let mut blends = BlendMeshes::new();
    blends.create("wide", GridSize::new(1, 1), Rect::new(0.0, 0.0, 400.0, 400.0), Rect::UNIT);
    blends.create("small", GridSize::new(1, 1), Rect::new(90.0, 90.0, 20.0, 20.0), Rect::UNIT);
    let small = blends.get("small").unwrap().id();
    let editor = BlendQuadEditor::new();

    let mut min = f32::INFINITY;
    for id in blends.editable(false).into_values() {
        editor.get_if_inside(blends.get_by_id(id).unwrap(), Vec2::new(100.0, 100.0), &mut min);
    }
    assert_eq!(min, 0.0);
    assert_eq!(editor.pick_mesh(&blends, Vec2::new(100.0, 100.0)), Some(small));
}

#[test]
fn undo_snapshot_restores_geometry() {
    let mut blends = BlendMeshes::new();
    blends.create("b", GridSize::new(1, 1), Rect::new(0.0, 0.0, 100.0, 100.0), Rect::UNIT);
    let snapshot = blends.snapshot();
    let original = blends.get("b").unwrap().mesh.clone();

    let editor = BlendQuadEditor::new();
    editor.move_mesh(&mut blends.get_mut("b").unwrap().mesh, Vec2::new(9.0, 9.0));
    blends.remove("b");
    blends.create("other", GridSize::new(1, 1), Rect::UNIT, Rect::UNIT);

    blends.restore(&snapshot).unwrap();
    assert_eq!(blends.names().collect::<Vec<_>>(), vec!["b"]);
    assert_eq!(blends.get("b").unwrap().mesh, original);
}

#[test]
fn data_file_round_trip_keeps_flags_and_selection() {
    let mut data = MeshData::new();
    let (_, warp) = data.warp.create(
        "warp",
        GridSize::new(2, 1),
        Rect::new(0.0, 0.0, 1024.0, 512.0),
        Rect::UNIT,
    );
    warp.is_hidden = true;
    warp.mesh.interpolator_mut().select_point(2, 0);
    let (_, blend) = data.blend.create(
        "blend",
        GridSize::new(1, 1),
        Rect::new(0.0, 0.0, 1024.0, 512.0),
        Rect::UNIT,
    );
    blend.is_solo = true;

    let scale = PackScale::normalizing([1024, 512], [1024, 512]);
    let back = MeshData::decode(&data.encode(scale), scale).unwrap();

    let warp = back.warp.get("warp").unwrap();
    assert!(warp.is_hidden);
    assert!(warp.mesh.interpolator().is_selected(2, 0));
    assert_eq!(
        warp.mesh.uv_quad().bounds(),
        Rect::new(0.0, 0.0, 1024.0, 512.0)
    );
    assert!(back.blend.get("blend").unwrap().is_solo);
    assert_eq!(back.blend.get("blend").unwrap().mesh, data.blend.get("blend").unwrap().mesh);
}
