use std::collections::BTreeSet;

use proptest::prelude::*;
use quadwarp_mesh_model::{BlendMesh, GridSize, MeshCollection, Rect, Vec2, WarpMesh};

fn close(a: Vec2, b: Vec2) -> bool {
    let tol = |v: f32| 1e-4 * v.abs().max(1.0);
    (a.x - b.x).abs() <= tol(a.x) && (a.y - b.y).abs() <= tol(a.y)
}

fn flags() -> impl Strategy<Value = (bool, bool, bool)> {
    (any::<bool>(), any::<bool>(), any::<bool>())
}

fn visible_by_rule<T: quadwarp_mesh_model::MeshPayload>(c: &MeshCollection<T>) -> Vec<String> {
    let any_solo = c.iter().any(|(_, e)| e.is_solo);
    c.iter()
        .filter(|(_, e)| {
            if any_solo {
                e.is_solo && !e.is_hidden
            } else {
                !e.is_hidden
            }
        })
        .map(|(n, _)| n.to_string())
        .collect()
}

proptest! {
    #[test]
    fn created_names_are_pairwise_distinct(
        bases in prop::collection::vec(prop::sample::select(vec!["x", "x0", "x1", "y", "warp"]), 0..24)
    ) {
        let mut c = MeshCollection::<WarpMesh>::new();
        let mut assigned = Vec::new();
        for base in &bases {
            let (name, _) = c.create(base, GridSize::new(1, 1), Rect::UNIT, Rect::UNIT);
            assigned.push(name);
        }
        let distinct: BTreeSet<_> = assigned.iter().collect();
        prop_assert_eq!(distinct.len(), bases.len());
        prop_assert_eq!(c.len(), bases.len());
    }

    #[test]
    fn warp_pack_unpack_round_trips(
        entries in prop::collection::vec((flags(), -500.0f32..500.0, -500.0f32..500.0), 0..6),
        sx in 0.01f32..10.0,
        sy in 0.01f32..10.0,
    ) {
        let mut c = MeshCollection::<WarpMesh>::new();
        for ((hidden, locked, solo), dx, dy) in &entries {
            let (_, entry) = c.create("m", GridSize::new(1, 1), Rect::new(0.0, 0.0, 640.0, 480.0), Rect::UNIT);
            entry.is_hidden = *hidden;
            entry.is_locked = *locked;
            entry.is_solo = *solo;
            entry.mesh.uv_quad_mut().translate(Vec2::new(*dx, *dy));
        }

        let scale = Vec2::new(sx, sy);
        let mut back = MeshCollection::<WarpMesh>::new();
        back.load_bytes(&c.to_bytes(scale), scale).unwrap();

        prop_assert_eq!(back.len(), c.len());
        for (name, entry) in c.iter() {
            let restored = back.get(name).unwrap();
            prop_assert_eq!(
                (restored.is_hidden, restored.is_locked, restored.is_solo),
                (entry.is_hidden, entry.is_locked, entry.is_solo)
            );
            for (a, b) in entry.mesh.uv_quad().iter().zip(restored.mesh.uv_quad().iter()) {
                prop_assert!(close(*a, *b), "{:?} vs {:?}", a, b);
            }
            let (ma, mb) = (entry.mesh.control_mesh(), restored.mesh.control_mesh());
            prop_assert_eq!(ma.num_cells(), mb.num_cells());
            for (a, b) in ma.points().iter().zip(mb.points()) {
                prop_assert!(close(a.position, b.position));
                prop_assert!(close(a.coord, b.coord));
            }
        }
    }

    #[test]
    fn blend_pack_unpack_round_trips(
        offsets in prop::collection::vec((-100.0f32..100.0, -100.0f32..100.0), 1..5),
        sx in 0.01f32..10.0,
        sy in 0.01f32..10.0,
    ) {
        let mut c = MeshCollection::<BlendMesh>::new();
        for (dx, dy) in &offsets {
            let (_, entry) = c.create("b", GridSize::new(1, 1), Rect::new(0.0, 0.0, 1920.0, 1080.0), Rect::UNIT);
            entry.mesh.quads[1].translate(Vec2::new(*dx, *dy));
        }
        let scale = Vec2::new(sx, sy);
        let mut back = MeshCollection::<BlendMesh>::new();
        back.load_bytes(&c.to_bytes(scale), scale).unwrap();
        for (name, entry) in c.iter() {
            let restored = back.get(name).unwrap();
            for (qa, qb) in entry.mesh.quads.iter().zip(restored.mesh.quads.iter()) {
                for (a, b) in qa.iter().zip(qb.iter()) {
                    prop_assert!(close(*a, *b));
                }
            }
        }
    }

    #[test]
    fn visible_follows_solo_rule(states in prop::collection::vec(flags(), 0..10)) {
        let mut c = MeshCollection::<BlendMesh>::new();
        for (hidden, locked, solo) in &states {
            let (_, entry) = c.create("e", GridSize::new(1, 1), Rect::UNIT, Rect::UNIT);
            entry.is_hidden = *hidden;
            entry.is_locked = *locked;
            entry.is_solo = *solo;
        }
        let visible: Vec<String> = c.visible().into_keys().collect();
        prop_assert_eq!(visible, visible_by_rule(&c));

        let editable: Vec<String> = c.editable(false).into_keys().collect();
        let expected: Vec<String> = visible_by_rule(&c)
            .into_iter()
            .filter(|n| !c.get(n).unwrap().is_locked)
            .collect();
        prop_assert_eq!(editable, expected);
    }
}

#[test]
fn visibility_over_every_flag_combination() {
    let mut c = MeshCollection::<WarpMesh>::new();
    for bits in 0u8..8 {
        let (_, entry) = c.create(&format!("e{bits}"), GridSize::new(1, 1), Rect::UNIT, Rect::UNIT);
        entry.is_hidden = bits & 1 != 0;
        entry.is_locked = bits & 2 != 0;
        entry.is_solo = bits & 4 != 0;
    }
    // Solo entries exist, so only solo and not hidden: bits 4 and 6.
    let visible: Vec<String> = c.visible().into_keys().collect();
    assert_eq!(visible, vec!["e4".to_string(), "e6".to_string()]);
    let editable: Vec<String> = c.editable(false).into_keys().collect();
    assert_eq!(editable, vec!["e4".to_string()]);

    for bits in 4u8..8 {
        c.get_mut(&format!("e{bits}")).unwrap().is_solo = false;
    }
    let visible: Vec<String> = c.visible().into_keys().collect();
    assert_eq!(visible, vec!["e0", "e2", "e4", "e6"]);
}
