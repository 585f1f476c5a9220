use blockforge_blocks::{
    Atlas, AtlasBlock, FALLBACK_BLOCK, FaceData, SkippedVoxel, map_voxels_to_blocks,
    map_voxels_with_report,
};
use blockforge_geom::Vec3;
use blockforge_voxel::{Face, FaceMask, Rgba, SolidGrid, VoxelMesh, compute_face_visibility};
use proptest::prelude::*;

fn uniform_block(name: &str, colour: Rgba) -> AtlasBlock {
    AtlasBlock {
        name: name.into(),
        colour,
        faces: Face::ALL
            .iter()
            .map(|&f| (f, FaceData { colour, std: 0.0 }))
            .collect(),
    }
}

/// Block whose top differs from its sides.
fn two_tone(name: &str, top: Rgba, side: Rgba) -> AtlasBlock {
    let mut b = uniform_block(name, side);
    b.faces.insert(Face::Up, FaceData { colour: top, std: 0.0 });
    b
}

#[test]
fn single_white_voxel_picks_the_white_block() {
    let mut atlas = Atlas::new();
    atlas.insert(uniform_block("minecraft:white_concrete", Rgba::WHITE));
    let mut voxels = VoxelMesh::new();
    voxels.add_voxel(0, 0, 0, Rgba::WHITE);
    let vis = compute_face_visibility(&SolidGrid::new(1, 1, 1, true));
    assert_eq!(vis.get(0, 0, 0), Some(FaceMask::ALL));

    let blocks = map_voxels_to_blocks(&voxels, &vis, &atlas);
    assert_eq!(blocks.len(), 1);
    let b = &blocks.blocks()[0];
    assert_eq!(b.name, "minecraft:white_concrete");
    assert_eq!(b.position, Vec3::ZERO);
    assert_eq!(b.colour, Rgba::WHITE);
    assert_eq!(blocks.palette(), vec!["minecraft:white_concrete".to_string()]);
}

#[test]
fn exposure_changes_the_choice() {
    let mut atlas = Atlas::new();
    atlas.insert(two_tone("grass", Rgba::rgb(0, 200, 0), Rgba::rgb(120, 80, 40)));
    atlas.insert(uniform_block("moss", Rgba::rgb(40, 140, 40)));

    // 3x2x3 slab: the top-centre voxel only shows Up, the bottom-centre only Down.
    let vis = compute_face_visibility(&SolidGrid::new(3, 2, 3, true));
    assert_eq!(vis.get(1, 1, 1), Some(FaceMask::UP));
    assert_eq!(vis.get(1, 0, 1), Some(FaceMask::DOWN));
    let mut voxels = VoxelMesh::new();
    voxels.add_voxel(1, 1, 1, Rgba::rgb(0, 200, 0));
    voxels.add_voxel(1, 0, 1, Rgba::rgb(0, 200, 0));
    let blocks = map_voxels_to_blocks(&voxels, &vis, &atlas);
    let names: Vec<&str> = blocks.blocks().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["grass", "moss"]);
}

#[test]
fn out_of_grid_voxels_are_reported_and_skipped() {
    let mut atlas = Atlas::new();
    atlas.insert(uniform_block("stone", Rgba::rgb(128, 128, 128)));
    let vis = compute_face_visibility(&SolidGrid::new(2, 2, 2, true));
    let mut voxels = VoxelMesh::new();
    voxels.add_voxel(0, 0, 0, Rgba::BLACK);
    voxels.add_voxel(5, 0, 0, Rgba::BLACK);
    voxels.add_voxel(-1, 1, 1, Rgba::BLACK);
    voxels.add_voxel(1, 1, 1, Rgba::BLACK);

    let (blocks, skipped) = map_voxels_with_report(&voxels, &vis, &atlas);
    assert_eq!(blocks.len(), 2);
    assert_eq!(
        skipped,
        vec![
            SkippedVoxel::OutOfBounds { position: [5, 0, 0] },
            SkippedVoxel::OutOfBounds { position: [-1, 1, 1] },
        ]
    );
    // Bounds come from the voxel mesh, skipped voxels included.
    assert_eq!(blocks.bounds().min, Vec3::new(-1.0, 0.0, 0.0));
    assert_eq!(blocks.bounds().max, Vec3::new(5.0, 1.0, 1.0));
}

#[test]
fn empty_atlas_places_fallback_blocks() {
    let atlas = Atlas::new();
    let vis = compute_face_visibility(&SolidGrid::new(1, 1, 1, true));
    let mut voxels = VoxelMesh::new();
    voxels.add_voxel(0, 0, 0, Rgba::rgb(3, 4, 5));
    let blocks = map_voxels_to_blocks(&voxels, &vis, &atlas);
    assert_eq!(blocks.palette(), vec![FALLBACK_BLOCK.to_string()]);
}

#[test]
fn palette_is_sorted_and_distinct() {
    let mut atlas = Atlas::new();
    atlas.insert(uniform_block("z_red", Rgba::rgb(255, 0, 0)));
    atlas.insert(uniform_block("a_blue", Rgba::rgb(0, 0, 255)));
    let vis = compute_face_visibility(&SolidGrid::new(3, 1, 1, true));
    let mut voxels = VoxelMesh::new();
    voxels.add_voxel(0, 0, 0, Rgba::rgb(250, 0, 0));
    voxels.add_voxel(1, 0, 0, Rgba::rgb(0, 0, 250));
    voxels.add_voxel(2, 0, 0, Rgba::rgb(240, 10, 0));
    let blocks = map_voxels_to_blocks(&voxels, &vis, &atlas);
    assert_eq!(blocks.palette(), vec!["a_blue".to_string(), "z_red".to_string()]);
    let names: Vec<&str> = blocks.blocks().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["z_red", "a_blue", "z_red"]);
}

fn rgba() -> impl Strategy<Value = Rgba> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgba::rgb(r, g, b))
}

proptest! {
    // Same colour and same exposure give the same block wherever the voxel sits.
    #[test]
    fn identical_colour_and_mask_map_identically(
        palette in prop::collection::vec(rgba(), 1..8),
        colour in rgba(),
    ) {
        let mut atlas = Atlas::new();
        for (i, c) in palette.iter().enumerate() {
            atlas.insert(uniform_block(&format!("b{i}"), *c));
        }
        // Two isolated voxels: same mask (ALL) at different positions.
        let mut solid = SolidGrid::new(5, 1, 1, false);
        solid.set(0, 0, 0, true);
        solid.set(4, 0, 0, true);
        let vis = compute_face_visibility(&solid);
        let mut voxels = VoxelMesh::new();
        voxels.add_voxel(0, 0, 0, colour);
        voxels.add_voxel(4, 0, 0, colour);
        let blocks = map_voxels_to_blocks(&voxels, &vis, &atlas);
        prop_assert_eq!(blocks.len(), 2);
        prop_assert_eq!(&blocks.blocks()[0].name, &blocks.blocks()[1].name);

        // And the choice is the brute-force nearest with first-wins ties.
        let best = palette
            .iter()
            .enumerate()
            .min_by_key(|(i, c)| (colour.distance_sq(**c), *i))
            .map(|(i, _)| format!("b{i}"))
            .unwrap();
        prop_assert_eq!(&blocks.blocks()[0].name, &best);
    }
}
