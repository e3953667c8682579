//! # Terrain Meshing Tests
//!
//! Both extractors run over generated terrain and must describe the same
//! surface.

use std::sync::Arc;

use strata_meshing::{GreedyExtractor, Mesh, NaiveExtractor};
use strata_procedural::{BiomeDefinition, OreConfig, TerrainGenerator, TerrainSettings, WorldSeed};
use strata_voxel::{
    BlockCatalog, BlockType, ChunkCoord, Face, MeshExtractor, Rgba, VoxelWorld, WorldBounds,
};

fn catalog_and_generator(seed: u64) -> (Arc<BlockCatalog>, TerrainGenerator) {
    let mut catalog = BlockCatalog::new();
    let grass = catalog.register(BlockType::solid("grass", Rgba::rgb(0.3, 0.7, 0.2))).unwrap();
    let dirt = catalog.register(BlockType::solid("dirt", Rgba::rgb(0.45, 0.3, 0.2))).unwrap();
    let stone = catalog.register(BlockType::solid("stone", Rgba::rgb(0.5, 0.5, 0.5))).unwrap();
    let coal = catalog.register(BlockType::solid("coal_ore", Rgba::rgb(0.1, 0.1, 0.1))).unwrap();
    let sand = catalog.register(BlockType::solid("sand", Rgba::rgb(0.9, 0.85, 0.6))).unwrap();
    let water = catalog
        .register(BlockType::fluid("water", Rgba::new(0.2, 0.3, 0.9, 0.6)))
        .unwrap();
    let log = catalog.register(BlockType::solid("log", Rgba::rgb(0.4, 0.25, 0.1))).unwrap();
    let leaves = catalog
        .register(BlockType::translucent("leaves", Rgba::new(0.2, 0.6, 0.2, 0.8)))
        .unwrap();

    let biomes = vec![
        BiomeDefinition {
            beach: sand,
            ..BiomeDefinition::new("forest", grass, dirt, stone)
                .with_height(10, 12)
                .with_water(water, 12)
                .with_ore(OreConfig::new(coal, 3, 12, 0.15, 0.2))
                .with_trees(log, leaves, 0.05)
        },
        BiomeDefinition::new("desert", sand, sand, stone).with_height(8, 4),
    ];
    let settings = TerrainSettings {
        biome_scale: 0.02,
        ..TerrainSettings::default()
    };
    (Arc::new(catalog), TerrainGenerator::new(WorldSeed::new(seed), biomes, settings))
}

fn generated_world(seed: u64) -> (Arc<BlockCatalog>, Arc<VoxelWorld>) {
    let (catalog, generator) = catalog_and_generator(seed);
    let world = VoxelWorld::new(WorldBounds {
        min_y: 0,
        height: 32,
        horizontal_limit: None,
    });
    for y in 0..2 {
        for z in -1..2 {
            for x in -1..2 {
                generator.generate_chunk(&world, ChunkCoord::new(x, y, z));
            }
        }
    }
    (catalog, world)
}

fn area_by_face(mesh: &Mesh) -> [f64; 6] {
    let mut areas = [0.0; 6];
    for quad in 0..mesh.quad_count() {
        let base = quad * 4;
        let [p0, p1, _, p3] = [0, 1, 2, 3].map(|i| mesh.positions[base + i]);
        let du: Vec<f64> = (0..3).map(|k| f64::from(p1[k] - p0[k])).collect();
        let dv: Vec<f64> = (0..3).map(|k| f64::from(p3[k] - p0[k])).collect();
        let n = [
            du[1] * dv[2] - du[2] * dv[1],
            du[2] * dv[0] - du[0] * dv[2],
            du[0] * dv[1] - du[1] * dv[0],
        ];
        let face = Face::ALL
            .into_iter()
            .find(|face| face.normal() == mesh.normals[base])
            .unwrap();
        areas[face.index()] += (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    }
    areas
}

/// Test: greedy and naive meshes of generated terrain cover the same area
/// per direction, and greedy never produces more vertices.
#[test]
fn test_extractors_agree_on_generated_terrain() {
    let (catalog, world) = generated_world(2024);
    let mut naive = NaiveExtractor::new(Arc::clone(&catalog));
    let mut greedy = GreedyExtractor::new(Arc::clone(&catalog));

    let mut total_naive = 0;
    let mut total_greedy = 0;
    for coord in world.chunk_coords() {
        let (a, b) = world
            .with_chunk(coord, |chunk| (naive.build_mesh(chunk), greedy.build_mesh(chunk)))
            .unwrap();

        let (area_a, area_b) = (area_by_face(&a), area_by_face(&b));
        for face in Face::ALL {
            let i = face.index();
            assert!(
                (area_a[i] - area_b[i]).abs() < 1e-6,
                "{coord:?} {face:?}: naive {} greedy {}",
                area_a[i],
                area_b[i]
            );
        }
        assert!(b.vertex_count() <= a.vertex_count(), "{coord:?}");
        total_naive += a.quad_count();
        total_greedy += b.quad_count();
    }

    assert!(total_naive > 0);
    assert!(total_greedy < total_naive);
}

/// Test: the floor of the world never renders bottom faces.
#[test]
fn test_generated_floor_has_no_bottom_faces() {
    let (catalog, world) = generated_world(77);
    let mut greedy = GreedyExtractor::new(catalog);

    for z in -1..2 {
        for x in -1..2 {
            let mesh = world
                .with_chunk(ChunkCoord::new(x, 0, z), |chunk| greedy.build_mesh(chunk))
                .unwrap();
            let floor_bottoms = mesh
                .positions
                .chunks(4)
                .zip(mesh.normals.iter().step_by(4))
                .filter(|(quad, normal)| {
                    **normal == Face::NegY.normal() && quad.iter().all(|p| p[1] == 0.0)
                })
                .count();
            assert_eq!(floor_bottoms, 0);
        }
    }
}

/// Test: a world rebuild pass meshes every chunk holding blocks, once.
#[test]
fn test_rebuild_dirty_after_generation() {
    let (catalog, world) = generated_world(5);
    let mut extractor = GreedyExtractor::new(catalog);

    let meshes = world.rebuild_dirty(&mut extractor);
    for coord in world.chunk_coords() {
        let has_blocks = world.with_chunk(coord, |chunk| !chunk.is_empty()).unwrap();
        if has_blocks {
            assert!(meshes.iter().any(|(c, _)| *c == coord), "{coord:?} not rebuilt");
        }
    }
    assert!(meshes.iter().any(|(_, mesh)| !mesh.is_empty()));
    assert!(world.rebuild_dirty(&mut extractor).is_empty());
}
