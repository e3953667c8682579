//! Benchmark for noise sampling and chunk population.
//!
//! Run with: cargo bench --package strata_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use strata_procedural::{
    BiomeDefinition, Noise2D, OreConfig, OreField, SimplexNoise, TerrainGenerator,
    TerrainSettings, WorldSeed,
};
use strata_voxel::{BlockId, BlockPos, Chunk, ChunkCoord, WorldLink};

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    c.bench_function("single_noise_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.noise_2d(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_octaved_noise(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    c.bench_function("octaved_noise_4_octaves", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.octaved(black_box(x), black_box(x * 0.7), 4, 0.5, 2.0))
        });
    });
}

fn benchmark_ore_density(c: &mut Criterion) {
    let field = OreField::new(SimplexNoise::new(WorldSeed::new(42)), 311.0);
    let ore = OreConfig::new(BlockId(9), 0, 64, 0.1, 0.15);

    let mut group = c.benchmark_group("ore_field");
    group.throughput(Throughput::Elements(4096));
    group.bench_function("chunk_of_ore_checks", |b| {
        b.iter(|| {
            let mut hits = 0u32;
            for z in 0..16 {
                for y in 0..16 {
                    for x in 0..16 {
                        if field.matches(&ore, BlockPos::new(x, y, z), 40) {
                            hits += 1;
                        }
                    }
                }
            }
            black_box(hits)
        });
    });
    group.finish();
}

fn benchmark_populate(c: &mut Criterion) {
    let hills = BiomeDefinition::new("hills", BlockId(1), BlockId(2), BlockId(3))
        .with_height(4, 10)
        .with_ore(OreConfig::new(BlockId(4), 2, 16, 0.1, 0.15));
    let generator = TerrainGenerator::new(WorldSeed::new(42), vec![hills], TerrainSettings::default());

    c.bench_function("populate_chunk", |b| {
        b.iter(|| {
            let mut chunk = Chunk::new();
            chunk.initialize(ChunkCoord::new(0, 0, 0), WorldLink::detached());
            generator.populate(&mut chunk);
            black_box(chunk.block_count())
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_sample,
    benchmark_octaved_noise,
    benchmark_ore_density,
    benchmark_populate,
);

criterion_main!(benches);
