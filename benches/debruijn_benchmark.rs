use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hague::create_de_bruijn_graph;
use std::time::Duration;

/// Benchmarks for graph construction, classification and walk reconstruction
/// over reads tiled from a synthetic genome.

fn generate_synthetic_reads(genome_len: usize, read_len: usize, step: usize) -> Vec<String> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(42);
    let bases = b"ACGT";
    let genome: Vec<u8> = (0..genome_len).map(|_| bases[rng.gen_range(0..4)]).collect();

    genome
        .windows(read_len)
        .step_by(step)
        .map(|w| String::from_utf8(w.to_vec()).unwrap())
        .collect()
}

fn bench_graph_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_construction");
    group.measurement_time(Duration::from_secs(10));

    for genome_len in [1_000, 10_000, 50_000].iter() {
        let reads = generate_synthetic_reads(*genome_len, 150, 50);

        group.bench_with_input(
            BenchmarkId::new("create_de_bruijn_graph", genome_len),
            &reads,
            |b, reads| {
                b.iter(|| {
                    let _graph = create_de_bruijn_graph(black_box(reads), 31).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_eulerian_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("eulerian_walk");
    group.measurement_time(Duration::from_secs(10));

    for genome_len in [1_000, 10_000, 50_000].iter() {
        // A single read always has an Eulerian path through its own graph.
        let reads = generate_synthetic_reads(*genome_len, *genome_len, 1);
        let graph = create_de_bruijn_graph(&reads, 31).unwrap();

        group.bench_with_input(
            BenchmarkId::new("classify_and_walk", genome_len),
            &graph,
            |b, graph| {
                b.iter(|| {
                    let mut graph = graph.clone();
                    let properties = graph.compute_eulerian_path_properties();
                    let _walk = graph.compute_eulerian_walk(black_box(&properties)).unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_graph_construction, bench_eulerian_walk);
criterion_main!(benches);
