use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;
use terrain_pathfinding::*;

const SIDE: usize = 128;
const N_SCENARIOS: usize = 200;

fn random_terrain(rng: &mut StdRng) -> TerrainGrid {
    let mut terrain = TerrainGrid::new(SIDE, SIDE, 1);
    for x in 0..SIDE as u8 {
        for y in 0..SIDE as u8 {
            let cost = if rng.gen_bool(0.2) {
                0
            } else {
                rng.gen_range(1..4)
            };
            terrain.set(Point::new(x, y), cost);
        }
    }
    terrain
}

/// Start and end pairs close enough for the default scoped window.
fn random_scenarios(rng: &mut StdRng) -> Vec<(Point, Point)> {
    (0..N_SCENARIOS)
        .map(|_| {
            let start = Point::new(rng.gen_range(0..SIDE as u8), rng.gen_range(0..SIDE as u8));
            let end = Point::new(
                (start.x as usize + rng.gen_range(1..16)).min(SIDE - 1) as u8,
                (start.y as usize + rng.gen_range(0..16)).min(SIDE - 1) as u8,
            );
            (start, end)
        })
        .collect()
}

fn network_name(network: NetworkKind) -> &'static str {
    match network {
        NetworkKind::Grid => "grid",
        NetworkKind::FullGrid => "full grid",
        NetworkKind::Scoped { .. } => "scoped grid",
    }
}

fn compare_networks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let terrain = random_terrain(&mut rng);
    let scenarios = random_scenarios(&mut rng);
    let token = CancellationToken::new();
    for network in [NetworkKind::Grid, NetworkKind::FullGrid, NetworkKind::default()] {
        for open_list in [OpenListKind::BinaryHeap, OpenListKind::IndexedLinkedList] {
            let mut finder = PathFinderConfig::default()
                .with_network(network)
                .with_open_list(open_list)
                .with_heuristic(HeuristicKind::MaxAxis, DEFAULT_HEURISTIC_ESTIMATE)
                .build()
                .unwrap();
            let name = format!("{}, {:?}", network_name(network), open_list);
            c.bench_function(name.as_str(), |b| {
                b.iter(|| {
                    for (start, end) in &scenarios {
                        black_box(finder.find_path(*start, *end, &terrain, false, &token));
                    }
                })
            });
        }
    }
}

fn compare_heuristics(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let terrain = random_terrain(&mut rng);
    let scenarios = random_scenarios(&mut rng);
    let token = CancellationToken::new();
    for heuristic in [
        HeuristicKind::None,
        HeuristicKind::Manhattan,
        HeuristicKind::Euclidean,
        HeuristicKind::MaxAxis,
    ] {
        let mut finder = PathFinderConfig::default()
            .with_heuristic(heuristic, DEFAULT_HEURISTIC_ESTIMATE)
            .build()
            .unwrap();
        c.bench_function(format!("heuristic {:?}", heuristic).as_str(), |b| {
            b.iter(|| {
                for (start, end) in &scenarios {
                    black_box(finder.find_path(*start, *end, &terrain, false, &token));
                }
            })
        });
    }
}

criterion_group!(benches, compare_networks, compare_heuristics);
criterion_main!(benches);
