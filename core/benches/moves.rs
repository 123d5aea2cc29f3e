use criterion::{Criterion, criterion_group, criterion_main};
use fusion_core::{Direction, GridConfig, GridEngine, NullStore};
use std::hint::black_box;

fn play(config: GridConfig, seed: u64, steps: usize) -> u32 {
    let (mut engine, _) = GridEngine::create(config, NullStore, seed);
    for step in 0..steps {
        let direction = Direction::ALL[step % Direction::ALL.len()];
        if engine.move_tiles(direction) && engine.add_tile().is_err() {
            break;
        }
        if engine.is_finished() {
            break;
        }
    }
    engine.score()
}

fn bench_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("moves");
    for size in [4, 8, 16] {
        let config = GridConfig::new(size, 16);
        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| play(black_box(config), 42, 512))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_moves);
criterion_main!(benches);
