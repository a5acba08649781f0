use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use engine_core::Game;
use games_boop::{Action, Boop, GameState, Observation};

/// A busy midgame position with pieces near the centre
fn midgame() -> GameState {
    [
        Action::kitten(2, 2),
        Action::kitten(3, 3),
        Action::kitten(1, 4),
        Action::kitten(4, 1),
        Action::kitten(0, 0),
        Action::kitten(5, 5),
    ]
    .into_iter()
    .try_fold(GameState::default(), |s, a| s.apply_move(a))
    .expect("benchmark opening is legal")
}

fn bench_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("boop_state");
    let state = midgame();
    group.bench_function("clone", |b| b.iter(|| state.clone()));
    group.bench_function("legal_moves", |b| {
        let mut buf = Vec::with_capacity(72);
        b.iter(|| {
            buf.clear();
            state.legal_moves_into(&mut buf);
            buf.len()
        })
    });
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("boop_apply");
    let game = Boop::standard();

    group.bench_function("apply_opening", |b| {
        let state = game.initial_state();
        b.iter(|| game.apply(&state, Action::kitten(2, 3)).unwrap())
    });

    group.bench_function("apply_midgame_boop", |b| {
        let state = midgame();
        b.iter(|| game.apply(&state, Action::kitten(2, 3)).unwrap())
    });

    group.finish();
}

fn bench_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("boop_encoding");
    let state = midgame();

    group.bench_function("state_roundtrip", |b| {
        b.iter_batched(
            || Vec::with_capacity(64),
            |mut buffer| {
                Boop::encode_state(&state, &mut buffer).unwrap();
                let _ = Boop::decode_state(&buffer).unwrap();
                buffer
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("observation_encode", |b| {
        let obs = Observation::from_state(&state);
        b.iter_batched(
            || Vec::with_capacity(1024),
            |mut buffer| {
                Boop::encode_obs(&obs, &mut buffer).unwrap();
                buffer
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_clone, bench_apply, bench_encode_decode);
criterion_main!(benches);
