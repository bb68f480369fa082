use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use wm_core::engine::intercept::PlayerKinematics;
use wm_core::engine::types::{vec2, AngleDeg, Side};
use wm_core::{BallTrajectory, CycleObservation, PlayerObservation, WorldBuilder, WorldModelConfig};

/// 22 players scattered over the pitch, ball rolling toward a random point.
fn random_observation(rng: &mut ChaCha8Rng, cycle: u32) -> CycleObservation {
    let ball_pos = vec2(rng.gen_range(-40.0..40.0), rng.gen_range(-25.0..25.0));
    let ball_vel = vec2(rng.gen_range(-2.5..2.5), rng.gen_range(-2.5..2.5));
    let mut obs = CycleObservation::new(cycle).with_ball(ball_pos, ball_vel);

    for side in [Side::Left, Side::Right] {
        for unum in 1..=11u8 {
            let pos = vec2(rng.gen_range(-50.0..50.0), rng.gen_range(-32.0..32.0));
            let body = AngleDeg::new(rng.gen_range(-180.0..180.0));
            let mut player = PlayerObservation::new(side, Some(unum), pos)
                .with_velocity(vec2(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)))
                .with_body(body);
            if unum == 1 {
                player = player.goalie();
            }
            obs = obs.with_player(player);
        }
    }
    obs
}

fn bench_build(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let observations: Vec<_> = (1..=32).map(|cycle| random_observation(&mut rng, cycle)).collect();

    let mut group = c.benchmark_group("WorldBuilder::build");
    for (name, config) in [
        ("sequential", WorldModelConfig::standard()),
        ("parallel", WorldModelConfig::parallel()),
    ] {
        let builder = WorldBuilder::new(Side::Left, config);
        group.bench_with_input(BenchmarkId::from_parameter(name), &observations, |b, observations| {
            b.iter(|| {
                let mut previous = None;
                for obs in observations {
                    previous = Some(builder.build(black_box(obs), previous.as_ref()));
                }
                black_box(previous)
            });
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let config = WorldModelConfig::standard();
    let types = config.player_type_registry();
    let predictor = wm_core::InterceptPredictor::new(&config.server, &types, &config.predictor);

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let players: Vec<_> = (0..64)
        .map(|_| {
            let pos = vec2(rng.gen_range(-50.0..50.0), rng.gen_range(-32.0..32.0));
            PlayerKinematics::at_rest(pos, AngleDeg::new(rng.gen_range(-180.0..180.0)), rng.gen_bool(0.5))
        })
        .collect();

    let mut group = c.benchmark_group("InterceptPredictor::predict");
    for speed in [0.5, 1.5, 2.7] {
        let cache = BallTrajectory::compute(vec2(0.0, 0.0), vec2(speed, 0.3), &config.server, &config.trajectory);
        group.bench_with_input(BenchmarkId::new("ball_speed", speed), &cache, |b, cache| {
            b.iter(|| {
                let mut total = 0u32;
                for kin in &players {
                    total = total.wrapping_add(predictor.predict(black_box(kin), cache, false));
                }
                black_box(total)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_predict);
criterion_main!(benches);
