use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use pressurefront::game::GameModel;
use pressurefront::grid::{Coord, GridTile};
use pressurefront::session::{demo_session, SessionSnapshot};
use pressurefront::team::TeamId;
use pressurefront::tools::{DDos, Dos, PressureToolSet, Tool, ToolKind};

fn demo_game() -> GameModel {
    demo_session().build(Duration::ZERO).unwrap()
}

/// A demo game with some tiles captured and some weakened.
fn played_game() -> GameModel {
    let mut game = demo_game();
    game.use_active_tool(&ToolKind::DDos, 0, Coord::new(1, 0)).unwrap();
    game.use_active_tool(&ToolKind::Dos, 0, Coord::new(3, 3)).unwrap();
    game.tick(Duration::from_secs(30));
    game.use_active_tool(&ToolKind::DDos, 0, Coord::new(5, 5)).unwrap();
    game.refresh_colors();
    game
}

fn bench_try_use(c: &mut Criterion) {
    c.bench_function("try_use_dos_full_stack", |b| {
        b.iter(|| {
            let mut set = PressureToolSet::new(Tool::Dos(Dos), 64, TeamId(0));
            let mut tile = GridTile::new(Coord::new(0, 0));
            while set.try_use(black_box(&mut tile)).unwrap() {}
            tile
        })
    });

    c.bench_function("try_use_ddos_declined", |b| {
        let mut tile = GridTile::new(Coord::new(0, 0));
        tile.conquer(TeamId(0));
        let mut set = PressureToolSet::new(Tool::DDos(DDos), 1, TeamId(0));
        b.iter(|| set.try_use(black_box(&mut tile)).unwrap())
    });
}

fn bench_turn_rotation(c: &mut Criterion) {
    c.bench_function("tick_rotation_600_turns", |b| {
        b.iter(|| {
            let mut game = demo_game();
            for n in 1..=600u64 {
                black_box(game.tick(Duration::from_secs(n * 30)));
            }
            game.turn_state()
        })
    });

    c.bench_function("tick_not_due", |b| {
        let mut game = demo_game();
        b.iter(|| game.tick(black_box(Duration::from_secs(1))))
    });
}

fn bench_ownership(c: &mut Criterion) {
    let game = played_game();
    c.bench_function("ownership_summary", |b| {
        b.iter(|| black_box(&game).ownership_summary())
    });

    let mut game = played_game();
    c.bench_function("refresh_colors", |b| b.iter(|| game.refresh_colors()));
}

fn bench_snapshot(c: &mut Criterion) {
    let game = played_game();
    let now = Duration::from_secs(40);
    c.bench_function("snapshot_capture_json", |b| {
        b.iter(|| {
            SessionSnapshot::capture(black_box(&game), now)
                .to_json()
                .unwrap()
        })
    });

    let json = SessionSnapshot::capture(&game, now).to_json().unwrap();
    c.bench_function("snapshot_restore_json", |b| {
        b.iter(|| {
            SessionSnapshot::from_json(black_box(&json))
                .and_then(|s| s.restore(now))
                .unwrap()
        })
    });
}

fn bench_session_build(c: &mut Criterion) {
    let config = demo_session();
    c.bench_function("build_demo_session", |b| {
        b.iter(|| black_box(&config).build(Duration::ZERO).unwrap())
    });
}

criterion_group!(
    benches,
    bench_try_use,
    bench_turn_rotation,
    bench_ownership,
    bench_snapshot,
    bench_session_build,
);
criterion_main!(benches);
