use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Color, Fps, IVec2};
use crate::scene::config::IRange;
use crate::scene::shape::ShapeKind;

const WHITE: Color = Color::from_rgba(255, 255, 255, 255);
const BG: Color = Color::from_rgba(11, 23, 58, 255);

fn scene(width: u32, height: u32) -> SceneConfig {
    SceneConfig {
        canvas: Canvas { width, height },
        spawn: SpawnMode::Persistent,
        background: Some(BG),
        ..SceneConfig::default()
    }
}

fn shape(kind: ShapeKind, pos: (i32, i32), vel: (i32, i32), size: i32) -> Shape {
    Shape::new(
        kind,
        IVec2::new(pos.0, pos.1),
        IVec2::new(vel.0, vel.1),
        size,
        WHITE,
    )
    .unwrap()
}

#[test]
fn run_pushes_rate_times_duration_frames_then_ends_once() {
    let cfg = SceneConfig {
        fps: Fps::integer(5).unwrap(),
        duration_secs: 2,
        shape_count: 3,
        ..scene(32, 32)
    };
    let mut sim = Simulation::new(cfg).unwrap();
    let mut sink = InMemorySink::new();
    let stats = sim.run(&mut sink).unwrap();

    assert_eq!(stats.frames, 10);
    assert_eq!(stats.bytes, 10 * 32 * 32 * 4);
    assert_eq!(sink.frames().len(), 10);
    assert_eq!(sink.end_calls(), 1);
    for (i, (idx, bytes)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!(bytes.len(), 32 * 32 * 4);
    }
    assert_eq!(sink.config().unwrap().canvas.width, 32);
    assert_eq!(sim.ticks(), 10);
}

#[test]
fn square_scenario_moves_then_bounces_off_right_wall() {
    let mut sim = Simulation::with_shapes(
        scene(800, 600),
        vec![shape(ShapeKind::Square, (10, 10), (10, 10), 10)],
    )
    .unwrap();

    sim.step();
    assert_eq!(sim.shapes()[0].position, IVec2::new(20, 20));
    assert_eq!(sim.shapes()[0].velocity, IVec2::new(10, 10));
    assert_eq!(sim.raster().pixel(20, 20), Some(WHITE));
    assert_eq!(sim.raster().pixel(9, 9), Some(BG));

    while sim.shapes()[0].position.x < 790 {
        sim.step();
        assert!(sim.ticks() < 200);
    }
    assert!(sim.shapes()[0].velocity.x < 0);
    let x = sim.shapes()[0].position.x;
    sim.step();
    assert!(sim.shapes()[0].position.x < x);
}

#[test]
fn render_sees_clamped_position_before_reflection() {
    let mut sim = Simulation::with_shapes(
        scene(800, 600),
        vec![shape(ShapeKind::Square, (785, 300), (10, 0), 10)],
    )
    .unwrap();
    sim.step();

    let s = sim.shapes()[0];
    assert_eq!(s.position, IVec2::new(790, 300));
    assert_eq!(s.velocity, IVec2::new(-10, 0));
    assert_eq!(sim.raster().pixel(799, 300), Some(WHITE));
    assert_eq!(sim.raster().pixel(779, 300), Some(BG));
}

#[test]
fn pairwise_pass_swaps_converging_x_velocities() {
    let cfg = SceneConfig {
        pairwise_collisions: true,
        ..scene(400, 400)
    };
    let mut sim = Simulation::with_shapes(
        cfg,
        vec![
            shape(ShapeKind::Disc, (100, 100), (5, 1), 20),
            shape(ShapeKind::Disc, (130, 100), (-5, 1), 20),
        ],
    )
    .unwrap();
    sim.step();

    assert_eq!(sim.shapes()[0].velocity, IVec2::new(-5, 1));
    assert_eq!(sim.shapes()[1].velocity, IVec2::new(5, 1));
}

#[test]
fn pairwise_pass_is_off_by_default() {
    let mut sim = Simulation::with_shapes(
        scene(400, 400),
        vec![
            shape(ShapeKind::Disc, (100, 100), (5, 1), 20),
            shape(ShapeKind::Disc, (130, 100), (-5, 1), 20),
        ],
    )
    .unwrap();
    sim.step();
    assert_eq!(sim.shapes()[0].velocity, IVec2::new(5, 1));
}

#[test]
fn respawn_mode_replaces_shapes_after_rendering() {
    let cfg = SceneConfig {
        spawn: SpawnMode::Respawn,
        ..scene(400, 400)
    };
    let placed = shape(ShapeKind::Square, (200, 200), (0, 0), 10);
    let mut sim = Simulation::with_shapes(cfg, vec![placed]).unwrap();
    sim.step();

    // The frame shows the shape that was there before the respawn.
    assert_eq!(sim.raster().pixel(200, 200), Some(WHITE));
    let respawned = sim.shapes()[0];
    assert_ne!(respawned, placed);
    assert!((20..30).contains(&respawned.size));
    assert_eq!(respawned.kind, ShapeKind::Disc);
}

#[test]
fn same_seed_produces_identical_frames() {
    let cfg = SceneConfig {
        shape_count: 4,
        duration_secs: 1,
        pairwise_collisions: true,
        ..scene(64, 64)
    };
    let mut a = InMemorySink::new();
    let mut b = InMemorySink::new();
    Simulation::new(cfg.clone()).unwrap().run(&mut a).unwrap();
    Simulation::new(cfg).unwrap().run(&mut b).unwrap();
    assert_eq!(a.frames(), b.frames());
}

#[test]
fn no_background_keeps_trails() {
    let cfg = SceneConfig {
        background: None,
        ..scene(200, 200)
    };
    let mut sim =
        Simulation::with_shapes(cfg, vec![shape(ShapeKind::Square, (50, 50), (40, 0), 5)])
            .unwrap();
    sim.step();
    sim.step();
    assert_eq!(sim.raster().pixel(90, 50), Some(WHITE));
    assert_eq!(sim.raster().pixel(130, 50), Some(WHITE));
}

struct FailingSink {
    pushed: usize,
    fail_at: usize,
    ended: bool,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> BounceResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &Raster) -> BounceResult<()> {
        if self.pushed == self.fail_at {
            return Err(BounceError::transport("short write"));
        }
        self.pushed += 1;
        Ok(())
    }

    fn end(&mut self) -> BounceResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[test]
fn sink_error_aborts_remaining_ticks() {
    let mut sim = Simulation::new(scene(16, 16)).unwrap();
    let mut sink = FailingSink {
        pushed: 0,
        fail_at: 3,
        ended: false,
    };
    let err = sim.run(&mut sink).unwrap_err();
    assert!(matches!(err, BounceError::Transport(_)));
    assert_eq!(sink.pushed, 3);
    assert_eq!(sim.ticks(), 4);
    assert!(!sink.ended);
}

#[test]
fn advance_to_renders_requested_frame() {
    let mut sim = Simulation::new(scene(64, 64)).unwrap();
    sim.advance_to(FrameIndex(4)).unwrap();
    assert_eq!(sim.ticks(), 5);
    sim.advance_to(FrameIndex(4)).unwrap();
    assert_eq!(sim.ticks(), 5);
    assert!(sim.advance_to(FrameIndex(2)).is_err());
}

#[test]
fn invalid_shapes_are_rejected() {
    let mut bad = shape(ShapeKind::Square, (10, 10), (0, 0), 1);
    bad.size = 0;
    assert!(Simulation::with_shapes(scene(64, 64), vec![bad]).is_err());
}

#[test]
fn extreme_velocity_range_steps_without_panicking() {
    let cfg = SceneConfig {
        velocity: IRange::new(i32::MIN, i32::MIN + 1),
        shape_count: 3,
        pairwise_collisions: true,
        ..scene(64, 64)
    };
    cfg.validate().unwrap();
    let mut sim = Simulation::new(cfg).unwrap();
    for _ in 0..4 {
        sim.step();
    }
    for s in sim.shapes() {
        assert!(s.velocity.x == i32::MIN || s.velocity.x.abs() == i32::MAX);
        assert!((s.size..=64 - s.size).contains(&s.position.x));
    }
}

#[test]
fn oversized_shapes_step_in_canvas_time() {
    let cfg = SceneConfig {
        shape: ShapeKind::Square,
        size: IRange::new(20_000, 20_001),
        ..scene(8, 8)
    };
    cfg.validate().unwrap();
    let mut sim = Simulation::new(cfg).unwrap();
    sim.step();
    let color = sim.shapes()[0].color;
    assert!((0..8).all(|x| sim.raster().pixel(x, 0) == Some(color)));
}
