use super::*;
use crate::foundation::core::{Color, IVec2};
use crate::scene::shape::ShapeKind;

fn disc(pos: (i32, i32), vel: (i32, i32), size: i32) -> Shape {
    Shape::new(
        ShapeKind::Disc,
        IVec2::new(pos.0, pos.1),
        IVec2::new(vel.0, vel.1),
        size,
        Color::from_rgba(0, 128, 255, 255),
    )
    .unwrap()
}

#[test]
fn converging_on_x_swaps_only_x() {
    let mut shapes = vec![disc((100, 100), (5, 2), 20), disc((130, 110), (-3, 2), 20)];
    let swaps = resolve_pairs(&mut shapes);
    assert_eq!(swaps, 1);
    assert_eq!(shapes[0].velocity, IVec2::new(-3, 2));
    assert_eq!(shapes[1].velocity, IVec2::new(5, 2));
}

#[test]
fn converging_on_both_axes_swaps_both() {
    let mut shapes = vec![disc((100, 100), (4, 4), 10), disc((110, 110), (-1, -2), 10)];
    assert_eq!(resolve_pairs(&mut shapes), 2);
    assert_eq!(shapes[0].velocity, IVec2::new(-1, -2));
    assert_eq!(shapes[1].velocity, IVec2::new(4, 4));
}

#[test]
fn diverging_pairs_are_untouched() {
    let mut shapes = vec![disc((100, 100), (-5, 0), 20), disc((130, 100), (5, 0), 20)];
    assert_eq!(resolve_pairs(&mut shapes), 0);
    assert_eq!(shapes[0].velocity, IVec2::new(-5, 0));
    assert_eq!(shapes[1].velocity, IVec2::new(5, 0));
}

#[test]
fn separated_boxes_are_untouched() {
    // |dx| == size_a + size_b is not an overlap.
    let mut shapes = vec![disc((100, 100), (5, 0), 10), disc((120, 100), (-5, 0), 10)];
    assert_eq!(resolve_pairs(&mut shapes), 0);
    assert_eq!(shapes[0].velocity.x, 5);
}

#[test]
fn single_shape_is_a_no_op() {
    let mut shapes = vec![disc((100, 100), (5, 5), 10)];
    assert_eq!(resolve_pairs(&mut shapes), 0);
    let mut none: Vec<Shape> = Vec::new();
    assert_eq!(resolve_pairs(&mut none), 0);
}

#[test]
fn every_pair_is_visited() {
    let mut shapes = vec![
        disc((100, 100), (5, 0), 10),
        disc((500, 500), (0, 0), 10),
        disc((110, 100), (-5, 0), 10),
    ];
    assert_eq!(resolve_pairs(&mut shapes), 1);
    assert_eq!(shapes[0].velocity.x, -5);
    assert_eq!(shapes[2].velocity.x, 5);
    assert_eq!(shapes[1].velocity, IVec2::new(0, 0));
}

#[test]
fn extreme_positions_and_velocities_do_not_overflow() {
    let mut shapes = vec![
        disc((-2_000_000_000, 0), (i32::MAX, 0), i32::MAX),
        disc((2_000_000_000, 0), (i32::MIN, 0), i32::MAX),
    ];
    assert_eq!(resolve_pairs(&mut shapes), 1);
    assert_eq!(shapes[0].velocity.x, i32::MIN);
    assert_eq!(shapes[1].velocity.x, i32::MAX);
}
