use crate::scene::shape::Shape;

/// Exchange velocity components between overlapping shapes that are closing in.
///
/// Every unordered pair is compared. When the bounding boxes overlap on both axes, each axis
/// whose relative position and relative velocity have opposite signs gets its velocity
/// components swapped. Sizes do not weight the exchange. Returns the number of axis swaps.
pub fn resolve_pairs(shapes: &mut [Shape]) -> usize {
    let mut swaps = 0;
    for i in 0..shapes.len() {
        let (head, tail) = shapes.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            swaps += resolve_pair(a, b);
        }
    }
    swaps
}

fn resolve_pair(a: &mut Shape, b: &mut Shape) -> usize {
    let reach = i64::from(a.size) + i64::from(b.size);
    let dx = i64::from(b.position.x) - i64::from(a.position.x);
    let dy = i64::from(b.position.y) - i64::from(a.position.y);
    if dx.abs() >= reach || dy.abs() >= reach {
        return 0;
    }

    let mut swaps = 0;
    if converging(dx, a.velocity.x, b.velocity.x) {
        std::mem::swap(&mut a.velocity.x, &mut b.velocity.x);
        swaps += 1;
    }
    if converging(dy, a.velocity.y, b.velocity.y) {
        std::mem::swap(&mut a.velocity.y, &mut b.velocity.y);
        swaps += 1;
    }
    swaps
}

// Sign test on `d * (vb - va) < 0`; the product itself can overflow i64.
fn converging(d: i64, va: i32, vb: i32) -> bool {
    d.signum() * (i64::from(vb) - i64::from(va)).signum() < 0
}

#[cfg(test)]
#[path = "../../tests/unit/scene/collision.rs"]
mod tests;
