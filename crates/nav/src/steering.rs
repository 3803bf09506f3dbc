use glam::Vec2;
use riftgrid_occupancy::CollisionQuery;

/// Steering direction for an agent at `from` chasing `target`.
///
/// Uses the sampled flow direction when there is one, otherwise a straight
/// line to the target. Zero once the agent stands on the target.
pub fn steer(flow: Option<Vec2>, from: Vec2, target: Vec2) -> Vec2 {
    match flow {
        Some(dir) => dir,
        None => (target - from).normalize_or_zero(),
    }
}

/// Move `pos` by `delta`, one axis at a time.
///
/// Each axis is applied only if the agent's disk stays free afterwards, so a
/// blocked axis is dropped and the agent slides along the wall on the other.
pub fn slide<Q>(query: &Q, pos: Vec2, delta: Vec2, radius: f32) -> Vec2
where
    Q: CollisionQuery + ?Sized,
{
    let mut next = pos;
    if delta.x != 0.0 && !query.check_collision(next.x + delta.x, next.y, radius) {
        next.x += delta.x;
    }
    if delta.y != 0.0 && !query.check_collision(next.x, next.y + delta.y, radius) {
        next.y += delta.y;
    }
    next
}
