//! Collision detection
//!
//! Every pair is tested as two circles whatever the sprite looks like:
//! a hit is registered when the distance between centers is strictly less
//! than the sum of the two radii (half-sizes).

use glam::Vec2;

use super::entity::Body;

/// Circle-circle overlap test (touching is not a hit)
#[inline]
pub fn circles_overlap(a: Vec2, size_a: f32, b: Vec2, size_b: f32) -> bool {
    a.distance(b) < (size_a + size_b) / 2.0
}

/// Overlap test between two bodies
#[inline]
pub fn bodies_overlap(a: &Body, b: &Body) -> bool {
    circles_overlap(a.pos, a.size, b.pos, b.size)
}

/// Index of the first target overlapping `probe`, scanning in array order.
///
/// Targets with non-finite fields are skipped (with a warning) for this scan.
pub fn first_hit<'a, I>(probe: &Body, targets: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Body>,
{
    targets.into_iter().enumerate().find_map(|(i, target)| {
        if !target.is_valid() {
            log::warn!("Skipping invalid entity in collision scan: {:?}", target);
            return None;
        }
        bodies_overlap(probe, target).then_some(i)
    })
}

/// True if `probe` overlaps any target
pub fn any_hit<'a, I>(probe: &Body, targets: I) -> bool
where
    I: IntoIterator<Item = &'a Body>,
{
    first_hit(probe, targets).is_some()
}
