/// Axis-aligned box overlap between the player and the bugs.
///
/// Every body is tested by its frame origin: the player is hit when its
/// origin lies strictly inside a `margin`-expanded box around an enemy's
/// origin. The sweep is a plain O(n) pass, one player against all enemies.

use super::entity::Body;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Aabb {
    /// Square box of half-size `margin` centered on (x, y).
    pub fn around(x: f32, y: f32, margin: f32) -> Self {
        Aabb {
            min_x: x - margin,
            min_y: y - margin,
            max_x: x + margin,
            max_y: y + margin,
        }
    }

    /// Strict containment: points on the edge are outside.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x > self.min_x && x < self.max_x && y > self.min_y && y < self.max_y
    }
}

/// Does `enemy` hit `player`?
#[inline]
pub fn hits(player: &Body, enemy: &Body, margin: f32) -> bool {
    Aabb::around(enemy.x, enemy.y, margin).contains(player.x, player.y)
}

/// Index of the first enemy that hits the player, if any.
pub fn first_hit<'a>(player: &Body, enemies: impl IntoIterator<Item = &'a Body>, margin: f32) -> Option<usize> {
    enemies.into_iter().position(|e| hits(player, e, margin))
}
