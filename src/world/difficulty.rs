//! Difficulty scaling by distance from the origin block.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::enemy::{EnemyKind, EnemyType};

/// Manhattan distance of a block from the origin
pub fn block_distance(x: i32, y: i32) -> u32 {
    x.unsigned_abs() + y.unsigned_abs()
}

/// Difficulty tier 1..=6
pub fn difficulty_level(x: i32, y: i32) -> u32 {
    match block_distance(x, y) {
        0 => 1,
        1 => 2,
        2 => 3,
        3..=4 => 4,
        5..=6 => 5,
        _ => 6,
    }
}

/// Enemy level budget for a tier: `level² + 2 ± 2`, never below 2
pub fn difficulty_points(level: u32, rng: &mut impl Rng) -> u32 {
    let base = (level * level + 2) as i32;
    (base + rng.gen_range(-2..=2)).max(2) as u32
}

/// Multiplier fed to enemy `set_level`; 1.0 at the origin, 2.0 at distance
/// 6, then creeping up to 3.0
pub fn difficulty_factor(x: i32, y: i32) -> f32 {
    let d = block_distance(x, y) as f32;
    if d <= 6.0 {
        1.0 + d / 6.0
    } else {
        2.0 + (0.1 * (d - 6.0)).min(1.0)
    }
}

/// Weighted spawn table for a tier
fn tier_table(level: u32) -> &'static [(EnemyKind, EnemyType, u32)] {
    use EnemyKind::*;
    use EnemyType::*;
    match level {
        0 | 1 => &[(Slime, Normal, 10), (Slime, Fast, 3)],
        2 => &[(Slime, Normal, 8), (Slime, Fast, 4), (Skeleton, Normal, 2)],
        3 => &[(Slime, Normal, 5), (Slime, Fast, 4), (Skeleton, Normal, 4), (Slime, Tank, 2)],
        4 => &[
            (Slime, Fast, 3),
            (Slime, Tank, 3),
            (Skeleton, Normal, 5),
            (Skeleton, Fast, 2),
            (Skeleton, Brute, 2),
        ],
        5 => &[
            (Slime, Tank, 3),
            (Skeleton, Normal, 4),
            (Skeleton, Fast, 3),
            (Skeleton, Brute, 4),
            (Skeleton, Magic, 2),
        ],
        _ => &[
            (Slime, Tank, 2),
            (Skeleton, Fast, 3),
            (Skeleton, Tank, 3),
            (Skeleton, Brute, 5),
            (Skeleton, Magic, 4),
        ],
    }
}

/// Draw an enemy kind and type from the tier's weighted table
pub fn choose_enemy(level: u32, rng: &mut impl Rng) -> (EnemyKind, EnemyType) {
    let table = tier_table(level);
    match WeightedIndex::new(table.iter().map(|(_, _, w)| *w)) {
        Ok(dist) => {
            let (kind, enemy_type, _) = table[dist.sample(rng)];
            (kind, enemy_type)
        }
        Err(_) => (EnemyKind::Slime, EnemyType::Normal),
    }
}
