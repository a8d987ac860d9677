//! Enemy attribute block.
//!
//! Stats are rebuilt from scratch on every `set_level`: the point budget is
//! split between STR/CON/DEX/INT by the enemy type's ratios, then every
//! derived value is recomputed from the result.

use crate::constants::*;

use super::EnemyType;

/// Level-derived stats of one enemy
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyAttributes {
    /// Effective level after the difficulty boost
    pub level: u32,
    pub strength: u32,
    pub constitution: u32,
    pub dexterity: u32,
    pub intelligence: u32,
    pub max_health: f32,
    pub attack: f32,
    pub speed_multiplier: f32,
    pub defense: f32,
    pub knockback_resistance: f32,
}

/// Effective levels gained from a block's difficulty factor
pub fn difficulty_level_boost(difficulty_factor: f32) -> u32 {
    let boost = (3.0 * (difficulty_factor - 1.0)).floor();
    if boost <= 0.0 {
        0
    } else {
        (boost as u32).min(ENEMY_DIFFICULTY_LEVEL_BOOST_MAX)
    }
}

/// Split `budget` points by the type's percentages. Rounding leftovers go to
/// the type's primary stat so the whole budget is always spent.
pub fn distribute_points(enemy_type: EnemyType, budget: u32) -> [u32; 4] {
    let ratios = enemy_type.stat_ratios();
    let mut stats = [0u32; 4];
    for (stat, pct) in stats.iter_mut().zip(ratios) {
        *stat = budget * pct / 100;
    }
    let spent: u32 = stats.iter().sum();
    stats[enemy_type.primary_stat()] += budget - spent;
    stats
}

impl EnemyAttributes {
    pub fn new(enemy_type: EnemyType, level: u32, difficulty_factor: f32) -> Self {
        let base = level.clamp(ENEMY_MIN_LEVEL, ENEMY_MAX_LEVEL);
        let level = (base + difficulty_level_boost(difficulty_factor)).min(ENEMY_MAX_LEVEL);
        let [strength, constitution, dexterity, intelligence] =
            distribute_points(enemy_type, level + ENEMY_STAT_POINT_BONUS);

        let lvl = level as f32;
        let str_ = strength as f32;
        let con = constitution as f32;
        let dex = dexterity as f32;
        Self {
            level,
            strength,
            constitution,
            dexterity,
            intelligence,
            max_health: 3.0 + 2.0 * con + 0.5 * lvl,
            attack: (1.0 + 0.5 * str_ + 0.2 * lvl).max(1.0),
            speed_multiplier: 1.0 + 0.08 * dex,
            defense: enemy_type.defense_base() + 0.1 * con + 0.1 * lvl,
            knockback_resistance: (0.07 * con + 0.02 * lvl).min(0.8),
        }
    }

    /// Damage left after defense; a landed hit always deals at least 1
    pub fn damage_taken(&self, raw: f32) -> f32 {
        let reduction = (0.1 * self.defense).min(0.8);
        (raw * (1.0 - reduction)).max(1.0)
    }

    /// Walking speed in pixels per frame
    pub fn speed(&self) -> f32 {
        ENEMY_BASE_SPEED * self.speed_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brute_distribution() {
        // 10 points: 7 STR, 2 CON, 1 DEX
        assert_eq!(distribute_points(EnemyType::Brute, 10), [7, 2, 1, 0]);
    }

    #[test]
    fn test_distribution_spends_whole_budget() {
        for enemy_type in EnemyType::ALL {
            for budget in 1..20 {
                let total: u32 = distribute_points(enemy_type, budget).iter().sum();
                assert_eq!(total, budget, "{:?} with {}", enemy_type, budget);
            }
        }
    }

    #[test]
    fn test_difficulty_boost_is_clamped() {
        assert_eq!(difficulty_level_boost(0.0), 0);
        assert_eq!(difficulty_level_boost(1.0), 0);
        assert_eq!(difficulty_level_boost(1.5), 1);
        assert_eq!(difficulty_level_boost(2.0), 3);
        assert_eq!(difficulty_level_boost(3.0), 5);
        assert_eq!(difficulty_level_boost(9.0), 5);
    }

    #[test]
    fn test_derived_stats() {
        // Tank level 3: 5 points -> STR 1, CON 3, DEX 0 plus the leftover on CON
        let attrs = EnemyAttributes::new(EnemyType::Tank, 3, 1.0);
        assert_eq!(attrs.level, 3);
        assert_eq!((attrs.strength, attrs.constitution, attrs.dexterity), (1, 4, 0));
        assert!((attrs.max_health - (3.0 + 8.0 + 1.5)).abs() < 1e-5);
        assert!((attrs.attack - (1.0 + 0.5 + 0.6)).abs() < 1e-5);
        assert!((attrs.defense - (2.0 + 0.4 + 0.3)).abs() < 1e-5);
        assert!((attrs.knockback_resistance - (0.28 + 0.06)).abs() < 1e-5);
    }

    #[test]
    fn test_zero_factor_preserves_level() {
        let attrs = EnemyAttributes::new(EnemyType::Fast, 7, 0.0);
        assert_eq!(attrs.level, 7);
    }

    #[test]
    fn test_damage_floor_and_cap() {
        let mut attrs = EnemyAttributes::new(EnemyType::Normal, 1, 1.0);
        assert_eq!(attrs.damage_taken(0.2), 1.0);
        attrs.defense = 50.0;
        assert!((attrs.damage_taken(10.0) - 2.0).abs() < 1e-5);
    }
}
