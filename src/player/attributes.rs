//! Player attribute block: level, XP, stats and the pools derived from them.
//!
//! The block never touches the player that owns it. Calls that change a
//! player-level value (walking speed) return it in a [`StatChange`] and the
//! player applies it.

use std::sync::OnceLock;

use crate::constants::*;

/// The four allocatable stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Strength,
    Constitution,
    Dexterity,
    Intelligence,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Strength, Stat::Constitution, Stat::Dexterity, Stat::Intelligence];

    pub fn short_name(&self) -> &'static str {
        match self {
            Stat::Strength => "STR",
            Stat::Constitution => "CON",
            Stat::Dexterity => "DEX",
            Stat::Intelligence => "INT",
        }
    }
}

/// Which precomputed XP curve is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XpTable {
    Default,
    AncientScroll,
    DragonHeart,
}

static XP_TABLES: OnceLock<[Vec<u32>; 3]> = OnceLock::new();

fn build_table(multiplier: f64) -> Vec<u32> {
    (1..=PLAYER_MAX_LEVEL)
        .map(|level| (XP_BASE * multiplier.powi(level as i32 - 1)).floor() as u32)
        .collect()
}

impl XpTable {
    pub fn multiplier(&self) -> f64 {
        match self {
            XpTable::Default => XP_MULTIPLIER_DEFAULT,
            XpTable::AncientScroll => XP_MULTIPLIER_SCROLL,
            XpTable::DragonHeart => XP_MULTIPLIER_HEART,
        }
    }

    fn index(&self) -> usize {
        match self {
            XpTable::Default => 0,
            XpTable::AncientScroll => 1,
            XpTable::DragonHeart => 2,
        }
    }

    /// XP needed to advance from `level` to `level + 1`
    pub fn xp_needed(&self, level: u32) -> u32 {
        let tables = XP_TABLES.get_or_init(|| {
            [
                build_table(XP_MULTIPLIER_DEFAULT),
                build_table(XP_MULTIPLIER_SCROLL),
                build_table(XP_MULTIPLIER_HEART),
            ]
        });
        let idx = level.clamp(1, PLAYER_MAX_LEVEL) as usize - 1;
        tables[self.index()][idx]
    }
}

/// Abilities granted by unlocked skills
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbilityFlags {
    pub sprint: bool,
    pub dash: bool,
    pub blink: bool,
    pub firebolt: bool,
    pub extended_sword: bool,
}

/// Player-level values that changed as a result of a stat change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatChange {
    pub stat: Stat,
    pub new_value: u32,
    /// Set when DEX changed
    pub base_speed: Option<f32>,
}

/// Rewards for a single level gained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub new_level: u32,
    pub stat_points: u32,
    pub skill_points: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAttributes {
    pub level: u32,
    pub xp: u32,
    pub strength: u32,
    pub constitution: u32,
    pub dexterity: u32,
    pub intelligence: u32,
    pub max_health: f32,
    pub health: f32,
    pub max_mana: f32,
    pub mana: f32,
    pub stat_points: u32,
    pub skill_points: u32,
    pub found_ancient_scroll: bool,
    pub found_dragon_heart: bool,
    pub sword_length: f32,
    pub abilities: AbilityFlags,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::new()
    }
}

/// Walking speed for a DEX value
pub fn base_speed_for(dexterity: u32) -> f32 {
    PLAYER_BASE_SPEED + PLAYER_SPEED_PER_DEX * dexterity.saturating_sub(1) as f32
}

/// Melee damage for a STR value
pub fn sword_damage_for(strength: u32) -> f32 {
    1.0 + (0.5 * strength as f32).floor()
}

fn max_health_for(constitution: u32) -> f32 {
    PLAYER_HEALTH_BASE + PLAYER_HEALTH_PER_CON * constitution as f32
}

fn max_mana_for(intelligence: u32) -> f32 {
    PLAYER_MANA_BASE + PLAYER_MANA_PER_INT * intelligence as f32
}

impl PlayerAttributes {
    pub fn new() -> Self {
        let max_health = max_health_for(1);
        let max_mana = max_mana_for(1);
        Self {
            level: 1,
            xp: 0,
            strength: 1,
            constitution: 1,
            dexterity: 1,
            intelligence: 1,
            max_health,
            health: max_health,
            max_mana,
            mana: max_mana,
            stat_points: 0,
            skill_points: 0,
            found_ancient_scroll: false,
            found_dragon_heart: false,
            sword_length: SWORD_BASE_LENGTH,
            abilities: AbilityFlags::default(),
        }
    }

    pub fn xp_table(&self) -> XpTable {
        if self.found_dragon_heart {
            XpTable::DragonHeart
        } else if self.found_ancient_scroll {
            XpTable::AncientScroll
        } else {
            XpTable::Default
        }
    }

    /// XP needed to reach the next level from the current one
    pub fn xp_needed(&self) -> u32 {
        self.xp_table().xp_needed(self.level)
    }

    pub fn sword_damage(&self) -> f32 {
        sword_damage_for(self.strength)
    }

    pub fn base_speed(&self) -> f32 {
        base_speed_for(self.dexterity)
    }

    pub fn stat(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Constitution => self.constitution,
            Stat::Dexterity => self.dexterity,
            Stat::Intelligence => self.intelligence,
        }
    }

    /// Add XP, levelling up as many times as the total allows. Excess XP
    /// carries into the next level.
    pub fn gain_xp(&mut self, amount: u32) -> Vec<LevelUp> {
        let mut gained = Vec::new();
        if self.level >= PLAYER_MAX_LEVEL {
            return gained;
        }
        self.xp += amount;
        while self.level < PLAYER_MAX_LEVEL && self.xp >= self.xp_needed() {
            self.xp -= self.xp_needed();
            gained.push(self.level_up());
        }
        if self.level >= PLAYER_MAX_LEVEL {
            self.xp = 0;
        }
        gained
    }

    fn level_up(&mut self) -> LevelUp {
        self.level += 1;
        let mut stat_points = 1;
        if self.level % 10 == 0 {
            stat_points += self.level / 10;
        }
        let skill_points = if self.level >= SKILL_POINT_FIRST_LEVEL
            && (self.level - SKILL_POINT_FIRST_LEVEL) % SKILL_POINT_INTERVAL == 0
        {
            1
        } else {
            0
        };
        self.stat_points += stat_points;
        self.skill_points += skill_points;
        LevelUp {
            new_level: self.level,
            stat_points,
            skill_points,
        }
    }

    /// Spend one stat point. Returns `None` when no point is available.
    pub fn allocate(&mut self, stat: Stat) -> Option<StatChange> {
        if self.stat_points == 0 {
            return None;
        }
        self.stat_points -= 1;
        let new_value = self.stat(stat) + 1;
        self.set_stat(stat, new_value);
        Some(StatChange {
            stat,
            new_value,
            base_speed: (stat == Stat::Dexterity).then(|| self.base_speed()),
        })
    }

    /// Overwrite a stat and refresh the pools derived from it. Current
    /// health and mana move by the same delta as their maxima.
    pub fn set_stat(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Strength => self.strength = value,
            Stat::Constitution => {
                self.constitution = value;
                let max = max_health_for(value);
                self.health = (self.health + max - self.max_health).clamp(0.0, max);
                self.max_health = max;
            }
            Stat::Dexterity => self.dexterity = value,
            Stat::Intelligence => {
                self.intelligence = value;
                let max = max_mana_for(value);
                self.mana = (self.mana + max - self.max_mana).clamp(0.0, max);
                self.max_mana = max;
            }
        }
    }

    /// Recompute maxima from stats and clamp the pools (used after loading)
    pub fn refresh_derived(&mut self) {
        self.max_health = max_health_for(self.constitution);
        self.max_mana = max_mana_for(self.intelligence);
        self.health = self.health.clamp(0.0, self.max_health);
        self.mana = self.mana.clamp(0.0, self.max_mana);
    }

    /// Returns the amount actually healed
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    pub fn restore_mana(&mut self, amount: f32) -> f32 {
        let before = self.mana;
        self.mana = (self.mana + amount).min(self.max_mana);
        self.mana - before
    }

    pub fn spend_mana(&mut self, amount: f32) -> bool {
        if self.mana < amount {
            return false;
        }
        self.mana -= amount;
        true
    }

    pub fn restore_all(&mut self) {
        self.health = self.max_health;
        self.mana = self.max_mana;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_tables() {
        assert_eq!(XpTable::Default.xp_needed(1), 10);
        assert_eq!(XpTable::Default.xp_needed(2), 15);
        assert_eq!(XpTable::Default.xp_needed(3), 22);
        assert_eq!(XpTable::Default.xp_needed(5), 50);
        assert_eq!(XpTable::AncientScroll.xp_needed(5), 28);
        assert_eq!(XpTable::DragonHeart.xp_needed(5), 20);
    }

    #[test]
    fn test_level_up_carries_excess() {
        let mut attrs = PlayerAttributes::new();
        attrs.xp = 9;
        let ups = attrs.gain_xp(16);
        assert_eq!(ups.len(), 2);
        assert_eq!(attrs.level, 3);
        assert_eq!(attrs.xp, 0);
        assert_eq!(attrs.stat_points, 2);
        assert_eq!(attrs.skill_points, 0);
    }

    #[test]
    fn test_larger_gain_keeps_remainder() {
        let mut attrs = PlayerAttributes::new();
        attrs.xp = 9;
        attrs.gain_xp(25);
        assert_eq!(attrs.level, 3);
        assert_eq!(attrs.xp, 9);
        assert_eq!(attrs.stat_points, 2);
    }

    #[test]
    fn test_skill_points_every_three_levels_from_four() {
        let mut attrs = PlayerAttributes::new();
        let mut awarded = Vec::new();
        while attrs.level < 13 {
            let need = attrs.xp_needed() - attrs.xp;
            for up in attrs.gain_xp(need) {
                if up.skill_points > 0 {
                    awarded.push(up.new_level);
                }
            }
        }
        assert_eq!(awarded, vec![4, 7, 10, 13]);
    }

    #[test]
    fn test_milestone_bonus() {
        let mut attrs = PlayerAttributes::new();
        attrs.level = 9;
        let need = attrs.xp_needed();
        let ups = attrs.gain_xp(need);
        assert_eq!(ups[0].new_level, 10);
        assert_eq!(ups[0].stat_points, 2);
    }

    #[test]
    fn test_max_level_stops_progress() {
        let mut attrs = PlayerAttributes::new();
        attrs.level = PLAYER_MAX_LEVEL;
        assert!(attrs.gain_xp(1_000_000).is_empty());
        assert_eq!(attrs.level, PLAYER_MAX_LEVEL);
    }

    #[test]
    fn test_allocate_dex_reports_speed() {
        let mut attrs = PlayerAttributes::new();
        assert!(attrs.allocate(Stat::Dexterity).is_none());
        attrs.stat_points = 1;
        let change = attrs.allocate(Stat::Dexterity).expect("point available");
        assert_eq!(change.new_value, 2);
        assert_eq!(change.base_speed, Some(PLAYER_BASE_SPEED + PLAYER_SPEED_PER_DEX));
        assert_eq!(attrs.stat_points, 0);
    }

    #[test]
    fn test_constitution_raises_both_health_values() {
        let mut attrs = PlayerAttributes::new();
        attrs.health = 4.0;
        attrs.stat_points = 1;
        let change = attrs.allocate(Stat::Constitution).expect("point available");
        assert_eq!(change.base_speed, None);
        assert_eq!(attrs.max_health, 12.0);
        assert_eq!(attrs.health, 6.0);
        assert!(attrs.health <= attrs.max_health);
    }

    #[test]
    fn test_pools_never_exceed_maximum() {
        let mut attrs = PlayerAttributes::new();
        attrs.health = 9.0;
        assert_eq!(attrs.heal(5.0), 1.0);
        assert_eq!(attrs.health, attrs.max_health);
        assert!(attrs.spend_mana(FIREBOLT_MANA_COST));
        attrs.restore_mana(100.0);
        assert_eq!(attrs.mana, attrs.max_mana);
    }

    #[test]
    fn test_sword_damage() {
        assert_eq!(sword_damage_for(1), 1.0);
        assert_eq!(sword_damage_for(2), 2.0);
        assert_eq!(sword_damage_for(5), 3.0);
    }
}
