//! Skill tree.
//!
//! A fixed catalog; unlocking a skill produces a [`SkillEffect`] that the
//! player applies to itself, so the tree never reaches into player state.

use thiserror::Error;

/// What an unlocked skill does to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillEffect {
    EnableSprint,
    EnableDash,
    EnableBlink,
    ExtendSword,
    EnableFirebolt,
    /// Listed in the tree but has no gameplay hook yet
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnlockError {
    #[error("Unknown skill '{0}'")]
    UnknownSkill(String),
    #[error("{0} is already unlocked")]
    AlreadyUnlocked(&'static str),
    #[error("{name} requires level {required}")]
    LevelTooLow { name: &'static str, required: u32 },
    #[error("Unlock {0} first")]
    ParentLocked(&'static str),
    #[error("No skill points available")]
    NoSkillPoints,
    #[error("{0} is not available yet")]
    NotImplemented(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub parent: Option<&'static str>,
    pub level_required: u32,
    pub implemented: bool,
    pub unlocked: bool,
    pub effect: SkillEffect,
}

fn skill(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    parent: Option<&'static str>,
    level_required: u32,
    effect: SkillEffect,
) -> Skill {
    Skill {
        id,
        name,
        description,
        parent,
        level_required,
        implemented: !matches!(effect, SkillEffect::Unavailable),
        unlocked: false,
        effect,
    }
}

fn catalog() -> Vec<Skill> {
    vec![
        skill("sprint", "Sprint", "Run 50% faster for a short time", None, 2, SkillEffect::EnableSprint),
        skill("dash", "Dash", "Burst forward at five times your speed", Some("sprint"), 3, SkillEffect::EnableDash),
        skill("blink", "Blink", "Teleport a short distance ahead", Some("dash"), 4, SkillEffect::EnableBlink),
        skill("extended_sword", "Extended Sword", "Longer reach and a wider arc", None, 3, SkillEffect::ExtendSword),
        skill("firebolt", "Firebolt", "Hurl a bolt of fire that scales with INT", None, 5, SkillEffect::EnableFirebolt),
        skill("whirlwind", "Whirlwind", "Strike everything around you", Some("extended_sword"), 8, SkillEffect::Unavailable),
        skill("mana_shield", "Mana Shield", "Absorb damage with mana", Some("firebolt"), 10, SkillEffect::Unavailable),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillTree {
    skills: Vec<Skill>,
}

impl Default for SkillTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillTree {
    pub fn new() -> Self {
        Self { skills: catalog() }
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.get(id).is_some_and(|s| s.unlocked)
    }

    /// Check every unlock rule without changing anything
    pub fn can_unlock(&self, id: &str, level: u32, skill_points: u32) -> Result<&Skill, UnlockError> {
        let skill = self.get(id).ok_or_else(|| UnlockError::UnknownSkill(id.to_string()))?;
        if skill.unlocked {
            return Err(UnlockError::AlreadyUnlocked(skill.name));
        }
        if !skill.implemented {
            return Err(UnlockError::NotImplemented(skill.name));
        }
        if level < skill.level_required {
            return Err(UnlockError::LevelTooLow {
                name: skill.name,
                required: skill.level_required,
            });
        }
        if let Some(parent) = skill.parent {
            if !self.is_unlocked(parent) {
                let parent_name = self.get(parent).map_or(parent, |p| p.name);
                return Err(UnlockError::ParentLocked(parent_name));
            }
        }
        if skill_points == 0 {
            return Err(UnlockError::NoSkillPoints);
        }
        Ok(skill)
    }

    /// Unlock `id`, spending one skill point
    pub fn unlock(&mut self, id: &str, level: u32, skill_points: &mut u32) -> Result<SkillEffect, UnlockError> {
        let effect = self.can_unlock(id, level, *skill_points)?.effect;
        *skill_points -= 1;
        if let Some(skill) = self.skills.iter_mut().find(|s| s.id == id) {
            skill.unlocked = true;
        }
        tracing::debug!("Unlocked skill {}", id);
        Ok(effect)
    }

    /// Mark a skill unlocked without spending points (restoring a save).
    /// Returns its effect, or `None` for ids not in the catalog.
    pub fn restore_unlocked(&mut self, id: &str) -> Option<SkillEffect> {
        let skill = self.skills.iter_mut().find(|s| s.id == id)?;
        skill.unlocked = true;
        Some(skill.effect)
    }

    pub fn unlocked_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.skills.iter().filter(|s| s.unlocked).map(|s| s.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_requires_level() {
        let mut tree = SkillTree::new();
        let mut points = 1;
        let err = tree.unlock("sprint", 1, &mut points).unwrap_err();
        assert_eq!(err, UnlockError::LevelTooLow { name: "Sprint", required: 2 });
        assert_eq!(points, 1);
    }

    #[test]
    fn test_unlock_requires_parent() {
        let mut tree = SkillTree::new();
        let mut points = 2;
        assert_eq!(tree.unlock("dash", 5, &mut points), Err(UnlockError::ParentLocked("Sprint")));
        assert_eq!(tree.unlock("sprint", 5, &mut points), Ok(SkillEffect::EnableSprint));
        assert_eq!(tree.unlock("dash", 5, &mut points), Ok(SkillEffect::EnableDash));
        assert_eq!(points, 0);
    }

    #[test]
    fn test_unlock_requires_points() {
        let mut tree = SkillTree::new();
        let mut points = 0;
        assert_eq!(tree.unlock("firebolt", 9, &mut points), Err(UnlockError::NoSkillPoints));
    }

    #[test]
    fn test_unimplemented_skill_is_refused() {
        let mut tree = SkillTree::new();
        let mut points = 5;
        tree.unlock("extended_sword", 10, &mut points).unwrap();
        assert_eq!(
            tree.unlock("whirlwind", 10, &mut points),
            Err(UnlockError::NotImplemented("Whirlwind"))
        );
    }

    #[test]
    fn test_double_unlock_refused() {
        let mut tree = SkillTree::new();
        let mut points = 5;
        tree.unlock("sprint", 3, &mut points).unwrap();
        assert!(matches!(tree.unlock("sprint", 3, &mut points), Err(UnlockError::AlreadyUnlocked(_))));
        assert_eq!(points, 4);
        assert_eq!(tree.unlocked_ids().collect::<Vec<_>>(), vec!["sprint"]);
    }

    #[test]
    fn test_restore_unknown_skill() {
        let mut tree = SkillTree::new();
        assert_eq!(tree.restore_unlocked("teleport"), None);
        assert_eq!(tree.restore_unlocked("blink"), Some(SkillEffect::EnableBlink));
        assert!(tree.is_unlocked("blink"));
    }
}
