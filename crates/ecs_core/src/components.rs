//! Plain components shared across gameplay crates.
//!
//! The server owns authoritative mutation; config and tooling crates only read
//! these shapes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Health component for damage/death application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { hp: max, max }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    #[inline]
    pub fn clamp(&mut self) {
        if self.hp > self.max {
            self.hp = self.max;
        }
    }
}

/// Faction affiliation (aggro and friendly-fire checks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Players,
    Monsters,
    Civilians,
    Neutral,
}

impl Team {
    /// Default hostility matrix: monsters fight players and civilians.
    #[inline]
    pub fn hostile_to(self, other: Team) -> bool {
        matches!(
            (self, other),
            (Team::Monsters, Team::Players)
                | (Team::Monsters, Team::Civilians)
                | (Team::Players, Team::Monsters)
                | (Team::Civilians, Team::Monsters)
        )
    }
}

/// Position and orientation. Angles are stored in degrees as (pitch, yaw,
/// roll) because waypoint rotation data is authored in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub pos: Vec3,
    pub angles_deg: Vec3,
    pub radius: f32,
}

impl Transform {
    pub fn at(pos: Vec3) -> Self {
        Self {
            pos,
            angles_deg: Vec3::ZERO,
            radius: 0.0,
        }
    }

    #[inline]
    pub fn yaw_deg(&self) -> f32 {
        self.angles_deg.y
    }

    /// Unit forward vector on the ground plane for the current yaw.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        let r = self.angles_deg.y.to_radians();
        Vec3::new(r.sin(), 0.0, r.cos())
    }
}

/// Linear velocity for movement integration (server-side).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub lin: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_follows_yaw() {
        let mut tr = Transform::at(Vec3::ZERO);
        tr.angles_deg.y = 0.0;
        assert!((tr.forward() - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
        tr.angles_deg.y = 90.0;
        assert!((tr.forward() - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn hostility_is_symmetric_for_monsters() {
        assert!(Team::Monsters.hostile_to(Team::Players));
        assert!(Team::Players.hostile_to(Team::Monsters));
        assert!(!Team::Players.hostile_to(Team::Civilians));
        assert!(!Team::Neutral.hostile_to(Team::Monsters));
    }
}
