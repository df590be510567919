//! Animation frame tables as immutable configuration values.
//!
//! A `MoveDef` is an ordered behavior script: one entry per simulation tick,
//! each carrying a movement delta along the entity's facing plus an optional
//! side-effect event, with a continuation run when the table is exhausted.
//! Per-entity cursors live in the simulation's behavior records, never here.

use serde::{Deserialize, Serialize};

/// Locomotion style applied while a frame is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiStep {
    /// Hold position; perception still runs.
    Stand,
    /// Follow the current goal at walk pace.
    Walk,
    /// Pursue the enemy.
    Run,
    /// Close on the enemy while facing it (attack tables).
    Charge,
    /// Blind translation along the current facing (pain/death shoves).
    Move,
    /// Rotate toward the goal without translating.
    Turn,
}

/// Which rocket hardpoint a frame fires from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RocketSide {
    Left,
    Right,
}

/// Side effect fired when the interpreter lands on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameEvent {
    /// Footstep sound.
    Step,
    /// Idle chatter behind the archetype's random gate.
    IdleVoice,
    /// Melee swipe against the enemy if it is still in reach.
    Claw { damage: i32 },
    /// Unconditional bolt at the enemy from the archetype's bolt spec.
    FireBolt,
    /// Bolt only if the enemy is visible and inside attack range.
    AimedBolt,
    /// Rocket from one of the archetype's two hardpoints.
    FireRocket { side: RocketSide },
    /// Rocket plus an attack-finished re-arm (barrage closer).
    RocketBurst { cooldown_s: f32 },
    /// Weapon spin-up sound.
    Warmup,
    /// Body-fall sound during death tables.
    Thud,
    /// Latch the corpse state; safe to repeat on trailing death frames.
    SettleDead,
}

/// Continuation invoked when a table runs past its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceEnd {
    /// Resume pursuit locomotion.
    Run,
    /// Fall back to the idle stand table.
    Stand,
    /// Fold back into the closed idle pose (turret-style archetypes).
    IdleClosed,
    /// Death table finished: corpse comes to rest.
    Dead,
    /// Re-roll an immediate follow-up attack, else run.
    PostAttack,
    /// Combo chain decision point (window + range checks).
    ComboGate,
    /// Recovery finished: arm the attack cooldown and resume locomotion.
    Recovered,
}

/// One tick of a frame table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameDef {
    pub ai: AiStep,
    pub dist: f32,
    #[serde(default)]
    pub event: Option<FrameEvent>,
}

/// An ordered frame table with its model-frame window and continuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDef {
    pub first: u16,
    pub last: u16,
    pub frames: Vec<FrameDef>,
    #[serde(default)]
    pub on_end: Option<SequenceEnd>,
}

impl MoveDef {
    /// Number of ticks one pass through the table consumes.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Check the frame window matches the frame list.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.last >= self.first, "frame window inverted");
        anyhow::ensure!(
            self.frames.len() == (self.last - self.first + 1) as usize,
            "frame count {} does not match window [{}, {}]",
            self.frames.len(),
            self.first,
            self.last
        );
        Ok(())
    }
}

/// The two alternating strike tables of a melee combo chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboVariantPair {
    pub left: MoveDef,
    pub right: MoveDef,
}

/// Shorthand for authoring embedded default tables.
pub fn frames(defs: &[(AiStep, f32, Option<FrameEvent>)]) -> Vec<FrameDef> {
    defs.iter()
        .map(|&(ai, dist, event)| FrameDef { ai, dist, event })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_mismatched_window() {
        let mv = MoveDef {
            first: 3,
            last: 5,
            frames: frames(&[(AiStep::Move, 0.0, None), (AiStep::Move, 0.0, None)]),
            on_end: None,
        };
        assert!(mv.validate().is_err());
    }

    #[test]
    fn single_frame_table_is_valid() {
        let mv = MoveDef {
            first: 0,
            last: 0,
            frames: frames(&[(AiStep::Stand, 0.0, Some(FrameEvent::IdleVoice))]),
            on_end: None,
        };
        mv.validate().expect("single frame loop");
    }
}
