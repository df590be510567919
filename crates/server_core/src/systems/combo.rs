//! Melee combo chain timing.
//!
//! A combo walks `None -> First -> Second -> Finish -> None`. Each link is a
//! frame table whose `ComboGate` continuation lands here; the chain only
//! advances while the armed window has not lapsed and the enemy is still in
//! melee reach, otherwise it short-circuits straight to the recovery table.
//! Variant alternation flips the last-used strike so back-to-back combos
//! never open the same way.

use ecs_core::{SimTime, Ticks};

use crate::ecs::world::ActorId;
use crate::systems::behavior::{self, MoveKey};
use crate::ServerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboVariant {
    Left,
    Right,
}

impl ComboVariant {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            ComboVariant::Left => ComboVariant::Right,
            ComboVariant::Right => ComboVariant::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboStage {
    None,
    First,
    Second,
    Finish,
}

#[derive(Debug, Clone, Copy)]
pub struct ComboState {
    pub stage: ComboStage,
    pub last_variant: ComboVariant,
    pub window: SimTime,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            stage: ComboStage::None,
            // first flip lands on Left
            last_variant: ComboVariant::Right,
            window: SimTime::default(),
        }
    }
}

/// Open a combo. Caller has already checked the attack-finished gate and
/// melee range.
pub fn start(s: &mut ServerState, id: ActorId) {
    let now = s.time;
    let Some(first_window) = combo_window(s, id, true) else {
        return;
    };
    let Some(c) = s.ecs.get_mut(id) else {
        return;
    };
    let Some(b) = c.behavior.as_mut() else {
        return;
    };
    if b.combo.stage != ComboStage::None {
        return;
    }
    let variant = b.combo.last_variant.other();
    b.combo.stage = ComboStage::First;
    b.combo.last_variant = variant;
    b.combo.window = now + first_window;
    behavior::install(s, id, MoveKey::ComboVariant(variant));
}

/// `ComboGate` continuation: decide the next link when a combo table ends.
pub fn advance_chain(s: &mut ServerState, id: ActorId) {
    let now = s.time;
    let in_reach = behavior::enemy_in_melee_reach(s, id);
    let Some(chain_window) = combo_window(s, id, false) else {
        return;
    };
    let Some(c) = s.ecs.get_mut(id) else {
        return;
    };
    let Some(b) = c.behavior.as_mut() else {
        return;
    };
    let in_window = now <= b.combo.window;
    let next = match b.combo.stage {
        ComboStage::First if in_window && in_reach => {
            let variant = b.combo.last_variant.other();
            b.combo.last_variant = variant;
            b.combo.stage = ComboStage::Second;
            b.combo.window = now + chain_window;
            MoveKey::ComboVariant(variant)
        }
        ComboStage::Second if in_window && in_reach => {
            b.combo.stage = ComboStage::Finish;
            MoveKey::ComboFinisher
        }
        _ => {
            // lapsed window, lost enemy, or finisher completed
            b.combo.stage = ComboStage::None;
            MoveKey::ComboRecover
        }
    };
    behavior::install(s, id, next);
}

fn combo_window(s: &ServerState, id: ActorId, first: bool) -> Option<Ticks> {
    let c = s.ecs.get(id)?;
    let b = c.behavior.as_ref()?;
    let arch = s.registry.get(&b.archetype)?;
    let combo = arch.combo.as_ref()?;
    let secs = if first {
        combo.first_window_s
    } else {
        combo.chain_window_s
    };
    Some(Ticks::from_secs(secs))
}
