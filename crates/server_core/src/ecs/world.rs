//! Generation-counted actor arena and name directory.
//!
//! Handles (`ActorId`) are index + generation; dereferencing one returns an
//! `Option`, so every caller handles the "entity gone" case explicitly instead
//! of trusting a liveness flag. The name directory keeps entries for despawned
//! actors so scripted lookups can distinguish a broken link from an entity
//! that used to exist.

use std::collections::HashMap;

use ecs_core::{Health, SimTime, Team, Transform};
use glam::Vec3;

use crate::mission::MissionNote;
use crate::systems::behavior::BehaviorRecord;
use crate::systems::path::{CameraRig, PathFollow, WaypointSpec};
use crate::systems::projectiles::{Charge, Projectile};
use crate::systems::script::{ActorScript, ControllerNode};
use crate::triggers::UseKind;

/// Weak handle into the arena. Stale handles resolve to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Monster,
    ScriptedActor,
    Train,
    Camera,
    Waypoint,
    Controller,
    Trigger,
    Projectile,
    Charge,
    Debris,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    None,
    Step,
    Fly,
    Push,
    /// Falling/resting corpse mode after a death table completes.
    Toss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadState {
    Alive,
    /// Death table still playing.
    Dying,
    Dead,
}

/// Published camera pose copied into attached client views once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPose {
    pub pos: Vec3,
    pub angles_deg: Vec3,
    pub frozen: bool,
}

/// Result of a name lookup. Scripted chains log and abort on `NotFound`,
/// but treat `Destroyed` as an expected transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolve {
    Found(ActorId),
    Destroyed,
    NotFound,
}

/// Fat component record (pre-ECS bridge): optional parts stay `None` for
/// kinds that do not use them.
#[derive(Debug, Clone)]
pub struct Components {
    pub id: ActorId,
    pub kind: ActorKind,
    pub team: Team,
    pub name: Option<String>,
    /// Generic forward link by name (mission id fallback, relays).
    pub target: Option<String>,
    pub tr: Transform,
    pub vel: Vec3,
    pub hp: Health,
    /// Bounding-box minimum; trains keep this corner on the waypoint.
    pub mins: Vec3,
    pub view_height: f32,
    pub move_mode: MoveMode,
    pub dead: DeadState,
    pub enemy: Option<ActorId>,
    /// Counter-style trigger accumulator.
    pub count: u32,
    pub use_debounce: SimTime,
    pub behavior: Option<BehaviorRecord>,
    pub script: Option<ActorScript>,
    pub waypoint: Option<WaypointSpec>,
    pub mover: Option<PathFollow>,
    pub camera: Option<CameraRig>,
    pub node: Option<ControllerNode>,
    pub usekind: Option<UseKind>,
    pub mission: Option<MissionNote>,
    pub projectile: Option<Projectile>,
    pub charge: Option<Charge>,
    pub despawn_at: Option<SimTime>,
    /// Camera this client view is attached to.
    pub watching: Option<ActorId>,
    pub view: Option<ViewPose>,
}

impl Components {
    pub fn new(id: ActorId, kind: ActorKind, team: Team, tr: Transform, hp: Health) -> Self {
        Self {
            id,
            kind,
            team,
            name: None,
            target: None,
            tr,
            vel: Vec3::ZERO,
            hp,
            mins: Vec3::ZERO,
            view_height: 0.0,
            move_mode: MoveMode::Step,
            dead: DeadState::Alive,
            enemy: None,
            count: 0,
            use_debounce: SimTime::default(),
            behavior: None,
            script: None,
            waypoint: None,
            mover: None,
            camera: None,
            node: None,
            usekind: None,
            mission: None,
            projectile: None,
            charge: None,
            despawn_at: None,
            watching: None,
            view: None,
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    comps: Option<Components>,
}

/// Arena of live actors plus the name directory.
#[derive(Debug, Default)]
pub struct WorldEcs {
    slots: Vec<Slot>,
    free: Vec<u32>,
    names: HashMap<String, Vec<ActorId>>,
}

impl WorldEcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, kind: ActorKind, team: Team, tr: Transform, hp: Health) -> ActorId {
        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = ActorId {
            index,
            generation: slot.generation,
        };
        slot.comps = Some(Components::new(id, kind, team, tr, hp));
        id
    }

    /// Remove an actor. Its handle (and any name entries pointing at it)
    /// resolve as destroyed afterwards.
    pub fn despawn(&mut self, id: ActorId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return false;
        };
        if slot.generation != id.generation || slot.comps.is_none() {
            return false;
        }
        slot.comps = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        true
    }

    #[inline]
    pub fn get(&self, id: ActorId) -> Option<&Components> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.comps.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Components> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.comps.as_mut()
    }

    #[inline]
    pub fn alive(&self, id: ActorId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Components> {
        self.slots.iter().filter_map(|s| s.comps.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Components> {
        self.slots.iter_mut().filter_map(|s| s.comps.as_mut())
    }

    /// Snapshot of live ids, for systems that mutate while iterating.
    pub fn ids(&self) -> Vec<ActorId> {
        self.iter().map(|c| c.id).collect()
    }

    /// Register a name for an actor. Names are not unique: trigger firing
    /// activates every match.
    pub fn register_name(&mut self, id: ActorId, name: &str) {
        if name.is_empty() {
            return;
        }
        if let Some(c) = self.get_mut(id) {
            c.name = Some(name.to_string());
        }
        self.names.entry(name.to_string()).or_default().push(id);
    }

    /// Resolve a name to the first live actor carrying it.
    pub fn resolve(&self, name: &str) -> Resolve {
        match self.names.get(name) {
            None => Resolve::NotFound,
            Some(ids) => {
                for id in ids {
                    if self.alive(*id) {
                        return Resolve::Found(*id);
                    }
                }
                Resolve::Destroyed
            }
        }
    }

    /// All live actors registered under a name.
    pub fn resolve_all(&self, name: &str) -> Vec<ActorId> {
        match self.names.get(name) {
            None => Vec::new(),
            Some(ids) => ids.iter().copied().filter(|id| self.alive(*id)).collect(),
        }
    }

    /// Nearest live hostile target for a seeker team, within `max_range`.
    pub fn nearest_hostile(&self, team: Team, pos: Vec3, max_range: f32) -> Option<ActorId> {
        let max_r2 = max_range * max_range;
        let mut best: Option<(f32, ActorId)> = None;
        for c in self.iter() {
            if !c.hp.alive() || c.dead != DeadState::Alive {
                continue;
            }
            if !matches!(
                c.kind,
                ActorKind::Player | ActorKind::Monster | ActorKind::ScriptedActor
            ) {
                continue;
            }
            if !team.hostile_to(c.team) {
                continue;
            }
            let d2 = (c.tr.pos - pos).length_squared();
            if d2 > max_r2 {
                continue;
            }
            if best.map(|(b, _)| d2 < b).unwrap_or(true) {
                best = Some((d2, c.id));
            }
        }
        best.map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    fn world_with_named(name: &str) -> (WorldEcs, ActorId) {
        let mut w = WorldEcs::new();
        let id = w.spawn(
            ActorKind::Waypoint,
            Team::Neutral,
            Transform::at(vec3(1.0, 0.0, 2.0)),
            Health::new(1),
        );
        w.register_name(id, name);
        (w, id)
    }

    #[test]
    fn stale_handle_resolves_to_none() {
        let (mut w, id) = world_with_named("wp1");
        assert!(w.get(id).is_some());
        assert!(w.despawn(id));
        assert!(w.get(id).is_none());
        // slot reuse must not resurrect the old handle
        let id2 = w.spawn(
            ActorKind::Waypoint,
            Team::Neutral,
            Transform::at(vec3(0.0, 0.0, 0.0)),
            Health::new(1),
        );
        assert_eq!(id2.index, id.index);
        assert!(w.get(id).is_none());
        assert!(w.get(id2).is_some());
    }

    #[test]
    fn name_lookup_distinguishes_missing_from_destroyed() {
        let (mut w, id) = world_with_named("wp1");
        assert_eq!(w.resolve("wp1"), Resolve::Found(id));
        assert_eq!(w.resolve("nope"), Resolve::NotFound);
        w.despawn(id);
        assert_eq!(w.resolve("wp1"), Resolve::Destroyed);
    }
}
