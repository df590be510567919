//! Authoritative gameplay core.
//!
//! The engine owns rendering, physics, and networking; this crate owns the
//! per-tick gameplay simulation: monster behavior driven by data frame
//! tables, melee combo chains, path-following trains and cutscene cameras,
//! scripted actors walking controller chains, and the mission objective log.
//! The engine steps the world once per fixed tick and drains the
//! presentation buses (sounds, effects, chat) afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use data_runtime::specs::archetypes::{ArchetypeDb, ArchetypeSpec};
use data_runtime::specs::projectiles::ProjectileTuning;

pub mod combat;
pub mod ecs;
pub mod frames;
pub mod mission;
pub mod systems;
pub mod telemetry;
pub mod triggers;
pub mod util;

pub use ecs::world::{
    ActorId, ActorKind, Components, DeadState, MoveMode, Resolve, ViewPose, WorldEcs,
};
pub use ecs_core::{Health, SimTime, Team, Ticks, Transform, TICK_HZ, TICK_SECONDS};
pub use mission::{MissionEvent, MissionLog, MissionNote, ObjectiveState};
pub use systems::behavior::{BehaviorRecord, MoveKey};
pub use systems::path::{CameraRig, PathFollow, WaypointSpec};
pub use systems::script::{ActorScript, ControllerNode, NodeAction};
pub use triggers::UseKind;

use combat::ExplodeEvent;
use ecs::schedule::Schedule;
use systems::path;
use systems::projectiles;
use systems::script;

/// Sound channel hints forwarded to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundChannel {
    Voice,
    Body,
    Weapon,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attenuation {
    Norm,
    Idle,
    Static,
}

#[derive(Debug, Clone)]
pub struct SoundEvent {
    pub src: ActorId,
    pub channel: SoundChannel,
    pub key: String,
    pub attenuation: Attenuation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FxKind {
    Explosion,
    GibSpray,
    Teleport,
}

#[derive(Debug, Clone, Copy)]
pub struct FxEvent {
    pub kind: FxKind,
    pub pos: Vec3,
}

#[derive(Debug, Clone)]
pub struct ChatEvent {
    pub speaker: String,
    pub text: String,
}

/// Spatial services consumed as black boxes; the engine substitutes real
/// traces, tests substitute closures via `BoxedPerception`.
pub trait Perception: Send + Sync {
    fn visible(&self, from: Vec3, to: Vec3) -> bool;
}

/// Default perception: nothing occludes.
pub struct OpenWorld;

impl Perception for OpenWorld {
    fn visible(&self, _from: Vec3, _to: Vec3) -> bool {
        true
    }
}

impl<F> Perception for F
where
    F: Fn(Vec3, Vec3) -> bool + Send + Sync,
{
    fn visible(&self, from: Vec3, to: Vec3) -> bool {
        self(from, to)
    }
}

/// Archetype registry built once at startup: sound keys and frame tables are
/// resolved here, then passed by reference into behavior code.
#[derive(Default)]
pub struct Registry {
    map: HashMap<String, Arc<ArchetypeSpec>>,
}

impl Registry {
    pub fn from_db(db: ArchetypeDb) -> Self {
        Self {
            map: db
                .entries
                .into_iter()
                .map(|(k, v)| (k, Arc::new(v)))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Arc<ArchetypeSpec>> {
        self.map.get(key)
    }
}

/// Train spawn options.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub speed: f32,
    pub duration: Option<f32>,
    pub toggle: bool,
    pub start_on: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            speed: 100.0,
            duration: None,
            toggle: false,
            start_on: false,
        }
    }
}

/// Camera spawn options.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub first_corner: Option<String>,
    /// Default on-time in seconds; negative keeps the camera on until its
    /// path releases it.
    pub wait: f32,
    pub speed: f32,
    pub duration: Option<f32>,
    pub freeze: bool,
    /// Initial look-at target by name.
    pub focus: Option<String>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            first_corner: None,
            wait: 3.0,
            speed: 200.0,
            duration: None,
            freeze: false,
            focus: None,
        }
    }
}

pub struct ServerState {
    pub time: SimTime,
    pub ecs: WorldEcs,
    pub registry: Registry,
    pub tuning: ProjectileTuning,
    pub mission: MissionLog,
    pub rng: ChaCha8Rng,
    pub perception: Box<dyn Perception>,
    /// Presentation out-buses, drained by the engine after each tick.
    pub sounds: Vec<SoundEvent>,
    pub fx: Vec<FxEvent>,
    pub chat: Vec<ChatEvent>,
    /// Explosions queued outside the tick (charge eviction).
    pub(crate) pending_boom: Vec<ExplodeEvent>,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_seed(0x0051_C41B)
    }

    pub fn with_seed(seed: u64) -> Self {
        let db = ArchetypeDb::load_default().unwrap_or_else(|e| {
            log::warn!("server: failed to load archetype config: {e:#}");
            data_runtime::specs::archetypes::builtin()
        });
        let tuning = ProjectileTuning::load_default().unwrap_or_else(|e| {
            log::warn!("server: failed to load projectile config: {e:#}");
            ProjectileTuning::default()
        });
        Self {
            time: SimTime::default(),
            ecs: WorldEcs::new(),
            registry: Registry::from_db(db),
            tuning,
            mission: MissionLog::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            perception: Box::new(OpenWorld),
            sounds: Vec::new(),
            fx: Vec::new(),
            chat: Vec::new(),
            pending_boom: Vec::new(),
        }
    }

    /// Advance the simulation by one fixed tick.
    pub fn step(&mut self) {
        self.time.advance();
        Schedule::run(self);
    }

    pub(crate) fn emit_sound(
        &mut self,
        src: ActorId,
        channel: SoundChannel,
        key: &str,
        attenuation: Attenuation,
    ) {
        if key.is_empty() {
            return;
        }
        self.sounds.push(SoundEvent {
            src,
            channel,
            key: key.to_string(),
            attenuation,
        });
    }

    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    pub fn drain_fx(&mut self) -> Vec<FxEvent> {
        std::mem::take(&mut self.fx)
    }

    pub fn drain_chat(&mut self) -> Vec<ChatEvent> {
        std::mem::take(&mut self.chat)
    }

    // ------------------------------------------------------------------
    // Spawning
    // ------------------------------------------------------------------

    pub fn spawn_player(&mut self, pos: Vec3) -> ActorId {
        let id = self.ecs.spawn(
            ActorKind::Player,
            Team::Players,
            Transform {
                pos,
                angles_deg: Vec3::ZERO,
                radius: 16.0,
            },
            Health::new(100),
        );
        if let Some(c) = self.ecs.get_mut(id) {
            c.view_height = 22.0;
        }
        id
    }

    /// Spawn a monster by archetype key. Unknown keys log and return `None`.
    pub fn spawn_monster(&mut self, archetype: &str, pos: Vec3) -> Option<ActorId> {
        let (radius, health, fly, stand_key, stand_first) = {
            let Some(arch) = self.registry.get(archetype) else {
                log::warn!("unknown monster archetype `{archetype}`");
                return None;
            };
            (
                arch.radius,
                arch.health,
                arch.fly,
                MoveKey::Stand,
                arch.stand.first,
            )
        };
        let id = self.ecs.spawn(
            ActorKind::Monster,
            Team::Monsters,
            Transform {
                pos,
                angles_deg: Vec3::ZERO,
                radius,
            },
            Health::new(health),
        );
        if let Some(c) = self.ecs.get_mut(id) {
            c.move_mode = if fly { MoveMode::Fly } else { MoveMode::Step };
            c.behavior = Some(BehaviorRecord::new(archetype, stand_key, stand_first));
        }
        Some(id)
    }

    /// Turret-style spawn: pinned in place, starting from the closed idle
    /// pose when the archetype has one.
    pub fn spawn_turret_monster(&mut self, archetype: &str, pos: Vec3) -> Option<ActorId> {
        let id = self.spawn_monster(archetype, pos)?;
        let closed = self
            .registry
            .get(archetype)
            .and_then(|a| a.idle_closed.as_ref().map(|m| m.first));
        if let Some(b) = self.ecs.get_mut(id).and_then(|c| c.behavior.as_mut()) {
            b.stand_ground = true;
            if let Some(first) = closed {
                b.current = MoveKey::IdleClosed;
                b.frame = first;
            }
        }
        Some(id)
    }

    pub fn set_stand_ground(&mut self, id: ActorId, on: bool) {
        if let Some(b) = self.ecs.get_mut(id).and_then(|c| c.behavior.as_mut()) {
            b.stand_ground = on;
        }
    }

    /// Spawn a scripted actor. `target` names the first controller node; the
    /// actor starts walking when use-activated.
    pub fn spawn_scripted_actor(
        &mut self,
        pos: Vec3,
        display_name: Option<&str>,
        target: Option<&str>,
    ) -> ActorId {
        let (health, radius, stand_first) = {
            match self.registry.get("rifleman") {
                Some(a) => (a.health, a.radius, a.stand.first),
                None => (100, 16.0, 0),
            }
        };
        let id = self.ecs.spawn(
            ActorKind::ScriptedActor,
            Team::Civilians,
            Transform {
                pos,
                angles_deg: Vec3::ZERO,
                radius,
            },
            Health::new(health),
        );
        if let Some(c) = self.ecs.get_mut(id) {
            c.behavior = Some(BehaviorRecord::new("rifleman", MoveKey::Stand, stand_first));
            let mut sc = ActorScript::default();
            sc.display_name = display_name.map(str::to_string);
            c.script = Some(sc);
            c.target = target.map(str::to_string);
        }
        id
    }

    pub fn spawn_waypoint(&mut self, name: &str, pos: Vec3, spec: WaypointSpec) -> ActorId {
        let id = self.ecs.spawn(
            ActorKind::Waypoint,
            Team::Neutral,
            Transform::at(pos),
            Health::new(1),
        );
        if let Some(c) = self.ecs.get_mut(id) {
            c.move_mode = MoveMode::None;
            c.waypoint = Some(spec);
        }
        self.ecs.register_name(id, name);
        id
    }

    /// Spawn a train snapped onto its first path corner.
    pub fn spawn_train(
        &mut self,
        name: Option<&str>,
        pos: Vec3,
        mins: Vec3,
        first_corner: &str,
        cfg: TrainConfig,
    ) -> ActorId {
        let id = self.ecs.spawn(
            ActorKind::Train,
            Team::Neutral,
            Transform::at(pos),
            Health::new(100_000),
        );
        if let Some(c) = self.ecs.get_mut(id) {
            c.move_mode = MoveMode::Push;
            c.mins = mins;
            let mut m = PathFollow::new(cfg.speed);
            m.duration = cfg.duration;
            m.toggle = cfg.toggle;
            m.align_min = true;
            m.first_corner = Some(first_corner.to_string());
            c.mover = Some(m);
        }
        if let Some(n) = name {
            self.ecs.register_name(id, n);
        }
        // unnamed trains start on their own, like any untriggerable mover
        let auto_start = cfg.start_on || name.is_none();
        path::train_find(self, id, auto_start);
        id
    }

    pub fn spawn_camera(&mut self, name: Option<&str>, pos: Vec3, cfg: CameraConfig) -> ActorId {
        let id = self.ecs.spawn(
            ActorKind::Camera,
            Team::Neutral,
            Transform::at(pos),
            Health::new(1),
        );
        let focus = cfg
            .focus
            .as_deref()
            .and_then(|n| match self.ecs.resolve(n) {
                Resolve::Found(t) => Some(t),
                _ => None,
            });
        if let Some(c) = self.ecs.get_mut(id) {
            c.move_mode = MoveMode::None;
            let mut m = PathFollow::new(cfg.speed);
            m.duration = cfg.duration;
            m.first_corner = cfg.first_corner.clone();
            c.mover = Some(m);
            let mut rig = CameraRig::new(if cfg.wait != 0.0 { cfg.wait } else { 3.0 }, cfg.freeze);
            rig.focus = focus;
            c.camera = Some(rig);
        }
        if let Some(n) = name {
            self.ecs.register_name(id, n);
        }
        id
    }

    pub fn spawn_camera_trigger(
        &mut self,
        name: &str,
        camera: &str,
        track: Option<&str>,
        wait: f32,
        delay: f32,
    ) -> ActorId {
        let id = self.ecs.spawn(
            ActorKind::Trigger,
            Team::Neutral,
            Transform::at(Vec3::ZERO),
            Health::new(1),
        );
        if let Some(c) = self.ecs.get_mut(id) {
            c.move_mode = MoveMode::None;
            c.usekind = Some(UseKind::CameraTrigger {
                camera: camera.to_string(),
                track: track.map(str::to_string),
                wait,
                delay: if delay > 0.0 { delay } else { 1.0 },
                message: None,
            });
        }
        self.ecs.register_name(id, name);
        id
    }

    pub fn spawn_controller(&mut self, name: &str, pos: Vec3, node: ControllerNode) -> ActorId {
        let id = self.ecs.spawn(
            ActorKind::Controller,
            Team::Neutral,
            Transform::at(pos),
            Health::new(1),
        );
        if let Some(c) = self.ecs.get_mut(id) {
            c.move_mode = MoveMode::None;
            c.node = Some(node);
        }
        self.ecs.register_name(id, name);
        id
    }

    /// Test/debug target that counts how many times it was fired.
    pub fn spawn_counter(&mut self, name: &str) -> ActorId {
        let id = self.ecs.spawn(
            ActorKind::Trigger,
            Team::Neutral,
            Transform::at(Vec3::ZERO),
            Health::new(1),
        );
        if let Some(c) = self.ecs.get_mut(id) {
            c.usekind = Some(UseKind::Counter);
        }
        self.ecs.register_name(id, name);
        id
    }

    pub fn counter_value(&self, id: ActorId) -> u32 {
        self.ecs.get(id).map(|c| c.count).unwrap_or(0)
    }

    pub fn spawn_relay(&mut self, name: &str, target: &str) -> ActorId {
        let id = self.ecs.spawn(
            ActorKind::Trigger,
            Team::Neutral,
            Transform::at(Vec3::ZERO),
            Health::new(1),
        );
        if let Some(c) = self.ecs.get_mut(id) {
            c.usekind = Some(UseKind::Relay {
                target: target.to_string(),
            });
        }
        self.ecs.register_name(id, name);
        id
    }

    /// Scripted mission event source; firing it mutates the mission log.
    pub fn spawn_mission_note(
        &mut self,
        name: Option<&str>,
        target: Option<&str>,
        note: MissionNote,
    ) -> ActorId {
        let id = self.ecs.spawn(
            ActorKind::Trigger,
            Team::Neutral,
            Transform::at(Vec3::ZERO),
            Health::new(1),
        );
        if let Some(c) = self.ecs.get_mut(id) {
            c.mission = Some(note);
            c.target = target.map(str::to_string);
        }
        if let Some(n) = name {
            self.ecs.register_name(id, n);
        }
        id
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Activate every entity registered under `name`.
    pub fn fire_targets(&mut self, name: &str, activator: Option<ActorId>) {
        triggers::fire_targets(self, name, activator);
    }

    pub fn use_entity(&mut self, id: ActorId, activator: Option<ActorId>) {
        triggers::use_entity(self, id, activator);
    }

    /// Mission HUD mutation entry point for scripted event entities.
    pub fn target_help_fired(&mut self, id: ActorId, _activator: Option<ActorId>) -> bool {
        let (note, name, target, index) = {
            let Some(c) = self.ecs.get(id) else { return false };
            let Some(note) = c.mission.clone() else {
                return false;
            };
            (note, c.name.clone(), c.target.clone(), id.index)
        };
        self.mission
            .fire(&note, name.as_deref(), target.as_deref(), index)
    }

    /// External contact signal: an actor touched a controller node.
    pub fn notify_controller_contact(&mut self, actor: ActorId, node: ActorId) {
        script::reached_controller(self, actor, node);
    }

    /// Plant a timed charge for an owner, evicting their oldest at the cap.
    pub fn plant_charge(&mut self, owner: ActorId, pos: Vec3) -> ActorId {
        projectiles::plant_charge(self, owner, pos)
    }

    /// Level transition housekeeping for persistent state.
    pub fn begin_level(&mut self) {
        self.mission.begin_level();
    }
}
