//! Scripted actor controller binding.
//!
//! A scripted actor walks a chain of controller nodes. Reaching one (a
//! contact event) runs the node's declared one-shot action, fires its
//! downstream targets, applies its wait, and hands off to the next node.
//! A destroyed controller clears the binding and the actor falls back to
//! idle-flourish scheduling.

use ecs_core::{SimTime, Ticks};
use glam::Vec3;
use rand::Rng;

use crate::ecs::world::{ActorId, ActorKind, DeadState, Resolve};
use crate::systems::behavior::{self, MoveKey};
use crate::util::vec_to_yaw_deg;
use crate::{Attenuation, ChatEvent, ServerState, SoundChannel};

/// Reaching distance for controller contact, matching the node's touch box
/// plus the actor's body.
pub const CONTACT_RANGE: f32 = 24.0;

const CHAT_COOLDOWN_S: f32 = 2.0;

/// Stand-in names for actors the map author left unnamed.
const FALLBACK_NAMES: [&str; 8] = [
    "Mercer", "Holt", "Vega", "Sable", "Juno", "Pike", "Rook", "Dane",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptState {
    Idle,
    Seeking,
    Waiting,
}

/// One-shot action declared on a controller node.
#[derive(Debug, Clone)]
pub enum NodeAction {
    /// Launch the actor along the node's facing.
    Jump { speed: f32, height: f32 },
    /// Single ranged shot at a named target, then resume the path.
    ShootOnce { target: String },
    /// Sustained attack against a named target.
    Attack { target: String, hold: bool },
}

/// Script waypoint an actor walks toward and may act upon reaching.
#[derive(Debug, Clone, Default)]
pub struct ControllerNode {
    pub next: Option<String>,
    pub path_target: Option<String>,
    pub wait: f32,
    pub message: Option<String>,
    pub action: Option<NodeAction>,
}

/// Per-actor scripting state.
#[derive(Debug, Clone)]
pub struct ActorScript {
    pub controller: Option<ActorId>,
    pub prev_node: Option<ActorId>,
    /// Refreshed every tick for HUD/debug readouts.
    pub distance: f32,
    pub state: ScriptState,
    pub wait_until: SimTime,
    pub next_flourish: SimTime,
    pub chat_ready: SimTime,
    pub display_name: Option<String>,
    /// Releases the stand-ground hold when the one-shot attack table ends.
    pub shoot_once: bool,
}

impl Default for ActorScript {
    fn default() -> Self {
        Self {
            controller: None,
            prev_node: None,
            distance: 0.0,
            state: ScriptState::Idle,
            wait_until: SimTime::default(),
            next_flourish: SimTime::default(),
            chat_ready: SimTime::default(),
            display_name: None,
            shoot_once: false,
        }
    }
}

fn display_name(s: &ServerState, id: ActorId) -> String {
    if let Some(c) = s.ecs.get(id) {
        if let Some(sc) = c.script.as_ref() {
            if let Some(n) = &sc.display_name {
                if !n.is_empty() {
                    return n.clone();
                }
            }
        }
    }
    FALLBACK_NAMES[id.index as usize % FALLBACK_NAMES.len()].to_string()
}

/// Broadcast a chat line, honoring the per-actor cooldown.
fn broadcast(s: &mut ServerState, id: ActorId, text: &str) {
    let now = s.time;
    let ready = {
        let Some(sc) = s.ecs.get(id).and_then(|c| c.script.as_ref()) else {
            return;
        };
        now >= sc.chat_ready
    };
    if !ready {
        return;
    }
    let speaker = display_name(s, id);
    if let Some(sc) = s.ecs.get_mut(id).and_then(|c| c.script.as_mut()) {
        sc.chat_ready = now + Ticks::from_secs(CHAT_COOLDOWN_S);
    }
    s.chat.push(ChatEvent {
        speaker,
        text: text.to_string(),
    });
}

/// Bind an actor to a controller node: validate the kind, face it, walk.
pub fn attach_controller(s: &mut ServerState, actor: ActorId, node: ActorId) -> bool {
    let valid = s
        .ecs
        .get(node)
        .map(|c| c.kind == ActorKind::Controller && c.node.is_some())
        .unwrap_or(false);
    if !valid {
        if let Some(sc) = s.ecs.get_mut(actor).and_then(|c| c.script.as_mut()) {
            sc.controller = None;
            sc.state = ScriptState::Idle;
        }
        return false;
    }
    let node_pos = match s.ecs.get(node) {
        Some(c) => c.tr.pos,
        None => return false,
    };
    if let Some(c) = s.ecs.get_mut(actor) {
        let d = node_pos - c.tr.pos;
        if d.length_squared() > 1e-6 {
            c.tr.angles_deg.y = vec_to_yaw_deg(d);
        }
        let dist = d.length();
        if let Some(sc) = c.script.as_mut() {
            sc.controller = Some(node);
            sc.distance = dist;
            sc.state = ScriptState::Seeking;
        }
        if let Some(b) = c.behavior.as_mut() {
            b.hold_frame = false;
        }
    }
    // a node action may have handed the actor an enemy; the walk resumes
    // when that engagement releases
    let engaged = s.ecs.get(actor).map(|c| c.enemy.is_some()).unwrap_or(false);
    if !engaged {
        behavior::walk(s, actor);
    }
    true
}

/// Use-activation: resolve the actor's target name and start walking the
/// chain, or park idle when the link is broken.
pub fn actor_use(s: &mut ServerState, actor: ActorId) {
    let target = s.ecs.get(actor).and_then(|c| c.target.clone());
    let Some(name) = target else {
        park_idle(s, actor);
        return;
    };
    match s.ecs.resolve(&name) {
        Resolve::Found(node) => {
            if attach_controller(s, actor, node) {
                if let Some(c) = s.ecs.get_mut(actor) {
                    c.target = None;
                }
            } else {
                log::warn!("actor has bad controller target `{name}`");
                if let Some(c) = s.ecs.get_mut(actor) {
                    c.target = None;
                }
                park_idle(s, actor);
            }
        }
        Resolve::NotFound => {
            log::warn!("actor controller target `{name}` not found");
            park_idle(s, actor);
        }
        Resolve::Destroyed => {
            log::debug!("actor controller target `{name}` destroyed");
            park_idle(s, actor);
        }
    }
}

fn park_idle(s: &mut ServerState, actor: ActorId) {
    if let Some(sc) = s.ecs.get_mut(actor).and_then(|c| c.script.as_mut()) {
        sc.controller = None;
        sc.state = ScriptState::Idle;
    }
    behavior::stand(s, actor);
}

/// Per-tick pass over every scripted actor.
pub fn tick_actors(s: &mut ServerState) {
    let ids: Vec<ActorId> = s
        .ecs
        .iter()
        .filter(|c| c.script.is_some())
        .map(|c| c.id)
        .collect();
    for id in ids {
        tick_one(s, id);
    }
}

fn tick_one(s: &mut ServerState, id: ActorId) {
    let now = s.time;
    let dead = match s.ecs.get(id) {
        Some(c) => c.dead != DeadState::Alive,
        None => return,
    };
    if dead {
        return;
    }

    // re-validate the controller reference before anything else
    let controller = {
        let Some(sc) = s.ecs.get(id).and_then(|c| c.script.as_ref()) else {
            return;
        };
        sc.controller
    };
    if let Some(node) = controller {
        if !s.ecs.alive(node) {
            log::debug!("actor controller destroyed; falling back to idle");
            if let Some(sc) = s.ecs.get_mut(id).and_then(|c| c.script.as_mut()) {
                sc.controller = None;
                if sc.state != ScriptState::Waiting {
                    sc.state = ScriptState::Idle;
                }
                sc.distance = 0.0;
            }
            behavior::stand(s, id);
        }
    }

    let (state, wait_until, controller) = {
        let Some(sc) = s.ecs.get(id).and_then(|c| c.script.as_ref()) else {
            return;
        };
        (sc.state, sc.wait_until, sc.controller)
    };

    match state {
        ScriptState::Waiting => {
            if now >= wait_until {
                if let Some(c) = s.ecs.get_mut(id) {
                    if let Some(b) = c.behavior.as_mut() {
                        b.hold_frame = false;
                    }
                }
                if controller.is_some() {
                    if let Some(sc) = s.ecs.get_mut(id).and_then(|c| c.script.as_mut()) {
                        sc.state = ScriptState::Seeking;
                    }
                    let no_enemy = s.ecs.get(id).map(|c| c.enemy.is_none()).unwrap_or(false);
                    if no_enemy {
                        behavior::walk(s, id);
                    }
                } else {
                    if let Some(sc) = s.ecs.get_mut(id).and_then(|c| c.script.as_mut()) {
                        sc.state = ScriptState::Idle;
                    }
                    behavior::stand(s, id);
                }
            } else if let Some(b) = s.ecs.get_mut(id).and_then(|c| c.behavior.as_mut()) {
                // hold the current animation frame until the wait elapses
                b.hold_frame = true;
            }
        }
        ScriptState::Seeking => {
            let Some(node) = controller else {
                if let Some(sc) = s.ecs.get_mut(id).and_then(|c| c.script.as_mut()) {
                    sc.state = ScriptState::Idle;
                }
                return;
            };
            // refresh distance/direction for HUD and contact detection
            let (pos, node_pos, has_enemy) = {
                let Some(c) = s.ecs.get(id) else { return };
                let Some(n) = s.ecs.get(node) else { return };
                (c.tr.pos, n.tr.pos, c.enemy.is_some())
            };
            let dist = (node_pos - pos).length();
            if let Some(sc) = s.ecs.get_mut(id).and_then(|c| c.script.as_mut()) {
                sc.distance = dist;
            }
            if !has_enemy && dist <= CONTACT_RANGE {
                reached_controller(s, id, node);
            }
        }
        ScriptState::Idle => {
            let (has_prev, flourish_ready) = {
                let Some(sc) = s.ecs.get(id).and_then(|c| c.script.as_ref()) else {
                    return;
                };
                (sc.prev_node.is_some(), now >= sc.next_flourish)
            };
            // only embellish a resting pose; never cut into an action table
            let resting = s
                .ecs
                .get(id)
                .map(|c| {
                    c.enemy.is_none()
                        && c.behavior
                            .as_ref()
                            .map(|b| b.current == MoveKey::Stand)
                            .unwrap_or(false)
                })
                .unwrap_or(false);
            if resting && has_prev && flourish_ready {
                idle_flourish(s, id);
            }
        }
    }
}

/// Random idle flourish with a 1-2 s cooldown before the next one.
fn idle_flourish(s: &mut ServerState, id: ActorId) {
    let now = s.time;
    let flourish_count = behavior::archetype_of(s, id)
        .map(|a| a.flourishes.len())
        .unwrap_or(0);
    let choice = s.rng.gen_range(0..(flourish_count + 1));
    if choice == 0 || flourish_count == 0 {
        behavior::stand(s, id);
    } else {
        behavior::install(s, id, MoveKey::Flourish(choice - 1));
    }
    let cooldown = 1.0 + s.rng.gen::<f32>();
    if let Some(sc) = s.ecs.get_mut(id).and_then(|c| c.script.as_mut()) {
        sc.next_flourish = now + Ticks::from_secs(cooldown);
    }
}

/// Contact with a controller node. The engine signals this on touch; the
/// tick loop also fires it when the actor closes within `CONTACT_RANGE`.
pub fn reached_controller(s: &mut ServerState, actor: ActorId, node: ActorId) {
    let now = s.time;
    let valid = {
        let Some(sc) = s.ecs.get(actor).and_then(|c| c.script.as_ref()) else {
            return;
        };
        sc.controller == Some(node) && sc.state == ScriptState::Seeking
    };
    if !valid {
        return;
    }
    let has_enemy = s.ecs.get(actor).map(|c| c.enemy.is_some()).unwrap_or(false);
    if has_enemy {
        return;
    }
    let spec = {
        let Some(n) = s.ecs.get(node).and_then(|c| c.node.as_ref()) else {
            return;
        };
        n.clone()
    };

    if let Some(msg) = &spec.message {
        broadcast(s, actor, msg);
    }

    match &spec.action {
        Some(NodeAction::Jump { speed, height }) => {
            let dir = s
                .ecs
                .get(node)
                .map(|n| n.tr.forward())
                .unwrap_or(Vec3::Z);
            if let Some(c) = s.ecs.get_mut(actor) {
                c.vel = dir * *speed + Vec3::new(0.0, *height, 0.0);
            }
            s.emit_sound(actor, SoundChannel::Voice, "rifleman/jump", Attenuation::Norm);
        }
        Some(NodeAction::ShootOnce { target }) => match s.ecs.resolve(target) {
            Resolve::Found(t) => {
                if let Some(c) = s.ecs.get_mut(actor) {
                    c.enemy = Some(t);
                    if let Some(sc) = c.script.as_mut() {
                        sc.shoot_once = true;
                    }
                    if let Some(b) = c.behavior.as_mut() {
                        b.stand_ground = true;
                    }
                }
                behavior::attack(s, actor);
            }
            Resolve::NotFound => log::warn!("controller shoot target `{target}` not found"),
            Resolve::Destroyed => log::debug!("controller shoot target `{target}` destroyed"),
        },
        Some(NodeAction::Attack { target, hold }) => match s.ecs.resolve(target) {
            Resolve::Found(t) => {
                if let Some(c) = s.ecs.get_mut(actor) {
                    c.enemy = Some(t);
                    if let Some(b) = c.behavior.as_mut() {
                        b.stand_ground = *hold;
                    }
                }
                if *hold {
                    behavior::stand(s, actor);
                } else {
                    behavior::run(s, actor);
                }
            }
            Resolve::NotFound => log::warn!("controller attack target `{target}` not found"),
            Resolve::Destroyed => log::debug!("controller attack target `{target}` destroyed"),
        },
        None => {}
    }

    if let Some(name) = &spec.path_target {
        let name = name.clone();
        crate::triggers::fire_targets(s, &name, Some(actor));
        if !s.ecs.alive(actor) {
            return;
        }
    }

    // hand off to the next node in the chain
    let next = match &spec.next {
        Some(name) => match s.ecs.resolve(name) {
            Resolve::Found(n) => Some(n),
            Resolve::NotFound => {
                log::warn!("controller chain link `{name}` not found");
                None
            }
            Resolve::Destroyed => {
                log::debug!("controller chain link `{name}` destroyed");
                None
            }
        },
        None => None,
    };

    if let Some(sc) = s.ecs.get_mut(actor).and_then(|c| c.script.as_mut()) {
        sc.prev_node = Some(node);
        sc.controller = None;
    }

    match next {
        Some(n) => {
            attach_controller(s, actor, n);
        }
        None => {
            if let Some(sc) = s.ecs.get_mut(actor).and_then(|c| c.script.as_mut()) {
                sc.state = ScriptState::Idle;
            }
        }
    }

    if spec.wait > 0.0 {
        if let Some(c) = s.ecs.get_mut(actor) {
            if let Some(sc) = c.script.as_mut() {
                sc.state = ScriptState::Waiting;
                sc.wait_until = now + Ticks::from_secs(spec.wait);
            }
            if let Some(b) = c.behavior.as_mut() {
                b.hold_frame = true;
            }
        }
    } else {
        let parked = {
            let Some(c) = s.ecs.get(actor) else { return };
            let no_next = c.script.as_ref().map(|sc| sc.controller.is_none()).unwrap_or(true);
            no_next && c.enemy.is_none()
        };
        if parked {
            // end of the chain: idle with an effectively infinite pause
            park_idle(s, actor);
        }
    }

    // actors publish pending mission events when they advance
    let has_note = s.ecs.get(actor).map(|c| c.mission.is_some()).unwrap_or(false);
    if has_note {
        s.target_help_fired(actor, Some(actor));
    }
}
