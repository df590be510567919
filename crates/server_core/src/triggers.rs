//! Generic target firing and use-activation.
//!
//! Firing a name activates every live entity registered under it, passing the
//! activator along. Waypoint arrival, controller nodes, and relays all funnel
//! through here so downstream wiring behaves identically regardless of what
//! pulled the trigger.

use ecs_core::Ticks;

use crate::ecs::world::{ActorId, ActorKind, Resolve};
use crate::systems::{path, script};
use crate::{ChatEvent, ServerState};

/// Use-activation payload for trigger-style entities.
#[derive(Debug, Clone)]
pub enum UseKind {
    /// Test/debug accumulator: counts activations.
    Counter,
    /// Re-fire another name when activated.
    Relay { target: String },
    /// Start a named camera, optionally tracking a named entity.
    CameraTrigger {
        camera: String,
        track: Option<String>,
        wait: f32,
        /// Refractory period before this trigger may fire again.
        delay: f32,
        message: Option<String>,
    },
}

/// Activate every live entity registered under `name`.
pub fn fire_targets(s: &mut ServerState, name: &str, activator: Option<ActorId>) {
    let ids = s.ecs.resolve_all(name);
    if ids.is_empty() {
        match s.ecs.resolve(name) {
            Resolve::NotFound => log::warn!("fire target `{name}` not found"),
            Resolve::Destroyed => log::debug!("fire target `{name}` destroyed"),
            Resolve::Found(_) => {}
        }
        return;
    }
    for id in ids {
        use_entity(s, id, activator);
    }
}

/// Use-activate a single entity according to its kind and payload.
pub fn use_entity(s: &mut ServerState, id: ActorId, activator: Option<ActorId>) {
    let (kind, usekind, has_mission) = {
        let Some(c) = s.ecs.get(id) else { return };
        (c.kind, c.usekind.clone(), c.mission.is_some())
    };
    match kind {
        ActorKind::Train => path::train_use(s, id, activator),
        ActorKind::Camera => path::camera_start(s, id, activator, None, 0.0),
        ActorKind::ScriptedActor => script::actor_use(s, id),
        _ => {}
    }
    match usekind {
        Some(UseKind::Counter) => {
            if let Some(c) = s.ecs.get_mut(id) {
                c.count += 1;
            }
        }
        Some(UseKind::Relay { target }) => fire_targets(s, &target, activator),
        Some(UseKind::CameraTrigger {
            camera,
            track,
            wait,
            delay,
            message,
        }) => camera_trigger_fire(s, id, activator, &camera, track.as_deref(), wait, delay, message),
        None => {}
    }
    if has_mission {
        s.target_help_fired(id, activator);
    }
}

/// Camera trigger with its own refractory delay. An unresolvable camera logs
/// a diagnostic and never activates.
#[allow(clippy::too_many_arguments)]
fn camera_trigger_fire(
    s: &mut ServerState,
    id: ActorId,
    activator: Option<ActorId>,
    camera: &str,
    track: Option<&str>,
    wait: f32,
    delay: f32,
    message: Option<String>,
) {
    let now = s.time;
    let debounced = s
        .ecs
        .get(id)
        .map(|c| now < c.use_debounce)
        .unwrap_or(true);
    if debounced {
        return;
    }
    let cam = match s.ecs.resolve(camera) {
        Resolve::Found(c) => c,
        Resolve::NotFound => {
            log::warn!("camera trigger target `{camera}` not found");
            return;
        }
        Resolve::Destroyed => {
            log::debug!("camera trigger target `{camera}` destroyed");
            return;
        }
    };
    let is_camera = s.ecs.get(cam).map(|c| c.camera.is_some()).unwrap_or(false);
    if !is_camera {
        log::warn!("camera trigger target `{camera}` is not a camera");
        return;
    }
    let track_id = track.and_then(|name| match s.ecs.resolve(name) {
        Resolve::Found(t) => Some(t),
        _ => None,
    });
    path::camera_start(s, cam, activator, track_id, wait);
    if let Some(text) = message {
        s.chat.push(ChatEvent {
            speaker: String::new(),
            text,
        });
    }
    if let Some(c) = s.ecs.get_mut(id) {
        c.use_debounce = now + Ticks::from_secs(delay.max(0.1));
    }
}
