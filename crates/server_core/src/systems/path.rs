//! Path/waypoint follower shared by trains and cutscene cameras.
//!
//! A leg's duration resolves as: destination waypoint duration, else the
//! mover's own duration, else distance / speed (waypoint speed override
//! first). Position interpolates linearly with an exact snap at t >= 1;
//! orientation interpolates per-axis along the shortest arc unless a tracked
//! entity overrides it. Arrival fires the waypoint's path target through the
//! generic trigger machinery, then waits, advances, or toggles the mover off.

use ecs_core::{SimTime, Ticks};
use glam::Vec3;

use crate::ecs::world::{ActorId, ActorKind, Resolve, ViewPose};
use crate::util::{lerp_angle_deg, look_at_deg, wrap_deg};
use crate::{FxEvent, FxKind, ServerState};

/// Script node consumed by the follower. `next` links the chain by name.
#[derive(Debug, Clone, Default)]
pub struct WaypointSpec {
    pub next: Option<String>,
    /// Fired with the mover's activator on arrival.
    pub path_target: Option<String>,
    /// Explicit leg duration in seconds; overrides speed.
    pub duration: Option<f32>,
    /// Speed override for the leg ending here.
    pub speed: Option<f32>,
    /// Pause on arrival. Negative plus a toggle mover deactivates it.
    pub wait: f32,
    /// Orientation delta applied over the leg, in degrees.
    pub rotate: Option<Vec3>,
    /// Angular rate in degrees/second, used when `rotate` is unset.
    pub rotate_speed: Option<Vec3>,
    /// Relocate instantly, skipping interpolation and arrival targets.
    pub teleport: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleGoal {
    pub start: Vec3,
    pub end: Vec3,
}

/// Mover state for one path-following entity.
#[derive(Debug, Clone)]
pub struct PathFollow {
    pub active: bool,
    pub speed: f32,
    /// Mover-level duration default (waypoint duration wins).
    pub duration: Option<f32>,
    pub toggle: bool,
    pub first_corner: Option<String>,
    /// Last waypoint reached.
    pub current: Option<ActorId>,
    /// Waypoint being approached; consumed exactly once on arrival.
    pub pending: Option<ActorId>,
    pub move_start: SimTime,
    pub move_ticks: Ticks,
    pub start_pos: Vec3,
    pub end_pos: Vec3,
    pub angle_goal: Option<AngleGoal>,
    pub wait_until: Option<SimTime>,
    /// Trains keep their bounding-box minimum on the waypoint.
    pub align_min: bool,
    pub activator: Option<ActorId>,
}

impl PathFollow {
    pub fn new(speed: f32) -> Self {
        Self {
            active: false,
            speed,
            duration: None,
            toggle: false,
            first_corner: None,
            current: None,
            pending: None,
            move_start: SimTime::default(),
            move_ticks: Ticks::ZERO,
            start_pos: Vec3::ZERO,
            end_pos: Vec3::ZERO,
            angle_goal: None,
            wait_until: None,
            align_min: false,
            activator: None,
        }
    }
}

/// Camera-only state carried next to the mover.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Tracking overrides scripted rotation every tick.
    pub track: Option<ActorId>,
    /// Fallback look-at target.
    pub focus: Option<ActorId>,
    pub stop_time: Option<SimTime>,
    pub freeze: bool,
    pub default_wait: f32,
}

impl CameraRig {
    pub fn new(default_wait: f32, freeze: bool) -> Self {
        Self {
            track: None,
            focus: None,
            stop_time: None,
            freeze,
            default_wait,
        }
    }
}

fn resolve_move_time(corner: &WaypointSpec, mover: &PathFollow, dist: f32) -> f32 {
    if let Some(d) = corner.duration {
        if d > 0.0 {
            return d;
        }
    }
    if let Some(d) = mover.duration {
        if d > 0.0 {
            return d;
        }
    }
    let speed = match corner.speed {
        Some(v) if v > 0.0 => v,
        _ => mover.speed,
    };
    if speed <= 0.0 {
        return 0.0;
    }
    dist / speed
}

/// Begin moving toward a waypoint. Teleport corners resolve in place; a
/// second consecutive teleport is a malformed chain and aborts resolution.
pub fn start_path(s: &mut ServerState, id: ActorId, corner: ActorId) {
    let now = s.time;
    let mut corner = corner;
    let mut teleported = false;
    loop {
        let (cpos, spec) = {
            let Some(c) = s.ecs.get(corner) else {
                log::debug!("path corner destroyed before departure");
                return;
            };
            let Some(w) = c.waypoint.as_ref() else {
                log::warn!("path target is not a waypoint");
                return;
            };
            (c.tr.pos, w.clone())
        };
        let (pos, mins, align_min) = {
            let Some(c) = s.ecs.get(id) else { return };
            let Some(m) = c.mover.as_ref() else { return };
            (c.tr.pos, c.mins, m.align_min)
        };
        let offset = if align_min { mins } else { Vec3::ZERO };
        let dest = cpos - offset;

        if spec.teleport {
            if teleported {
                log::warn!("chained teleport path corners at {cpos}; aborting path resolution");
                if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
                    m.pending = None;
                    m.move_ticks = Ticks::ZERO;
                }
                return;
            }
            teleported = true;
            if let Some(c) = s.ecs.get_mut(id) {
                c.tr.pos = dest;
            }
            s.fx.push(FxEvent {
                kind: FxKind::Teleport,
                pos: dest,
            });
            if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
                m.current = Some(corner);
                m.pending = None;
                m.move_ticks = Ticks::ZERO;
            }
            // continue resolving the rest of the chain in the same tick,
            // without firing arrival targets
            let Some(next_name) = spec.next else { return };
            match s.ecs.resolve(&next_name) {
                Resolve::Found(n) => {
                    corner = n;
                    continue;
                }
                Resolve::NotFound => {
                    log::warn!("path corner target `{next_name}` not found");
                    return;
                }
                Resolve::Destroyed => {
                    log::debug!("path corner target `{next_name}` destroyed");
                    return;
                }
            }
        }

        let dist = (dest - pos).length();
        let (move_time, _) = {
            let Some(m) = s.ecs.get(id).and_then(|c| c.mover.as_ref()) else {
                return;
            };
            (resolve_move_time(&spec, m, dist), ())
        };

        if move_time <= 0.0 || dist <= 1.0 {
            // snap and handle arrival in the same tick
            if let Some(c) = s.ecs.get_mut(id) {
                c.tr.pos = dest;
            }
            set_angle_goal(s, id, &spec, 0.0);
            if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
                m.pending = Some(corner);
                m.move_ticks = Ticks::ZERO;
            }
            arrive(s, id);
            return;
        }

        let ticks = Ticks::from_secs(move_time);
        if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
            m.pending = Some(corner);
            m.move_start = now;
            m.move_ticks = ticks;
            m.start_pos = pos;
            m.end_pos = dest;
        }
        set_angle_goal(s, id, &spec, move_time);
        return;
    }
}

/// Arm the orientation goal for a leg (skipped while a camera tracks).
fn set_angle_goal(s: &mut ServerState, id: ActorId, spec: &WaypointSpec, move_time: f32) {
    let tracking = tracking_target(s, id).is_some();
    let Some(c) = s.ecs.get_mut(id) else { return };
    if let Some(m) = c.mover.as_mut() {
        m.angle_goal = None;
    }
    if tracking || move_time < 0.0 {
        return;
    }
    let start = c.tr.angles_deg;
    let goal = match (spec.rotate, spec.rotate_speed) {
        (Some(rot), _) => Some(start + rot),
        (None, Some(rate)) => Some(start + rate * move_time),
        (None, None) => None,
    };
    let Some(end) = goal else { return };
    let start = Vec3::new(wrap_deg(start.x), wrap_deg(start.y), wrap_deg(start.z));
    let end = Vec3::new(wrap_deg(end.x), wrap_deg(end.y), wrap_deg(end.z));
    if move_time == 0.0 {
        // instant legs snap straight to the goal orientation
        c.tr.angles_deg = end;
    } else if let Some(m) = c.mover.as_mut() {
        m.angle_goal = Some(AngleGoal { start, end });
    }
}

/// Consume the pending waypoint exactly once and run arrival handling.
fn arrive(s: &mut ServerState, id: ActorId) {
    let now = s.time;
    let (corner, activator, toggle) = {
        let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) else {
            return;
        };
        let Some(corner) = m.pending.take() else {
            // double arrival tick: already handled
            return;
        };
        m.current = Some(corner);
        m.move_ticks = Ticks::ZERO;
        m.angle_goal = None;
        (corner, m.activator, m.toggle)
    };
    let spec = {
        let Some(w) = s.ecs.get(corner).and_then(|c| c.waypoint.as_ref()) else {
            return;
        };
        w.clone()
    };
    // fire downstream targets through the generic trigger machinery
    if let Some(name) = &spec.path_target {
        let name = name.clone();
        crate::triggers::fire_targets(s, &name, activator);
        if !s.ecs.alive(id) {
            return;
        }
    }
    if spec.wait > 0.0 {
        if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
            m.wait_until = Some(now + Ticks::from_secs(spec.wait));
        }
        return;
    }
    if spec.wait < 0.0 && toggle {
        // auto-deactivate; the next trigger restarts from the top
        if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
            m.active = false;
            m.current = None;
            m.pending = None;
        }
        return;
    }
    advance_from(s, id, corner);
}

/// Look up the next waypoint by name and depart toward it.
fn advance_from(s: &mut ServerState, id: ActorId, corner: ActorId) {
    let next_name = {
        let Some(w) = s.ecs.get(corner).and_then(|c| c.waypoint.as_ref()) else {
            return;
        };
        match &w.next {
            Some(n) => n.clone(),
            None => return,
        }
    };
    match s.ecs.resolve(&next_name) {
        Resolve::Found(n) => start_path(s, id, n),
        Resolve::NotFound => {
            // broken chain: hold the last position rather than crash
            log::warn!("path corner target `{next_name}` not found");
        }
        Resolve::Destroyed => {
            log::debug!("path corner target `{next_name}` destroyed");
        }
    }
}

/// Per-tick update for every active mover.
pub fn tick_movers(s: &mut ServerState) {
    let ids: Vec<ActorId> = s
        .ecs
        .iter()
        .filter(|c| c.mover.is_some())
        .map(|c| c.id)
        .collect();
    for id in ids {
        tick_one(s, id);
    }
}

fn tick_one(s: &mut ServerState, id: ActorId) {
    let now = s.time;
    let (active, stop_time, is_camera, wait_until, current) = {
        let Some(c) = s.ecs.get(id) else { return };
        let Some(m) = c.mover.as_ref() else { return };
        (
            m.active,
            c.camera.as_ref().and_then(|r| r.stop_time),
            c.camera.is_some(),
            m.wait_until,
            m.current,
        )
    };
    if !active {
        return;
    }
    if let Some(stop) = stop_time {
        if now >= stop {
            camera_stop(s, id);
            return;
        }
    }
    match wait_until {
        Some(t) if now >= t => {
            if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
                m.wait_until = None;
            }
            if let Some(corner) = current {
                advance_from(s, id, corner);
            }
        }
        Some(_) => {
            // still waiting; a tracking camera keeps looking
            update_orientation(s, id);
        }
        None => {
            run_leg(s, id, now);
            update_orientation(s, id);
            if is_camera {
                camera_idle_advance(s, id);
            }
        }
    }
}

fn run_leg(s: &mut ServerState, id: ActorId, now: SimTime) {
    let (pending, move_start, move_ticks, start_pos, end_pos, angle_goal) = {
        let Some(m) = s.ecs.get(id).and_then(|c| c.mover.as_ref()) else {
            return;
        };
        (
            m.pending,
            m.move_start,
            m.move_ticks,
            m.start_pos,
            m.end_pos,
            m.angle_goal,
        )
    };
    if pending.is_none() || move_ticks.0 == 0 {
        return;
    }
    let t = ((now - move_start).0 as f32 / move_ticks.0 as f32).clamp(0.0, 1.0);
    let tracking = tracking_target(s, id).is_some();
    if let Some(c) = s.ecs.get_mut(id) {
        c.tr.pos = start_pos + (end_pos - start_pos) * t;
        if !tracking {
            if let Some(goal) = angle_goal {
                c.tr.angles_deg = Vec3::new(
                    lerp_angle_deg(goal.start.x, goal.end.x, t),
                    lerp_angle_deg(goal.start.y, goal.end.y, t),
                    lerp_angle_deg(goal.start.z, goal.end.z, t),
                );
            }
        }
    }
    if t >= 1.0 {
        // snap exactly to the end values before arrival handling
        if let Some(c) = s.ecs.get_mut(id) {
            c.tr.pos = end_pos;
            if !tracking {
                if let Some(goal) = angle_goal {
                    c.tr.angles_deg = goal.end;
                }
            }
        }
        arrive(s, id);
    }
}

/// Camera think keeps chasing the chain while idle at a corner.
fn camera_idle_advance(s: &mut ServerState, id: ActorId) {
    let (pending, waiting, current, first) = {
        let Some(m) = s.ecs.get(id).and_then(|c| c.mover.as_ref()) else {
            return;
        };
        (
            m.pending,
            m.wait_until.is_some(),
            m.current,
            m.first_corner.clone(),
        )
    };
    if pending.is_some() || waiting {
        return;
    }
    if let Some(corner) = current {
        advance_from(s, id, corner);
    } else if let Some(name) = first {
        match s.ecs.resolve(&name) {
            Resolve::Found(c) => start_path(s, id, c),
            Resolve::NotFound => log::warn!("camera path `{name}` not found"),
            Resolve::Destroyed => log::debug!("camera path `{name}` destroyed"),
        }
    }
}

/// Entity the camera should look at this tick, if any.
fn tracking_target(s: &ServerState, id: ActorId) -> Option<ActorId> {
    let rig = s.ecs.get(id)?.camera.as_ref()?;
    if let Some(t) = rig.track {
        if s.ecs.alive(t) {
            return Some(t);
        }
    }
    if let Some(t) = rig.focus {
        if s.ecs.alive(t) {
            return Some(t);
        }
    }
    None
}

/// Tracking look-at overrides scripted rotation every tick.
fn update_orientation(s: &mut ServerState, id: ActorId) {
    let Some(target) = tracking_target(s, id) else {
        return;
    };
    let aim = {
        let Some(t) = s.ecs.get(target) else { return };
        t.tr.pos + Vec3::new(0.0, t.view_height, 0.0)
    };
    if let Some(c) = s.ecs.get_mut(id) {
        let from = c.tr.pos;
        if (aim - from).length_squared() > 1e-6 {
            c.tr.angles_deg = look_at_deg(from, aim);
        }
    }
}

/// Initial train placement: snap onto the first path corner, then depart if
/// the spawn asked for it.
pub fn train_find(s: &mut ServerState, id: ActorId, start_on: bool) {
    let first = {
        let Some(m) = s.ecs.get(id).and_then(|c| c.mover.as_ref()) else {
            return;
        };
        m.first_corner.clone()
    };
    let Some(name) = first else {
        log::warn!("train without a path target");
        return;
    };
    let corner = match s.ecs.resolve(&name) {
        Resolve::Found(c) => c,
        Resolve::NotFound => {
            log::warn!("train path `{name}` not found");
            return;
        }
        Resolve::Destroyed => {
            log::debug!("train path `{name}` destroyed");
            return;
        }
    };
    let cpos = match s.ecs.get(corner) {
        Some(c) => c.tr.pos,
        None => return,
    };
    if let Some(c) = s.ecs.get_mut(id) {
        let offset = c.mins;
        c.tr.pos = cpos - offset;
        if let Some(m) = c.mover.as_mut() {
            m.current = Some(corner);
        }
    }
    if start_on {
        if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
            m.active = true;
        }
        advance_from(s, id, corner);
    }
}

/// Use-activation for trains: start, resume, or toggle off.
pub fn train_use(s: &mut ServerState, id: ActorId, activator: Option<ActorId>) {
    let (active, toggle, pending, current, first) = {
        let Some(m) = s.ecs.get(id).and_then(|c| c.mover.as_ref()) else {
            return;
        };
        (
            m.active,
            m.toggle,
            m.pending,
            m.current,
            m.first_corner.clone(),
        )
    };
    if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
        m.activator = activator;
    }
    if active {
        if toggle {
            if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
                m.active = false;
                m.wait_until = None;
            }
        }
        return;
    }
    if let Some(m) = s.ecs.get_mut(id).and_then(|c| c.mover.as_mut()) {
        m.active = true;
    }
    if let Some(corner) = pending {
        // resume the interrupted leg from the current position
        start_path(s, id, corner);
    } else if let Some(corner) = current {
        advance_from(s, id, corner);
    } else if let Some(name) = first {
        match s.ecs.resolve(&name) {
            Resolve::Found(c) => start_path(s, id, c),
            Resolve::NotFound => log::warn!("train path `{name}` not found"),
            Resolve::Destroyed => log::debug!("train path `{name}` destroyed"),
        }
    }
}

/// Start a cutscene camera: resolve the stop time, attach every client view,
/// and begin the scripted path if one exists.
pub fn camera_start(
    s: &mut ServerState,
    cam: ActorId,
    activator: Option<ActorId>,
    track: Option<ActorId>,
    wait_override: f32,
) {
    let now = s.time;
    let is_player = |s: &ServerState, id: ActorId| {
        s.ecs
            .get(id)
            .map(|c| c.kind == ActorKind::Player)
            .unwrap_or(false)
    };
    let track = match track {
        Some(t) if s.ecs.alive(t) => Some(t),
        _ => activator.filter(|a| is_player(s, *a)),
    };
    let default_wait = {
        let Some(rig) = s.ecs.get(cam).and_then(|c| c.camera.as_ref()) else {
            return;
        };
        rig.default_wait
    };
    let stop_time = if wait_override < 0.0 || default_wait < 0.0 {
        None
    } else if wait_override > 0.0 {
        Some(now + Ticks::from_secs(wait_override))
    } else if default_wait > 0.0 {
        Some(now + Ticks::from_secs(default_wait))
    } else {
        None
    };
    {
        let Some(c) = s.ecs.get_mut(cam) else { return };
        let Some(rig) = c.camera.as_mut() else { return };
        rig.stop_time = stop_time;
        if let Some(t) = track {
            rig.track = Some(t);
            rig.focus = Some(t);
        }
        let Some(m) = c.mover.as_mut() else { return };
        m.active = true;
        m.activator = activator;
    }
    // attach all client views; the camera think is the single authority
    let players: Vec<ActorId> = s
        .ecs
        .iter()
        .filter(|c| c.kind == ActorKind::Player)
        .map(|c| c.id)
        .collect();
    for p in players {
        if let Some(c) = s.ecs.get_mut(p) {
            c.watching = Some(cam);
        }
    }
    let (has_corner, first) = {
        let Some(m) = s.ecs.get(cam).and_then(|c| c.mover.as_ref()) else {
            return;
        };
        (
            m.current.is_some() || m.pending.is_some(),
            m.first_corner.clone(),
        )
    };
    if !has_corner {
        if let Some(name) = first {
            match s.ecs.resolve(&name) {
                Resolve::Found(c) => start_path(s, cam, c),
                Resolve::NotFound => {
                    log::warn!("camera `{name}` path start not found; camera stays static");
                }
                Resolve::Destroyed => log::debug!("camera path start `{name}` destroyed"),
            }
        }
    }
}

/// Stop a camera and release every attached viewer.
pub fn camera_stop(s: &mut ServerState, cam: ActorId) {
    if let Some(c) = s.ecs.get_mut(cam) {
        if let Some(m) = c.mover.as_mut() {
            m.active = false;
            m.pending = None;
            m.move_ticks = Ticks::ZERO;
            m.wait_until = None;
        }
        if let Some(rig) = c.camera.as_mut() {
            rig.stop_time = None;
        }
    }
    let viewers: Vec<ActorId> = s
        .ecs
        .iter()
        .filter(|c| c.watching == Some(cam))
        .map(|c| c.id)
        .collect();
    for v in viewers {
        if let Some(c) = s.ecs.get_mut(v) {
            c.watching = None;
            c.view = None;
        }
    }
}

/// Copy the camera pose into every attached client view, once per tick.
/// Dependents only read this published state; they never race the camera.
pub fn publish_camera_views(s: &mut ServerState) {
    let viewers: Vec<(ActorId, ActorId)> = s
        .ecs
        .iter()
        .filter_map(|c| c.watching.map(|cam| (c.id, cam)))
        .collect();
    for (viewer, cam) in viewers {
        let pose = {
            match s.ecs.get(cam) {
                Some(c) => {
                    let active = c.mover.as_ref().map(|m| m.active).unwrap_or(false);
                    let frozen = c.camera.as_ref().map(|r| r.freeze).unwrap_or(false);
                    if active {
                        Some(ViewPose {
                            pos: c.tr.pos,
                            angles_deg: c.tr.angles_deg,
                            frozen,
                        })
                    } else {
                        None
                    }
                }
                None => None,
            }
        };
        if let Some(c) = s.ecs.get_mut(viewer) {
            match pose {
                Some(p) => c.view = Some(p),
                None => {
                    // camera gone or inactive: release the viewer
                    c.watching = None;
                    c.view = None;
                }
            }
        }
    }
}
