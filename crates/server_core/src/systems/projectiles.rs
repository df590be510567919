//! Projectile integration and collision, plus planted charges.
//!
//! Bolts fly straight and damage the first actor their swept segment
//! crosses; rockets detonate on contact, proximity is not modeled. Charges
//! sit on a fuse and enforce a per-owner cap by detonating the oldest when
//! one too many is planted.

use ecs_core::{Health, SimTime, Team, Ticks, Transform, TICK_SECONDS};
use glam::{Vec2, Vec3};

use data_runtime::anim::RocketSide;
use data_runtime::specs::archetypes::ArchetypeSpec;

use crate::combat::{DamageEvent, DamageTag, ExplodeEvent};
use crate::ecs::schedule::Ctx;
use crate::ecs::world::{ActorId, ActorKind, DeadState, MoveMode};
use crate::util::{forward_from_yaw_deg, right_from_yaw_deg};
use crate::{Attenuation, ServerState, SoundChannel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjKind {
    Bolt,
    Rocket,
}

#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub kind: ProjKind,
    pub owner: Option<ActorId>,
    pub damage: i32,
    pub radius: f32,
    pub splash: i32,
    pub expire: SimTime,
}

/// A planted timed charge.
#[derive(Debug, Clone, Copy)]
pub struct Charge {
    pub owner: ActorId,
    pub planted: SimTime,
    pub fuse_at: SimTime,
    pub damage: i32,
    pub radius: f32,
}

/// Muzzle position for a model-space offset (forward/right/up).
fn project_muzzle(pos: Vec3, yaw_deg: f32, offset: [f32; 3]) -> Vec3 {
    let f = forward_from_yaw_deg(yaw_deg);
    let r = right_from_yaw_deg(yaw_deg);
    pos + f * offset[0] + r * offset[1] + Vec3::new(0.0, offset[2], 0.0)
}

fn aim_at_enemy(s: &ServerState, id: ActorId, start: Vec3) -> Option<Vec3> {
    let c = s.ecs.get(id)?;
    let e = s.ecs.get(c.enemy?)?;
    if !e.hp.alive() || e.dead != DeadState::Alive {
        return None;
    }
    let target = e.tr.pos + Vec3::new(0.0, e.view_height, 0.0);
    let d = target - start;
    if d.length_squared() <= 1e-6 {
        return None;
    }
    Some(d.normalize())
}

/// Frame-event entry: fire the archetype's bolt at the current enemy.
/// `aimed` additionally requires visibility and attack range.
pub fn monster_fire_bolt(s: &mut ServerState, id: ActorId, arch: &ArchetypeSpec, aimed: bool) {
    let Some(bolt) = arch.bolt else { return };
    let (pos, yaw) = match s.ecs.get(id) {
        Some(c) => (c.tr.pos, c.tr.yaw_deg()),
        None => return,
    };
    if aimed {
        let target_ok = {
            let target = s.ecs.get(id).and_then(|c| c.enemy).and_then(|e| s.ecs.get(e));
            match target {
                Some(t) => {
                    let dist = (t.tr.pos - pos).length();
                    dist <= arch.attack_range && s.perception.visible(pos, t.tr.pos)
                }
                None => false,
            }
        };
        if !target_ok {
            return;
        }
    }
    let start = project_muzzle(pos, yaw, bolt.offset);
    let Some(dir) = aim_at_enemy(s, id, start) else {
        return;
    };
    if let Some(key) = arch.sounds.attack.clone() {
        s.emit_sound(id, SoundChannel::Weapon, &key, Attenuation::Norm);
    }
    spawn_bolt(s, Some(id), start, dir, bolt.damage, bolt.speed);
}

/// Frame-event entry: fire one of the archetype's rocket hardpoints.
pub fn monster_fire_rocket(s: &mut ServerState, id: ActorId, arch: &ArchetypeSpec, side: RocketSide) {
    let Some(rocket) = arch.rocket else { return };
    let (pos, yaw) = match s.ecs.get(id) {
        Some(c) => (c.tr.pos, c.tr.yaw_deg()),
        None => return,
    };
    let offset = match side {
        RocketSide::Left => rocket.offsets[0],
        RocketSide::Right => rocket.offsets[1],
    };
    let start = project_muzzle(pos, yaw, offset);
    let Some(dir) = aim_at_enemy(s, id, start) else {
        return;
    };
    if let Some(key) = arch.sounds.attack.clone() {
        s.emit_sound(id, SoundChannel::Weapon, &key, Attenuation::Norm);
    }
    spawn_rocket(
        s,
        Some(id),
        start,
        dir,
        rocket.damage,
        rocket.speed,
        rocket.radius,
        rocket.splash,
    );
}

pub fn spawn_bolt(
    s: &mut ServerState,
    owner: Option<ActorId>,
    start: Vec3,
    dir: Vec3,
    damage: i32,
    speed: f32,
) -> ActorId {
    let expire = s.time + Ticks::from_secs(s.tuning.bolt_life_s);
    let id = s.ecs.spawn(
        ActorKind::Projectile,
        Team::Neutral,
        Transform::at(start),
        Health::new(1),
    );
    if let Some(c) = s.ecs.get_mut(id) {
        c.vel = dir * speed;
        c.move_mode = MoveMode::Fly;
        c.projectile = Some(Projectile {
            kind: ProjKind::Bolt,
            owner,
            damage,
            radius: 0.0,
            splash: 0,
            expire,
        });
    }
    id
}

#[allow(clippy::too_many_arguments)]
pub fn spawn_rocket(
    s: &mut ServerState,
    owner: Option<ActorId>,
    start: Vec3,
    dir: Vec3,
    damage: i32,
    speed: f32,
    radius: f32,
    splash: i32,
) -> ActorId {
    let expire = s.time + Ticks::from_secs(s.tuning.rocket_life_s);
    let id = s.ecs.spawn(
        ActorKind::Projectile,
        Team::Neutral,
        Transform::at(start),
        Health::new(1),
    );
    if let Some(c) = s.ecs.get_mut(id) {
        c.vel = dir * speed;
        c.move_mode = MoveMode::Fly;
        c.projectile = Some(Projectile {
            kind: ProjKind::Rocket,
            owner,
            damage,
            radius,
            splash,
            expire,
        });
    }
    id
}

/// Plant a timed charge. One owner may keep at most
/// `max_charges_per_owner` alive: planting past the cap detonates the oldest
/// (lowest plant time) instead of rejecting the new one.
pub fn plant_charge(s: &mut ServerState, owner: ActorId, pos: Vec3) -> ActorId {
    let now = s.time;
    let tuning = s.tuning;
    let id = s.ecs.spawn(
        ActorKind::Charge,
        Team::Neutral,
        Transform::at(pos),
        Health::new(1),
    );
    if let Some(c) = s.ecs.get_mut(id) {
        c.charge = Some(Charge {
            owner,
            planted: now,
            fuse_at: now + Ticks::from_secs(tuning.charge_fuse_s),
            damage: tuning.charge_damage,
            radius: tuning.charge_radius,
        });
    }
    let mut mine: Vec<(SimTime, ActorId)> = s
        .ecs
        .iter()
        .filter_map(|c| {
            c.charge
                .filter(|ch| ch.owner == owner)
                .map(|ch| (ch.planted, c.id))
        })
        .collect();
    if mine.len() > tuning.max_charges_per_owner {
        mine.sort_by_key(|(planted, id)| (*planted, id.index));
        let (_, oldest) = mine[0];
        detonate_charge(s, oldest);
    }
    id
}

/// Detonations queue on the state so charge eviction works outside the tick.
fn detonate_charge(s: &mut ServerState, id: ActorId) {
    let Some(c) = s.ecs.get(id) else { return };
    let Some(ch) = c.charge else { return };
    let pos = c.tr.pos;
    s.pending_boom.push(ExplodeEvent {
        src: Some(ch.owner),
        center: pos,
        radius: ch.radius,
        damage: ch.damage,
    });
    s.emit_sound(id, SoundChannel::Auto, "world/explosion", Attenuation::Norm);
    s.ecs.despawn(id);
}

/// Advance charge fuses.
pub fn tick_charges(s: &mut ServerState) {
    let now = s.time;
    let due: Vec<ActorId> = s
        .ecs
        .iter()
        .filter(|c| c.charge.map(|ch| now >= ch.fuse_at).unwrap_or(false))
        .map(|c| c.id)
        .collect();
    for id in due {
        detonate_charge(s, id);
    }
}

/// Integrate all projectiles one tick and collide their swept segments.
pub fn integrate(s: &mut ServerState, ctx: &mut Ctx) {
    let now = s.time;
    let ids: Vec<ActorId> = s
        .ecs
        .iter()
        .filter(|c| c.projectile.is_some())
        .map(|c| c.id)
        .collect();
    for id in ids {
        let (p0, vel, proj) = {
            let Some(c) = s.ecs.get(id) else { continue };
            let Some(p) = c.projectile else { continue };
            (c.tr.pos, c.vel, p)
        };
        let p1 = p0 + vel * TICK_SECONDS;
        if let Some(c) = s.ecs.get_mut(id) {
            c.tr.pos = p1;
        }

        if now >= proj.expire {
            match proj.kind {
                ProjKind::Rocket => ctx.boom.push(ExplodeEvent {
                    src: proj.owner,
                    center: p1,
                    radius: proj.radius,
                    damage: proj.splash,
                }),
                ProjKind::Bolt => {}
            }
            s.ecs.despawn(id);
            continue;
        }

        let hit = {
            let mut found: Option<ActorId> = None;
            for t in s.ecs.iter() {
                if !t.hp.alive() || t.dead != DeadState::Alive {
                    continue;
                }
                if !matches!(
                    t.kind,
                    ActorKind::Player | ActorKind::Monster | ActorKind::ScriptedActor
                ) {
                    continue;
                }
                if proj.owner == Some(t.id) {
                    continue;
                }
                if segment_hits_circle_xz(p0, p1, t.tr.pos, t.tr.radius.max(8.0)) {
                    found = Some(t.id);
                    break;
                }
            }
            found
        };
        if let Some(target) = hit {
            match proj.kind {
                ProjKind::Bolt => {
                    let dir = vel.normalize_or_zero();
                    ctx.dmg.push(DamageEvent {
                        src: proj.owner,
                        dst: target,
                        amount: proj.damage,
                        dir,
                        kick: 4.0,
                        tag: DamageTag::Bolt,
                    });
                }
                ProjKind::Rocket => {
                    // direct hit plus splash around the impact
                    let dir = vel.normalize_or_zero();
                    ctx.dmg.push(DamageEvent {
                        src: proj.owner,
                        dst: target,
                        amount: proj.damage,
                        dir,
                        kick: 20.0,
                        tag: DamageTag::Rocket,
                    });
                    ctx.boom.push(ExplodeEvent {
                        src: proj.owner,
                        center: p1,
                        radius: proj.radius,
                        damage: proj.splash,
                    });
                }
            }
            s.ecs.despawn(id);
        }
    }
}

/// Swept segment vs circle on the ground plane.
#[inline]
fn segment_hits_circle_xz(p0: Vec3, p1: Vec3, center: Vec3, radius: f32) -> bool {
    let a = Vec2::new(p0.x, p0.z);
    let b = Vec2::new(p1.x, p1.z);
    let c = Vec2::new(center.x, center.z);
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= 1e-12 {
        return (a - c).length_squared() <= radius * radius;
    }
    let t = ((c - a).dot(ab) / len2).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (closest - c).length_squared() <= radius * radius
}
