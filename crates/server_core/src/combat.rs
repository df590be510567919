//! Damage application and radius damage.
//!
//! Systems push `DamageEvent`s and `ExplodeEvent`s onto the tick context;
//! this module drains them in order, applying hit points, knockback, and the
//! pain/death entry points synchronously the way a direct damage call would.

use glam::Vec3;

use crate::ecs::schedule::Ctx;
use crate::ecs::world::{ActorId, ActorKind, DeadState};
use crate::systems::behavior;
use crate::{FxEvent, FxKind, ServerState};

/// Kill-attribution tag carried by every damage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageTag {
    Melee,
    Bolt,
    Rocket,
    Splash,
}

#[derive(Debug, Clone, Copy)]
pub struct DamageEvent {
    pub src: Option<ActorId>,
    pub dst: ActorId,
    pub amount: i32,
    /// Unit direction from attacker to victim, for knockback.
    pub dir: Vec3,
    pub kick: f32,
    pub tag: DamageTag,
}

#[derive(Debug, Clone, Copy)]
pub struct ExplodeEvent {
    pub src: Option<ActorId>,
    pub center: Vec3,
    pub radius: f32,
    pub damage: i32,
}

/// Expand queued explosions into per-target damage with distance falloff.
pub fn aoe_apply(s: &mut ServerState, ctx: &mut Ctx) {
    let booms: Vec<ExplodeEvent> = ctx.boom.drain(..).collect();
    for e in booms {
        s.fx.push(FxEvent {
            kind: FxKind::Explosion,
            pos: e.center,
        });
        let targets: Vec<(ActorId, Vec3)> = s
            .ecs
            .iter()
            .filter(|c| {
                c.hp.alive()
                    && c.dead == DeadState::Alive
                    && matches!(
                        c.kind,
                        ActorKind::Player | ActorKind::Monster | ActorKind::ScriptedActor
                    )
            })
            .map(|c| (c.id, c.tr.pos))
            .collect();
        for (id, pos) in targets {
            let dist = (pos - e.center).length();
            if dist > e.radius {
                continue;
            }
            let amount = (e.damage as f32 - 0.5 * dist).max(1.0) as i32;
            let dir = (pos - e.center).normalize_or_zero();
            ctx.dmg.push(DamageEvent {
                src: e.src,
                dst: id,
                amount,
                dir,
                kick: 12.0,
                tag: DamageTag::Splash,
            });
        }
    }
}

/// Drain the damage bus: hit points, knockback, pain/death hooks.
pub fn apply_damage(s: &mut ServerState, ctx: &mut Ctx) {
    let events: Vec<DamageEvent> = ctx.dmg.drain(..).collect();
    for d in events {
        let (mass, was_alive, kind) = {
            let Some(c) = s.ecs.get(d.dst) else { continue };
            if c.dead == DeadState::Dead {
                continue;
            }
            let mass = behavior::archetype_of(s, d.dst)
                .map(|a| a.mass.max(1))
                .unwrap_or(200);
            (mass as f32, c.hp.alive(), c.kind)
        };
        if !was_alive {
            continue;
        }
        let dead_now = {
            let Some(c) = s.ecs.get_mut(d.dst) else { continue };
            c.hp.hp -= d.amount;
            if d.kick > 0.0 {
                c.vel += d.dir * (d.kick * 500.0 / mass);
            }
            c.hp.hp <= 0
        };
        match kind {
            ActorKind::Monster | ActorKind::ScriptedActor => {
                if dead_now {
                    behavior::die(s, d.dst, d.src, d.amount);
                } else {
                    behavior::pain(s, d.dst, d.src, d.amount);
                }
            }
            ActorKind::Player => {
                if dead_now {
                    if let Some(c) = s.ecs.get_mut(d.dst) {
                        c.dead = DeadState::Dead;
                    }
                }
            }
            _ => {}
        }
    }
}
