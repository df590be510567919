//! Ordered per-tick systems.
//!
//! One tick runs: behavior selection, frame advance, path movers, scripted
//! actors, projectile/charge integration, explosion expansion, damage
//! application, mission countdowns, camera view publication, cleanup. All
//! mutation is synchronous and serialized by this order; suspension is
//! expressed purely through deadline fields checked on later ticks.

use crate::combat::{self, DamageEvent, ExplodeEvent};
use crate::ecs::world::ActorId;
use crate::systems::{behavior, path, projectiles, script};
use crate::{frames, ServerState};

/// Per-tick event buses.
#[derive(Default)]
pub struct Ctx {
    pub dmg: Vec<DamageEvent>,
    pub boom: Vec<ExplodeEvent>,
}

pub struct Schedule;

impl Schedule {
    pub fn run(s: &mut ServerState) {
        let mut ctx = Ctx::default();
        ctx.boom.append(&mut s.pending_boom);
        behavior::think_all(s);
        frames::advance_all(s, &mut ctx);
        path::tick_movers(s);
        script::tick_actors(s);
        projectiles::integrate(s, &mut ctx);
        projectiles::tick_charges(s);
        ctx.boom.append(&mut s.pending_boom);
        combat::aoe_apply(s, &mut ctx);
        combat::apply_damage(s, &mut ctx);
        s.mission.frame_update();
        path::publish_camera_views(s);
        cleanup(s);
    }
}

fn cleanup(s: &mut ServerState) {
    let now = s.time;
    let expired: Vec<ActorId> = s
        .ecs
        .iter()
        .filter(|c| c.despawn_at.map(|t| now >= t).unwrap_or(false))
        .map(|c| c.id)
        .collect();
    for id in expired {
        s.ecs.despawn(id);
    }
}
