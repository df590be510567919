//! Frame-table interpreter.
//!
//! One frame per simulation tick: apply the frame's movement delta along the
//! entity's facing, fire its side-effect event, then advance the cursor. When
//! the cursor sits on the last frame the table's continuation runs
//! synchronously; a table without one freezes there, still firing that
//! frame's event every tick (single-frame idle loops rely on this). The
//! cursor never leaves `[first, last]`.

use glam::Vec3;
use rand::Rng;

use data_runtime::anim::{AiStep, FrameEvent, MoveDef, RocketSide, SequenceEnd};
use data_runtime::specs::archetypes::ArchetypeSpec;

use crate::combat::{DamageEvent, DamageTag};
use crate::ecs::schedule::Ctx;
use crate::ecs::world::{ActorId, DeadState, MoveMode};
use crate::systems::behavior::{self, MoveKey};
use crate::systems::{combo, projectiles};
use crate::util::vec_to_yaw_deg;
use crate::{Attenuation, ServerState, SoundChannel};

/// Advance every behavior-driven entity by one frame.
pub fn advance_all(s: &mut ServerState, ctx: &mut Ctx) {
    let ids: Vec<ActorId> = s
        .ecs
        .iter()
        .filter(|c| c.behavior.is_some())
        .map(|c| c.id)
        .collect();
    for id in ids {
        advance(s, ctx, id);
    }
}

fn advance(s: &mut ServerState, ctx: &mut Ctx, id: ActorId) {
    let (key, frame) = {
        let Some(c) = s.ecs.get(id) else { return };
        if c.dead == DeadState::Dead {
            // corpse at rest
            return;
        }
        let Some(b) = c.behavior.as_ref() else { return };
        if b.hold_frame {
            // scripted wait: the pose is frozen, no movement or events
            return;
        }
        (b.current, b.frame)
    };
    let Some(arch) = behavior::archetype_of(s, id) else {
        return;
    };
    let Some(mv) = behavior::resolve_move(&arch, key) else {
        behavior::install(s, id, MoveKey::Stand);
        return;
    };
    let mv: MoveDef = mv.clone();
    let frame = frame.clamp(mv.first, mv.last);
    let idx = (frame - mv.first) as usize;
    let Some(fr) = mv.frames.get(idx).copied() else {
        return;
    };

    apply_ai_step(s, id, fr.ai, fr.dist);
    if let Some(ev) = fr.event {
        fire_event(s, ctx, id, &arch, ev);
    }

    // the event may have despawned us or switched tables (via damage hooks)
    let Some(b) = s.ecs.get(id).and_then(|c| c.behavior.as_ref()) else {
        return;
    };
    if b.current != key || b.hold_frame {
        return;
    }

    if frame >= mv.last {
        match mv.on_end {
            Some(end) => apply_sequence_end(s, id, &arch, end),
            // no continuation: freeze on the last frame
            None => set_frame(s, id, mv.last),
        }
    } else {
        set_frame(s, id, frame + 1);
    }
}

fn set_frame(s: &mut ServerState, id: ActorId, frame: u16) {
    if let Some(b) = s.ecs.get_mut(id).and_then(|c| c.behavior.as_mut()) {
        b.frame = frame;
    }
}

/// Movement goal for walk-style steps: enemy first, then the scripted
/// controller.
fn goal_pos(s: &ServerState, id: ActorId) -> Option<Vec3> {
    let c = s.ecs.get(id)?;
    if let Some(e) = c.enemy {
        if let Some(t) = s.ecs.get(e) {
            if t.hp.alive() {
                return Some(t.tr.pos);
            }
        }
    }
    let node = c.script.as_ref()?.controller?;
    s.ecs.get(node).map(|n| n.tr.pos)
}

fn apply_ai_step(s: &mut ServerState, id: ActorId, ai: AiStep, dist: f32) {
    match ai {
        AiStep::Stand => {}
        AiStep::Turn => {
            if let Some(goal) = goal_pos(s, id) {
                face(s, id, goal);
            }
        }
        AiStep::Walk | AiStep::Run | AiStep::Charge => {
            let goal = goal_pos(s, id);
            if let Some(g) = goal {
                face(s, id, g);
            }
            translate(s, id, dist, goal);
        }
        AiStep::Move => translate(s, id, dist, None),
    }
}

fn face(s: &mut ServerState, id: ActorId, toward: Vec3) {
    if let Some(c) = s.ecs.get_mut(id) {
        let d = toward - c.tr.pos;
        if d.length_squared() > 1e-6 {
            c.tr.angles_deg.y = vec_to_yaw_deg(d);
        }
    }
}

/// Step along the facing; never overshoot a known goal.
fn translate(s: &mut ServerState, id: ActorId, dist: f32, goal: Option<Vec3>) {
    if let Some(c) = s.ecs.get_mut(id) {
        let mut step = dist;
        if let Some(g) = goal {
            let remaining = (g - c.tr.pos).length();
            if dist > 0.0 {
                step = dist.min(remaining);
            }
        }
        let f = c.tr.forward();
        c.tr.pos += f * step;
    }
}

fn fire_event(s: &mut ServerState, ctx: &mut Ctx, id: ActorId, arch: &ArchetypeSpec, ev: FrameEvent) {
    match ev {
        FrameEvent::Step => {
            if let Some(key) = arch.sounds.step.clone() {
                s.emit_sound(id, SoundChannel::Body, &key, Attenuation::Norm);
            }
        }
        FrameEvent::IdleVoice => {
            if s.rng.gen::<f32>() < arch.idle_chance {
                if let Some(key) = arch.sounds.idle.clone() {
                    s.emit_sound(id, SoundChannel::Voice, &key, Attenuation::Idle);
                }
            }
        }
        FrameEvent::Claw { damage } => {
            if !behavior::enemy_in_melee_reach(s, id) {
                return;
            }
            let Some(c) = s.ecs.get(id) else { return };
            let Some(eid) = c.enemy else { return };
            let Some(e) = s.ecs.get(eid) else { return };
            let dir = (e.tr.pos - c.tr.pos).normalize_or_zero();
            if !arch.sounds.melee.is_empty() {
                let i = s.rng.gen_range(0..arch.sounds.melee.len());
                let key = arch.sounds.melee[i].clone();
                s.emit_sound(id, SoundChannel::Weapon, &key, Attenuation::Norm);
            }
            ctx.dmg.push(DamageEvent {
                src: Some(id),
                dst: eid,
                amount: damage,
                dir,
                kick: 8.0,
                tag: DamageTag::Melee,
            });
        }
        FrameEvent::FireBolt => {
            projectiles::monster_fire_bolt(s, id, arch, false);
        }
        FrameEvent::AimedBolt => {
            projectiles::monster_fire_bolt(s, id, arch, true);
        }
        FrameEvent::FireRocket { side } => {
            projectiles::monster_fire_rocket(s, id, arch, side);
        }
        FrameEvent::RocketBurst { cooldown_s } => {
            projectiles::monster_fire_rocket(s, id, arch, RocketSide::Right);
            let deadline = s.time + ecs_core::Ticks::from_secs(cooldown_s);
            if let Some(b) = s.ecs.get_mut(id).and_then(|c| c.behavior.as_mut()) {
                b.attack_finished = deadline;
            }
        }
        FrameEvent::Warmup => {
            if let Some(key) = arch.sounds.attack.clone() {
                s.emit_sound(id, SoundChannel::Weapon, &key, Attenuation::Norm);
            }
        }
        FrameEvent::Thud => {
            if let Some(key) = arch.sounds.death.clone() {
                s.emit_sound(id, SoundChannel::Body, &key, Attenuation::Norm);
            }
        }
        FrameEvent::SettleDead => settle_dead(s, id),
    }
}

/// Latch the corpse state. Death tables repeat this on trailing frames so a
/// partially-interrupted death still comes to rest.
fn settle_dead(s: &mut ServerState, id: ActorId) {
    if let Some(c) = s.ecs.get_mut(id) {
        c.dead = DeadState::Dead;
        c.move_mode = MoveMode::Toss;
        c.vel = Vec3::ZERO;
    }
}

fn apply_sequence_end(s: &mut ServerState, id: ActorId, arch: &ArchetypeSpec, end: SequenceEnd) {
    match end {
        SequenceEnd::Run => behavior::resume_locomotion(s, id),
        SequenceEnd::Stand => behavior::stand(s, id),
        SequenceEnd::IdleClosed => behavior::install(s, id, MoveKey::IdleClosed),
        SequenceEnd::Dead => settle_dead(s, id),
        SequenceEnd::PostAttack => {
            let again = {
                let visible_in_range = ranged_target_available(s, id, arch);
                visible_in_range && s.rng.gen::<f32>() < arch.post_attack_repeat_chance
            };
            if again {
                behavior::install(s, id, MoveKey::Attack);
            } else {
                behavior::resume_locomotion(s, id);
            }
        }
        SequenceEnd::ComboGate => combo::advance_chain(s, id),
        SequenceEnd::Recovered => {
            let deadline = s.time + ecs_core::Ticks::from_secs(arch.attack_cooldown_s);
            if let Some(b) = s.ecs.get_mut(id).and_then(|c| c.behavior.as_mut()) {
                b.attack_finished = deadline;
            }
            behavior::resume_locomotion(s, id);
        }
    }
}

fn ranged_target_available(s: &ServerState, id: ActorId, arch: &ArchetypeSpec) -> bool {
    let Some(c) = s.ecs.get(id) else { return false };
    let Some(eid) = c.enemy else { return false };
    let Some(e) = s.ecs.get(eid) else { return false };
    if !e.hp.alive() || e.dead != DeadState::Alive {
        return false;
    }
    let dist = (e.tr.pos - c.tr.pos).length();
    dist <= arch.attack_range && s.perception.visible(c.tr.pos, e.tr.pos)
}
