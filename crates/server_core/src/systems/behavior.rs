//! Behavior state selection for monsters and scripted actors.
//!
//! One selector drives every archetype: the per-kind differences live in the
//! archetype registry (tables, ranges, pain gates), not in per-monster code.
//! The selector only swaps locomotion tables; action tables (attack, pain,
//! death, combo links) run to their continuation before locomotion resumes.

use ecs_core::{SimTime, Team, Ticks};
use glam::Vec3;
use rand::Rng;

use data_runtime::specs::archetypes::{ArchetypeSpec, RangeBucket};
use data_runtime::anim::MoveDef;

use crate::ecs::world::{ActorId, ActorKind, DeadState, MoveMode};
use crate::systems::combo::{self, ComboStage, ComboState, ComboVariant};
use crate::util::vec_to_yaw_deg;
use crate::{Attenuation, FxEvent, FxKind, ServerState, SoundChannel};

/// Which frame table a behavior record is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Stand,
    IdleClosed,
    Activate,
    Deactivate,
    Walk(usize),
    Run(usize),
    Attack,
    ComboVariant(ComboVariant),
    ComboFinisher,
    ComboRecover,
    Pain,
    Death,
    Flourish(usize),
}

impl MoveKey {
    /// Locomotion tables may be swapped freely; action tables run to their
    /// continuation.
    #[inline]
    pub fn is_locomotion(self) -> bool {
        matches!(
            self,
            MoveKey::Stand | MoveKey::IdleClosed | MoveKey::Walk(_) | MoveKey::Run(_)
        )
    }
}

/// Per-entity mutable behavior state: table cursor plus the timing fields the
/// selector and combo logic gate on.
#[derive(Debug, Clone)]
pub struct BehaviorRecord {
    pub archetype: String,
    pub current: MoveKey,
    pub frame: u16,
    pub pain_debounce: SimTime,
    pub attack_finished: SimTime,
    pub combo: ComboState,
    pub stagger_until: SimTime,
    pub stand_ground: bool,
    /// Hold the current frame without advancing (scripted waits).
    pub hold_frame: bool,
    pub voice_toggle: bool,
}

impl BehaviorRecord {
    pub fn new(archetype: &str, current: MoveKey, first_frame: u16) -> Self {
        Self {
            archetype: archetype.to_string(),
            current,
            frame: first_frame,
            pain_debounce: SimTime::default(),
            attack_finished: SimTime::default(),
            combo: ComboState::default(),
            stagger_until: SimTime::default(),
            stand_ground: false,
            hold_frame: false,
            voice_toggle: false,
        }
    }
}

/// Look up the frame table a key refers to.
pub fn resolve_move(arch: &ArchetypeSpec, key: MoveKey) -> Option<&MoveDef> {
    match key {
        MoveKey::Stand => Some(&arch.stand),
        MoveKey::IdleClosed => arch.idle_closed.as_ref(),
        MoveKey::Activate => arch.activate.as_ref(),
        MoveKey::Deactivate => arch.deactivate.as_ref(),
        MoveKey::Walk(i) => arch.walks.get(i).map(|w| &w.table),
        MoveKey::Run(i) => arch.runs.get(i).map(|w| &w.table),
        MoveKey::Attack => arch.attack.as_ref(),
        MoveKey::ComboVariant(v) => arch.combo.as_ref().map(|c| match v {
            ComboVariant::Left => &c.variants.left,
            ComboVariant::Right => &c.variants.right,
        }),
        MoveKey::ComboFinisher => arch.combo.as_ref().map(|c| &c.finisher),
        MoveKey::ComboRecover => arch.combo.as_ref().map(|c| &c.recover),
        MoveKey::Pain => Some(&arch.pain),
        MoveKey::Death => Some(&arch.death),
        MoveKey::Flourish(i) => arch.flourishes.get(i),
    }
}

/// Install a frame table, resetting the cursor to its first frame.
pub fn install(s: &mut ServerState, id: ActorId, key: MoveKey) {
    let first = {
        let Some(c) = s.ecs.get(id) else { return };
        let Some(b) = c.behavior.as_ref() else { return };
        let Some(arch) = s.registry.get(&b.archetype) else {
            return;
        };
        match resolve_move(arch, key) {
            Some(mv) => mv.first,
            None => {
                log::warn!("archetype `{}` has no table for {key:?}", b.archetype);
                arch.stand.first
            }
        }
    };
    if let Some(c) = s.ecs.get_mut(id) {
        if let Some(b) = c.behavior.as_mut() {
            b.current = key;
            b.frame = first;
            b.hold_frame = false;
        }
    }
}

pub fn stand(s: &mut ServerState, id: ActorId) {
    if current_key(s, id) != Some(MoveKey::Stand) {
        install(s, id, MoveKey::Stand);
    }
}

/// Pick and install a walk table (weighted, bucket ignored without an enemy).
pub fn walk(s: &mut ServerState, id: ActorId) {
    if matches!(current_key(s, id), Some(MoveKey::Walk(_))) {
        return;
    }
    let idx = {
        let Some(arch) = archetype_of(s, id) else { return };
        pick_weighted(s, &arch.walks, None)
    };
    install(s, id, MoveKey::Walk(idx));
}

/// Pick and install a run table using the near/far distance bucket.
pub fn run(s: &mut ServerState, id: ActorId) {
    if matches!(current_key(s, id), Some(MoveKey::Run(_))) {
        return;
    }
    let idx = {
        let Some(arch) = archetype_of(s, id) else { return };
        let bucket = enemy_distance(s, id).map(|d| {
            if d < arch.near_range {
                RangeBucket::Near
            } else {
                RangeBucket::Far
            }
        });
        pick_weighted(s, &arch.runs, bucket)
    };
    install(s, id, MoveKey::Run(idx));
}

/// Open an attack if the attack-finished gate allows one. At most one attack
/// (or combo chain) is in flight per entity.
pub fn attack(s: &mut ServerState, id: ActorId) {
    let now = s.time;
    let (ready, comboing, melee_combo) = {
        let Some(c) = s.ecs.get(id) else { return };
        let Some(b) = c.behavior.as_ref() else { return };
        let Some(arch) = s.registry.get(&b.archetype) else {
            return;
        };
        (
            now >= b.attack_finished,
            b.combo.stage != ComboStage::None,
            arch.combo.is_some(),
        )
    };
    if !ready || comboing {
        return;
    }
    if melee_combo && enemy_in_melee_reach(s, id) {
        combo::start(s, id);
        return;
    }
    let deadline = {
        let Some(arch) = archetype_of(s, id) else { return };
        let Some(mv) = arch.attack.as_ref() else {
            return;
        };
        now + Ticks(mv.frame_count() as u64) + Ticks::from_secs(arch.attack_cooldown_s)
    };
    install(s, id, MoveKey::Attack);
    if let Some(b) = s.ecs.get_mut(id).and_then(|c| c.behavior.as_mut()) {
        b.attack_finished = deadline;
    }
}

/// Pain entry point, invoked from damage application.
pub fn pain(s: &mut ServerState, id: ActorId, _attacker: Option<ActorId>, damage: i32) {
    let now = s.time;
    let Some(arch) = archetype_of(s, id) else {
        return;
    };
    let (hp, max) = {
        let Some(c) = s.ecs.get(id) else { return };
        if c.dead != DeadState::Alive {
            return;
        }
        (c.hp.hp, c.hp.max)
    };
    // wounded reflex applies even while the debounce holds
    if arch.pain_resets_attack_below_half && hp < max / 2 {
        if let Some(b) = s.ecs.get_mut(id).and_then(|c| c.behavior.as_mut()) {
            b.attack_finished = now;
        }
    }
    if damage < arch.pain_damage_threshold {
        return;
    }
    let debounced = {
        let Some(b) = s.ecs.get(id).and_then(|c| c.behavior.as_ref()) else {
            return;
        };
        now < b.pain_debounce
    };
    if debounced {
        return;
    }
    if arch.pain_light_limit > 0
        && damage <= arch.pain_light_limit
        && s.rng.gen::<f32>() > arch.pain_light_chance
    {
        return;
    }
    let voice = {
        let Some(b) = s.ecs.get_mut(id).and_then(|c| c.behavior.as_mut()) else {
            return;
        };
        b.pain_debounce = now + Ticks::from_secs(arch.pain_debounce_s);
        if arch.stagger_s > 0.0 {
            b.stagger_until = now + Ticks::from_secs(arch.stagger_s);
        }
        // an interrupted combo never resumes mid-chain
        b.combo.stage = ComboStage::None;
        b.voice_toggle = !b.voice_toggle;
        b.voice_toggle
    };
    // alternate between the two pain voice samples
    if !arch.sounds.pain.is_empty() {
        let idx = if voice { 0 } else { 1 };
        let key = arch.sounds.pain[idx % arch.sounds.pain.len()].clone();
        s.emit_sound(id, SoundChannel::Voice, &key, Attenuation::Norm);
    }
    install(s, id, MoveKey::Pain);
}

/// Death entry point. Health at or below the gib threshold throws debris and
/// skips the scripted death table entirely.
pub fn die(s: &mut ServerState, id: ActorId, _attacker: Option<ActorId>, damage: i32) {
    let now = s.time;
    let Some(arch) = archetype_of(s, id) else {
        return;
    };
    let (hp, pos, already_dead) = {
        let Some(c) = s.ecs.get(id) else { return };
        (c.hp.hp, c.tr.pos, c.dead == DeadState::Dead)
    };
    if already_dead {
        return;
    }
    if let Some(key) = arch.sounds.death.clone() {
        s.emit_sound(id, SoundChannel::Voice, &key, Attenuation::Norm);
    }
    if hp <= arch.gib_health {
        if let Some(key) = arch.sounds.gib.clone() {
            s.emit_sound(id, SoundChannel::Voice, &key, Attenuation::Norm);
        }
        s.fx.push(FxEvent {
            kind: FxKind::GibSpray,
            pos,
        });
        spawn_debris(s, pos, arch.gib_count, damage);
        if let Some(c) = s.ecs.get_mut(id) {
            c.dead = DeadState::Dead;
            c.move_mode = MoveMode::Toss;
            c.vel = Vec3::ZERO;
            c.despawn_at = Some(now + Ticks::from_secs(2.0));
            if let Some(b) = c.behavior.as_mut() {
                b.combo.stage = ComboStage::None;
            }
        }
        return;
    }
    if let Some(c) = s.ecs.get_mut(id) {
        c.dead = DeadState::Dying;
        if let Some(b) = c.behavior.as_mut() {
            b.combo.stage = ComboStage::None;
        }
    }
    install(s, id, MoveKey::Death);
}

/// `SequenceEnd::Run`: resume whatever locomotion fits the entity now.
pub fn resume_locomotion(s: &mut ServerState, id: ActorId) {
    // scripted one-shot attacks release their hold here
    let release = {
        let Some(c) = s.ecs.get(id) else { return };
        c.script.as_ref().map(|sc| sc.shoot_once).unwrap_or(false)
    };
    if release {
        if let Some(c) = s.ecs.get_mut(id) {
            c.enemy = None;
            if let Some(sc) = c.script.as_mut() {
                sc.shoot_once = false;
            }
            if let Some(b) = c.behavior.as_mut() {
                b.stand_ground = false;
            }
        }
    }
    let (has_enemy, has_controller) = {
        let Some(c) = s.ecs.get(id) else { return };
        let live_enemy = c
            .enemy
            .map(|e| s.ecs.get(e).map(|t| t.hp.alive()).unwrap_or(false))
            .unwrap_or(false);
        let ctrl = c
            .script
            .as_ref()
            .and_then(|sc| sc.controller)
            .map(|n| s.ecs.alive(n))
            .unwrap_or(false);
        (live_enemy, ctrl)
    };
    if has_enemy {
        run(s, id);
    } else if has_controller {
        walk(s, id);
    } else {
        stand(s, id);
    }
}

/// Per-tick selector pass over every behavior-driven entity.
pub fn think_all(s: &mut ServerState) {
    let ids: Vec<ActorId> = s
        .ecs
        .iter()
        .filter(|c| c.behavior.is_some())
        .map(|c| c.id)
        .collect();
    for id in ids {
        think_one(s, id);
    }
}

fn think_one(s: &mut ServerState, id: ActorId) {
    let now = s.time;
    let (kind, team, pos, dead) = {
        let Some(c) = s.ecs.get(id) else { return };
        (c.kind, c.team, c.tr.pos, c.dead)
    };
    if dead != DeadState::Alive {
        return;
    }
    let Some(arch) = archetype_of(s, id) else {
        return;
    };

    // liveness is re-validated every tick, never cached across ticks
    let mut enemy = s.ecs.get(id).and_then(|c| c.enemy);
    if let Some(e) = enemy {
        let gone = match s.ecs.get(e) {
            None => true,
            Some(t) => !t.hp.alive() || t.dead != DeadState::Alive,
        };
        if gone {
            enemy = None;
            if let Some(c) = s.ecs.get_mut(id) {
                c.enemy = None;
            }
            if let Some(key) = arch.sounds.search.clone() {
                s.emit_sound(id, SoundChannel::Voice, &key, Attenuation::Idle);
            }
        }
    }

    // monsters acquire; scripted actors only fight targets handed to them
    if enemy.is_none() && kind == ActorKind::Monster && team == Team::Monsters {
        if let Some(t) = s.ecs.nearest_hostile(team, pos, arch.aggro_range) {
            let tpos = match s.ecs.get(t) {
                Some(c) => c.tr.pos,
                None => return,
            };
            if s.perception.visible(pos, tpos) {
                if let Some(c) = s.ecs.get_mut(id) {
                    c.enemy = Some(t);
                }
                enemy = Some(t);
                sight(s, id, &arch);
            }
        }
    }

    let Some(current) = current_key(s, id) else {
        return;
    };
    if !current.is_locomotion() {
        return;
    }

    let Some(eid) = enemy else {
        // no target: pursuit stops; actor walking is owned by the script
        // system, and a pinned turret folds closed again
        if matches!(current, MoveKey::Run(_)) {
            stand(s, id);
        } else if current == MoveKey::Stand && arch.deactivate.is_some() {
            let pinned = s
                .ecs
                .get(id)
                .and_then(|c| c.behavior.as_ref())
                .map(|b| b.stand_ground)
                .unwrap_or(false);
            if pinned {
                install(s, id, MoveKey::Deactivate);
            }
        }
        return;
    };

    let (epos, eradius) = match s.ecs.get(eid) {
        Some(t) => (t.tr.pos, t.tr.radius),
        None => return,
    };
    let dist = (epos - pos).length();
    let visible = s.perception.visible(pos, epos);
    let (ready, pinned) = {
        let Some(b) = s.ecs.get(id).and_then(|c| c.behavior.as_ref()) else {
            return;
        };
        (
            now >= b.attack_finished && b.combo.stage == ComboStage::None,
            b.stand_ground || now < b.stagger_until,
        )
    };

    // a sighted turret unfolds before anything else
    if current == MoveKey::IdleClosed {
        if arch.activate.is_some() {
            install(s, id, MoveKey::Activate);
        } else {
            run(s, id);
        }
        return;
    }

    let melee_capable = arch.combo.is_some() || (arch.melee_range > 0.0 && arch.attack.is_some());
    if ready && visible && melee_capable && dist <= arch.melee_range + eradius {
        face(s, id, epos);
        attack(s, id);
        return;
    }
    if ready && visible && arch.attack_range > 0.0 && dist <= arch.attack_range {
        face(s, id, epos);
        attack(s, id);
        return;
    }

    if pinned {
        face(s, id, epos);
        stand(s, id);
    } else {
        run(s, id);
    }
}

fn sight(s: &mut ServerState, id: ActorId, arch: &ArchetypeSpec) {
    if let Some(key) = arch.sounds.sight.clone() {
        s.emit_sound(id, SoundChannel::Voice, &key, Attenuation::Norm);
    }
    match current_key(s, id) {
        Some(MoveKey::IdleClosed) if arch.activate.is_some() => {
            install(s, id, MoveKey::Activate);
        }
        Some(k) if k.is_locomotion() => run(s, id),
        _ => {}
    }
}

/// Melee reach test shared by the selector, claw events, and the combo gate.
pub fn enemy_in_melee_reach(s: &ServerState, id: ActorId) -> bool {
    let Some(c) = s.ecs.get(id) else { return false };
    let Some(b) = c.behavior.as_ref() else {
        return false;
    };
    let Some(arch) = s.registry.get(&b.archetype) else {
        return false;
    };
    let Some(eid) = c.enemy else { return false };
    let Some(e) = s.ecs.get(eid) else { return false };
    if !e.hp.alive() || e.dead != DeadState::Alive {
        return false;
    }
    (e.tr.pos - c.tr.pos).length() <= arch.melee_range + e.tr.radius
}

pub(crate) fn current_key(s: &ServerState, id: ActorId) -> Option<MoveKey> {
    s.ecs.get(id).and_then(|c| c.behavior.as_ref()).map(|b| b.current)
}

pub(crate) fn archetype_of(
    s: &ServerState,
    id: ActorId,
) -> Option<std::sync::Arc<ArchetypeSpec>> {
    let c = s.ecs.get(id)?;
    let b = c.behavior.as_ref()?;
    s.registry.get(&b.archetype).cloned()
}

pub(crate) fn enemy_distance(s: &ServerState, id: ActorId) -> Option<f32> {
    let c = s.ecs.get(id)?;
    let e = s.ecs.get(c.enemy?)?;
    Some((e.tr.pos - c.tr.pos).length())
}

fn face(s: &mut ServerState, id: ActorId, toward: Vec3) {
    if let Some(c) = s.ecs.get_mut(id) {
        let d = toward - c.tr.pos;
        if d.length_squared() > 1e-6 {
            c.tr.angles_deg.y = vec_to_yaw_deg(d);
        }
    }
}

fn pick_weighted(
    s: &mut ServerState,
    moves: &[data_runtime::specs::archetypes::WeightedMove],
    bucket: Option<RangeBucket>,
) -> usize {
    let eligible: Vec<(usize, u32)> = moves
        .iter()
        .enumerate()
        .filter(|(_, m)| match (bucket, m.bucket) {
            (_, RangeBucket::Any) => true,
            (None, _) => true,
            (Some(b), mb) => b == mb,
        })
        .map(|(i, m)| (i, m.weight.max(1)))
        .collect();
    if eligible.is_empty() {
        return 0;
    }
    let total: u32 = eligible.iter().map(|(_, w)| w).sum();
    let mut roll = s.rng.gen_range(0..total);
    for (i, w) in &eligible {
        if roll < *w {
            return *i;
        }
        roll -= w;
    }
    eligible[0].0
}

fn spawn_debris(s: &mut ServerState, pos: Vec3, count: u32, damage: i32) {
    let now = s.time;
    let spread = (damage.max(10) as f32).min(200.0);
    for _ in 0..count {
        let vel = Vec3::new(
            s.rng.gen_range(-1.0..1.0) * spread,
            100.0 + s.rng.gen_range(0.0..1.0) * spread,
            s.rng.gen_range(-1.0..1.0) * spread,
        );
        let id = s.ecs.spawn(
            ActorKind::Debris,
            Team::Neutral,
            ecs_core::Transform::at(pos),
            ecs_core::Health::new(1),
        );
        if let Some(c) = s.ecs.get_mut(id) {
            c.vel = vel;
            c.move_mode = MoveMode::Toss;
            c.despawn_at = Some(now + Ticks::from_secs(2.5));
        }
    }
}
