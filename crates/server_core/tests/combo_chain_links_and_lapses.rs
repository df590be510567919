use glam::vec3;
use server_core::systems::combo::{ComboStage, ComboVariant};
use server_core::{MoveKey, ServerState, SimTime};

fn melee_pair(s: &mut ServerState) -> (server_core::ActorId, server_core::ActorId) {
    let player = s.spawn_player(vec3(0.0, 0.0, 40.0));
    let spider = s
        .spawn_monster("spider", vec3(0.0, 0.0, 0.0))
        .expect("spider archetype");
    // keep the target alive through the whole chain
    if let Some(c) = s.ecs.get_mut(player) {
        c.hp.hp = 10_000;
        c.hp.max = 10_000;
    }
    (player, spider)
}

#[test]
fn combo_chain_alternates_variants_through_the_finisher() {
    let mut s = ServerState::new();
    let (_player, spider) = melee_pair(&mut s);
    let mut seen = Vec::new();
    for _ in 0..60 {
        s.step();
        let key = s
            .ecs
            .get(spider)
            .unwrap()
            .behavior
            .as_ref()
            .unwrap()
            .current;
        if seen.last() != Some(&key) {
            seen.push(key);
        }
    }
    let opener = seen
        .iter()
        .position(|k| matches!(k, MoveKey::ComboVariant(_)))
        .expect("combo opened");
    assert_eq!(
        seen[opener],
        MoveKey::ComboVariant(ComboVariant::Left),
        "first combo opens with the flipped variant"
    );
    assert_eq!(
        seen[opener + 1],
        MoveKey::ComboVariant(ComboVariant::Right),
        "second link flips the last-used variant"
    );
    assert_eq!(seen[opener + 2], MoveKey::ComboFinisher);
    assert_eq!(seen[opener + 3], MoveKey::ComboRecover);
}

#[test]
fn lapsed_window_short_circuits_to_recovery() {
    let mut s = ServerState::new();
    let (_player, spider) = melee_pair(&mut s);
    s.step();
    {
        let b = s.ecs.get(spider).unwrap().behavior.as_ref().unwrap();
        assert_eq!(b.combo.stage, ComboStage::First, "opener armed");
    }
    // force the window into the past before the chain gate runs
    if let Some(b) = s.ecs.get_mut(spider).and_then(|c| c.behavior.as_mut()) {
        b.combo.window = SimTime(0);
    }
    for _ in 0..4 {
        s.step();
    }
    let b = s.ecs.get(spider).unwrap().behavior.as_ref().unwrap();
    assert_eq!(
        b.combo.stage,
        ComboStage::None,
        "no chain transition may happen after the window deadline"
    );
    assert_eq!(
        b.current,
        MoveKey::ComboRecover,
        "lapse goes straight to the recovery table"
    );
}

#[test]
fn enemy_out_of_reach_ends_the_chain_at_the_gate() {
    let mut s = ServerState::new();
    let (player, spider) = melee_pair(&mut s);
    s.step();
    // the opener is running; pull the enemy far out of melee reach
    if let Some(c) = s.ecs.get_mut(player) {
        c.tr.pos = vec3(0.0, 0.0, 900.0);
    }
    for _ in 0..4 {
        s.step();
    }
    let b = s.ecs.get(spider).unwrap().behavior.as_ref().unwrap();
    assert_eq!(b.combo.stage, ComboStage::None);
    assert_eq!(b.current, MoveKey::ComboRecover);
}
