use glam::vec3;
use server_core::systems::behavior;
use server_core::{ActorKind, DeadState, FxKind, MoveKey, MoveMode, ServerState};

#[test]
fn health_at_the_gib_threshold_throws_debris_instead_of_a_death_table() {
    let mut s = ServerState::new();
    let spider = s
        .spawn_monster("spider", vec3(0.0, 0.0, 0.0))
        .expect("spider archetype");
    // exactly the gib threshold must still take the gib path
    if let Some(c) = s.ecs.get_mut(spider) {
        c.hp.hp = -120;
    }
    behavior::die(&mut s, spider, None, 121);

    let c = s.ecs.get(spider).expect("corpse lingers for cleanup");
    assert_eq!(c.dead, DeadState::Dead, "gib path marks dead immediately");
    assert_ne!(
        c.behavior.as_ref().unwrap().current,
        MoveKey::Death,
        "no scripted death table on the gib path"
    );
    let debris = s.ecs.iter().filter(|c| c.kind == ActorKind::Debris).count() as u32;
    assert_eq!(debris, 3, "spider throws its configured debris count");
    assert!(
        s.drain_fx().iter().any(|f| matches!(f.kind, FxKind::GibSpray)),
        "gib spray effect broadcast"
    );
}

#[test]
fn survivable_death_plays_the_scripted_table_before_resting() {
    let mut s = ServerState::new();
    let spider = s
        .spawn_monster("spider", vec3(0.0, 0.0, 0.0))
        .expect("spider archetype");
    if let Some(c) = s.ecs.get_mut(spider) {
        c.hp.hp = -10;
    }
    behavior::die(&mut s, spider, None, 40);
    {
        let c = s.ecs.get(spider).unwrap();
        assert_eq!(c.dead, DeadState::Dying, "death table still playing");
        assert_eq!(c.behavior.as_ref().unwrap().current, MoveKey::Death);
        assert_eq!(
            s.ecs.iter().filter(|c| c.kind == ActorKind::Debris).count(),
            0,
            "no debris above the gib threshold"
        );
    }
    for _ in 0..10 {
        s.step();
    }
    let c = s.ecs.get(spider).unwrap();
    assert_eq!(c.dead, DeadState::Dead, "table continuation settles the corpse");
    assert_eq!(c.move_mode, MoveMode::Toss, "corpse switches to resting mode");
}
