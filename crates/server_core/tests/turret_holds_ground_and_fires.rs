use glam::{vec3, Vec3};
use server_core::{MoveKey, ServerState};

#[test]
fn turret_spawn_holds_ground_and_bombards() {
    let mut s = ServerState::new();
    let player = s.spawn_player(vec3(0.0, 0.0, 400.0));
    let walker = s
        .spawn_turret_monster("siege_walker", vec3(0.0, 0.0, 0.0))
        .expect("walker archetype");
    {
        let b = s.ecs.get(walker).unwrap().behavior.as_ref().unwrap();
        assert!(b.stand_ground, "turret flag pins the walker");
        assert_eq!(b.current, MoveKey::IdleClosed, "starts folded");
    }

    let mut unfolded = false;
    for _ in 0..100 {
        s.step();
        let key = s
            .ecs
            .get(walker)
            .unwrap()
            .behavior
            .as_ref()
            .unwrap()
            .current;
        unfolded |= key == MoveKey::Activate;
    }
    assert!(unfolded, "sighting the player runs the activate table");

    let wpos = s.ecs.get(walker).unwrap().tr.pos;
    assert!(
        wpos.distance(Vec3::ZERO) < 100.0,
        "pinned walker never pursues, got {wpos:?}"
    );
    let hp = s.ecs.get(player).unwrap().hp.hp;
    assert!(hp < 100, "rocket fire reached the player, hp {hp}");
    assert_eq!(
        s.ecs
            .get(walker)
            .unwrap()
            .behavior
            .as_ref()
            .unwrap()
            .current,
        MoveKey::IdleClosed,
        "folds closed once the target is gone"
    );
}
