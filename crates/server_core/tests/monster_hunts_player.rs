use glam::vec3;
use server_core::ServerState;

#[test]
fn spider_closes_the_distance_and_draws_blood() {
    let mut s = ServerState::new();
    let target = vec3(0.0, 0.0, 500.0);
    let player = s.spawn_player(target);
    let spider = s
        .spawn_monster("spider", vec3(0.0, 0.0, 0.0))
        .expect("spider archetype");

    let mut sighted = false;
    for _ in 0..40 {
        s.step();
        sighted |= s.drain_sounds().iter().any(|e| e.key == "spider/sight");
    }
    assert!(sighted, "sight voice fires on acquisition");
    let closed = s.ecs.get(spider).unwrap().tr.pos.distance(target);
    assert!(
        closed < 400.0,
        "spider closed ground over 4 seconds, still {closed} away"
    );

    for _ in 0..100 {
        s.step();
    }
    let hp = s.ecs.get(player).unwrap().hp.hp;
    assert!(hp < 100, "melee chain landed, hp {hp}");
}
