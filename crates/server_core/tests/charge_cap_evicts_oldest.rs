use glam::vec3;
use server_core::{FxKind, ServerState};

#[test]
fn sixth_charge_detonates_the_oldest() {
    let mut s = ServerState::new();
    let owner = s.spawn_player(vec3(0.0, 0.0, 0.0));
    // plant well away from the owner so the eviction blast cannot reach
    let mut planted = Vec::new();
    for i in 0..5 {
        planted.push(s.plant_charge(owner, vec3(1000.0 + 20.0 * i as f32, 0.0, 0.0)));
        s.step();
    }
    assert!(
        planted.iter().all(|id| s.ecs.alive(*id)),
        "five charges sit inside the cap"
    );

    let sixth = s.plant_charge(owner, vec3(1200.0, 0.0, 0.0));
    assert!(
        !s.ecs.alive(planted[0]),
        "the oldest charge is detonated, not the newest rejected"
    );
    assert!(planted[1..].iter().all(|id| s.ecs.alive(*id)));
    assert!(s.ecs.alive(sixth));

    s.step();
    assert!(
        s.drain_fx()
            .iter()
            .any(|f| matches!(f.kind, FxKind::Explosion)),
        "eviction goes off as a real detonation"
    );
}
