use glam::{vec3, Vec3};
use server_core::{ServerState, TrainConfig, WaypointSpec};

#[test]
fn train_reaches_waits_and_returns_on_schedule() {
    let mut s = ServerState::new();
    s.spawn_waypoint(
        "loop_a",
        vec3(0.0, 0.0, 0.0),
        WaypointSpec {
            next: Some("loop_b".to_string()),
            ..Default::default()
        },
    );
    s.spawn_waypoint(
        "loop_b",
        vec3(200.0, 0.0, 0.0),
        WaypointSpec {
            next: Some("loop_a".to_string()),
            duration: Some(4.0),
            wait: 2.0,
            ..Default::default()
        },
    );
    let train = s.spawn_train(
        None,
        vec3(10.0, 0.0, -30.0),
        Vec3::ZERO,
        "loop_a",
        TrainConfig {
            speed: 100.0,
            ..Default::default()
        },
    );
    let pos = |s: &ServerState| s.ecs.get(train).unwrap().tr.pos;
    assert_eq!(pos(&s), Vec3::ZERO, "snapped onto the first corner at spawn");

    // t = 2.0s: exactly halfway through the 4s leg
    for _ in 0..20 {
        s.step();
    }
    assert_eq!(pos(&s).x, 100.0);

    // t = 4.0s: exactly on the far corner
    for _ in 0..20 {
        s.step();
    }
    assert_eq!(pos(&s), vec3(200.0, 0.0, 0.0));

    // holds through the 2s wait
    for _ in 0..19 {
        s.step();
    }
    assert_eq!(pos(&s), vec3(200.0, 0.0, 0.0), "still waiting at t=5.9s");

    // t = 6.0s: the wait expires and the return leg is armed
    s.step();
    assert_eq!(pos(&s), vec3(200.0, 0.0, 0.0));

    // first tick of the return leg
    s.step();
    assert!(
        pos(&s).x < 200.0,
        "moving back toward the first corner at t>6.0s"
    );
}
