use glam::{vec3, Vec3};
use server_core::{ServerState, TrainConfig, WaypointSpec};

#[test]
fn arrival_fires_downstream_targets_exactly_once() {
    let mut s = ServerState::new();
    let counter = s.spawn_counter("arrival_bell");
    s.spawn_waypoint(
        "ring_a",
        vec3(0.0, 0.0, 0.0),
        WaypointSpec {
            next: Some("ring_b".to_string()),
            ..Default::default()
        },
    );
    s.spawn_waypoint(
        "ring_b",
        vec3(100.0, 0.0, 0.0),
        WaypointSpec {
            path_target: Some("arrival_bell".to_string()),
            wait: 10.0,
            ..Default::default()
        },
    );
    s.spawn_train(
        None,
        Vec3::ZERO,
        Vec3::ZERO,
        "ring_a",
        TrainConfig {
            speed: 100.0,
            ..Default::default()
        },
    );
    for _ in 0..10 {
        s.step();
    }
    assert_eq!(s.counter_value(counter), 1, "target fired on arrival");
    for _ in 0..30 {
        s.step();
    }
    assert_eq!(
        s.counter_value(counter),
        1,
        "holding at the corner must not re-fire the target"
    );
}
