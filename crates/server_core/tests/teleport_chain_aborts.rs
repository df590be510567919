use glam::{vec3, Vec3};
use server_core::{FxKind, ServerState, TrainConfig, WaypointSpec};

#[test]
fn back_to_back_teleport_corners_abort_the_chain() {
    let mut s = ServerState::new();
    let bell = s.spawn_counter("tele_bell");
    s.spawn_waypoint(
        "gate_in",
        vec3(0.0, 0.0, 0.0),
        WaypointSpec {
            next: Some("gate_mid".to_string()),
            ..Default::default()
        },
    );
    s.spawn_waypoint(
        "gate_mid",
        vec3(400.0, 0.0, 0.0),
        WaypointSpec {
            teleport: true,
            next: Some("gate_out".to_string()),
            path_target: Some("tele_bell".to_string()),
            ..Default::default()
        },
    );
    s.spawn_waypoint(
        "gate_out",
        vec3(800.0, 0.0, 0.0),
        WaypointSpec {
            teleport: true,
            ..Default::default()
        },
    );
    let train = s.spawn_train(None, Vec3::ZERO, Vec3::ZERO, "gate_in", TrainConfig::default());

    let c = s.ecs.get(train).unwrap();
    assert_eq!(
        c.tr.pos,
        vec3(400.0, 0.0, 0.0),
        "first teleport relocates instantly"
    );
    assert!(
        c.mover.as_ref().unwrap().pending.is_none(),
        "resolution aborted at the second consecutive teleport"
    );
    assert_eq!(
        s.counter_value(bell),
        0,
        "teleport corners never fire arrival targets"
    );
    let fx = s.drain_fx();
    assert_eq!(
        fx.iter()
            .filter(|f| matches!(f.kind, FxKind::Teleport))
            .count(),
        1
    );

    for _ in 0..20 {
        s.step();
    }
    assert_eq!(
        s.ecs.get(train).unwrap().tr.pos,
        vec3(400.0, 0.0, 0.0),
        "holds position after the abort"
    );
}
