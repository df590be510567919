use glam::{vec3, Vec3};
use server_core::{ServerState, Ticks, TrainConfig, WaypointSpec};

fn leg_ticks(s: &ServerState, train: server_core::ActorId) -> Ticks {
    s.ecs
        .get(train)
        .unwrap()
        .mover
        .as_ref()
        .unwrap()
        .move_ticks
}

#[test]
fn distance_over_speed_resolves_the_leg_duration() {
    let mut s = ServerState::new();
    s.spawn_waypoint(
        "wp_a",
        vec3(0.0, 0.0, 0.0),
        WaypointSpec {
            next: Some("wp_b".to_string()),
            ..Default::default()
        },
    );
    s.spawn_waypoint("wp_b", vec3(200.0, 0.0, 0.0), WaypointSpec::default());
    let train = s.spawn_train(
        None,
        vec3(50.0, 0.0, 50.0),
        Vec3::ZERO,
        "wp_a",
        TrainConfig {
            speed: 100.0,
            ..Default::default()
        },
    );
    assert_eq!(
        leg_ticks(&s, train),
        Ticks(20),
        "200 units at speed 100 is a 2.0s leg"
    );
}

#[test]
fn waypoint_duration_overrides_the_computed_leg() {
    let mut s = ServerState::new();
    s.spawn_waypoint(
        "wp_a",
        vec3(0.0, 0.0, 0.0),
        WaypointSpec {
            next: Some("wp_b".to_string()),
            ..Default::default()
        },
    );
    s.spawn_waypoint(
        "wp_b",
        vec3(200.0, 0.0, 0.0),
        WaypointSpec {
            duration: Some(5.0),
            ..Default::default()
        },
    );
    let train = s.spawn_train(
        None,
        Vec3::ZERO,
        Vec3::ZERO,
        "wp_a",
        TrainConfig {
            speed: 100.0,
            // the mover-level default loses to the waypoint's own duration
            duration: Some(3.0),
            ..Default::default()
        },
    );
    assert_eq!(leg_ticks(&s, train), Ticks(50));
}

#[test]
fn mover_duration_beats_speed_when_the_waypoint_is_silent() {
    let mut s = ServerState::new();
    s.spawn_waypoint(
        "wp_a",
        vec3(0.0, 0.0, 0.0),
        WaypointSpec {
            next: Some("wp_b".to_string()),
            ..Default::default()
        },
    );
    s.spawn_waypoint("wp_b", vec3(200.0, 0.0, 0.0), WaypointSpec::default());
    let train = s.spawn_train(
        None,
        Vec3::ZERO,
        Vec3::ZERO,
        "wp_a",
        TrainConfig {
            speed: 100.0,
            duration: Some(3.0),
            ..Default::default()
        },
    );
    assert_eq!(leg_ticks(&s, train), Ticks(30));
}

#[test]
fn waypoint_speed_override_outranks_the_mover_speed() {
    let mut s = ServerState::new();
    s.spawn_waypoint(
        "wp_a",
        vec3(0.0, 0.0, 0.0),
        WaypointSpec {
            next: Some("wp_b".to_string()),
            ..Default::default()
        },
    );
    s.spawn_waypoint(
        "wp_b",
        vec3(200.0, 0.0, 0.0),
        WaypointSpec {
            speed: Some(50.0),
            ..Default::default()
        },
    );
    let train = s.spawn_train(
        None,
        Vec3::ZERO,
        Vec3::ZERO,
        "wp_a",
        TrainConfig {
            speed: 100.0,
            ..Default::default()
        },
    );
    assert_eq!(leg_ticks(&s, train), Ticks(40), "leg uses the corner's 50 u/s");
}

#[test]
fn short_hops_snap_without_an_interpolation_tick() {
    let mut s = ServerState::new();
    s.spawn_waypoint(
        "near_a",
        vec3(0.0, 0.0, 0.0),
        WaypointSpec {
            next: Some("near_b".to_string()),
            ..Default::default()
        },
    );
    s.spawn_waypoint(
        "near_b",
        vec3(0.8, 0.0, 0.0),
        WaypointSpec {
            wait: 4.0,
            ..Default::default()
        },
    );
    let train = s.spawn_train(None, Vec3::ZERO, Vec3::ZERO, "near_a", TrainConfig::default());
    let c = s.ecs.get(train).unwrap();
    assert_eq!(c.tr.pos, vec3(0.8, 0.0, 0.0), "snapped onto the corner");
    assert!(
        c.mover.as_ref().unwrap().wait_until.is_some(),
        "arrival handling ran in the same resolution"
    );
}
