use glam::vec3;
use server_core::systems::script::ScriptState;
use server_core::{ControllerNode, NodeAction, ServerState};

#[test]
fn shoot_once_fires_a_single_bolt_then_releases() {
    let mut s = ServerState::new();
    let actor = s.spawn_scripted_actor(vec3(0.0, 0.0, 0.0), None, Some("sniper_post"));
    s.spawn_controller(
        "sniper_post",
        vec3(0.0, 0.0, 30.0),
        ControllerNode {
            action: Some(NodeAction::ShootOnce {
                target: "range_marker".to_string(),
            }),
            ..Default::default()
        },
    );
    // a named prop works as the designated target; bolts ignore it on impact
    s.spawn_waypoint("range_marker", vec3(0.0, 0.0, 230.0), Default::default());

    s.use_entity(actor, None);
    let mut shots = 0usize;
    for _ in 0..40 {
        s.step();
        shots += s
            .drain_sounds()
            .iter()
            .filter(|e| e.key == "rifleman/attack")
            .count();
    }
    assert_eq!(shots, 1, "exactly one ranged shot");

    let c = s.ecs.get(actor).unwrap();
    assert_eq!(c.enemy, None, "designated target released after the shot");
    let b = c.behavior.as_ref().unwrap();
    assert!(!b.stand_ground, "hold released with the shot");
    assert_eq!(c.script.as_ref().unwrap().state, ScriptState::Idle);
}

#[test]
fn jump_node_applies_the_launch_impulse() {
    let mut s = ServerState::new();
    let actor = s.spawn_scripted_actor(vec3(0.0, 0.0, 0.0), None, Some("ledge"));
    s.spawn_controller(
        "ledge",
        vec3(0.0, 0.0, 30.0),
        ControllerNode {
            action: Some(NodeAction::Jump {
                speed: 200.0,
                height: 120.0,
            }),
            ..Default::default()
        },
    );
    s.use_entity(actor, None);
    let mut jumped = false;
    for _ in 0..20 {
        s.step();
        jumped |= s.drain_sounds().iter().any(|e| e.key == "rifleman/jump");
        if jumped {
            break;
        }
    }
    assert!(jumped, "jump sound on contact");
    let v = s.ecs.get(actor).unwrap().vel;
    assert_eq!(v.y, 120.0, "vertical launch applied for the engine to integrate");
    assert!(v.length() > 120.0, "forward component along the node facing");
}
