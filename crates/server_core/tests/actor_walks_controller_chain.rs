use glam::vec3;
use server_core::systems::script::ScriptState;
use server_core::{ControllerNode, ServerState};

#[test]
fn actor_walks_the_chain_speaks_once_and_parks() {
    let mut s = ServerState::new();
    let actor = s.spawn_scripted_actor(vec3(0.0, 0.0, 0.0), Some("Dorn"), Some("patrol_1"));
    s.spawn_controller(
        "patrol_1",
        vec3(0.0, 0.0, 60.0),
        ControllerNode {
            next: Some("patrol_2".to_string()),
            message: Some("Moving out.".to_string()),
            ..Default::default()
        },
    );
    s.spawn_controller(
        "patrol_2",
        vec3(0.0, 0.0, 90.0),
        ControllerNode {
            message: Some("Hold here.".to_string()),
            wait: 1.0,
            ..Default::default()
        },
    );

    s.use_entity(actor, None);
    let mut chats = Vec::new();
    for _ in 0..80 {
        s.step();
        chats.extend(s.drain_chat());
    }

    assert_eq!(
        chats.len(),
        1,
        "the second node's line lands inside the 2s chat cooldown"
    );
    assert_eq!(chats[0].speaker, "Dorn");
    assert_eq!(chats[0].text, "Moving out.");

    let c = s.ecs.get(actor).unwrap();
    let sc = c.script.as_ref().unwrap();
    assert_eq!(sc.state, ScriptState::Idle, "parked at the end of the chain");
    assert!(
        (c.tr.pos - vec3(0.0, 0.0, 90.0)).length() <= 25.0,
        "came to rest at the last node, got {:?}",
        c.tr.pos
    );
}

#[test]
fn destroyed_controller_clears_the_binding() {
    let mut s = ServerState::new();
    let actor = s.spawn_scripted_actor(vec3(0.0, 0.0, 0.0), None, Some("lone_node"));
    let node = s.spawn_controller(
        "lone_node",
        vec3(0.0, 0.0, 400.0),
        ControllerNode::default(),
    );
    s.use_entity(actor, None);
    for _ in 0..5 {
        s.step();
    }
    {
        let sc = s.ecs.get(actor).unwrap().script.as_ref().unwrap();
        assert_eq!(sc.state, ScriptState::Seeking);
        assert!(sc.distance > 0.0, "distance readout refreshed while seeking");
    }

    s.ecs.despawn(node);
    s.step();
    let sc = s.ecs.get(actor).unwrap().script.as_ref().unwrap();
    assert_eq!(sc.controller, None, "stale binding dropped on next use");
    assert_eq!(sc.state, ScriptState::Idle, "falls back to idle scheduling");
}

#[test]
fn actor_with_a_missing_target_parks_idle() {
    let mut s = ServerState::new();
    let actor = s.spawn_scripted_actor(vec3(0.0, 0.0, 0.0), None, Some("ghost_node"));
    s.use_entity(actor, None);
    let sc = s.ecs.get(actor).unwrap().script.as_ref().unwrap();
    assert_eq!(sc.state, ScriptState::Idle);
    assert_eq!(sc.controller, None);
}
