use glam::vec3;
use server_core::systems::behavior::resolve_move;
use server_core::ServerState;

#[test]
fn frame_cursor_never_leaves_the_table_window() {
    let mut s = ServerState::new();
    s.spawn_player(vec3(0.0, 0.0, 400.0));
    let spider = s
        .spawn_monster("spider", vec3(0.0, 0.0, 0.0))
        .expect("spider archetype");
    // Chase, combo, kill, idle: the cursor must stay inside whatever table is
    // current on every single tick.
    for tick in 0..300 {
        s.step();
        let Some(c) = s.ecs.get(spider) else { break };
        let b = c.behavior.as_ref().expect("behavior record");
        let arch = s.registry.get(&b.archetype).expect("registered archetype");
        let mv = resolve_move(arch, b.current).expect("current table resolves");
        assert!(
            b.frame >= mv.first && b.frame <= mv.last,
            "tick {tick}: frame {} outside [{}, {}] in {:?}",
            b.frame,
            mv.first,
            mv.last,
            b.current
        );
    }
}
