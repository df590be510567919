use glam::vec3;
use server_core::systems::behavior;
use server_core::ServerState;

fn pain_sounds(s: &mut ServerState) -> usize {
    s.drain_sounds()
        .iter()
        .filter(|e| e.key.contains("pain"))
        .count()
}

#[test]
fn pain_reactions_honor_the_debounce_window() {
    let mut s = ServerState::new();
    // rifleman carries a 3.0s pain debounce and no damage threshold
    let rifleman = s
        .spawn_monster("rifleman", vec3(0.0, 0.0, 0.0))
        .expect("rifleman archetype");

    behavior::pain(&mut s, rifleman, None, 25);
    assert_eq!(pain_sounds(&mut s), 1, "first hit reacts");

    for _ in 0..10 {
        s.step();
    }
    behavior::pain(&mut s, rifleman, None, 25);
    assert_eq!(
        pain_sounds(&mut s),
        0,
        "a hit 1.0s later lands inside the 3s debounce"
    );

    for _ in 0..21 {
        s.step();
    }
    behavior::pain(&mut s, rifleman, None, 25);
    assert_eq!(pain_sounds(&mut s), 1, "a hit at +3.1s reacts again");
}

#[test]
fn pain_voice_alternates_between_the_two_samples() {
    let mut s = ServerState::new();
    let rifleman = s
        .spawn_monster("rifleman", vec3(0.0, 0.0, 0.0))
        .expect("rifleman archetype");

    behavior::pain(&mut s, rifleman, None, 25);
    let first: Vec<String> = s.drain_sounds().into_iter().map(|e| e.key).collect();
    for _ in 0..31 {
        s.step();
    }
    behavior::pain(&mut s, rifleman, None, 25);
    let second: Vec<String> = s.drain_sounds().into_iter().map(|e| e.key).collect();
    assert_eq!(first, vec!["rifleman/pain1".to_string()]);
    assert_eq!(second, vec!["rifleman/pain2".to_string()]);
}

#[test]
fn damage_below_the_archetype_threshold_is_shrugged_off() {
    let mut s = ServerState::new();
    // siege walker ignores hits under 20 damage outright
    let walker = s
        .spawn_monster("siege_walker", vec3(0.0, 0.0, 0.0))
        .expect("walker archetype");
    behavior::pain(&mut s, walker, None, 10);
    assert_eq!(pain_sounds(&mut s), 0, "sub-threshold damage never reacts");
    behavior::pain(&mut s, walker, None, 120);
    assert_eq!(pain_sounds(&mut s), 1, "heavy damage reacts immediately");
}
