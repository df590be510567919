use server_core::{MissionEvent, MissionNote, ObjectiveState, ServerState};

#[test]
fn armed_countdown_fails_the_objective_at_zero() {
    let mut s = ServerState::new();
    let e = s.spawn_mission_note(
        None,
        None,
        MissionNote {
            id: Some("evac".to_string()),
            title: Some("Evacuate".to_string()),
            text: None,
            event: Some(MissionEvent::Start),
            primary: true,
            persistent: false,
            timer_limit_s: 3,
        },
    );
    assert!(s.target_help_fired(e, None));

    for _ in 0..5 {
        s.step();
    }
    assert_eq!(
        s.mission.help_title, "Evacuate (2s)",
        "help line carries the countdown"
    );

    for _ in 0..24 {
        s.step();
    }
    assert_eq!(
        s.mission.find("evac").map(|o| o.state),
        Some(ObjectiveState::Active),
        "one tick left"
    );
    s.step();
    assert_eq!(
        s.mission.find("evac").map(|o| o.state),
        Some(ObjectiveState::Failed),
        "limit reached"
    );
}
