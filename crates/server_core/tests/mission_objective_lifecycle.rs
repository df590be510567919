use server_core::{MissionEvent, MissionNote, ObjectiveState, ServerState};

fn note(id: &str, event: MissionEvent) -> MissionNote {
    MissionNote {
        id: Some(id.to_string()),
        title: Some("Restore the uplink".to_string()),
        text: Some("Bring the relay back online".to_string()),
        event: Some(event),
        primary: true,
        persistent: false,
        timer_limit_s: 0,
    }
}

#[test]
fn start_then_complete_mutates_one_record() {
    let mut s = ServerState::new();
    let start = s.spawn_mission_note(None, None, note("uplink", MissionEvent::Start));
    let done = s.spawn_mission_note(None, None, note("uplink", MissionEvent::Complete));
    assert_eq!(s.mission.objective_count(), 0);

    assert!(s.target_help_fired(start, None));
    assert_eq!(s.mission.objective_count(), 1);
    assert_eq!(
        s.mission.find("uplink").map(|o| o.state),
        Some(ObjectiveState::Active)
    );

    assert!(s.target_help_fired(done, None));
    assert_eq!(
        s.mission.objective_count(),
        1,
        "re-firing the same id never creates a duplicate record"
    );
    assert_eq!(
        s.mission.find("uplink").map(|o| o.state),
        Some(ObjectiveState::Completed)
    );

    let clear = s.spawn_mission_note(None, None, note("uplink", MissionEvent::Clear));
    assert!(s.target_help_fired(clear, None));
    assert_eq!(s.mission.objective_count(), 0, "clear removes the record");
}

#[test]
fn level_transition_keeps_only_persistent_objectives() {
    let mut s = ServerState::new();
    let evac = s.spawn_mission_note(
        None,
        None,
        MissionNote {
            persistent: true,
            timer_limit_s: 3,
            ..note("evac", MissionEvent::Start)
        },
    );
    let local = s.spawn_mission_note(None, None, note("local", MissionEvent::Start));
    assert!(s.target_help_fired(evac, None));
    assert!(s.target_help_fired(local, None));
    for _ in 0..12 {
        s.step();
    }
    assert_eq!(s.mission.objective_count(), 2);

    s.begin_level();
    assert_eq!(s.mission.objective_count(), 1);
    let survivor = s.mission.find("evac").expect("persistent objective carried");
    assert_eq!(survivor.state, ObjectiveState::Active);
    assert_eq!(
        survivor.timer_remaining, 30,
        "countdown re-armed on level start"
    );
    assert!(s.mission.find("local").is_none());
}
