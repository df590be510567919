use data_runtime::anim::SequenceEnd;
use data_runtime::specs::archetypes::ArchetypeDb;

#[test]
fn builtin_archetypes_validate() {
    let db = ArchetypeDb::load_default().expect("load archetypes");
    for key in [
        "spider",
        "cyborg",
        "hover_sentry",
        "rocket_trooper",
        "siege_walker",
        "rifleman",
    ] {
        let spec = db.get(key).unwrap_or_else(|| panic!("missing {key}"));
        spec.validate().unwrap_or_else(|e| panic!("{key}: {e:#}"));
        assert!(spec.health > 0, "{key} health");
        assert!(spec.gib_health < 0, "{key} gib threshold below zero");
    }
}

#[test]
fn spider_carries_the_melee_combo() {
    let db = ArchetypeDb::load_default().expect("load archetypes");
    let spider = db.get("spider").expect("spider");
    let combo = spider.combo.as_ref().expect("spider combo spec");
    assert!(combo.first_window_s > combo.chain_window_s);
    assert_eq!(
        combo.recover.on_end,
        Some(SequenceEnd::Recovered),
        "recovery must arm the cooldown when it completes"
    );
    assert_eq!(combo.variants.left.on_end, Some(SequenceEnd::ComboGate));
    assert_eq!(combo.variants.right.on_end, Some(SequenceEnd::ComboGate));
}

#[test]
fn turret_capable_walker_has_fold_tables() {
    let db = ArchetypeDb::load_default().expect("load archetypes");
    let walker = db.get("siege_walker").expect("siege_walker");
    assert!(walker.idle_closed.is_some());
    assert_eq!(
        walker.activate.as_ref().and_then(|m| m.on_end),
        Some(SequenceEnd::Run)
    );
    assert_eq!(
        walker.deactivate.as_ref().and_then(|m| m.on_end),
        Some(SequenceEnd::IdleClosed)
    );
}

#[test]
fn ranged_archetypes_declare_their_weapons() {
    let db = ArchetypeDb::load_default().expect("load archetypes");
    assert!(db.get("cyborg").expect("cyborg").bolt.is_some());
    assert!(db.get("hover_sentry").expect("sentry").bolt.is_some());
    assert!(db.get("rocket_trooper").expect("trooper").rocket.is_some());
    assert!(db.get("siege_walker").expect("walker").rocket.is_some());
    assert!(db.get("spider").expect("spider").bolt.is_none());
}
