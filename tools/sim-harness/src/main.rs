use glam::Vec3;
use serde::Deserialize;
use server_core::ServerState;
use std::env;
use std::fs;

#[derive(Deserialize)]
struct Scenario {
    #[serde(default)]
    players: Vec<[f32; 3]>,
    #[serde(default)]
    monsters: Vec<MonsterSpawn>,
    #[serde(default = "default_ticks")]
    ticks: u64,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct MonsterSpawn {
    archetype: String,
    pos: [f32; 3],
}

fn default_ticks() -> u64 {
    600
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: sim-harness <scenario.json>");
        std::process::exit(2);
    }
    let txt = fs::read_to_string(&args[1]).expect("read scenario json");
    let scen: Scenario = serde_json::from_str(&txt).expect("parse scenario json");

    let mut s = match scen.seed {
        Some(seed) => ServerState::with_seed(seed),
        None => ServerState::new(),
    };
    for p in &scen.players {
        s.spawn_player(Vec3::from_array(*p));
    }
    for m in &scen.monsters {
        if s.spawn_monster(&m.archetype, Vec3::from_array(m.pos)).is_none() {
            eprintln!("unknown archetype: {}", m.archetype);
            std::process::exit(1);
        }
    }

    let mut sounds = 0usize;
    let mut fx = 0usize;
    for _ in 0..scen.ticks {
        s.step();
        sounds += s.drain_sounds().len();
        fx += s.drain_fx().len();
    }

    let alive = s.ecs.iter().filter(|c| c.hp.alive()).count();
    println!(
        "ok t={:.1}s actors_alive={} sounds={} fx={}",
        s.time.as_secs(),
        alive,
        sounds,
        fx
    );
}
