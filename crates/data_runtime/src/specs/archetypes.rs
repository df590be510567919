//! Monster archetype definitions (server-side defaults).
//!
//! Each archetype bundles the stats, sound set, and frame tables one monster
//! kind needs. The tables are data, not code: the simulation's interpreter
//! walks them with a per-entity cursor. `load_default` reads
//! `data/config/archetypes.toml` when present and otherwise serves the
//! embedded set below.

use crate::anim::{frames, AiStep, ComboVariantPair, FrameEvent, MoveDef, RocketSide, SequenceEnd};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Distance bucket a locomotion table is eligible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeBucket {
    Near,
    Far,
    Any,
}

/// A locomotion table with selection weight and distance bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct WeightedMove {
    pub weight: u32,
    pub bucket: RangeBucket,
    pub table: MoveDef,
}

/// Straight-line bolt parameters (muzzle offset is in model space:
/// forward/right/up).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoltSpec {
    pub damage: i32,
    pub speed: f32,
    pub offset: [f32; 3],
}

/// Rocket parameters with two hardpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RocketSpec {
    pub damage: i32,
    pub speed: f32,
    pub radius: f32,
    pub splash: i32,
    pub offsets: [[f32; 3]; 2],
}

/// Melee combo chain tuning and tables.
#[derive(Debug, Clone, Deserialize)]
pub struct ComboSpec {
    /// Window armed when the opener lands.
    pub first_window_s: f32,
    /// Shorter window armed for the second link.
    pub chain_window_s: f32,
    /// Two alternating strike variants.
    pub variants: ComboVariantPair,
    pub finisher: MoveDef,
    pub recover: MoveDef,
}

/// Sound keys resolved once when the archetype registry is built.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SoundSet {
    #[serde(default)]
    pub sight: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub idle: Option<String>,
    #[serde(default)]
    pub step: Option<String>,
    /// Alternating pain voice samples (toggle bit picks the next one).
    #[serde(default)]
    pub pain: Vec<String>,
    #[serde(default)]
    pub death: Option<String>,
    #[serde(default)]
    pub attack: Option<String>,
    #[serde(default)]
    pub melee: Vec<String>,
    #[serde(default)]
    pub gib: Option<String>,
}

/// Full per-archetype definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchetypeSpec {
    pub health: i32,
    /// Health at or below which death gibs instead of playing a death table.
    pub gib_health: i32,
    pub mass: i32,
    pub radius: f32,
    #[serde(default)]
    pub fly: bool,
    pub aggro_range: f32,
    pub melee_range: f32,
    /// Enemy closer than this selects Near-bucket locomotion tables.
    pub near_range: f32,
    /// Maximum ranged attack distance; zero means melee only.
    #[serde(default)]
    pub attack_range: f32,
    pub attack_cooldown_s: f32,
    /// Chance to chain straight into another attack from `PostAttack`.
    #[serde(default)]
    pub post_attack_repeat_chance: f32,
    pub pain_debounce_s: f32,
    /// Damage below this never triggers a pain reaction.
    #[serde(default)]
    pub pain_damage_threshold: i32,
    /// Damage at or below this limit only reacts with the given chance.
    #[serde(default)]
    pub pain_light_limit: i32,
    #[serde(default)]
    pub pain_light_chance: f32,
    /// Clear the attack cooldown when health first drops below half.
    #[serde(default)]
    pub pain_resets_attack_below_half: bool,
    /// Temporary stand-ground window scheduled by a pain reaction.
    #[serde(default)]
    pub stagger_s: f32,
    /// Gate for `IdleVoice` frame events.
    pub idle_chance: f32,
    /// Debris chunks thrown by the gib path.
    pub gib_count: u32,
    pub stand: MoveDef,
    /// Closed idle pose for turret-style spawns.
    #[serde(default)]
    pub idle_closed: Option<MoveDef>,
    #[serde(default)]
    pub activate: Option<MoveDef>,
    #[serde(default)]
    pub deactivate: Option<MoveDef>,
    pub walks: Vec<WeightedMove>,
    pub runs: Vec<WeightedMove>,
    #[serde(default)]
    pub attack: Option<MoveDef>,
    pub pain: MoveDef,
    pub death: MoveDef,
    /// Idle flourish tables for scripted actors.
    #[serde(default)]
    pub flourishes: Vec<MoveDef>,
    #[serde(default)]
    pub combo: Option<ComboSpec>,
    #[serde(default)]
    pub bolt: Option<BoltSpec>,
    #[serde(default)]
    pub rocket: Option<RocketSpec>,
    pub sounds: SoundSet,
}

impl ArchetypeSpec {
    /// Validate every table's frame window.
    pub fn validate(&self) -> Result<()> {
        let mut tables: Vec<&MoveDef> = vec![&self.stand, &self.pain, &self.death];
        tables.extend(self.idle_closed.iter());
        tables.extend(self.activate.iter());
        tables.extend(self.deactivate.iter());
        tables.extend(self.walks.iter().map(|w| &w.table));
        tables.extend(self.runs.iter().map(|w| &w.table));
        tables.extend(self.attack.iter());
        tables.extend(self.flourishes.iter());
        if let Some(combo) = &self.combo {
            tables.push(&combo.variants.left);
            tables.push(&combo.variants.right);
            tables.push(&combo.finisher);
            tables.push(&combo.recover);
        }
        for t in tables {
            t.validate()?;
        }
        anyhow::ensure!(!self.walks.is_empty(), "archetype has no walk tables");
        anyhow::ensure!(!self.runs.is_empty(), "archetype has no run tables");
        Ok(())
    }
}

/// Archetype registry, keyed by spawn classname suffix.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchetypeDb {
    pub entries: HashMap<String, ArchetypeSpec>,
}

impl ArchetypeDb {
    pub fn get(&self, key: &str) -> Option<&ArchetypeSpec> {
        self.entries.get(key)
    }

    /// Load `data/config/archetypes.toml` or fall back to the embedded set.
    pub fn load_default() -> Result<Self> {
        let db = match crate::loader::load_toml_opt::<Self>("config/archetypes.toml")
            .context("load archetype config")?
        {
            Some(db) => db,
            None => builtin(),
        };
        for (key, spec) in &db.entries {
            spec.validate()
                .with_context(|| format!("archetype `{key}`"))?;
        }
        Ok(db)
    }
}

fn sound_set(prefix: &str, pain_variants: usize, melee_variants: usize) -> SoundSet {
    SoundSet {
        sight: Some(format!("{prefix}/sight")),
        search: Some(format!("{prefix}/search")),
        idle: Some(format!("{prefix}/idle")),
        step: Some(format!("{prefix}/step")),
        pain: (1..=pain_variants)
            .map(|i| format!("{prefix}/pain{i}"))
            .collect(),
        death: Some(format!("{prefix}/death")),
        attack: Some(format!("{prefix}/attack")),
        melee: (1..=melee_variants)
            .map(|i| format!("{prefix}/melee{i}"))
            .collect(),
        gib: Some("world/gib".to_string()),
    }
}

fn spider() -> ArchetypeSpec {
    use AiStep::*;
    use FrameEvent::*;
    let claw = Some(Claw { damage: 30 });
    ArchetypeSpec {
        health: 400,
        gib_health: -120,
        mass: 300,
        radius: 32.0,
        fly: false,
        aggro_range: 1000.0,
        melee_range: 80.0,
        near_range: 250.0,
        attack_range: 0.0,
        attack_cooldown_s: 1.0,
        post_attack_repeat_chance: 0.0,
        pain_debounce_s: 1.5,
        pain_damage_threshold: 0,
        pain_light_limit: 0,
        pain_light_chance: 0.0,
        pain_resets_attack_below_half: false,
        stagger_s: 0.0,
        idle_chance: 0.25,
        gib_count: 3,
        stand: MoveDef {
            first: 0,
            last: 0,
            frames: frames(&[(Stand, 0.0, Some(IdleVoice))]),
            on_end: None,
        },
        idle_closed: None,
        activate: None,
        deactivate: None,
        walks: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: MoveDef {
                first: 1,
                last: 6,
                frames: frames(&[
                    (Walk, 6.0, Some(Step)),
                    (Walk, 4.0, None),
                    (Walk, 6.0, Some(Step)),
                    (Walk, 4.0, None),
                    (Walk, 6.0, Some(Step)),
                    (Walk, 4.0, None),
                ]),
                on_end: None,
            },
        }],
        runs: vec![
            WeightedMove {
                weight: 2,
                bucket: RangeBucket::Far,
                table: MoveDef {
                    first: 7,
                    last: 12,
                    frames: frames(&[
                        (Run, 10.0, Some(Step)),
                        (Run, 6.0, None),
                        (Run, 10.0, Some(Step)),
                        (Run, 6.0, None),
                        (Run, 10.0, Some(Step)),
                        (Run, 6.0, None),
                    ]),
                    on_end: None,
                },
            },
            WeightedMove {
                weight: 1,
                bucket: RangeBucket::Near,
                table: MoveDef {
                    first: 7,
                    last: 12,
                    frames: frames(&[
                        (Run, 12.0, Some(Step)),
                        (Run, 8.0, None),
                        (Run, 12.0, Some(Step)),
                        (Run, 8.0, None),
                        (Run, 12.0, Some(Step)),
                        (Run, 8.0, None),
                    ]),
                    on_end: None,
                },
            },
        ],
        attack: None,
        pain: MoveDef {
            first: 28,
            last: 30,
            frames: frames(&[(Move, 0.0, None), (Move, 0.0, None), (Move, 0.0, None)]),
            on_end: Some(SequenceEnd::Run),
        },
        death: MoveDef {
            first: 31,
            last: 37,
            frames: frames(&[
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, 0.0, Some(Thud)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
            ]),
            on_end: Some(SequenceEnd::Dead),
        },
        flourishes: Vec::new(),
        combo: Some(ComboSpec {
            first_window_s: 0.7,
            chain_window_s: 0.55,
            variants: ComboVariantPair {
                left: MoveDef {
                    first: 13,
                    last: 16,
                    frames: frames(&[
                        (Charge, 0.0, claw),
                        (Charge, 0.0, None),
                        (Charge, 2.0, claw),
                        (Charge, 0.0, None),
                    ]),
                    on_end: Some(SequenceEnd::ComboGate),
                },
                right: MoveDef {
                    first: 17,
                    last: 20,
                    frames: frames(&[
                        (Charge, 0.0, claw),
                        (Charge, 2.0, None),
                        (Charge, 0.0, claw),
                        (Charge, 0.0, None),
                    ]),
                    on_end: Some(SequenceEnd::ComboGate),
                },
            },
            finisher: MoveDef {
                first: 21,
                last: 23,
                frames: frames(&[
                    (Charge, 0.0, None),
                    (Charge, 4.0, Some(Claw { damage: 45 })),
                    (Charge, 0.0, None),
                ]),
                on_end: Some(SequenceEnd::ComboGate),
            },
            recover: MoveDef {
                first: 24,
                last: 27,
                frames: frames(&[
                    (Move, -4.0, None),
                    (Move, -2.0, None),
                    (Move, 0.0, None),
                    (Move, 0.0, None),
                ]),
                on_end: Some(SequenceEnd::Recovered),
            },
        }),
        bolt: None,
        rocket: None,
        sounds: sound_set("spider", 2, 3),
    }
}

fn cyborg() -> ArchetypeSpec {
    use AiStep::*;
    use FrameEvent::*;
    ArchetypeSpec {
        health: 300,
        gib_health: -120,
        mass: 300,
        radius: 16.0,
        fly: false,
        aggro_range: 1200.0,
        melee_range: 80.0,
        near_range: 300.0,
        attack_range: 1000.0,
        attack_cooldown_s: 1.2,
        post_attack_repeat_chance: 0.0,
        pain_debounce_s: 2.0,
        pain_damage_threshold: 0,
        pain_light_limit: 0,
        pain_light_chance: 0.0,
        pain_resets_attack_below_half: false,
        stagger_s: 0.0,
        idle_chance: 0.3,
        gib_count: 3,
        stand: MoveDef {
            first: 0,
            last: 0,
            frames: frames(&[(Stand, 0.0, Some(IdleVoice))]),
            on_end: None,
        },
        idle_closed: None,
        activate: None,
        deactivate: None,
        walks: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: MoveDef {
                first: 1,
                last: 4,
                frames: frames(&[
                    (Walk, 6.0, Some(Step)),
                    (Walk, 3.0, None),
                    (Walk, 6.0, Some(Step)),
                    (Walk, 3.0, None),
                ]),
                on_end: None,
            },
        }],
        runs: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: MoveDef {
                first: 5,
                last: 8,
                frames: frames(&[
                    (Run, 10.0, Some(Step)),
                    (Run, 6.0, None),
                    (Run, 10.0, Some(Step)),
                    (Run, 6.0, None),
                ]),
                on_end: None,
            },
        }],
        attack: Some(MoveDef {
            first: 9,
            last: 12,
            frames: frames(&[
                (Charge, 0.0, None),
                (Charge, 0.0, Some(AimedBolt)),
                (Charge, 0.0, None),
                (Charge, 0.0, Some(AimedBolt)),
            ]),
            on_end: Some(SequenceEnd::Run),
        }),
        pain: MoveDef {
            first: 13,
            last: 14,
            frames: frames(&[(Move, 0.0, None), (Move, 0.0, None)]),
            on_end: Some(SequenceEnd::Run),
        },
        death: MoveDef {
            first: 15,
            last: 17,
            frames: frames(&[
                (Move, 0.0, None),
                (Move, 0.0, Some(Thud)),
                (Move, 0.0, Some(SettleDead)),
            ]),
            on_end: Some(SequenceEnd::Dead),
        },
        flourishes: Vec::new(),
        combo: None,
        bolt: Some(BoltSpec {
            damage: 12,
            speed: 1000.0,
            offset: [20.0, 7.0, 24.0],
        }),
        rocket: None,
        sounds: sound_set("cyborg", 1, 0),
    }
}

fn hover_sentry() -> ArchetypeSpec {
    use AiStep::*;
    use FrameEvent::*;
    let fly_table = |first: u16, run: bool| MoveDef {
        first,
        last: first + 3,
        frames: if run {
            frames(&[
                (Run, 4.0, None),
                (Run, 2.0, None),
                (Run, 4.0, None),
                (Run, 2.0, None),
            ])
        } else {
            frames(&[
                (Walk, 4.0, None),
                (Walk, 2.0, None),
                (Walk, 4.0, None),
                (Walk, 2.0, None),
            ])
        },
        on_end: None,
    };
    ArchetypeSpec {
        health: 200,
        gib_health: -100,
        mass: 120,
        radius: 20.0,
        fly: true,
        aggro_range: 1000.0,
        melee_range: 60.0,
        near_range: 250.0,
        attack_range: 1000.0,
        attack_cooldown_s: 1.0,
        post_attack_repeat_chance: 0.0,
        pain_debounce_s: 1.0,
        pain_damage_threshold: 0,
        pain_light_limit: 0,
        pain_light_chance: 0.0,
        pain_resets_attack_below_half: false,
        stagger_s: 0.0,
        idle_chance: 0.5,
        gib_count: 2,
        stand: MoveDef {
            first: 0,
            last: 0,
            frames: frames(&[(Stand, 0.0, Some(IdleVoice))]),
            on_end: None,
        },
        idle_closed: None,
        activate: None,
        deactivate: None,
        walks: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: fly_table(1, false),
        }],
        runs: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: fly_table(1, true),
        }],
        attack: Some(MoveDef {
            first: 5,
            last: 8,
            frames: frames(&[
                (Charge, 0.0, None),
                (Charge, 0.0, Some(FireBolt)),
                (Charge, 0.0, None),
                (Charge, 0.0, Some(FireBolt)),
            ]),
            on_end: Some(SequenceEnd::Run),
        }),
        pain: MoveDef {
            first: 9,
            last: 10,
            frames: frames(&[(Move, 0.0, None), (Move, 0.0, None)]),
            on_end: Some(SequenceEnd::Run),
        },
        death: MoveDef {
            first: 11,
            last: 14,
            frames: frames(&[
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
            ]),
            on_end: Some(SequenceEnd::Dead),
        },
        flourishes: Vec::new(),
        combo: None,
        bolt: Some(BoltSpec {
            damage: 8,
            speed: 1000.0,
            offset: [12.0, 0.0, -6.0],
        }),
        rocket: None,
        sounds: sound_set("sentry", 1, 0),
    }
}

fn rocket_trooper() -> ArchetypeSpec {
    use AiStep::*;
    use FrameEvent::*;
    ArchetypeSpec {
        health: 1000,
        gib_health: -200,
        mass: 550,
        radius: 40.0,
        fly: false,
        aggro_range: 2000.0,
        melee_range: 100.0,
        near_range: 400.0,
        attack_range: 1500.0,
        attack_cooldown_s: 0.0,
        post_attack_repeat_chance: 0.35,
        pain_debounce_s: 1.5,
        pain_damage_threshold: 0,
        pain_light_limit: 0,
        pain_light_chance: 0.0,
        pain_resets_attack_below_half: true,
        stagger_s: 0.0,
        idle_chance: 0.25,
        gib_count: 5,
        stand: MoveDef {
            first: 0,
            last: 9,
            frames: frames(&[
                (Stand, 0.0, Some(IdleVoice)),
                (Stand, 0.0, None),
                (Stand, 0.0, None),
                (Stand, 0.0, None),
                (Stand, 0.0, Some(IdleVoice)),
                (Stand, 0.0, None),
                (Stand, 0.0, None),
                (Stand, 0.0, None),
                (Stand, 0.0, Some(IdleVoice)),
                (Stand, 0.0, None),
            ]),
            on_end: None,
        },
        idle_closed: None,
        activate: None,
        deactivate: None,
        walks: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: MoveDef {
                first: 10,
                last: 19,
                frames: frames(&[
                    (Walk, 10.0, Some(Step)),
                    (Walk, 11.0, None),
                    (Walk, 12.0, None),
                    (Walk, 13.0, Some(Step)),
                    (Walk, 11.0, None),
                    (Walk, 12.0, None),
                    (Walk, 13.0, Some(Step)),
                    (Walk, 11.0, None),
                    (Walk, 12.0, None),
                    (Walk, 13.0, Some(Step)),
                ]),
                on_end: None,
            },
        }],
        runs: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: MoveDef {
                first: 20,
                last: 29,
                frames: frames(&[
                    (Run, 20.0, Some(Step)),
                    (Run, 22.0, None),
                    (Run, 24.0, None),
                    (Run, 26.0, Some(Step)),
                    (Run, 22.0, None),
                    (Run, 24.0, None),
                    (Run, 26.0, Some(Step)),
                    (Run, 22.0, None),
                    (Run, 24.0, None),
                    (Run, 26.0, Some(Step)),
                ]),
                on_end: None,
            },
        }],
        attack: Some(MoveDef {
            first: 40,
            last: 49,
            frames: frames(&[
                (Charge, 0.0, Some(Warmup)),
                (Charge, 0.0, None),
                (Charge, 0.0, Some(FireRocket { side: RocketSide::Right })),
                (Charge, 0.0, Some(FireRocket { side: RocketSide::Left })),
                (Charge, 0.0, Some(FireRocket { side: RocketSide::Right })),
                (Charge, 0.0, None),
                (Charge, 0.0, Some(RocketBurst { cooldown_s: 0.7 })),
                (Charge, 0.0, None),
                (Charge, 0.0, None),
                (Charge, 0.0, None),
            ]),
            on_end: Some(SequenceEnd::PostAttack),
        }),
        pain: MoveDef {
            first: 60,
            last: 63,
            frames: frames(&[
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, 0.0, None),
            ]),
            on_end: Some(SequenceEnd::Run),
        },
        death: MoveDef {
            first: 70,
            last: 85,
            frames: frames(&[
                (Move, 0.0, None),
                (Move, -4.0, None),
                (Move, -6.0, None),
                (Move, -6.0, Some(Step)),
                (Move, -4.0, None),
                (Move, -6.0, None),
                (Move, -8.0, None),
                (Move, -10.0, None),
                (Move, -12.0, Some(Thud)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
            ]),
            on_end: Some(SequenceEnd::Dead),
        },
        flourishes: Vec::new(),
        combo: None,
        bolt: None,
        rocket: Some(RocketSpec {
            damage: 70,
            speed: 900.0,
            radius: 140.0,
            splash: 70,
            offsets: [[24.0, 6.0, 48.0], [24.0, -6.0, 48.0]],
        }),
        sounds: sound_set("trooper", 1, 0),
    }
}

fn siege_walker() -> ArchetypeSpec {
    use AiStep::*;
    use FrameEvent::*;
    let hold = |n: usize| {
        frames(
            &std::iter::repeat((Stand, 0.0, None))
                .take(n)
                .collect::<Vec<_>>(),
        )
    };
    ArchetypeSpec {
        health: 1000,
        gib_health: -200,
        mass: 600,
        radius: 48.0,
        fly: false,
        aggro_range: 1500.0,
        melee_range: 100.0,
        near_range: 500.0,
        attack_range: 1500.0,
        attack_cooldown_s: 1.0,
        post_attack_repeat_chance: 0.0,
        pain_debounce_s: 3.0,
        pain_damage_threshold: 20,
        pain_light_limit: 50,
        pain_light_chance: 0.2,
        pain_resets_attack_below_half: false,
        stagger_s: 1.0,
        idle_chance: 0.3,
        gib_count: 5,
        stand: MoveDef {
            first: 23,
            last: 42,
            frames: {
                let mut f = frames(&[(Stand, 0.0, Some(IdleVoice))]);
                f.extend(hold(19));
                f
            },
            on_end: None,
        },
        idle_closed: Some(MoveDef {
            first: 1,
            last: 1,
            frames: frames(&[(Stand, 0.0, Some(IdleVoice))]),
            on_end: None,
        }),
        activate: Some(MoveDef {
            first: 1,
            last: 7,
            frames: hold(7),
            on_end: Some(SequenceEnd::Run),
        }),
        deactivate: Some(MoveDef {
            first: 8,
            last: 22,
            frames: hold(15),
            on_end: Some(SequenceEnd::IdleClosed),
        }),
        walks: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: MoveDef {
                first: 43,
                last: 56,
                frames: frames(&[
                    (Walk, 7.0, None),
                    (Walk, 7.0, None),
                    (Walk, 7.0, None),
                    (Walk, 7.0, None),
                    (Walk, 7.0, None),
                    (Walk, 7.0, None),
                    (Walk, 7.0, Some(Step)),
                    (Walk, 7.0, None),
                    (Walk, 7.0, None),
                    (Walk, 7.0, None),
                    (Walk, 7.0, None),
                    (Walk, 7.0, None),
                    (Walk, 7.0, None),
                    (Walk, 7.0, Some(Step)),
                ]),
                on_end: None,
            },
        }],
        runs: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: MoveDef {
                first: 57,
                last: 64,
                frames: frames(&[
                    (Run, 14.0, None),
                    (Run, 15.0, None),
                    (Run, 21.0, None),
                    (Run, 24.0, Some(Step)),
                    (Run, 14.0, None),
                    (Run, 15.0, None),
                    (Run, 21.0, None),
                    (Run, 24.0, Some(Step)),
                ]),
                on_end: None,
            },
        }],
        attack: Some(MoveDef {
            first: 65,
            last: 68,
            frames: frames(&[
                (Charge, -5.0, Some(FireRocket { side: RocketSide::Right })),
                (Charge, 0.0, None),
                (Charge, -5.0, Some(FireRocket { side: RocketSide::Left })),
                (Charge, 0.0, None),
            ]),
            on_end: Some(SequenceEnd::Run),
        }),
        pain: MoveDef {
            first: 69,
            last: 78,
            frames: frames(&[
                (Move, 8.0, None),
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, -16.0, None),
                (Move, -16.0, None),
                (Move, -8.0, None),
                (Move, 0.0, None),
            ]),
            on_end: Some(SequenceEnd::Run),
        },
        death: MoveDef {
            first: 79,
            last: 98,
            frames: frames(&[
                (Move, -8.0, None),
                (Move, -8.0, None),
                (Move, -8.0, None),
                (Move, -7.0, None),
                (Move, -4.0, Some(Thud)),
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, 4.0, None),
                (Move, 2.0, None),
                (Move, 2.0, None),
                (Move, 2.0, None),
                (Move, 2.0, None),
                (Move, 2.0, Some(Thud)),
                (Move, 0.0, None),
                (Move, 0.0, Some(Thud)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
                (Move, 0.0, Some(SettleDead)),
            ]),
            on_end: Some(SequenceEnd::Dead),
        },
        flourishes: Vec::new(),
        combo: None,
        bolt: None,
        rocket: Some(RocketSpec {
            damage: 50,
            speed: 550.0,
            radius: 70.0,
            splash: 50,
            offsets: [[18.0, -40.0, 0.0], [18.0, 40.0, 0.0]],
        }),
        sounds: sound_set("walker", 1, 0),
    }
}

fn rifleman() -> ArchetypeSpec {
    use AiStep::*;
    use FrameEvent::*;
    let turn = |n: usize| {
        frames(
            &std::iter::repeat((Turn, 0.0, None))
                .take(n)
                .collect::<Vec<_>>(),
        )
    };
    ArchetypeSpec {
        health: 100,
        gib_health: -80,
        mass: 200,
        radius: 16.0,
        fly: false,
        aggro_range: 1000.0,
        melee_range: 0.0,
        near_range: 250.0,
        attack_range: 1000.0,
        attack_cooldown_s: 1.0,
        post_attack_repeat_chance: 0.0,
        pain_debounce_s: 3.0,
        pain_damage_threshold: 0,
        pain_light_limit: 0,
        pain_light_chance: 0.0,
        pain_resets_attack_below_half: false,
        stagger_s: 0.0,
        idle_chance: 0.0,
        gib_count: 4,
        stand: MoveDef {
            first: 0,
            last: 9,
            frames: frames(
                &std::iter::repeat((Stand, 0.0, None))
                    .take(10)
                    .collect::<Vec<_>>(),
            ),
            on_end: None,
        },
        idle_closed: None,
        activate: None,
        deactivate: None,
        walks: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: MoveDef {
                first: 10,
                last: 17,
                frames: frames(&[
                    (Walk, 0.0, None),
                    (Walk, 6.0, None),
                    (Walk, 10.0, None),
                    (Walk, 3.0, None),
                    (Walk, 2.0, None),
                    (Walk, 7.0, None),
                    (Walk, 10.0, None),
                    (Walk, 4.0, None),
                ]),
                on_end: None,
            },
        }],
        runs: vec![WeightedMove {
            weight: 1,
            bucket: RangeBucket::Any,
            table: MoveDef {
                first: 18,
                last: 23,
                frames: frames(&[
                    (Run, 4.0, None),
                    (Run, 15.0, None),
                    (Run, 15.0, None),
                    (Run, 8.0, None),
                    (Run, 20.0, None),
                    (Run, 15.0, None),
                ]),
                on_end: None,
            },
        }],
        attack: Some(MoveDef {
            first: 24,
            last: 27,
            frames: frames(&[
                (Charge, -2.0, Some(AimedBolt)),
                (Charge, -2.0, None),
                (Charge, 3.0, None),
                (Charge, 2.0, None),
            ]),
            on_end: Some(SequenceEnd::Run),
        }),
        pain: MoveDef {
            first: 28,
            last: 30,
            frames: frames(&[(Move, -5.0, None), (Move, 4.0, None), (Move, 1.0, None)]),
            on_end: Some(SequenceEnd::Run),
        },
        death: MoveDef {
            first: 31,
            last: 37,
            frames: frames(&[
                (Move, 0.0, None),
                (Move, 0.0, None),
                (Move, -13.0, None),
                (Move, 14.0, None),
                (Move, 3.0, None),
                (Move, -2.0, Some(SettleDead)),
                (Move, 1.0, Some(SettleDead)),
            ]),
            on_end: Some(SequenceEnd::Dead),
        },
        flourishes: vec![
            MoveDef {
                first: 38,
                last: 51,
                frames: turn(14),
                on_end: Some(SequenceEnd::Stand),
            },
            MoveDef {
                first: 52,
                last: 68,
                frames: turn(17),
                on_end: Some(SequenceEnd::Stand),
            },
        ],
        combo: None,
        bolt: Some(BoltSpec {
            damage: 3,
            speed: 2000.0,
            offset: [18.0, 8.0, 24.0],
        }),
        rocket: None,
        sounds: sound_set("rifleman", 2, 0),
    }
}

/// Embedded archetype set used when no config file overrides it.
pub fn builtin() -> ArchetypeDb {
    let mut entries = HashMap::new();
    entries.insert("spider".to_string(), spider());
    entries.insert("cyborg".to_string(), cyborg());
    entries.insert("hover_sentry".to_string(), hover_sentry());
    entries.insert("rocket_trooper".to_string(), rocket_trooper());
    entries.insert("siege_walker".to_string(), siege_walker());
    entries.insert("rifleman".to_string(), rifleman());
    ArchetypeDb { entries }
}
