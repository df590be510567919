//! Data-driven gameplay configuration.
//!
//! Monster archetypes, including their animation frame tables, are plain
//! values deserialized from `data/config/*` with embedded defaults, so the
//! simulation interprets configuration instead of duplicating per-monster
//! code. Divergent legacy variants of the same monster collapse into
//! alternate archetype entries here.

pub mod anim;
pub mod configs;
pub mod loader;
pub mod specs;
