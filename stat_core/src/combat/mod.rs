//! Combat resolution - Hit math between an attacker and a defender

mod resolution;
mod result;

pub use resolution::{resolve_hit, resolve_hit_with_rng, Attacker, Defender};
pub use result::HitOutcome;
