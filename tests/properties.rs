//! Property tests for keel.
//!
//! Properties use randomized graphs and side-effect lists to protect
//! invariants like "traversal always terminates" and "applying twice equals
//! applying once".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/traverser.rs"]
mod traverser;

#[path = "properties/side_effects.rs"]
mod side_effects;
