//! The craft transform engine: one parameterized move/rotate pipeline with a
//! parallel target-mapping phase, validate-then-commit semantics, and
//! substructure/rider migration.

mod engine;
mod systems;

pub use engine::{change, compute_targets, TransformError, TransformReport};
pub use systems::{
    handle_move_requests, handle_rotate_requests, CraftTransformed, MoveCraftRequest,
    RotateCraftRequest, TransformPlugin,
};
