//! Crate-level tests exercising the engine through its public surface.
