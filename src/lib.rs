//! Library surface for the Console core. The demonstration binary (`src/main.rs`) and the
//! integration tests under `tests/` both depend on this crate rather than poking at modules
//! directly, so the public surface is exactly the set of types a host needs: [`core::Machine`],
//! the `Display`/`Input`/`SaveStore` trait boundaries, `Config`, and the error types.

pub mod core;

pub use crate::core::{
    Config, CoreError, CpuState, Display, Input, LoadError, Machine, NullSaveStore, SaveStore,
};
