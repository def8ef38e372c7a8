//! Domain types shared across the engine.

pub mod bar;
pub mod holding;
pub mod run;

pub use bar::Bar;
pub use holding::{Holding, Portfolio};
pub use run::{RunDirection, RunRecord};
