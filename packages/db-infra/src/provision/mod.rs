//! Database bootstrap: a pure plan of statements and a fail-fast runner.

pub mod plan;
pub mod runner;
pub mod target;

pub use plan::{Ident, ObjectClass, Probe, ProvisionPlan, Secret, Step, StepClass, StepKind};
pub use runner::{run_plan, ProvisionError, ProvisionReport, StepOutcome, StepRecord};
pub use target::{ProvisionTarget, SeaOrmTarget};
