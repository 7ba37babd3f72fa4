//! Multi-step intake wizard: step sequence, skip tracking, draft accumulation,
//! validation-gated transitions.

pub mod controller;
pub mod state;
pub mod validate;

pub use controller::WizardController;
pub use state::{StepMark, WizardState, WizardStep};
pub use validate::{validate_step, StepValidation};
