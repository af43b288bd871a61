//! registro-form - Registration form validation and submission engine
//!
//! The state machine behind the TecnoMayores registration flow: composable
//! synchronous field rules, record-level cross-field rules, debounced and
//! token-guarded asynchronous uniqueness checks, a capped dynamic list of
//! additional phone entries, and a controller that gates submission on the
//! aggregate validity of all of it.
//!
//! The crate owns no transport or rendering. The presentation layer feeds
//! edits into [`RegistrationController`] and consumes its phase; submission,
//! notifications, the busy indicator, and the remote availability oracle
//! are injected capabilities.

pub mod checks;
pub mod config;
pub mod controller;
pub mod errors;
pub mod remote;
pub mod rules;
pub mod services;
pub mod state;

pub use checks::{AsyncCheckEngine, AsyncEvent, AsyncToken, CheckOutcome, UniqueField};
pub use config::FormConfig;
pub use controller::{RegistrationController, SubmissionPhase, SubmitOutcome};
pub use errors::{ErrorKind, ErrorSet, ValidationError};
pub use remote::{AvailabilityOracle, SimulatedDirectory, SubmitCapability};
pub use services::{BusyIndicator, LoadingGate, Notifier, Toast, ToastHub, ToastKind};
pub use state::{
    AddressField, FieldId, FieldState, RegistrationData, RegistrationForm, ScalarField,
    TipoTelefono,
};
