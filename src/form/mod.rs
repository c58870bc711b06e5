mod error;
pub mod path;
mod provider;
mod store;
mod surface;
mod validation;
pub mod validators;
mod value;


pub use error::{FormError, FormResult};
pub use path::{FieldPath, SetOutcome};
pub use provider::{FormOptions, FormProvider, FormProviderBuilder};
pub use store::{FormStore, ReactiveStore, SharedStore, Subscription};
pub use surface::{ElementSurface, MountGuard, MountedElements};
pub use trellis_derive::FormValues;
pub(crate) use validation::run_field_validators;
pub use validation::{
    AgnosticErrors, AgnosticValidator, AgnosticValidatorFn, FieldValidator, FieldValidatorFn,
    agnostic_validator, field_validator,
};
pub use value::{FormMap, FormValue};
