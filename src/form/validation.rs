use std::sync::Arc;

use gpui::SharedString;
use indexmap::IndexMap;

use super::value::{FormMap, FormValue};

/// Validates one field's value. `None`, an empty list and empty messages all
/// mean "no errors".
///
/// Validators run without the form's lock held and may read the form. They
/// must not write to it: a write during validation restarts the pass.
pub trait FieldValidator: Send + Sync {
    fn validate(&self, value: &FormValue) -> Option<Vec<SharedString>>;
}

impl<F> FieldValidator for F
where
    F: Fn(&FormValue) -> Option<Vec<SharedString>> + Send + Sync,
{
    fn validate(&self, value: &FormValue) -> Option<Vec<SharedString>> {
        (self)(value)
    }
}

/// Errors reported by an [`AgnosticValidator`], one message per field path.
pub type AgnosticErrors = IndexMap<String, SharedString>;

/// Validates the whole form value and attaches errors to any field. The same
/// read-only rule as for [`FieldValidator`] applies.
pub trait AgnosticValidator: Send + Sync {
    fn validate(&self, values: &FormMap) -> AgnosticErrors;
}

impl<F> AgnosticValidator for F
where
    F: Fn(&FormMap) -> AgnosticErrors + Send + Sync,
{
    fn validate(&self, values: &FormMap) -> AgnosticErrors {
        (self)(values)
    }
}

pub type FieldValidatorFn = Arc<dyn FieldValidator>;
pub type AgnosticValidatorFn = Arc<dyn AgnosticValidator>;

pub fn field_validator<F>(validator: F) -> FieldValidatorFn
where
    F: Fn(&FormValue) -> Option<Vec<SharedString>> + Send + Sync + 'static,
{
    Arc::new(validator)
}

pub fn agnostic_validator<F>(validator: F) -> AgnosticValidatorFn
where
    F: Fn(&FormMap) -> AgnosticErrors + Send + Sync + 'static,
{
    Arc::new(validator)
}

/// Runs `validators` in order and flattens their non-empty messages.
pub(crate) fn run_field_validators(
    validators: &[FieldValidatorFn],
    value: &FormValue,
) -> Vec<SharedString> {
    validators
        .iter()
        .filter_map(|validator| validator.validate(value))
        .flatten()
        .filter(|message| !message.as_ref().is_empty())
        .collect()
}
