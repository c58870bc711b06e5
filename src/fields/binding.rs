use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use gpui::SharedString;
use tracing::{debug, warn};

use crate::form::{
    FieldValidatorFn, FormProvider, FormResult, FormStore, FormValue, MountGuard, ReactiveStore,
    SharedStore, field_validator, run_field_validators,
};
use crate::id::FieldElementId;

/// Everything a field component is configured with.
#[derive(Clone)]
pub struct FieldProps {
    name: String,
    validators: Vec<FieldValidatorFn>,
    initial: FormValue,
    disabled: bool,
}

impl FieldProps {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validators: Vec::new(),
            initial: FormValue::Null,
            disabled: false,
        }
    }

    pub fn validator(mut self, validator: FieldValidatorFn) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn validate_with<F>(self, validator: F) -> Self
    where
        F: Fn(&FormValue) -> Option<Vec<SharedString>> + Send + Sync + 'static,
    {
        self.validator(field_validator(validator))
    }

    pub fn validators(mut self, validators: impl IntoIterator<Item = FieldValidatorFn>) -> Self {
        self.validators.extend(validators);
        self
    }

    pub fn initial(mut self, value: impl Into<FormValue>) -> Self {
        self.initial = value.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

struct DetachedState {
    value: FormValue,
    errors: Vec<SharedString>,
    disabled: bool,
    validators: Vec<FieldValidatorFn>,
}

impl DetachedState {
    fn run_validators(&mut self) -> Vec<SharedString> {
        if self.disabled {
            return self.errors.clone();
        }
        self.errors = run_field_validators(&self.validators, &self.value);
        self.errors.clone()
    }
}

enum FieldSource<S>
where
    S: ReactiveStore<FormStore>,
{
    Form {
        form: FormProvider<S>,
        _mount: MountGuard,
    },
    Detached(RwLock<DetachedState>),
}

/// The state side of one field component.
///
/// Attached bindings live inside a form and clean up after themselves when
/// dropped. Detached bindings keep their own value and errors.
pub struct FieldBinding<S = SharedStore<FormStore>>
where
    S: ReactiveStore<FormStore>,
{
    name: String,
    element_id: FieldElementId,
    source: FieldSource<S>,
}

impl<S> FieldBinding<S>
where
    S: ReactiveStore<FormStore>,
{
    /// Mounts the field's element and registers it with `form`.
    ///
    /// A value the form already holds for this name wins over
    /// `props.initial`, so remounted fields pick up kept values.
    pub fn attach(form: &FormProvider<S>, props: FieldProps) -> FormResult<Self> {
        let FieldProps {
            name,
            validators,
            initial,
            disabled,
        } = props;
        let element_id = form.element_id(&name);
        let mount = MountGuard::new(form.surface().clone(), element_id.clone());

        let value = form
            .value_for(&name)
            .filter(|value| !value.is_map())
            .unwrap_or(initial);
        form.init_with_disabled(&name, validators, value, disabled)?;

        Ok(Self {
            name,
            element_id,
            source: FieldSource::Form {
                form: form.clone(),
                _mount: mount,
            },
        })
    }

    pub fn detached(props: FieldProps) -> Self {
        let element_id = FieldElementId::detached(&props.name);
        debug!(field = %props.name, "detached field created");
        Self {
            element_id,
            source: FieldSource::Detached(RwLock::new(DetachedState {
                value: props.initial,
                errors: Vec::new(),
                disabled: props.disabled,
                validators: props.validators,
            })),
            name: props.name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element_id(&self) -> &FieldElementId {
        &self.element_id
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.source, FieldSource::Form { .. })
    }

    pub fn form(&self) -> Option<&FormProvider<S>> {
        match &self.source {
            FieldSource::Form { form, .. } => Some(form),
            FieldSource::Detached(_) => None,
        }
    }

    pub fn value(&self) -> FormValue {
        match &self.source {
            FieldSource::Form { form, .. } => form.value_for(&self.name).unwrap_or_default(),
            FieldSource::Detached(state) => read_state(state).value.clone(),
        }
    }

    /// Writes the value without validating it.
    pub fn set_value(&self, value: impl Into<FormValue>) -> FormResult<()> {
        match &self.source {
            FieldSource::Form { form, .. } => form.update(&self.name, value).map(drop),
            FieldSource::Detached(state) => {
                write_state(state).value = value.into();
                Ok(())
            }
        }
    }

    /// Writes the value the way user input does: validation follows when the
    /// form validates on change. Detached fields always validate.
    pub fn change(&self, value: impl Into<FormValue>) -> FormResult<()> {
        match &self.source {
            FieldSource::Form { form, .. } => {
                form.update(&self.name, value)?;
                if form.options().validate_on_change {
                    form.validate(&self.name)?;
                }
                Ok(())
            }
            FieldSource::Detached(state) => {
                let mut state = write_state(state);
                state.value = value.into();
                state.run_validators();
                Ok(())
            }
        }
    }

    /// Re-derives this field's errors and returns them.
    pub fn validate(&self) -> FormResult<Vec<SharedString>> {
        match &self.source {
            FieldSource::Form { form, .. } => {
                form.validate(&self.name)?;
                Ok(form.get_errors(&self.name).unwrap_or_default())
            }
            FieldSource::Detached(state) => Ok(write_state(state).run_validators()),
        }
    }

    pub fn errors(&self) -> Vec<SharedString> {
        match &self.source {
            FieldSource::Form { form, .. } => form.get_errors(&self.name).unwrap_or_default(),
            FieldSource::Detached(state) => read_state(state).errors.clone(),
        }
    }

    pub fn first_error(&self) -> Option<SharedString> {
        match &self.source {
            FieldSource::Form { form, .. } => form.first_error_for(&self.name),
            FieldSource::Detached(state) => read_state(state).errors.first().cloned(),
        }
    }

    pub fn has_errors(&self) -> bool {
        match &self.source {
            FieldSource::Form { form, .. } => form.has_errors(&self.name),
            FieldSource::Detached(state) => !read_state(state).errors.is_empty(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        match &self.source {
            FieldSource::Form { form, .. } => form.is_disabled(&self.name),
            FieldSource::Detached(state) => read_state(state).disabled,
        }
    }

    pub fn set_disabled(&self, disabled: bool) -> FormResult<()> {
        match &self.source {
            FieldSource::Form { form, .. } => form.set_disabled(&self.name, disabled),
            FieldSource::Detached(state) => {
                let mut state = write_state(state);
                state.disabled = disabled;
                state.errors.clear();
                Ok(())
            }
        }
    }
}

impl<S> Drop for FieldBinding<S>
where
    S: ReactiveStore<FormStore>,
{
    fn drop(&mut self) {
        if let FieldSource::Form { form, .. } = &self.source {
            if let Err(error) = form.clean_up(&self.name) {
                warn!(
                    form = form.identification(),
                    field = %self.name,
                    %error,
                    "field clean up failed"
                );
            }
        }
    }
}

fn read_state(state: &RwLock<DetachedState>) -> RwLockReadGuard<'_, DetachedState> {
    match state.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_state(state: &RwLock<DetachedState>) -> RwLockWriteGuard<'_, DetachedState> {
    match state.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
