use std::sync::Arc;

use tracing::trace;

use super::binding::FieldBinding;
use super::options::{FieldOption, OptionList};
use crate::form::{FormResult, FormStore, FormValue, ReactiveStore, SharedStore};
use crate::id::FieldElementId;

pub type ChangeHandler = Arc<dyn Fn(&FormValue) + Send + Sync>;

/// A single choice out of a list of radio options.
pub struct RadioGroup<S = SharedStore<FormStore>>
where
    S: ReactiveStore<FormStore>,
{
    field: FieldBinding<S>,
    options: OptionList,
    on_change: Option<ChangeHandler>,
}

impl<S> RadioGroup<S>
where
    S: ReactiveStore<FormStore>,
{
    pub fn new(field: FieldBinding<S>, options: OptionList) -> Self {
        Self {
            field,
            options,
            on_change: None,
        }
    }

    pub fn on_change(mut self, handler: impl Fn(&FormValue) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(handler));
        self
    }

    pub fn field(&self) -> &FieldBinding<S> {
        &self.field
    }

    pub fn options(&self) -> &OptionList {
        &self.options
    }

    pub fn is_option_disabled(&self, option: &FieldOption) -> bool {
        option.is_disabled() || self.field.is_disabled()
    }

    pub fn is_checked(&self, option: &FieldOption) -> bool {
        self.field.value() == *option.value()
    }

    pub fn option_element_id(&self, option: &FieldOption) -> FieldElementId {
        self.field.element_id().child(&option.value().to_string())
    }

    /// Picks the option carrying `value`. Returns `false` without touching
    /// the field when the option is unknown or disabled.
    pub fn select(&self, value: &FormValue) -> FormResult<bool> {
        let Some(option) = self.options.find(value) else {
            return Ok(false);
        };
        if self.is_option_disabled(option) {
            trace!(field = self.field.name(), %value, "ignored disabled radio option");
            return Ok(false);
        }

        self.field.change(value.clone())?;
        if let Some(on_change) = &self.on_change {
            on_change(value);
        }
        Ok(true)
    }
}

/// A row of buttons where the active one holds the field's value.
pub struct ButtonChooser<S = SharedStore<FormStore>>
where
    S: ReactiveStore<FormStore>,
{
    field: FieldBinding<S>,
    options: OptionList,
    on_change: Option<ChangeHandler>,
}

impl<S> ButtonChooser<S>
where
    S: ReactiveStore<FormStore>,
{
    pub fn new(field: FieldBinding<S>, options: OptionList) -> Self {
        Self {
            field,
            options,
            on_change: None,
        }
    }

    pub fn on_change(mut self, handler: impl Fn(&FormValue) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(handler));
        self
    }

    pub fn field(&self) -> &FieldBinding<S> {
        &self.field
    }

    pub fn options(&self) -> &OptionList {
        &self.options
    }

    pub fn is_active(&self, option: &FieldOption) -> bool {
        self.field.value() == *option.value()
    }

    /// Every value change is validated, whatever the form's
    /// `validate_on_change` says.
    pub fn choose(&self, value: &FormValue) -> FormResult<bool> {
        let Some(option) = self.options.find(value) else {
            return Ok(false);
        };
        if option.is_disabled() || self.field.is_disabled() {
            return Ok(false);
        }

        self.field.set_value(value.clone())?;
        self.field.validate()?;
        if let Some(on_change) = &self.on_change {
            on_change(value);
        }
        Ok(true)
    }
}
