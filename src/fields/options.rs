use gpui::SharedString;

use crate::form::FormValue;

/// One choice offered by a grouped field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldOption {
    value: FormValue,
    label: SharedString,
    disabled: bool,
}

impl FieldOption {
    pub fn new(value: impl Into<FormValue>, label: impl Into<SharedString>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn value(&self) -> &FormValue {
        &self.value
    }

    pub fn label(&self) -> &SharedString {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// The options of a grouped field, in display order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OptionList {
    options: Vec<FieldOption>,
}

impl OptionList {
    pub fn builder() -> OptionListBuilder {
        OptionListBuilder::default()
    }

    pub fn find(&self, value: &FormValue) -> Option<&FieldOption> {
        self.options.iter().find(|option| option.value == *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl FromIterator<FieldOption> for OptionList {
    fn from_iter<I: IntoIterator<Item = FieldOption>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}

#[derive(Default)]
pub struct OptionListBuilder {
    options: Vec<FieldOption>,
}

impl OptionListBuilder {
    pub fn option(self, value: impl Into<FormValue>, label: impl Into<SharedString>) -> Self {
        self.push(FieldOption::new(value, label))
    }

    pub fn disabled_option(
        self,
        value: impl Into<FormValue>,
        label: impl Into<SharedString>,
    ) -> Self {
        self.push(FieldOption::new(value, label).disabled(true))
    }

    pub fn push(mut self, option: FieldOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn build(self) -> OptionList {
        OptionList {
            options: self.options,
        }
    }
}
