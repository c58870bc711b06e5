//! Ready-made validators for the common field rules.

use gpui::SharedString;
use rust_decimal::Decimal;

use super::path::{self, FieldPath};
use super::validation::{
    AgnosticErrors, AgnosticValidatorFn, FieldValidatorFn, agnostic_validator, field_validator,
};
use super::value::FormValue;

fn length_of(value: &FormValue) -> Option<usize> {
    match value {
        FormValue::Text(text) => Some(text.as_ref().chars().count()),
        FormValue::List(items) => Some(items.len()),
        _ => None,
    }
}

/// Fails when the value is not [present](FormValue::is_present).
pub fn required(message: impl Into<SharedString>) -> FieldValidatorFn {
    let message = message.into();
    field_validator(move |value: &FormValue| {
        (!value.is_present()).then(|| vec![message.clone()])
    })
}

/// Text shorter than `min` characters, or a list with fewer items, fails.
/// Empty values pass so the rule composes with [`required`].
pub fn min_length(min: usize, message: impl Into<SharedString>) -> FieldValidatorFn {
    let message = message.into();
    field_validator(move |value: &FormValue| {
        if !value.is_present() {
            return None;
        }
        length_of(value)
            .filter(|len| *len < min)
            .map(|_| vec![message.clone()])
    })
}

pub fn max_length(max: usize, message: impl Into<SharedString>) -> FieldValidatorFn {
    let message = message.into();
    field_validator(move |value: &FormValue| {
        length_of(value)
            .filter(|len| *len > max)
            .map(|_| vec![message.clone()])
    })
}

pub fn min(min: impl Into<Decimal>, message: impl Into<SharedString>) -> FieldValidatorFn {
    let min = min.into();
    let message = message.into();
    field_validator(move |value: &FormValue| {
        value
            .as_number()
            .filter(|number| *number < min)
            .map(|_| vec![message.clone()])
    })
}

pub fn max(max: impl Into<Decimal>, message: impl Into<SharedString>) -> FieldValidatorFn {
    let max = max.into();
    let message = message.into();
    field_validator(move |value: &FormValue| {
        value
            .as_number()
            .filter(|number| *number > max)
            .map(|_| vec![message.clone()])
    })
}

/// Present values must equal one of `allowed`.
pub fn one_of<I, V>(allowed: I, message: impl Into<SharedString>) -> FieldValidatorFn
where
    I: IntoIterator<Item = V>,
    V: Into<FormValue>,
{
    let allowed = allowed.into_iter().map(Into::into).collect::<Vec<FormValue>>();
    let message = message.into();
    field_validator(move |value: &FormValue| {
        (value.is_present() && !allowed.contains(value)).then(|| vec![message.clone()])
    })
}

/// Cross-field rule: the value at `confirmation` must equal the value at
/// `source`. The error is attached to `confirmation`.
pub fn matches_field(
    source: FieldPath,
    confirmation: FieldPath,
    message: impl Into<SharedString>,
) -> AgnosticValidatorFn {
    let message = message.into();
    agnostic_validator(move |values| {
        let mut errors = AgnosticErrors::new();
        if path::get(values, &source) != path::get(values, &confirmation) {
            errors.insert(confirmation.as_str().to_owned(), message.clone());
        }
        errors
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::value::FormMap;

    fn messages(validator: &FieldValidatorFn, value: FormValue) -> Vec<SharedString> {
        validator.validate(&value).unwrap_or_default()
    }

    #[test]
    fn required_accepts_zero() {
        let validator = required("required");
        assert!(messages(&validator, 0.into()).is_empty());
        assert!(messages(&validator, false.into()).is_empty());
        assert_eq!(messages(&validator, FormValue::Null), vec![SharedString::from("required")]);
        assert_eq!(messages(&validator, "".into()).len(), 1);
    }

    #[test]
    fn length_rules_count_characters_and_items() {
        let min = min_length(3, "too short");
        let max = max_length(3, "too long");
        assert_eq!(messages(&min, "ab".into()).len(), 1);
        assert!(messages(&min, "".into()).is_empty());
        assert!(messages(&min, "äöü".into()).is_empty());
        assert_eq!(messages(&max, vec![1, 2, 3, 4].into()).len(), 1);
        assert!(messages(&max, 12345.into()).is_empty());
    }

    #[test]
    fn numeric_bounds_ignore_non_numbers() {
        let at_least = min(18, "too young");
        let at_most = max(120, "too old");
        assert_eq!(messages(&at_least, 17.into()).len(), 1);
        assert!(messages(&at_least, 18.into()).is_empty());
        assert!(messages(&at_least, "17".into()).is_empty());
        assert_eq!(messages(&at_most, 121.into()).len(), 1);
    }

    #[test]
    fn one_of_checks_membership() {
        let validator = one_of(["red", "green"], "unknown color");
        assert!(messages(&validator, "red".into()).is_empty());
        assert!(messages(&validator, FormValue::Null).is_empty());
        assert_eq!(messages(&validator, "blue".into()).len(), 1);
    }

    #[test]
    fn matches_field_reports_on_confirmation() {
        let source = FieldPath::parse("password").expect("path");
        let confirmation = FieldPath::parse("confirm").expect("path");
        let validator = matches_field(source, confirmation, "mismatch");

        let mut values = FormMap::new();
        values.insert("password".into(), "a".into());
        values.insert("confirm".into(), "b".into());
        let errors = validator.validate(&values);
        assert_eq!(errors.get("confirm"), Some(&SharedString::from("mismatch")));

        values.insert("confirm".into(), "a".into());
        assert!(validator.validate(&values).is_empty());
    }
}
