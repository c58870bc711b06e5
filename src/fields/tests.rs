use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gpui::SharedString;

use crate::form::{FormError, FormProvider, FormValue, MountGuard, MountedElements, validators};

fn form() -> FormProvider {
    FormProvider::builder("profile").build()
}

fn colors() -> OptionList {
    OptionList::builder()
        .option("red", "Red")
        .option("green", "Green")
        .disabled_option("blue", "Blue")
        .build()
}

#[test]
fn attach_registers_and_drop_cleans_up() {
    let form = form();
    let field = FieldBinding::attach(
        &form,
        FieldProps::new("email").validator(validators::required("required")),
    )
    .expect("attach");

    assert!(field.is_attached());
    assert_eq!(field.element_id().as_str(), "field-profile-email");
    assert_eq!(form.surface().count(field.element_id()), 1);
    assert_eq!(form.registered_fields(), vec!["email"]);
    assert_eq!(field.value(), FormValue::Null);

    let id = field.element_id().clone();
    drop(field);

    assert_eq!(form.surface().count(&id), 0);
    assert!(form.registered_fields().is_empty());
    assert_eq!(form.value_for("email"), None);
}

#[test]
fn fields_dropped_during_teardown_keep_their_values() {
    let form = form();
    let field = FieldBinding::attach(&form, FieldProps::new("nickname").initial("ada"))
        .expect("attach");

    form.begin_teardown();
    drop(field);
    form.finish_teardown();

    assert_eq!(form.value_for("nickname"), Some("ada".into()));

    let remounted = FieldBinding::attach(&form, FieldProps::new("nickname").initial("other"))
        .expect("attach");
    assert_eq!(remounted.value(), "ada".into());
}

#[test]
fn attach_applies_initial_disabled_state() {
    let form = form();
    let field = FieldBinding::attach(&form, FieldProps::new("age").initial(3).disabled(true))
        .expect("attach");
    assert!(field.is_disabled());
    assert!(form.is_disabled("age"));
    assert_eq!(field.errors(), Vec::<SharedString>::new());
}

#[test]
fn duplicate_field_names_fail_to_attach() {
    let surface = MountedElements::shared();
    let form = FormProvider::builder("profile")
        .surface(surface.clone())
        .build();
    let first = FieldBinding::attach(&form, FieldProps::new("email").initial("a@b.c"))
        .expect("first attach");

    let error = match FieldBinding::attach(&form, FieldProps::new("email").initial("x@y.z")) {
        Ok(_) => panic!("second attach must fail"),
        Err(error) => error,
    };
    assert!(matches!(error, FormError::DuplicateField { .. }));
    assert_eq!(surface.count(first.element_id()), 1);
    assert_eq!(first.value(), "a@b.c".into());
}

#[test]
fn change_validates_when_form_validates_on_change() {
    let form = form();
    let field = FieldBinding::attach(
        &form,
        FieldProps::new("name")
            .initial("Ada")
            .validator(validators::required("required")),
    )
    .expect("attach");

    field.change("").expect("change");
    assert_eq!(field.errors(), vec![SharedString::from("required")]);
    assert_eq!(field.first_error(), Some("required".into()));
    assert!(field.has_errors());

    field.set_value("Grace").expect("set value");
    assert!(field.has_errors());
    assert!(field.validate().expect("validate").is_empty());
    assert!(!field.has_errors());
}

#[test]
fn change_skips_validation_when_disabled_in_options() {
    let form = FormProvider::builder("profile")
        .validate_on_change(false)
        .build();
    let field = FieldBinding::attach(
        &form,
        FieldProps::new("name").validator(validators::required("required")),
    )
    .expect("attach");

    field.change("").expect("change");
    assert_eq!(form.get_errors("name"), None);
}

#[test]
fn detached_fields_validate_locally() {
    let field: FieldBinding = FieldBinding::detached(
        FieldProps::new("search")
            .validator(validators::min_length(3, "too short"))
            .validate_with(|value: &FormValue| {
                (value.as_text() == Some("xxx")).then(|| vec!["forbidden".into()])
            }),
    );

    assert!(!field.is_attached());
    assert!(field.form().is_none());
    assert_eq!(field.element_id().as_str(), "field-search");

    field.change("ab").expect("change");
    assert_eq!(field.errors(), vec![SharedString::from("too short")]);

    field.change("xxx").expect("change");
    assert_eq!(field.first_error(), Some("forbidden".into()));

    field.set_disabled(true).expect("disable");
    assert!(!field.has_errors());
    field.set_value("a").expect("set value");
    assert!(field.validate().expect("validate").is_empty());
}

#[test]
fn radio_group_selects_enabled_options_only() {
    let form = form();
    let field = FieldBinding::attach(&form, FieldProps::new("color").initial("red"))
        .expect("attach");
    let changes = Arc::new(Mutex::new(Vec::new()));
    let changes_in_handler = changes.clone();
    let group = RadioGroup::new(field, colors()).on_change(move |value| {
        if let Ok(mut changes) = changes_in_handler.lock() {
            changes.push(value.clone());
        }
    });

    assert!(group.select(&"green".into()).expect("select"));
    assert_eq!(form.value_for("color"), Some("green".into()));

    assert!(!group.select(&"blue".into()).expect("disabled option"));
    assert!(!group.select(&"purple".into()).expect("unknown option"));
    assert_eq!(form.value_for("color"), Some("green".into()));

    let checked: Vec<_> = group
        .options()
        .iter()
        .filter(|option| group.is_checked(option))
        .map(|option| option.label().clone())
        .collect();
    assert_eq!(checked, vec![SharedString::from("Green")]);

    let changes = changes.lock().expect("lock").clone();
    assert_eq!(changes, vec![FormValue::from("green")]);
}

#[test]
fn disabled_radio_group_ignores_selection() {
    let form = form();
    let field = FieldBinding::attach(
        &form,
        FieldProps::new("color").initial("red").disabled(true),
    )
    .expect("attach");
    let group = RadioGroup::new(field, colors());

    assert!(!group.select(&"green".into()).expect("select"));
    assert_eq!(form.value_for("color"), Some("red".into()));
    assert!(group
        .options()
        .iter()
        .all(|option| group.is_option_disabled(option)));
}

#[test]
fn radio_option_ids_extend_the_group_id() {
    let form = form();
    let field = FieldBinding::attach(&form, FieldProps::new("size")).expect("attach");
    let group = RadioGroup::new(
        field,
        OptionList::builder().option(1, "Small").option(2, "Large").build(),
    );
    let ids: Vec<_> = group
        .options()
        .iter()
        .map(|option| group.option_element_id(option).as_str().to_owned())
        .collect();
    assert_eq!(ids, vec!["field-profile-size-1", "field-profile-size-2"]);
}

#[test]
fn button_chooser_validates_every_choice() {
    let form = FormProvider::builder("profile")
        .validate_on_change(false)
        .build();
    let field = FieldBinding::attach(
        &form,
        FieldProps::new("plan").validator(validators::one_of(["basic"], "unavailable")),
    )
    .expect("attach");
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_handler = calls.clone();
    let chooser = ButtonChooser::new(
        field,
        OptionList::builder()
            .option("basic", "Basic")
            .option("pro", "Pro")
            .build(),
    )
    .on_change(move |_| {
        calls_in_handler.fetch_add(1, Ordering::SeqCst);
    });

    assert!(chooser.choose(&"pro".into()).expect("choose"));
    assert_eq!(form.get_errors("plan"), Some(vec!["unavailable".into()]));

    assert!(chooser.choose(&"basic".into()).expect("choose"));
    assert_eq!(form.get_errors("plan"), Some(Vec::new()));

    let active: Vec<_> = chooser
        .options()
        .iter()
        .filter(|option| chooser.is_active(option))
        .map(|option| option.value().clone())
        .collect();
    assert_eq!(active, vec![FormValue::from("basic")]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn masked_input_stores_masked_text() {
    let form = form();
    let field = FieldBinding::attach(
        &form,
        FieldProps::new("phone").validator(validators::min_length(14, "incomplete")),
    )
    .expect("attach");
    let input = MaskedInput::new(field, Mask::parse("(999) 999-9999"));

    assert_eq!(
        input.input("555123").expect("input"),
        Some("(555) 123".into())
    );
    assert_eq!(form.value_for("phone"), Some("(555) 123".into()));
    assert!(form.has_errors("phone"));
    assert!(!input.is_complete());

    input.input("5551234567").expect("input");
    assert!(input.is_complete());
    assert!(!form.has_errors("phone"));

    input.field().set_disabled(true).expect("disable");
    assert_eq!(input.input("999").expect("input"), None);
    assert_eq!(form.value_for("phone"), Some("(555) 123-4567".into()));
}

#[test]
fn bindings_on_external_surfaces_see_foreign_mounts() {
    let surface = MountedElements::shared();
    let form = FormProvider::builder("profile")
        .surface(surface.clone())
        .build();
    let _rendered_elsewhere = MountGuard::new(surface.clone(), form.element_id("email"));

    assert!(FieldBinding::attach(&form, FieldProps::new("email")).is_err());
    assert!(form.registered_fields().is_empty());
}

#[test]
fn attaching_a_disabled_field_notifies_once() {
    let form = form();
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_callback = calls.clone();
    let _subscription = form.subscribe(move |_| {
        calls_in_callback.fetch_add(1, Ordering::SeqCst);
    });

    let field = FieldBinding::attach(&form, FieldProps::new("age").initial(3).disabled(true))
        .expect("attach");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(field.is_disabled());
}
