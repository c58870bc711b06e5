use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use gpui::SharedString;
use indexmap::IndexMap;
use tracing::{debug, error, trace};

use super::error::{FormError, FormResult};
use super::path::{self, FieldPath, SetOutcome};
use super::store::{FormStore, ReactiveStore, SharedStore, Subscription};
use super::surface::{ElementSurface, MountedElements};
use super::validation::{
    AgnosticErrors, AgnosticValidatorFn, FieldValidatorFn, agnostic_validator,
    run_field_validators,
};
use super::value::{FormMap, FormValue};
use crate::id::{FieldElementId, stable_auto_id};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormOptions {
    /// Names this form instance; part of every field element id.
    pub identification: String,
    /// Whether field components validate right after every value change.
    pub validate_on_change: bool,
}

impl FormOptions {
    pub fn identified(identification: impl Into<String>) -> Self {
        Self {
            identification: identification.into(),
            ..Self::default()
        }
    }

    /// Identification derived from the call site, stable across re-renders.
    #[track_caller]
    pub fn auto() -> Self {
        Self::identified(stable_auto_id("form"))
    }
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            identification: format!(
                "form-{}",
                FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst)
            ),
            validate_on_change: true,
        }
    }
}

pub struct FormProviderBuilder {
    options: FormOptions,
    values: FormMap,
    agnostic_validators: Vec<AgnosticValidatorFn>,
    surface: Option<Arc<dyn ElementSurface>>,
}

impl FormProviderBuilder {
    pub fn values(mut self, values: impl Into<FormMap>) -> Self {
        self.values = values.into();
        self
    }

    pub fn agnostic_validator(mut self, validator: AgnosticValidatorFn) -> Self {
        self.agnostic_validators.push(validator);
        self
    }

    pub fn agnostic_validator_fn<F>(self, validator: F) -> Self
    where
        F: Fn(&FormMap) -> AgnosticErrors + Send + Sync + 'static,
    {
        self.agnostic_validator(agnostic_validator(validator))
    }

    pub fn surface(mut self, surface: Arc<dyn ElementSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn validate_on_change(mut self, value: bool) -> Self {
        self.options.validate_on_change = value;
        self
    }

    pub fn build(self) -> FormProvider {
        FormProvider::from_parts(
            self.options,
            SharedStore::new(FormStore::new(self.values)),
            self.agnostic_validators,
            self.surface.unwrap_or_else(MountedElements::shared),
        )
    }
}

struct ProviderInner<S> {
    options: FormOptions,
    store: S,
    agnostic_validators: Vec<AgnosticValidatorFn>,
    surface: Arc<dyn ElementSurface>,
    cleaning_up: AtomicBool,
}

/// The handle field components use to talk to their form.
///
/// Every state change goes through one atomic store mutation. Clones share
/// the same form.
pub struct FormProvider<S = SharedStore<FormStore>> {
    inner: Arc<ProviderInner<S>>,
}

impl<S> Clone for FormProvider<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl FormProvider {
    pub fn new(options: FormOptions) -> Self {
        Self::from_parts(
            options,
            SharedStore::new(FormStore::default()),
            Vec::new(),
            MountedElements::shared(),
        )
    }

    pub fn builder(identification: impl Into<String>) -> FormProviderBuilder {
        FormProviderBuilder {
            options: FormOptions::identified(identification),
            values: FormMap::new(),
            agnostic_validators: Vec::new(),
            surface: None,
        }
    }
}

impl<S> FormProvider<S>
where
    S: ReactiveStore<FormStore>,
{
    pub fn from_parts(
        options: FormOptions,
        store: S,
        agnostic_validators: Vec<AgnosticValidatorFn>,
        surface: Arc<dyn ElementSurface>,
    ) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                options,
                store,
                agnostic_validators,
                surface,
                cleaning_up: AtomicBool::new(false),
            }),
        }
    }

    pub fn identification(&self) -> &str {
        &self.inner.options.identification
    }

    pub fn options(&self) -> &FormOptions {
        &self.inner.options
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    pub fn surface(&self) -> &Arc<dyn ElementSurface> {
        &self.inner.surface
    }

    pub fn element_id(&self, name: &str) -> FieldElementId {
        FieldElementId::for_form(self.identification(), name)
    }

    /// Whether the whole form is being torn down. While set, fields that
    /// clean up keep their values so a remount can pick them up again.
    pub fn is_cleaning_up(&self) -> bool {
        self.inner.cleaning_up.load(Ordering::SeqCst)
    }

    pub fn begin_teardown(&self) {
        self.inner.cleaning_up.store(true, Ordering::SeqCst);
        debug!(form = self.identification(), "form teardown started");
    }

    pub fn finish_teardown(&self) {
        self.inner.cleaning_up.store(false, Ordering::SeqCst);
        debug!(form = self.identification(), "form teardown finished");
    }

    /// Registers a field with its validators and initial value.
    ///
    /// Fails before touching the store when more than one rendered element
    /// carries the field's element id.
    pub fn init(
        &self,
        name: &str,
        validators: Vec<FieldValidatorFn>,
        value: impl Into<FormValue>,
    ) -> FormResult<()> {
        self.init_with_disabled(name, validators, value, false)
    }

    /// [`init`](Self::init) for a field that may start out disabled. The
    /// disabled flag lands in the same store mutation as the registration.
    pub fn init_with_disabled(
        &self,
        name: &str,
        validators: Vec<FieldValidatorFn>,
        value: impl Into<FormValue>,
        disabled: bool,
    ) -> FormResult<()> {
        let path = self.parse(name)?;
        let element_id = self.element_id(name);
        if self.inner.surface.count(&element_id) > 1 {
            return Err(self.configuration_error(FormError::DuplicateField {
                identification: self.identification().to_owned(),
                name: name.to_owned(),
            }));
        }

        let value = value.into();
        let validator_count = validators.len();
        self.inner.store.try_set(|form| {
            if path::set(&mut form.values, &path, value) == SetOutcome::Blocked {
                return Err(self.path_blocked(name));
            }
            form.validators.insert(name.to_owned(), validators);
            if disabled {
                form.disabled.insert(name.to_owned(), true);
                form.errors.insert(name.to_owned(), Vec::new());
            }
            Ok(())
        })?;
        debug!(
            form = self.identification(),
            field = name,
            validators = validator_count,
            disabled,
            "field initialized"
        );
        Ok(())
    }

    /// Drops everything the form tracks for `name`. The value itself is kept
    /// while the form is being torn down.
    pub fn clean_up(&self, name: &str) -> FormResult<()> {
        let path = self.parse(name)?;
        let keep_value = self.is_cleaning_up();
        self.inner.store.set(|form| {
            if !keep_value {
                path::delete(&mut form.values, &path);
            }
            form.errors.shift_remove(name);
            form.validators.shift_remove(name);
            form.disabled.shift_remove(name);
        })?;
        debug!(
            form = self.identification(),
            field = name,
            keep_value,
            "field cleaned up"
        );
        Ok(())
    }

    /// Re-derives the errors of one field from its validators. Disabled
    /// fields are left alone.
    ///
    /// Validators run against a snapshot with no lock held, so they may read
    /// the form. The result is committed only if nothing changed meanwhile;
    /// otherwise validation starts over on the newer state.
    pub fn validate(&self, name: &str) -> FormResult<()> {
        let path = self.parse(name)?;
        loop {
            let (version, snapshot) = self.inner.store.with_version(|form, version| {
                if form.is_disabled(name) {
                    return (version, Ok(None));
                }
                let snapshot = match path::get(&form.values, &path) {
                    Some(value) if !value.is_map() => Ok(Some((
                        value.clone(),
                        form.validators.get(name).cloned().unwrap_or_default(),
                    ))),
                    _ => Err(self.configuration_error(FormError::UnknownField {
                        identification: self.identification().to_owned(),
                        name: name.to_owned(),
                    })),
                };
                (version, snapshot)
            });
            let Some((value, validators)) = snapshot? else {
                trace!(
                    form = self.identification(),
                    field = name,
                    "skipped validation of disabled field"
                );
                return Ok(());
            };

            let errors = run_field_validators(&validators, &value);
            let count = errors.len();
            let committed = self.inner.store.try_set_at(version, |form| {
                form.errors.insert(name.to_owned(), errors);
                Ok(())
            })?;
            if committed.is_some() {
                trace!(
                    form = self.identification(),
                    field = name,
                    errors = count,
                    "field validated"
                );
                return Ok(());
            }
            trace!(
                form = self.identification(),
                field = name,
                "form changed while validating, retrying"
            );
        }
    }

    /// Validates every registered field, then runs the agnostic validators
    /// against the whole value tree. Returns whether the form is valid.
    ///
    /// Like [`validate`](Self::validate), validators see a snapshot and the
    /// new error map replaces the old one in one mutation.
    pub fn validate_all(&self) -> FormResult<bool> {
        loop {
            let (version, snapshot) = self
                .inner
                .store
                .with_version(|form, version| (version, form.clone()));
            let errors = derive_all_errors(&snapshot, &self.inner.agnostic_validators);
            let valid = errors.values().all(Vec::is_empty);

            let committed = self.inner.store.try_set_at(version, |form| {
                form.errors = errors;
                Ok(())
            })?;
            if committed.is_some() {
                debug!(form = self.identification(), valid, "form validated");
                return Ok(valid);
            }
            trace!(
                form = self.identification(),
                "form changed while validating, retrying"
            );
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.is_invalid()
    }

    pub fn is_invalid(&self) -> bool {
        self.inner
            .store
            .with(|form| form.errors.values().any(|errors| !errors.is_empty()))
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.inner.store.with(|form| form.is_disabled(name))
    }

    /// Disabling or enabling a field always clears its displayed errors.
    /// Only initialized fields can be disabled.
    pub fn set_disabled(&self, name: &str, disabled: bool) -> FormResult<()> {
        let path = self.parse(name)?;
        self.inner.store.try_set(|form| {
            if !path::is_leaf(&form.values, &path) {
                return Err(self.configuration_error(FormError::UnknownField {
                    identification: self.identification().to_owned(),
                    name: name.to_owned(),
                }));
            }
            form.disabled.insert(name.to_owned(), disabled);
            form.errors.insert(name.to_owned(), Vec::new());
            Ok(())
        })?;
        debug!(
            form = self.identification(),
            field = name,
            disabled,
            "field disabled state changed"
        );
        Ok(())
    }

    pub fn value_for(&self, name: &str) -> Option<FormValue> {
        let path = FieldPath::parse(name).ok()?;
        self.inner
            .store
            .with(|form| path::get(&form.values, &path).cloned())
    }

    pub fn update(&self, name: &str, value: impl Into<FormValue>) -> FormResult<SetOutcome> {
        let path = self.parse(name)?;
        let value = value.into();
        let outcome = self.inner.store.try_set(|form| {
            match path::set(&mut form.values, &path, value) {
                SetOutcome::Blocked => Err(self.path_blocked(name)),
                outcome => Ok(outcome),
            }
        })?;
        trace!(form = self.identification(), field = name, ?outcome, "field updated");
        Ok(outcome)
    }

    pub fn first_error_for(&self, name: &str) -> Option<SharedString> {
        self.inner.store.with(|form| {
            form.errors
                .get(name)
                .and_then(|errors| errors.first().cloned())
        })
    }

    /// `None` until the field has been validated; an empty list afterwards
    /// when it passed.
    pub fn get_errors(&self, name: &str) -> Option<Vec<SharedString>> {
        self.inner.store.with(|form| form.errors.get(name).cloned())
    }

    pub fn has_errors(&self, name: &str) -> bool {
        self.inner.store.with(|form| {
            form.errors
                .get(name)
                .is_some_and(|errors| !errors.is_empty())
        })
    }

    pub fn values(&self) -> FormMap {
        self.inner.store.with(|form| form.values.clone())
    }

    pub fn errors(&self) -> IndexMap<String, Vec<SharedString>> {
        self.inner.store.with(|form| form.errors.clone())
    }

    pub fn registered_fields(&self) -> Vec<String> {
        self.inner
            .store
            .with(|form| form.validators.keys().cloned().collect())
    }

    pub fn leaves(&self) -> Vec<String> {
        self.inner.store.with(|form| path::leaves(&form.values))
    }

    pub fn subscribe(&self, callback: impl Fn(u64) + Send + Sync + 'static) -> Subscription {
        self.inner.store.subscribe(callback)
    }

    fn parse(&self, name: &str) -> FormResult<FieldPath> {
        FieldPath::parse(name).map_err(|error| self.configuration_error(error))
    }

    fn path_blocked(&self, name: &str) -> FormError {
        self.configuration_error(FormError::PathBlocked {
            identification: self.identification().to_owned(),
            name: name.to_owned(),
        })
    }

    fn configuration_error(&self, error: FormError) -> FormError {
        error!(form = self.identification(), %error, "form configuration error");
        error
    }
}

/// The error map a full validation pass produces for `form`.
fn derive_all_errors(
    form: &FormStore,
    agnostic_validators: &[AgnosticValidatorFn],
) -> IndexMap<String, Vec<SharedString>> {
    let null = FormValue::Null;
    let mut errors: IndexMap<String, Vec<SharedString>> = IndexMap::new();

    for (name, validators) in &form.validators {
        if form.is_disabled(name) {
            continue;
        }
        let path = FieldPath::from_trusted(name);
        let value = path::get(&form.values, &path).unwrap_or(&null);
        errors.insert(name.clone(), run_field_validators(validators, value));
    }

    for validator in agnostic_validators {
        for (name, message) in validator.validate(&form.values) {
            if message.as_ref().is_empty() || form.is_disabled(&name) {
                continue;
            }
            errors.entry(name).or_default().push(message);
        }
    }

    // Disabled fields keep whatever they showed before.
    for (name, previous) in &form.errors {
        if form.is_disabled(name) {
            errors.insert(name.clone(), previous.clone());
        }
    }
    errors
}
