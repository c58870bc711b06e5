use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard, Weak};

use gpui::SharedString;
use indexmap::IndexMap;

use super::error::{FormError, FormResult};
use super::validation::FieldValidatorFn;
use super::value::FormMap;

/// The complete state of one form.
///
/// `errors` distinguishes a field that was never validated (no entry) from
/// one that was validated without errors (empty list).
#[derive(Clone, Default)]
pub struct FormStore {
    pub values: FormMap,
    pub disabled: IndexMap<String, bool>,
    pub errors: IndexMap<String, Vec<SharedString>>,
    pub validators: IndexMap<String, Vec<FieldValidatorFn>>,
}

impl FormStore {
    pub fn new(values: FormMap) -> Self {
        Self {
            values,
            disabled: IndexMap::new(),
            errors: IndexMap::new(),
            validators: IndexMap::new(),
        }
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.get(name).copied().unwrap_or(false)
    }
}

impl Debug for FormStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let validator_counts = self
            .validators
            .iter()
            .map(|(name, validators)| (name.as_str(), validators.len()))
            .collect::<Vec<_>>();
        f.debug_struct("FormStore")
            .field("values", &self.values)
            .field("disabled", &self.disabled)
            .field("errors", &self.errors)
            .field("validators", &validator_counts)
            .finish()
    }
}

/// Keeps a store callback registered until dropped.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Keeps the callback registered for as long as the store lives.
    pub fn detach(mut self) {
        self.unsubscribe.take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// A value container that applies every mutation atomically and tells its
/// observers about it afterwards.
pub trait ReactiveStore<S>: Send + Sync {
    /// Reads the latest state.
    fn with<R>(&self, reader: impl FnOnce(&S) -> R) -> R;

    /// Applies `mutator` exactly once against the latest state. A mutator
    /// that returns an error must not have touched the state; nothing is
    /// published in that case.
    fn try_set<R>(&self, mutator: impl FnOnce(&mut S) -> FormResult<R>) -> FormResult<R>;

    /// Reads the latest state together with the version it was published at.
    fn with_version<R>(&self, reader: impl FnOnce(&S, u64) -> R) -> R;

    /// [`try_set`](Self::try_set), applied only while the store is still at
    /// version `expected`. Yields `Ok(None)` and publishes nothing when
    /// another mutation got there first.
    fn try_set_at<R>(
        &self,
        expected: u64,
        mutator: impl FnOnce(&mut S) -> FormResult<R>,
    ) -> FormResult<Option<R>>;

    /// Registers `callback`, called with the new version after every
    /// successful mutation.
    fn subscribe(&self, callback: impl Fn(u64) + Send + Sync + 'static) -> Subscription;

    fn version(&self) -> u64;

    fn set(&self, mutator: impl FnOnce(&mut S)) -> FormResult<()> {
        self.try_set(|state| {
            mutator(state);
            Ok(())
        })
    }

    fn get(&self) -> S
    where
        S: Clone,
    {
        self.with(S::clone)
    }
}

type Subscriber = Arc<dyn Fn(u64) + Send + Sync>;

struct StoreInner<S> {
    state: RwLock<S>,
    version: AtomicU64,
    next_subscriber: AtomicU64,
    subscribers: RwLock<Vec<(u64, Subscriber)>>,
}

/// Lock-backed [`ReactiveStore`]. Clones share the same state.
pub struct SharedStore<S> {
    inner: Arc<StoreInner<S>>,
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> SharedStore<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(state),
                version: AtomicU64::new(0),
                next_subscriber: AtomicU64::new(1),
                subscribers: RwLock::new(Vec::new()),
            }),
        }
    }

    fn notify(&self, version: u64) {
        let subscribers: Vec<Subscriber> = {
            let guard = match self.inner.subscribers.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.iter().map(|(_, callback)| callback.clone()).collect()
        };
        for callback in subscribers {
            callback(version);
        }
    }
}

impl<S> ReactiveStore<S> for SharedStore<S>
where
    S: Send + Sync + 'static,
{
    fn with<R>(&self, reader: impl FnOnce(&S) -> R) -> R {
        let state = match self.inner.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        reader(&*state)
    }

    fn try_set<R>(&self, mutator: impl FnOnce(&mut S) -> FormResult<R>) -> FormResult<R> {
        let (result, version) = {
            let mut state = write_lock(&self.inner.state, "mutating form state")?;
            let result = mutator(&mut *state)?;
            let version = self.inner.version.fetch_add(1, Ordering::SeqCst) + 1;
            (result, version)
        };
        self.notify(version);
        Ok(result)
    }

    fn with_version<R>(&self, reader: impl FnOnce(&S, u64) -> R) -> R {
        let state = match self.inner.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Versions only move while the write lock is held.
        reader(&*state, self.inner.version.load(Ordering::SeqCst))
    }

    fn try_set_at<R>(
        &self,
        expected: u64,
        mutator: impl FnOnce(&mut S) -> FormResult<R>,
    ) -> FormResult<Option<R>> {
        let (result, version) = {
            let mut state = write_lock(&self.inner.state, "mutating form state")?;
            if self.inner.version.load(Ordering::SeqCst) != expected {
                return Ok(None);
            }
            let result = mutator(&mut *state)?;
            let version = self.inner.version.fetch_add(1, Ordering::SeqCst) + 1;
            (result, version)
        };
        self.notify(version);
        Ok(Some(result))
    }

    fn subscribe(&self, callback: impl Fn(u64) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::SeqCst);
        match self.inner.subscribers.write() {
            Ok(mut guard) => guard.push((id, Arc::new(callback))),
            Err(poisoned) => poisoned.into_inner().push((id, Arc::new(callback))),
        }

        let inner: Weak<StoreInner<S>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let mut subscribers = match inner.subscribers.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            subscribers.retain(|(subscriber, _)| *subscriber != id);
        })
    }

    fn version(&self) -> u64 {
        self.inner.version.load(Ordering::SeqCst)
    }
}

fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
