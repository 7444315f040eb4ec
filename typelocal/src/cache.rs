use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;

use crate::error::BoxError;
use crate::{AppError, CacheSettings, TypeKey};

type ComputeFn<V> = dyn Fn(TypeKey) -> Result<V, BoxError> + Send + Sync;
type Slots<V> = FxHashMap<TypeKey, Arc<V>>;

/// Lazily computed value per Rust type.
///
/// Reads load an immutable snapshot of the populated slots and never take a lock. A miss runs
/// the compute function with nothing held, so the function may itself query this cache, and then
/// publishes the result by compare-and-swap of the snapshot.
///
/// Concurrent misses on the same type may run the compute function more than once. The first
/// value published wins the slot; a racer whose slot got populated in the meantime still gets
/// back the value it computed itself, but the cache keeps the earlier one.
pub struct TypeLocal<V> {
    name: String,
    compute: Box<ComputeFn<V>>,
    slots: ArcSwap<Slots<V>>,
}

impl<V: Send + Sync + 'static> TypeLocal<V> {
    pub fn with_initial<F>(compute: F) -> Self
    where
        F: Fn(TypeKey) -> V + Send + Sync + 'static,
    {
        Self::with_settings(compute, &CacheSettings::default())
    }

    pub fn try_with_initial<F, E>(compute: F) -> Self
    where
        F: Fn(TypeKey) -> Result<V, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::try_with_settings(compute, &CacheSettings::default())
    }

    pub fn with_settings<F>(compute: F, settings: &CacheSettings) -> Self
    where
        F: Fn(TypeKey) -> V + Send + Sync + 'static,
    {
        Self::try_with_settings(move |key| Ok::<V, BoxError>(compute(key)), settings)
    }

    pub fn try_with_settings<F, E>(compute: F, settings: &CacheSettings) -> Self
    where
        F: Fn(TypeKey) -> Result<V, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let slots = FxHashMap::with_capacity_and_hasher(settings.initial_capacity, Default::default());
        Self {
            name: settings.name.clone(),
            compute: Box::new(move |key| compute(key).map_err(Into::<BoxError>::into)),
            slots: ArcSwap::from_pointee(slots),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value cached for `key`, computing and caching it on a miss.
    ///
    /// A failing compute function leaves the slot empty, the next call computes again.
    pub fn get(&self, key: TypeKey) -> Result<Arc<V>, AppError> {
        if let Some(value) = self.slots.load().get(&key) {
            return Ok(Arc::clone(value));
        }
        let value = (self.compute)(key)
            .map(Arc::new)
            .map_err(|source| AppError::ComputationFailure { type_name: key.name(), source })?;
        self.publish(key, &value);
        Ok(value)
    }

    pub fn get_of<T: ?Sized + 'static>(&self) -> Result<Arc<V>, AppError> {
        self.get(TypeKey::of::<T>())
    }

    /// Returns the cached value without ever computing.
    pub fn peek(&self, key: TypeKey) -> Option<Arc<V>> {
        self.slots.load().get(&key).cloned()
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.slots.load().contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.slots.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.load().is_empty()
    }

    /// Empties the slot for `key` so that the next `get` computes again. Returns whether a
    /// value was removed. Computations already running may still populate the slot afterwards.
    pub fn evict(&self, key: TypeKey) -> bool {
        let evicted = self.update(|slots| {
            if !slots.contains_key(&key) {
                return None;
            }
            let mut next = slots.clone();
            next.remove(&key);
            Some(next)
        });
        if evicted {
            crate::debug!("{}: evicted {}", self.name, key);
        }
        evicted
    }

    pub fn evict_of<T: ?Sized + 'static>(&self) -> bool {
        self.evict(TypeKey::of::<T>())
    }

    fn publish(&self, key: TypeKey, value: &Arc<V>) -> bool {
        let published = self.update(|slots| {
            if slots.contains_key(&key) {
                return None;
            }
            let mut next = slots.clone();
            next.insert(key, Arc::clone(value));
            Some(next)
        });
        if published {
            crate::debug!("{}: populated {}", self.name, key);
        } else {
            crate::debug!("{}: {} already populated, keeping the earlier value", self.name, key);
        }
        published
    }

    // `next` returning None means there is nothing to change in the current snapshot.
    fn update(&self, next: impl Fn(&Slots<V>) -> Option<Slots<V>>) -> bool {
        loop {
            let cur = self.slots.load_full();
            let Some(replacement) = next(cur.as_ref()) else {
                return false;
            };
            let prev = self.slots.compare_and_swap(&cur, Arc::new(replacement));
            if Arc::ptr_eq(&prev, &cur) {
                return true;
            }
        }
    }
}

impl<V: Send + Sync + 'static> fmt::Debug for TypeLocal<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeLocal").field("name", &self.name).field("populated", &self.len()).finish()
    }
}
