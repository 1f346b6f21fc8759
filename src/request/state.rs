use std::any::{Any, TypeId};
use std::collections::HashMap;

use thiserror::Error;

/// Type-keyed resource map owned by a single request. Each type can appear
/// at most once; the asset registry is stored under its own type.
///
/// Access goes through `&mut self`, so the request handler serialises it.
/// Values must be `Send` so the owning context can cross await points on a
/// multi-threaded executor.
#[derive(Default)]
pub struct RequestState {
    inner: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl RequestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T>(&mut self, value: T) -> Result<(), RequestStateError>
    where
        T: Send + 'static,
    {
        let type_id = TypeId::of::<T>();
        if self.inner.contains_key(&type_id) {
            return Err(RequestStateError::AlreadyExists);
        }
        self.inner.insert(type_id, Box::new(value));
        Ok(())
    }

    pub fn get<T>(&self) -> Result<&T, RequestStateError>
    where
        T: Send + 'static,
    {
        let boxed = self
            .inner
            .get(&TypeId::of::<T>())
            .ok_or(RequestStateError::Missing)?;
        boxed
            .downcast_ref::<T>()
            .ok_or(RequestStateError::TypeMismatch)
    }

    pub fn get_mut<T>(&mut self) -> Result<&mut T, RequestStateError>
    where
        T: Send + 'static,
    {
        let boxed = self
            .inner
            .get_mut(&TypeId::of::<T>())
            .ok_or(RequestStateError::Missing)?;
        boxed
            .downcast_mut::<T>()
            .ok_or(RequestStateError::TypeMismatch)
    }

    /// Fetch the value for `T`, creating it with `make` on first access.
    pub fn get_or_insert_with<T, F>(&mut self, make: F) -> Result<&mut T, RequestStateError>
    where
        T: Send + 'static,
        F: FnOnce() -> T,
    {
        self.get_or_try_insert_with(|| Ok(make()))
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with) for fallible
    /// constructors. Nothing is stored when `make` fails.
    pub fn get_or_try_insert_with<T, E, F>(&mut self, make: F) -> Result<&mut T, E>
    where
        T: Send + 'static,
        E: From<RequestStateError>,
        F: FnOnce() -> Result<T, E>,
    {
        use std::collections::hash_map::Entry;

        let boxed = match self.inner.entry(TypeId::of::<T>()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(vacant) => vacant.insert(Box::new(make()?)),
        };
        boxed
            .downcast_mut::<T>()
            .ok_or_else(|| RequestStateError::TypeMismatch.into())
    }

    pub fn remove<T>(&mut self) -> Option<T>
    where
        T: Send + 'static,
    {
        let boxed = self.inner.remove(&TypeId::of::<T>())?;
        boxed.downcast::<T>().ok().map(|value| *value)
    }

    pub fn contains<T>(&self) -> bool
    where
        T: Send + 'static,
    {
        self.inner.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestState")
            .field("resources", &self.inner.len())
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum RequestStateError {
    #[error("resource already exists")]
    AlreadyExists,
    #[error("resource missing")]
    Missing,
    #[error("resource type mismatch")]
    TypeMismatch,
}
