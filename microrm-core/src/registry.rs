use std::{
    any::TypeId,
    collections::HashSet,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Set of models whose table has been created through one database handle.
///
/// Each handle owns its registry, so a model used with a second handle is
/// registered again there. The lock is only held to read or update the set:
/// two threads registering the same model at once may both issue the
/// `CREATE TABLE IF NOT EXISTS`, which is harmless.
#[derive(Default, Debug)]
pub struct Registry {
    registered: Mutex<HashSet<TypeId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<TypeId>> {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_registered<M: 'static>(&self) -> bool {
        self.lock().contains(&TypeId::of::<M>())
    }

    pub fn mark_registered<M: 'static>(&self) {
        self.lock().insert(TypeId::of::<M>());
    }

    /// Forget about `M`, the next use will issue its DDL again.
    pub fn forget<M: 'static>(&self) -> bool {
        self.lock().remove(&TypeId::of::<M>())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
