use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};

/// Non-poisoning mutex.
pub(crate) struct Mutex<T> {
    inner: StdMutex<T>,
}

impl<T> Mutex<T> {
    pub(crate) fn new(value: T) -> Self {
        Mutex {
            inner: StdMutex::new(value),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<T> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
