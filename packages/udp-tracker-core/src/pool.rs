//! Pooling for connection ID generators.
//!
//! A [`crate::connection_id::ConnectionIdGenerator`] is single-owner while
//! in use, but request handlers come and go on many threads. The pool hands
//! out scoped generators: [`GeneratorPool::acquire`] returns a guard that
//! dereferences to the generator and puts it back when dropped, so returning
//! an instance to the pool is guaranteed and needs no cleanup call.
use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

use crate::connection_id::ConnectionIdGenerator;

/// A pool of reusable connection ID generators sharing one key.
pub struct GeneratorPool {
    key: String,
    idle: Mutex<Vec<ConnectionIdGenerator>>,
}

impl GeneratorPool {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            idle: Mutex::new(Vec::new()),
        }
    }

    /// Takes an idle generator from the pool, or keys a new one if the pool
    /// is empty. The generator returns to the pool when the guard drops.
    #[must_use]
    pub fn acquire(&self) -> PooledGenerator<'_> {
        let generator = self
            .idle
            .lock()
            .pop()
            .unwrap_or_else(|| ConnectionIdGenerator::new(&self.key));

        PooledGenerator {
            generator: Some(generator),
            pool: self,
        }
    }

    fn release(&self, generator: ConnectionIdGenerator) {
        self.idle.lock().push(generator);
    }
}

/// Scoped access to a pooled generator.
pub struct PooledGenerator<'a> {
    generator: Option<ConnectionIdGenerator>,
    pool: &'a GeneratorPool,
}

impl Deref for PooledGenerator<'_> {
    type Target = ConnectionIdGenerator;

    fn deref(&self) -> &Self::Target {
        self.generator.as_ref().expect("the generator is present until drop")
    }
}

impl DerefMut for PooledGenerator<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.generator.as_mut().expect("the generator is present until drop")
    }
}

impl Drop for PooledGenerator<'_> {
    fn drop(&mut self) {
        if let Some(generator) = self.generator.take() {
            self.pool.release(generator);
        }
    }
}
