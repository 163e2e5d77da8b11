// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread-shared registry for runtime re-registration.
//!
//! Lookups take the read lock; registration takes the write lock. A poisoned
//! lock is recovered rather than propagated.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use seisreg_core::{DuplicatePolicy, Operation, Role, SeisregError};

use crate::locator::Locator;
use crate::registry::PluginRegistry;

/// A [`PluginRegistry`] behind an `Arc<RwLock<_>>`, cheap to clone.
#[derive(Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<PluginRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Shared read access for lookups, listing and detection.
    pub fn read(&self) -> RwLockReadGuard<'_, PluginRegistry> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PluginRegistry> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn register(
        &self,
        category: &str,
        name: &str,
        role: Role,
        locator: Locator,
    ) -> Result<(), SeisregError> {
        self.write().register(category, name, role, locator)
    }

    pub fn register_with_policy(
        &self,
        category: &str,
        name: &str,
        role: Role,
        locator: Locator,
        policy: DuplicatePolicy,
    ) -> Result<(), SeisregError> {
        self.write()
            .register_with_policy(category, name, role, locator, policy)
    }

    pub fn resolve(&self, category: &str, name: &str, role: Role) -> Result<Operation, SeisregError> {
        self.read().resolve(category, name, role)
    }

    pub fn list_formats(&self, category: &str) -> Result<Vec<String>, SeisregError> {
        Ok(self
            .read()
            .list_formats(category)?
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub fn detect(&self, category: &str, data: &[u8]) -> Result<String, SeisregError> {
        self.read().detect(category, data)
    }
}

impl std::fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedRegistry").field(&*self.read()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Module, ModuleTable};
    use std::thread;

    fn is_a(prefix: &[u8]) -> bool {
        prefix.starts_with(b"A")
    }

    fn is_b(prefix: &[u8]) -> bool {
        prefix.starts_with(b"B")
    }

    fn shared() -> SharedRegistry {
        let mut modules = ModuleTable::new();
        modules.provide(
            "demo",
            Module::new()
                .with("is_a", Operation::detector(is_a))
                .with("is_b", Operation::detector(is_b)),
        );
        let mut registry = PluginRegistry::new(Arc::new(modules));
        registry
            .register("waveform", "A", Role::IsFormat, "demo:is_a".parse().unwrap())
            .unwrap();
        SharedRegistry::new(registry)
    }

    #[test]
    fn concurrent_readers_see_the_same_operation() {
        let registry = shared();
        let reference = registry.resolve("waveform", "A", Role::IsFormat).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || registry.resolve("waveform", "A", Role::IsFormat).unwrap())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().same_symbol(&reference));
        }
    }

    #[test]
    fn registration_is_visible_to_clones() {
        let registry = shared();
        let clone = registry.clone();
        clone
            .register("waveform", "B", Role::IsFormat, "demo:is_b".parse().unwrap())
            .unwrap();
        assert_eq!(registry.list_formats("waveform").unwrap(), vec!["A", "B"]);
        assert_eq!(registry.detect("waveform", b"B-data").unwrap(), "B");
    }

    #[test]
    fn duplicate_policy_applies_through_the_lock() {
        let registry = shared();
        let err = registry
            .register("waveform", "A", Role::IsFormat, "demo:is_b".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, SeisregError::DuplicateRegistration { .. }));

        registry
            .register_with_policy(
                "waveform",
                "A",
                Role::IsFormat,
                "demo:is_b".parse().unwrap(),
                DuplicatePolicy::Overwrite,
            )
            .unwrap();
        assert_eq!(registry.detect("waveform", b"B").unwrap(), "A");
    }
}
