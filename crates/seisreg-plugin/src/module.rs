// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module table: the set of modules locators may point into.
//!
//! A module is *declared* when its exported symbols are known, and
//! *installed* when a loader is attached. Declaration is enough for startup
//! validation; loading only happens when an operation is first resolved, so
//! optional backends that are not installed only fail when used.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use seisreg_core::{Operation, OperationKind};
use tracing::debug;

use crate::locator::Locator;

/// A loaded module: symbols mapped to operations.
#[derive(Clone, Default)]
pub struct Module {
    symbols: HashMap<String, Operation>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol, builder style.
    pub fn with(mut self, symbol: impl Into<String>, operation: Operation) -> Self {
        self.export(symbol, operation);
        self
    }

    /// Add or replace a symbol.
    pub fn export(&mut self, symbol: impl Into<String>, operation: Operation) {
        self.symbols.insert(symbol.into(), operation);
    }

    pub fn get(&self, symbol: &str) -> Option<&Operation> {
        self.symbols.get(symbol)
    }

    /// Exported symbols and their kinds, sorted by symbol.
    pub fn exports(&self) -> BTreeMap<String, OperationKind> {
        self.symbols
            .iter()
            .map(|(name, op)| (name.clone(), op.kind()))
            .collect()
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("symbols", &self.exports())
            .finish()
    }
}

/// Builds a module on first use.
pub type ModuleInit = Arc<dyn Fn() -> Result<Module, String> + Send + Sync>;

struct ModuleSlot {
    exports: BTreeMap<String, OperationKind>,
    init: Option<ModuleInit>,
    loaded: OnceLock<Result<Arc<Module>, String>>,
}

/// Known modules, their declared exports, and their lazily loaded contents.
#[derive(Default)]
pub struct ModuleTable {
    modules: HashMap<String, ModuleSlot>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a module without installing it.
    ///
    /// Locators into it pass validation; resolving them fails with
    /// "not installed".
    pub fn declare<I, S>(&mut self, module: &str, exports: I)
    where
        I: IntoIterator<Item = (S, OperationKind)>,
        S: Into<String>,
    {
        self.insert(module, collect_exports(exports), None);
    }

    /// Declare a module and attach the loader that builds it on first use.
    pub fn install<I, S, F>(&mut self, module: &str, exports: I, init: F)
    where
        I: IntoIterator<Item = (S, OperationKind)>,
        S: Into<String>,
        F: Fn() -> Result<Module, String> + Send + Sync + 'static,
    {
        self.insert(module, collect_exports(exports), Some(Arc::new(init)));
    }

    /// Register an already built module. Its exports are taken from its symbols.
    pub fn provide(&mut self, module: &str, built: Module) {
        let exports = built.exports();
        let built = Arc::new(built);
        let init: ModuleInit = {
            let built = Arc::clone(&built);
            Arc::new(move || Ok(Module::clone(&built)))
        };
        self.insert(module, exports, Some(init));
        if let Some(slot) = self.modules.get(module) {
            let _ = slot.loaded.set(Ok(built));
        }
    }

    fn insert(
        &mut self,
        module: &str,
        exports: BTreeMap<String, OperationKind>,
        init: Option<ModuleInit>,
    ) {
        debug!(
            module,
            exports = exports.len(),
            installed = init.is_some(),
            "declared plugin module"
        );
        self.modules.insert(
            module.to_string(),
            ModuleSlot {
                exports,
                init,
                loaded: OnceLock::new(),
            },
        );
    }

    pub fn is_declared(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    pub fn is_installed(&self, module: &str) -> bool {
        self.modules
            .get(module)
            .is_some_and(|slot| slot.init.is_some())
    }

    /// True once the module has been loaded successfully.
    pub fn is_loaded(&self, module: &str) -> bool {
        self.modules
            .get(module)
            .and_then(|slot| slot.loaded.get())
            .is_some_and(|loaded| loaded.is_ok())
    }

    /// Declared module names, sorted.
    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check a locator against the declarations without loading anything.
    pub fn check(&self, locator: &Locator, kind: OperationKind) -> Result<(), String> {
        let slot = self
            .modules
            .get(locator.module())
            .ok_or_else(|| format!("module `{}` is not declared", locator.module()))?;
        match slot.exports.get(locator.symbol()) {
            None => Err(format!(
                "module `{}` does not export `{}`",
                locator.module(),
                locator.symbol()
            )),
            Some(found) if *found != kind => {
                Err(format!("`{locator}` is a {found}, expected a {kind}"))
            }
            Some(_) => Ok(()),
        }
    }

    /// Load a module, running its loader at most once.
    ///
    /// Failures are cached as well: a module that failed to load is not retried.
    pub fn load(&self, module: &str) -> Result<Arc<Module>, String> {
        let slot = self
            .modules
            .get(module)
            .ok_or_else(|| format!("module `{module}` is not declared"))?;
        slot.loaded
            .get_or_init(|| {
                debug!(module, "loading plugin module");
                match &slot.init {
                    None => Err(format!("module `{module}` is not installed")),
                    Some(init) => init()
                        .map(Arc::new)
                        .map_err(|e| format!("module `{module}` failed to load: {e}")),
                }
            })
            .clone()
    }

    /// Load the module behind `locator` and fetch its symbol, checking its kind.
    pub fn load_symbol(&self, locator: &Locator, kind: OperationKind) -> Result<Operation, String> {
        let module = self.load(locator.module())?;
        let operation = module.get(locator.symbol()).ok_or_else(|| {
            format!(
                "module `{}` has no symbol `{}`",
                locator.module(),
                locator.symbol()
            )
        })?;
        if operation.kind() != kind {
            return Err(format!(
                "`{locator}` is a {}, expected a {kind}",
                operation.kind()
            ));
        }
        Ok(operation.clone())
    }
}

impl std::fmt::Debug for ModuleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleTable")
            .field("modules", &self.module_names())
            .finish()
    }
}

fn collect_exports<I, S>(exports: I) -> BTreeMap<String, OperationKind>
where
    I: IntoIterator<Item = (S, OperationKind)>,
    S: Into<String>,
{
    exports
        .into_iter()
        .map(|(name, kind)| (name.into(), kind))
        .collect()
}
