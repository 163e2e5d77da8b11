// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry mapping `(category, name, role)` to lazily resolved operations.
//!
//! The registry is built once at startup, usually from an entry-point table,
//! validated against the [`ModuleTable`], and read-only afterwards. Lookups
//! and detection only take `&self`, so a finished registry can be shared
//! across threads; each role slot caches its resolution in a one-time cell.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use seisreg_core::{
    CategoryKind, DuplicatePolicy, FormatDetector, FormatReader, FormatWriter, Operation, Params,
    Role, SampleAlgorithm, SeisregError, Stream,
};
use tracing::{debug, info};

use crate::locator::Locator;
use crate::manifest::EntryPointTable;
use crate::module::ModuleTable;

/// Minimum Jaro-Winkler similarity for "did you mean" hints on format names.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Registry-wide behavior, usually taken from the `[registry]` config section.
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Policy used by [`PluginRegistry::register`].
    pub duplicate_policy: DuplicatePolicy,
    /// Bytes of input handed to each detector.
    pub detect_prefix_bytes: usize,
    /// Skip detectors that fail to load instead of failing detection.
    pub skip_unloadable_detectors: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            detect_prefix_bytes: 4096,
            skip_unloadable_detectors: true,
        }
    }
}

/// One role of a plugin entry and its cached resolution.
struct RoleSlot {
    role: Role,
    locator: Locator,
    resolved: OnceLock<Result<Operation, String>>,
}

impl RoleSlot {
    fn new(role: Role, locator: Locator) -> Self {
        Self {
            role,
            locator,
            resolved: OnceLock::new(),
        }
    }
}

/// A named plugin within a category and the roles registered for it.
pub struct PluginEntry {
    name: String,
    slots: Vec<RoleSlot>,
}

impl PluginEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered roles, in registration order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.slots.iter().map(|slot| slot.role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.slot(role).is_some()
    }

    pub fn locator(&self, role: Role) -> Option<&Locator> {
        self.slot(role).map(|slot| &slot.locator)
    }

    /// True once the role has been resolved successfully.
    pub fn is_resolved(&self, role: Role) -> bool {
        self.slot(role)
            .and_then(|slot| slot.resolved.get())
            .is_some_and(|r| r.is_ok())
    }

    fn slot(&self, role: Role) -> Option<&RoleSlot> {
        self.slots.iter().find(|slot| slot.role == role)
    }
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let roles: Vec<String> = self
            .slots
            .iter()
            .map(|slot| format!("{}={}", slot.role, slot.locator))
            .collect();
        f.debug_struct("PluginEntry")
            .field("name", &self.name)
            .field("roles", &roles)
            .finish()
    }
}

struct CategoryTable {
    name: String,
    kind: CategoryKind,
    entries: Vec<PluginEntry>,
    index: HashMap<String, usize>,
}

impl CategoryTable {
    fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }
}

/// Registry of plugin operations keyed by category, name, and role.
pub struct PluginRegistry {
    categories: Vec<CategoryTable>,
    index: HashMap<String, usize>,
    modules: Arc<ModuleTable>,
    options: RegistryOptions,
}

impl PluginRegistry {
    /// Create an empty registry over `modules` with default options.
    pub fn new(modules: Arc<ModuleTable>) -> Self {
        Self::with_options(modules, RegistryOptions::default())
    }

    pub fn with_options(modules: Arc<ModuleTable>, options: RegistryOptions) -> Self {
        Self {
            categories: Vec::new(),
            index: HashMap::new(),
            modules,
            options,
        }
    }

    /// Register every row of `table`, then validate the result.
    ///
    /// All registration and validation errors are collected; any error means
    /// the configuration is unusable and startup should stop.
    pub fn from_entry_points(
        table: &EntryPointTable,
        modules: Arc<ModuleTable>,
        options: RegistryOptions,
    ) -> Result<Self, Vec<SeisregError>> {
        let mut registry = Self::with_options(modules, options);
        registry.extend(table)?;
        registry.validate()?;
        info!(
            categories = registry.categories.len(),
            entries = registry.len(),
            "plugin registry ready"
        );
        Ok(registry)
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    pub fn modules(&self) -> &ModuleTable {
        &self.modules
    }

    /// Register every row of `table` with the configured duplicate policy.
    pub fn extend(&mut self, table: &EntryPointTable) -> Result<(), Vec<SeisregError>> {
        let errors: Vec<SeisregError> = table
            .iter()
            .filter_map(|ep| {
                self.register(&ep.category, &ep.name, ep.role, ep.locator.clone())
                    .err()
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Register one operation using the registry's duplicate policy.
    pub fn register(
        &mut self,
        category: &str,
        name: &str,
        role: Role,
        locator: Locator,
    ) -> Result<(), SeisregError> {
        self.register_with_policy(category, name, role, locator, self.options.duplicate_policy)
    }

    /// Register one operation with an explicit duplicate policy.
    ///
    /// The category is created on first use and its kind (format or
    /// algorithm) is fixed by that first role.
    pub fn register_with_policy(
        &mut self,
        category: &str,
        name: &str,
        role: Role,
        locator: Locator,
        policy: DuplicatePolicy,
    ) -> Result<(), SeisregError> {
        let kind = role.category_kind();
        let idx = match self.index.get(category) {
            Some(&idx) => {
                let existing = self.categories[idx].kind;
                if existing != kind {
                    return Err(SeisregError::InvalidRole {
                        category: category.to_string(),
                        role,
                        kind: existing,
                    });
                }
                idx
            }
            None => {
                self.categories.push(CategoryTable {
                    name: category.to_string(),
                    kind,
                    entries: Vec::new(),
                    index: HashMap::new(),
                });
                let idx = self.categories.len() - 1;
                self.index.insert(category.to_string(), idx);
                idx
            }
        };

        let table = &mut self.categories[idx];
        let entry_idx = match table.index.get(name) {
            Some(&i) => i,
            None => {
                table.entries.push(PluginEntry {
                    name: name.to_string(),
                    slots: Vec::new(),
                });
                let i = table.entries.len() - 1;
                table.index.insert(name.to_string(), i);
                i
            }
        };
        let entry = &mut table.entries[entry_idx];

        match entry.slots.iter_mut().find(|slot| slot.role == role) {
            Some(slot) => match policy {
                DuplicatePolicy::Reject => {
                    return Err(SeisregError::DuplicateRegistration {
                        category: category.to_string(),
                        name: name.to_string(),
                        role,
                        existing: slot.locator.to_string(),
                    });
                }
                DuplicatePolicy::Overwrite => {
                    debug!(
                        category,
                        name,
                        %role,
                        previous = %slot.locator,
                        %locator,
                        "overwrote plugin operation"
                    );
                    *slot = RoleSlot::new(role, locator);
                }
            },
            None => {
                debug!(category, name, %role, %locator, "registered plugin operation");
                entry.slots.push(RoleSlot::new(role, locator));
            }
        }
        Ok(())
    }

    /// Check every registered locator against the module table.
    ///
    /// Modules only need to be declared, not installed. Format entries must
    /// also carry both `isFormat` and `readFormat`.
    pub fn validate(&self) -> Result<(), Vec<SeisregError>> {
        let mut errors = Vec::new();
        for table in &self.categories {
            for entry in &table.entries {
                let invalid = |reason: String| SeisregError::InvalidEntry {
                    category: table.name.clone(),
                    name: entry.name.clone(),
                    reason,
                };
                if table.kind == CategoryKind::Format {
                    for required in [Role::IsFormat, Role::ReadFormat] {
                        if !entry.has_role(required) {
                            errors.push(invalid(format!("missing required role `{required}`")));
                        }
                    }
                }
                for slot in &entry.slots {
                    if let Err(reason) = self.modules.check(&slot.locator, slot.role.kind()) {
                        errors.push(invalid(format!("{}: {reason}", slot.role)));
                    }
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Category names in registration order.
    pub fn list_categories(&self) -> Vec<&str> {
        self.categories.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn category_kind(&self, category: &str) -> Result<CategoryKind, SeisregError> {
        Ok(self.category(category)?.kind)
    }

    /// Names registered in `category`, in registration order.
    pub fn list_formats(&self, category: &str) -> Result<Vec<&str>, SeisregError> {
        Ok(self
            .category(category)?
            .entries
            .iter()
            .map(|e| e.name.as_str())
            .collect())
    }

    /// Entries of `category`, in registration order.
    pub fn entries(&self, category: &str) -> Result<&[PluginEntry], SeisregError> {
        Ok(&self.category(category)?.entries)
    }

    /// Look up one entry.
    pub fn entry(&self, category: &str, name: &str) -> Result<&PluginEntry, SeisregError> {
        let table = self.category(category)?;
        match table.index.get(name) {
            Some(&i) => Ok(&table.entries[i]),
            None => Err(SeisregError::UnknownFormat {
                category: category.to_string(),
                name: name.to_string(),
                suggestion: suggest_name(name, &table.entries),
                known: table.names(),
            }),
        }
    }

    /// Resolve an operation, loading its module on first use.
    pub fn resolve(&self, category: &str, name: &str, role: Role) -> Result<Operation, SeisregError> {
        self.resolve_slot(self.role_slot(category, name, role)?)
    }

    fn role_slot(&self, category: &str, name: &str, role: Role) -> Result<&RoleSlot, SeisregError> {
        let entry = self.entry(category, name)?;
        entry.slot(role).ok_or_else(|| SeisregError::UnknownRole {
            category: category.to_string(),
            name: name.to_string(),
            role,
            available: entry.roles().map(|r| r.to_string()).collect(),
        })
    }

    fn resolve_slot(&self, slot: &RoleSlot) -> Result<Operation, SeisregError> {
        slot.resolved
            .get_or_init(|| {
                debug!(locator = %slot.locator, role = %slot.role, "resolving plugin operation");
                self.modules.load_symbol(&slot.locator, slot.role.kind())
            })
            .clone()
            .map_err(|reason| SeisregError::PluginLoad {
                locator: slot.locator.to_string(),
                reason,
            })
    }

    pub fn detector(&self, category: &str, name: &str) -> Result<Arc<dyn FormatDetector>, SeisregError> {
        let slot = self.role_slot(category, name, Role::IsFormat)?;
        match self.resolve_slot(slot)? {
            Operation::Detector(detector) => Ok(detector),
            other => Err(wrong_kind(slot, &other)),
        }
    }

    pub fn reader(&self, category: &str, name: &str) -> Result<Arc<dyn FormatReader>, SeisregError> {
        let slot = self.role_slot(category, name, Role::ReadFormat)?;
        match self.resolve_slot(slot)? {
            Operation::Reader(reader) => Ok(reader),
            other => Err(wrong_kind(slot, &other)),
        }
    }

    pub fn writer(&self, category: &str, name: &str) -> Result<Arc<dyn FormatWriter>, SeisregError> {
        let slot = self.role_slot(category, name, Role::WriteFormat)?;
        match self.resolve_slot(slot)? {
            Operation::Writer(writer) => Ok(writer),
            other => Err(wrong_kind(slot, &other)),
        }
    }

    pub fn algorithm(
        &self,
        category: &str,
        name: &str,
    ) -> Result<Arc<dyn SampleAlgorithm>, SeisregError> {
        let slot = self.role_slot(category, name, Role::Function)?;
        match self.resolve_slot(slot)? {
            Operation::Algorithm(algorithm) => Ok(algorithm),
            other => Err(wrong_kind(slot, &other)),
        }
    }

    /// Identify the format of `data` by running every `isFormat` in `category`.
    ///
    /// Detectors see at most `detect_prefix_bytes` bytes. Exactly one match is
    /// required; none or several is a [`SeisregError::FormatDetection`].
    pub fn detect(&self, category: &str, data: &[u8]) -> Result<String, SeisregError> {
        let table = self.category(category)?;
        if table.kind != CategoryKind::Format {
            return Err(SeisregError::InvalidRole {
                category: category.to_string(),
                role: Role::IsFormat,
                kind: table.kind,
            });
        }

        let prefix = &data[..data.len().min(self.options.detect_prefix_bytes)];
        let mut matches = Vec::new();
        for entry in &table.entries {
            let Some(slot) = entry.slot(Role::IsFormat) else {
                continue;
            };
            let op = match self.resolve_slot(slot) {
                Ok(op) => op,
                Err(err) if self.options.skip_unloadable_detectors => {
                    debug!(category, name = %entry.name, error = %err, "skipping detector");
                    continue;
                }
                Err(err) => return Err(err),
            };
            if let Some(detector) = op.as_detector()
                && detector.is_format(prefix)
            {
                matches.push(entry.name.clone());
            }
        }

        debug!(category, matches = ?matches, "format detection finished");
        match matches.len() {
            1 => Ok(matches.remove(0)),
            _ => Err(SeisregError::FormatDetection {
                category: category.to_string(),
                matches,
            }),
        }
    }

    /// Decode `data`, detecting the format first when `format` is `None`.
    pub fn read(
        &self,
        category: &str,
        data: &[u8],
        format: Option<&str>,
    ) -> Result<Stream, SeisregError> {
        let name = match format {
            Some(name) => name.to_string(),
            None => self.detect(category, data)?,
        };
        self.reader(category, &name)?.read(data)
    }

    /// Encode `stream` with the writer registered for `format`.
    pub fn write(&self, category: &str, stream: &Stream, format: &str) -> Result<Vec<u8>, SeisregError> {
        self.writer(category, format)?.write(stream)
    }

    /// Run the algorithm registered as `name` in `category`.
    pub fn apply(
        &self,
        category: &str,
        name: &str,
        samples: &[f64],
        params: &Params,
    ) -> Result<Vec<f64>, SeisregError> {
        self.algorithm(category, name)?.apply(samples, params)
    }

    /// Total number of plugin entries across all categories.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|t| t.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn category(&self, category: &str) -> Result<&CategoryTable, SeisregError> {
        self.index
            .get(category)
            .map(|&i| &self.categories[i])
            .ok_or_else(|| SeisregError::UnknownCategory {
                category: category.to_string(),
                known: self.categories.iter().map(|t| t.name.clone()).collect(),
            })
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("categories", &self.list_categories())
            .field("entries", &self.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Error for a slot whose operation is not the kind its role needs.
fn wrong_kind(slot: &RoleSlot, op: &Operation) -> SeisregError {
    SeisregError::PluginLoad {
        locator: slot.locator.to_string(),
        reason: format!("`{}` is a {}, expected a {}", slot.locator, op.kind(), slot.role.kind()),
    }
}

/// Closest registered name, compared case-insensitively.
fn suggest_name(unknown: &str, entries: &[PluginEntry]) -> Option<String> {
    let unknown = unknown.to_lowercase();
    entries
        .iter()
        .map(|e| (e, strsim::jaro_winkler(&unknown, &e.name.to_lowercase())))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Module;
    use seisreg_core::{SampleType, Stats, Trace};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    fn is_slist(prefix: &[u8]) -> bool {
        prefix.starts_with(b"TIMESERIES") && prefix.windows(5).any(|w| w == b"SLIST")
    }

    fn is_seisan(prefix: &[u8]) -> bool {
        prefix.starts_with(b"SEISAN")
    }

    fn is_anything(_: &[u8]) -> bool {
        true
    }

    fn read_one_trace(data: &[u8]) -> Result<Stream, SeisregError> {
        let trace = Trace::new(Stats::default(), vec![data.len() as f64], SampleType::Float);
        Ok(Stream::new(vec![trace]))
    }

    fn write_len(stream: &Stream) -> Result<Vec<u8>, SeisregError> {
        Ok(stream.len().to_string().into_bytes())
    }

    fn loc(s: &str) -> Locator {
        s.parse().unwrap()
    }

    fn demo_modules() -> ModuleTable {
        let mut modules = ModuleTable::new();
        modules.provide(
            "demo.ascii",
            Module::new()
                .with("is_slist", Operation::detector(is_slist))
                .with("read_slist", Operation::reader(read_one_trace))
                .with("write_slist", Operation::writer(write_len))
                .with("is_anything", Operation::detector(is_anything)),
        );
        modules.provide(
            "demo.seisan",
            Module::new()
                .with("is_seisan", Operation::detector(is_seisan))
                .with("read_seisan", Operation::reader(read_one_trace)),
        );
        modules.provide(
            "demo.signal",
            Module::new().with(
                "double",
                Operation::algorithm(|s: &[f64], _: &Params| Ok(s.iter().map(|x| x * 2.0).collect())),
            ),
        );
        modules.declare("demo.missing", [("is_missing", seisreg_core::OperationKind::Detector)]);
        modules
    }

    /// Registry with SLIST (read+write) and SEISAN (read-only).
    fn demo_registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new(Arc::new(demo_modules()));
        for (name, role, locator) in [
            ("SLIST", Role::IsFormat, "demo.ascii:is_slist"),
            ("SLIST", Role::ReadFormat, "demo.ascii:read_slist"),
            ("SLIST", Role::WriteFormat, "demo.ascii:write_slist"),
            ("SEISAN", Role::IsFormat, "demo.seisan:is_seisan"),
            ("SEISAN", Role::ReadFormat, "demo.seisan:read_seisan"),
        ] {
            registry.register("waveform", name, role, loc(locator)).unwrap();
        }
        registry
            .register("filter", "double", Role::Function, loc("demo.signal:double"))
            .unwrap();
        registry
    }

    #[test]
    fn every_registered_triple_resolves() {
        let registry = demo_registry();
        assert!(registry.validate().is_ok());
        for category in registry.list_categories() {
            for entry in registry.entries(category).unwrap() {
                for role in entry.roles() {
                    registry
                        .resolve(category, entry.name(), role)
                        .unwrap_or_else(|e| panic!("{category}/{}/{role}: {e}", entry.name()));
                }
            }
        }
    }

    #[test]
    fn typed_accessor_reports_the_registered_locator() {
        let mut registry = PluginRegistry::new(Arc::new(demo_modules()));
        registry
            .register("waveform", "ODD", Role::IsFormat, loc("demo.ascii:is_slist"))
            .unwrap();
        registry
            .register("waveform", "ODD", Role::ReadFormat, loc("demo.ascii:is_slist"))
            .unwrap();

        let err = match registry.reader("waveform", "ODD") {
            Ok(_) => panic!("a detector must not resolve as a reader"),
            Err(err) => err,
        };
        match err {
            SeisregError::PluginLoad { locator, reason } => {
                assert_eq!(locator, "demo.ascii:is_slist");
                assert!(reason.contains("expected a reader"), "{reason}");
            }
            other => panic!("expected PluginLoad, got {other:?}"),
        }
        assert!(registry.detector("waveform", "ODD").is_ok());
    }

    #[test]
    fn read_only_format_has_no_writer() {
        let registry = demo_registry();
        let err = registry
            .resolve("waveform", "SEISAN", Role::WriteFormat)
            .unwrap_err();
        match err {
            SeisregError::UnknownRole {
                role, available, ..
            } => {
                assert_eq!(role, Role::WriteFormat);
                assert_eq!(available, vec!["isFormat", "readFormat"]);
            }
            other => panic!("expected UnknownRole, got {other:?}"),
        }
        assert!(registry.resolve("waveform", "SLIST", Role::WriteFormat).is_ok());
    }

    #[test]
    fn unknown_category_and_format() {
        let registry = demo_registry();
        let err = registry.resolve("event", "QUAKEML", Role::ReadFormat).unwrap_err();
        match err {
            SeisregError::UnknownCategory { known, .. } => {
                assert_eq!(known, vec!["waveform", "filter"]);
            }
            other => panic!("expected UnknownCategory, got {other:?}"),
        }

        let err = registry.resolve("waveform", "MSEED", Role::ReadFormat).unwrap_err();
        assert!(matches!(err, SeisregError::UnknownFormat { .. }));
        assert!(err.to_string().contains("SLIST, SEISAN"), "got: {err}");
    }

    #[test]
    fn unknown_format_suggests_case_insensitive_match() {
        let registry = demo_registry();
        match registry.entry("waveform", "slist").unwrap_err() {
            SeisregError::UnknownFormat { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("SLIST"));
            }
            other => panic!("expected UnknownFormat, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_registration_is_rejected_and_original_kept() {
        let mut registry = demo_registry();
        let err = registry
            .register("waveform", "SLIST", Role::ReadFormat, loc("demo.seisan:read_seisan"))
            .unwrap_err();
        assert!(matches!(err, SeisregError::DuplicateRegistration { .. }));
        assert!(err.to_string().contains("demo.ascii:read_slist"));
        assert_eq!(
            registry
                .entry("waveform", "SLIST")
                .unwrap()
                .locator(Role::ReadFormat)
                .unwrap()
                .to_string(),
            "demo.ascii:read_slist"
        );
        assert!(registry.resolve("waveform", "SLIST", Role::ReadFormat).is_ok());
    }

    #[test]
    fn overwrite_replaces_locator_and_cache() {
        let mut registry = demo_registry();
        let before = registry.resolve("waveform", "SLIST", Role::IsFormat).unwrap();
        registry
            .register_with_policy(
                "waveform",
                "SLIST",
                Role::IsFormat,
                loc("demo.ascii:is_anything"),
                DuplicatePolicy::Overwrite,
            )
            .unwrap();
        let after = registry.resolve("waveform", "SLIST", Role::IsFormat).unwrap();
        assert!(!before.same_symbol(&after));
        assert!(after.as_detector().unwrap().is_format(b"whatever"));
    }

    #[test]
    fn configured_overwrite_policy_applies_to_register() {
        let options = RegistryOptions {
            duplicate_policy: DuplicatePolicy::Overwrite,
            ..RegistryOptions::default()
        };
        let mut registry = PluginRegistry::with_options(Arc::new(demo_modules()), options);
        registry
            .register("waveform", "SLIST", Role::IsFormat, loc("demo.ascii:is_slist"))
            .unwrap();
        registry
            .register("waveform", "SLIST", Role::IsFormat, loc("demo.ascii:is_anything"))
            .unwrap();
        assert_eq!(
            registry.entry("waveform", "SLIST").unwrap().locator(Role::IsFormat).unwrap().symbol(),
            "is_anything"
        );
    }

    #[test]
    fn role_must_match_category_kind() {
        let mut registry = demo_registry();
        let err = registry
            .register("filter", "lowpass", Role::ReadFormat, loc("demo.ascii:read_slist"))
            .unwrap_err();
        assert!(matches!(
            err,
            SeisregError::InvalidRole {
                kind: CategoryKind::Algorithm,
                ..
            }
        ));
        let err = registry
            .register("waveform", "X", Role::Function, loc("demo.signal:double"))
            .unwrap_err();
        assert!(matches!(
            err,
            SeisregError::InvalidRole {
                kind: CategoryKind::Format,
                ..
            }
        ));
        // Rejected registrations leave no trace.
        assert_eq!(registry.list_formats("waveform").unwrap(), vec!["SLIST", "SEISAN"]);
    }

    #[test]
    fn list_formats_follows_registration_order() {
        let registry = demo_registry();
        let first = registry.list_formats("waveform").unwrap();
        let second = registry.list_formats("waveform").unwrap();
        assert_eq!(first, vec!["SLIST", "SEISAN"]);
        assert_eq!(first, second);
        assert!(matches!(
            registry.list_formats("nope"),
            Err(SeisregError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn resolution_is_lazy_and_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut modules = ModuleTable::new();
        modules.install(
            "lazy.mod",
            [("is_lazy", seisreg_core::OperationKind::Detector)],
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Module::new().with("is_lazy", Operation::detector(is_seisan)))
            },
        );
        let mut registry = PluginRegistry::new(Arc::new(modules));
        registry
            .register("waveform", "LAZY", Role::IsFormat, loc("lazy.mod:is_lazy"))
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!registry.entry("waveform", "LAZY").unwrap().is_resolved(Role::IsFormat));

        let first = registry.resolve("waveform", "LAZY", Role::IsFormat).unwrap();
        let second = registry.resolve("waveform", "LAZY", Role::IsFormat).unwrap();
        assert!(first.same_symbol(&second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.entry("waveform", "LAZY").unwrap().is_resolved(Role::IsFormat));
    }

    #[test]
    fn uninstalled_module_fails_on_first_use_only() {
        let mut registry = demo_registry();
        registry
            .register("waveform", "MISSING", Role::IsFormat, loc("demo.missing:is_missing"))
            .unwrap();
        registry
            .register("waveform", "MISSING", Role::ReadFormat, loc("demo.ascii:read_slist"))
            .unwrap();
        // Declared modules pass validation even when not installed.
        assert!(registry.validate().is_ok());
        let err = registry.resolve("waveform", "MISSING", Role::IsFormat).unwrap_err();
        match err {
            SeisregError::PluginLoad { locator, reason } => {
                assert_eq!(locator, "demo.missing:is_missing");
                assert!(reason.contains("not installed"));
            }
            other => panic!("expected PluginLoad, got {other:?}"),
        }
    }

    #[test]
    fn validate_reports_bad_locators_and_missing_roles() {
        let mut registry = PluginRegistry::new(Arc::new(demo_modules()));
        registry
            .register("waveform", "HALF", Role::IsFormat, loc("demo.ascii:is_slist"))
            .unwrap();
        registry
            .register("waveform", "GHOST", Role::IsFormat, loc("nowhere:is_ghost"))
            .unwrap();
        registry
            .register("waveform", "GHOST", Role::ReadFormat, loc("demo.ascii:is_slist"))
            .unwrap();
        let errors = registry.validate().unwrap_err();
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(errors.len(), 3, "got: {messages:?}");
        assert!(messages.iter().any(|m| m.contains("HALF") && m.contains("readFormat")));
        assert!(messages.iter().any(|m| m.contains("GHOST") && m.contains("not declared")));
        assert!(messages.iter().any(|m| m.contains("GHOST") && m.contains("expected a reader")));
    }

    #[test]
    fn detect_unique_match() {
        let registry = demo_registry();
        let data = b"TIMESERIES BW_RJOB__EHZ_D, 2 samples, 1 sps, 2009-08-24T00:20:03.000000, SLIST, INTEGER, Counts\n1\t2\n";
        assert_eq!(registry.detect("waveform", data).unwrap(), "SLIST");
        assert_eq!(registry.detect("waveform", b"SEISAN...").unwrap(), "SEISAN");
    }

    #[test]
    fn detect_zero_or_ambiguous_matches() {
        let mut registry = demo_registry();
        let err = registry.detect("waveform", b"MiniSEED").unwrap_err();
        assert!(matches!(err, SeisregError::FormatDetection { ref matches, .. } if matches.is_empty()));

        registry
            .register("waveform", "ANY", Role::IsFormat, loc("demo.ascii:is_anything"))
            .unwrap();
        registry
            .register("waveform", "ANY", Role::ReadFormat, loc("demo.ascii:read_slist"))
            .unwrap();
        let err = registry.detect("waveform", b"SEISAN").unwrap_err();
        match err {
            SeisregError::FormatDetection { matches, .. } => {
                assert_eq!(matches, vec!["SEISAN", "ANY"]);
            }
            other => panic!("expected FormatDetection, got {other:?}"),
        }
    }

    #[test]
    fn detect_sees_only_prefix() {
        let options = RegistryOptions {
            detect_prefix_bytes: 10,
            ..RegistryOptions::default()
        };
        let mut registry = PluginRegistry::with_options(Arc::new(demo_modules()), options);
        registry
            .register("waveform", "SLIST", Role::IsFormat, loc("demo.ascii:is_slist"))
            .unwrap();
        // "SLIST" appears after the 10-byte prefix, so the detector cannot see it.
        let err = registry.detect("waveform", b"TIMESERIES X, SLIST").unwrap_err();
        assert!(matches!(err, SeisregError::FormatDetection { .. }));
    }

    #[test]
    fn detect_in_algorithm_category_is_invalid() {
        let registry = demo_registry();
        assert!(matches!(
            registry.detect("filter", b"anything"),
            Err(SeisregError::InvalidRole { .. })
        ));
    }

    #[traced_test]
    #[test]
    fn detect_skips_unloadable_detectors() {
        let mut registry = demo_registry();
        registry
            .register("waveform", "MISSING", Role::IsFormat, loc("demo.missing:is_missing"))
            .unwrap();
        assert_eq!(registry.detect("waveform", b"SEISAN").unwrap(), "SEISAN");
        assert!(logs_contain("skipping detector"));
    }

    #[test]
    fn detect_fails_on_unloadable_detector_when_not_skipping() {
        let options = RegistryOptions {
            skip_unloadable_detectors: false,
            ..RegistryOptions::default()
        };
        let mut registry = PluginRegistry::with_options(Arc::new(demo_modules()), options);
        registry
            .register("waveform", "MISSING", Role::IsFormat, loc("demo.missing:is_missing"))
            .unwrap();
        assert!(matches!(
            registry.detect("waveform", b"SEISAN"),
            Err(SeisregError::PluginLoad { .. })
        ));
    }

    #[test]
    fn read_write_and_apply_dispatch() {
        let registry = demo_registry();
        let stream = registry.read("waveform", b"SEISAN data", None).unwrap();
        assert_eq!(stream.traces[0].data, vec![11.0]);

        let stream = registry.read("waveform", b"abc", Some("SLIST")).unwrap();
        assert_eq!(stream.traces[0].data, vec![3.0]);

        assert_eq!(registry.write("waveform", &stream, "SLIST").unwrap(), b"1");
        assert!(matches!(
            registry.write("waveform", &stream, "SEISAN"),
            Err(SeisregError::UnknownRole { .. })
        ));

        let out = registry
            .apply("filter", "double", &[1.0, -2.5], &Params::new())
            .unwrap();
        assert_eq!(out, vec![2.0, -5.0]);
    }

    #[test]
    fn from_entry_points_collects_all_errors() {
        let table: EntryPointTable = r#"
[waveform.SLIST]
isFormat = "demo.ascii:is_slist"
readFormat = "demo.ascii:read_slist"

[waveform.BROKEN]
isFormat = "demo.ascii:nope"
readFormat = "demo.ascii:read_slist"
"#
        .parse()
        .unwrap();
        let errors = PluginRegistry::from_entry_points(
            &table,
            Arc::new(demo_modules()),
            RegistryOptions::default(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("BROKEN"));
    }

    #[test]
    fn registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PluginRegistry>();
    }
}
