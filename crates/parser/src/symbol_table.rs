//! Cross-file symbol table
//!
//! One [`SymbolTable`] is created per generation run. Extraction only ever
//! adds to it; the resolver consumes it once all files are registered.

use proto_service_generator_common::{
    GeneratorError, Result, Service, TypeReference, WELL_KNOWN_OUTPUT_PACKAGE,
    WELL_KNOWN_PROTO_PACKAGE,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Proto packages whose types map to a fixed output package
#[derive(Debug, Clone)]
pub struct PackageOverrides {
    entries: HashMap<String, String>,
}

impl PackageOverrides {
    /// Table holding only the well-known types mapping
    pub fn with_well_known() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            WELL_KNOWN_PROTO_PACKAGE.to_string(),
            WELL_KNOWN_OUTPUT_PACKAGE.to_string(),
        );
        Self { entries }
    }

    /// Register a mapping. Entries are set-once: re-registering the same
    /// target is a no-op, a different target is an error.
    pub fn register(&mut self, proto_package: &str, output_package: &str) -> Result<()> {
        match self.entries.get(proto_package) {
            Some(existing) if existing == output_package => Ok(()),
            Some(existing) => Err(GeneratorError::ConflictingOverride {
                proto_package: proto_package.to_string(),
                existing: existing.clone(),
                requested: output_package.to_string(),
            }),
            None => {
                debug!("Overriding proto package {} -> {}", proto_package, output_package);
                self.entries
                    .insert(proto_package.to_string(), output_package.to_string());
                Ok(())
            }
        }
    }

    pub fn get(&self, proto_package: &str) -> Option<&str> {
        self.entries.get(proto_package).map(String::as_str)
    }
}

impl Default for PackageOverrides {
    fn default() -> Self {
        Self::with_well_known()
    }
}

/// Where a proto message lands in the output language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    pub output_package: String,
    /// Enclosing class names, outermost first
    pub enclosing_classes: Vec<String>,
    pub name: String,
}

impl TypeEntry {
    /// Top-level class; no enclosing classes
    pub fn new(output_package: &str, name: &str) -> Self {
        Self {
            output_package: output_package.to_string(),
            enclosing_classes: Vec::new(),
            name: name.to_string(),
        }
    }

    pub fn with_enclosing_classes(mut self, classes: Vec<String>) -> Self {
        self.enclosing_classes = classes;
        self
    }
}

/// (proto package, message name) -> output location
///
/// Messages of files without a package directive are kept under the empty
/// package, which no package directive can produce.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    packages: HashMap<String, HashMap<String, TypeEntry>>,
}

impl TypeRegistry {
    /// Register a message. The first registration of a name wins.
    pub fn register(&mut self, proto_package: Option<&str>, proto_name: &str, entry: TypeEntry) {
        let types = self
            .packages
            .entry(proto_package.unwrap_or_default().to_string())
            .or_default();

        match types.get(proto_name) {
            Some(existing) if *existing != entry => warn!(
                "Type {} is already registered as {:?}, ignoring {:?}",
                TypeReference::new(proto_package, proto_name),
                existing,
                entry
            ),
            Some(_) => {}
            None => {
                debug!(
                    "Registered type {} -> {}.{}",
                    TypeReference::new(proto_package, proto_name),
                    entry.output_package,
                    entry.name
                );
                types.insert(proto_name.to_string(), entry);
            }
        }
    }

    /// All types registered for a proto package, if any were
    pub fn package(&self, proto_package: Option<&str>) -> Option<&HashMap<String, TypeEntry>> {
        self.packages.get(proto_package.unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.packages.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Source file name -> the service it declares
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Service<TypeReference>>,
}

impl ServiceRegistry {
    /// Record a file's service; a later service of the same file name wins
    pub fn register(&mut self, file_name: &str, service: Service<TypeReference>) {
        if let Some(previous) = self.services.insert(file_name.to_string(), service) {
            debug!(
                "Service {} of {} replaced by a later declaration",
                previous.name, file_name
            );
        }
    }

    pub fn get(&self, file_name: &str) -> Option<&Service<TypeReference>> {
        self.services.get(file_name)
    }

    pub(crate) fn remove(&mut self, file_name: &str) -> Option<Service<TypeReference>> {
        self.services.remove(file_name)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Everything extraction learns about a set of proto files
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub overrides: PackageOverrides,
    pub types: TypeRegistry,
    pub services: ServiceRegistry,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with extra package overrides on top of the well-known one
    pub fn with_overrides<'a>(
        overrides: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Result<Self> {
        let mut table = Self::new();
        for (proto_package, output_package) in overrides {
            table.overrides.register(proto_package, output_package)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_well_known_seed() {
        let overrides = PackageOverrides::default();
        assert_eq!(overrides.get("google.protobuf"), Some("com.google.protobuf"));
        assert_eq!(overrides.get("acme"), None);
    }

    #[test]
    fn test_override_set_once() {
        let mut overrides = PackageOverrides::with_well_known();
        overrides.register("acme", "com.acme").unwrap();
        overrides.register("acme", "com.acme").unwrap();

        let err = overrides.register("acme", "org.acme").unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::ConflictingOverride { ref existing, .. } if existing == "com.acme"
        ));
        assert_eq!(overrides.get("acme"), Some("com.acme"));
    }

    #[test]
    fn test_well_known_cannot_be_remapped() {
        let mut overrides = PackageOverrides::with_well_known();
        assert!(overrides
            .register("google.protobuf", "org.example.protobuf")
            .is_err());
    }

    #[test]
    fn test_type_registry_first_registration_wins() {
        let mut registry = TypeRegistry::default();
        registry.register(Some("p"), "Pong", TypeEntry::new("com.p", "Pong"));
        registry.register(Some("p"), "Pong", TypeEntry::new("org.p", "Pong"));

        let types = registry.package(Some("p")).unwrap();
        assert_eq!(types["Pong"].output_package, "com.p");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_type_registry_without_package() {
        let mut registry = TypeRegistry::default();
        registry.register(None, "Loose", TypeEntry::new("", "Loose"));

        assert!(registry.package(None).unwrap().contains_key("Loose"));
        assert!(registry.package(Some("p")).is_none());
    }

    #[test]
    fn test_type_entry_defaults_to_no_enclosing_classes() {
        let entry = TypeEntry::new("com.acme", "Ack");
        assert!(entry.enclosing_classes.is_empty());

        let nested = entry.with_enclosing_classes(vec!["AckProto".to_string()]);
        assert_eq!(nested.enclosing_classes, vec!["AckProto".to_string()]);
    }

    #[test]
    fn test_service_registry_last_write_wins() {
        let service = |name: &str| Service {
            name: name.to_string(),
            proto_package: None,
            output_package: String::new(),
            methods: vec![],
            comments: vec![],
            annotations: vec![],
        };

        let mut registry = ServiceRegistry::default();
        registry.register("orders.proto", service("First"));
        registry.register("orders.proto", service("Second"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("orders.proto").unwrap().name, "Second");
    }

    #[test]
    fn test_with_overrides() {
        let mut extra = BTreeMap::new();
        extra.insert("acme.common".to_string(), "com.acme.shared".to_string());

        let table = SymbolTable::with_overrides(&extra).unwrap();
        assert_eq!(table.overrides.get("acme.common"), Some("com.acme.shared"));
        assert_eq!(table.overrides.get("google.protobuf"), Some("com.google.protobuf"));
    }
}
