//! Resolution of RPC type references against the symbol table

use crate::symbol_table::{PackageOverrides, SymbolTable, TypeRegistry};
use proto_service_generator_common::{GeneratorError, ResolvedType, Result, Service, TypeReference};
use std::collections::HashSet;
use tracing::debug;

/// Read-only view of a symbol table that maps proto types to output types
pub struct Resolver<'a> {
    overrides: &'a PackageOverrides,
    types: &'a TypeRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Self {
            overrides: &table.overrides,
            types: &table.types,
        }
    }

    /// Resolve a single reference.
    ///
    /// Overridden packages short-circuit the registry, so well-known types
    /// resolve without being declared anywhere.
    pub fn resolve_type(&self, reference: &TypeReference) -> Result<ResolvedType> {
        if let Some(output_package) = reference
            .package
            .as_deref()
            .and_then(|package| self.overrides.get(package))
        {
            return Ok(ResolvedType {
                name: reference.name.clone(),
                package: output_package.to_string(),
                enclosing_classes: Vec::new(),
            });
        }

        let types = self
            .types
            .package(reference.package.as_deref())
            .ok_or_else(|| GeneratorError::UnresolvedPackage(reference.clone()))?;

        let entry = types
            .get(&reference.name)
            .ok_or_else(|| GeneratorError::UnresolvedType(reference.clone()))?;

        let package = std::iter::once(entry.output_package.as_str())
            .chain(entry.enclosing_classes.iter().map(String::as_str))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(".");

        Ok(ResolvedType {
            name: entry.name.clone(),
            package,
            enclosing_classes: entry.enclosing_classes.clone(),
        })
    }

    /// Resolve every request and response type of a service
    pub fn resolve_service(
        &self,
        service: Service<TypeReference>,
    ) -> Result<Service<ResolvedType>> {
        service.try_map_types(|reference| self.resolve_type(&reference))
    }
}

/// Consume a fully populated table and resolve the services of `file_names`,
/// in that order.
///
/// Services of files outside `file_names` (imported-only files) contributed
/// their types but are not returned. The first unresolved reference aborts
/// the whole run.
pub fn resolve_services(
    mut table: SymbolTable,
    file_names: &[String],
) -> Result<Vec<Service<ResolvedType>>> {
    let mut seen = HashSet::new();
    let services: Vec<_> = file_names
        .iter()
        .filter(|name| seen.insert(*name))
        .filter_map(|name| table.services.remove(name))
        .collect();

    debug!(
        "Resolving {} services against {} registered types",
        services.len(),
        table.types.len()
    );

    let resolver = Resolver::new(&table);
    services
        .into_iter()
        .map(|service| resolver.resolve_service(service))
        .collect()
}
