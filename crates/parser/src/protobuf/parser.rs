//! Directory-level proto service parser

use super::comments::file_name_of;
use super::extractor::Extractor;
use crate::imports::{ImportLocator, SearchPath};
use crate::resolver::resolve_services;
use crate::scan::scan_proto_files;
use crate::symbol_table::SymbolTable;
use proto_service_generator_common::{GeneratorConfig, ResolvedType, Result, Service};
use std::path::Path;
use tracing::info;

/// Proto service parser
///
/// Scans a directory for proto files, extracts every file (and everything it
/// imports) into one symbol table, then resolves the services declared in
/// the scanned files.
pub struct ProtoServiceParser {
    config: GeneratorConfig,
}

impl ProtoServiceParser {
    /// Create a parser with an explicit configuration
    ///
    /// # Example
    /// ```rust,ignore
    /// let config = GeneratorConfig::default().with_import_path("third_party");
    /// let services = ProtoServiceParser::new(config).parse_directory("protos")?;
    /// ```
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Parse a directory using the configured import search path
    pub fn parse_directory<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<Service<ResolvedType>>> {
        let locator = SearchPath::new(self.config.import_paths.clone());
        self.parse_directory_with(dir.as_ref(), &locator)
    }

    /// Parse a directory resolving imports through `locator`
    pub fn parse_directory_with(
        &self,
        dir: &Path,
        locator: &dyn ImportLocator,
    ) -> Result<Vec<Service<ResolvedType>>> {
        let files = scan_proto_files(dir, &self.config.extension)?;
        let mut table = SymbolTable::with_overrides(&self.config.package_overrides)?;

        let mut extractor =
            Extractor::new(&mut table, locator).lenient_syntax(self.config.lenient_syntax);
        for file in &files {
            info!("Parsing '{}' file", file_name_of(file));
            extractor.extract_path(file)?;
        }

        info!(
            "Registered {} types and {} services",
            table.types.len(),
            table.services.len()
        );

        let file_names: Vec<String> = files.iter().map(|f| file_name_of(f)).collect();
        resolve_services(table, &file_names)
    }

    /// Get reference to the active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl Default for ProtoServiceParser {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
