//! Proto service extraction and type resolution
//!
//! This crate turns a directory of `.proto` files into resolved service
//! descriptors (`Service<ResolvedType>`) for a downstream code generator.
//!
//! ## Pipeline
//!
//! 1. [`scan_proto_files`] collects the files below the root directory
//! 2. [`Extractor`] walks each file, and each file it imports, into one
//!    shared [`SymbolTable`]
//! 3. [`resolve_services`] maps every RPC request/response type to its
//!    output-language name, for the scanned files only
//!
//! Type names resolve through two tables:
//! - package overrides (`google.protobuf` → `com.google.protobuf`, plus any
//!   configured), which win outright
//! - the type registry, filled from message declarations of every parsed file

mod imports;
mod protobuf;
mod resolver;
mod scan;
mod symbol_table;

pub use imports::{ImportLocator, SearchPath};
pub use protobuf::{Extractor, ProtoServiceParser};
pub use resolver::{resolve_services, Resolver};
pub use scan::scan_proto_files;
pub use symbol_table::{PackageOverrides, ServiceRegistry, SymbolTable, TypeEntry, TypeRegistry};

use proto_service_generator_common::{ResolvedType, Result, Service};
use std::path::Path;

/// Parse every proto file below `dir` with the default configuration
///
/// # Arguments
/// * `dir` - Root directory scanned recursively for `.proto` files
///
/// # Returns
/// * Resolved services of the scanned files, in file-name order
pub fn parse_service_descriptors<P: AsRef<Path>>(dir: P) -> Result<Vec<Service<ResolvedType>>> {
    ProtoServiceParser::default().parse_directory(dir)
}
