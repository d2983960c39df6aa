//! Common types and utilities for the Proto Service Generator
//!
//! This crate contains the service descriptor model, error types and
//! configuration shared by the parser and CLI components.
//!
//! Descriptors are generic over their type stage: the extractor produces
//! `Service<TypeReference>` values that still name proto types, and the
//! resolver turns them into `Service<ResolvedType>` values that name
//! output-language (Java) classes.

mod config;

pub use config::GeneratorConfig;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Proto package of the protobuf well-known types
pub const WELL_KNOWN_PROTO_PACKAGE: &str = "google.protobuf";

/// Java package the well-known types are generated into
pub const WELL_KNOWN_OUTPUT_PACKAGE: &str = "com.google.protobuf";

/// Errors that can occur while building service descriptors
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Provided directory with proto files does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Expected a directory with proto files, not a single file: {0}")]
    NotADirectory(PathBuf),

    #[error("No proto file was found in directory: {0}")]
    NoProtoFiles(PathBuf),

    #[error("Syntax error in {file}: {message}")]
    Syntax { file: String, message: String },

    #[error(
        "Proto package '{proto_package}' is already mapped to '{existing}', cannot remap to '{requested}'"
    )]
    ConflictingOverride {
        proto_package: String,
        existing: String,
        requested: String,
    },

    #[error("Can not find proto package for type '{0}'")]
    UnresolvedPackage(TypeReference),

    #[error("Can not find type '{0}' in its proto package")]
    UnresolvedType(TypeReference),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// A type as mentioned in an RPC signature, before resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeReference {
    /// Simple message name (e.g., "Ack")
    pub name: String,
    /// Proto package, if known (e.g., "acme.orders")
    pub package: Option<String>,
}

impl TypeReference {
    pub fn new(package: Option<&str>, name: &str) -> Self {
        Self {
            name: name.to_string(),
            package: package.map(String::from),
        }
    }

    /// Split a dotted type name at its last dot.
    ///
    /// - "acme.orders.Ack" -> package "acme.orders", name "Ack"
    /// - ".acme.orders.Ack" -> same; the leading dot only marks an absolute name
    /// - "Ack" -> no package
    pub fn parse(full_name: &str) -> Self {
        let full_name = full_name.strip_prefix('.').unwrap_or(full_name);
        match full_name.rfind('.') {
            Some(idx) if idx > 0 => Self::new(Some(&full_name[..idx]), &full_name[idx + 1..]),
            _ => Self::new(None, full_name),
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(package) => write!(f, "{}.{}", package, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A type resolved to its output-language location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedType {
    /// Output simple class name
    pub name: String,
    /// Output package, enclosing classes already joined in
    /// (e.g., "com.acme.orders" or "com.acme.orders.OrdersProto")
    pub package: String,
    /// Enclosing class names, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enclosing_classes: Vec<String>,
}

impl ResolvedType {
    /// Fully qualified output name, e.g. "com.acme.orders.Ack"
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// One request/response RPC of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method<T> {
    pub name: String,
    /// Request types; a single element for unary RPCs
    pub request_types: Vec<T>,
    pub response_type: T,
    /// Comment lines that directly preceded the RPC
    #[serde(default)]
    pub comments: Vec<String>,
}

impl<T> Method<T> {
    /// Convert request/response types, keeping everything else
    pub fn try_map_types<U, E>(
        self,
        mut convert: impl FnMut(T) -> std::result::Result<U, E>,
    ) -> std::result::Result<Method<U>, E> {
        let request_types = self
            .request_types
            .into_iter()
            .map(&mut convert)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let response_type = convert(self.response_type)?;

        Ok(Method {
            name: self.name,
            request_types,
            response_type,
            comments: self.comments,
        })
    }
}

/// A service declaration with its RPC methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service<T> {
    pub name: String,
    /// Proto package the service was declared in
    pub proto_package: Option<String>,
    /// Output package in force where the service was declared
    pub output_package: String,
    pub methods: Vec<Method<T>>,
    /// Comment lines that preceded the service declaration
    #[serde(default)]
    pub comments: Vec<String>,
    /// Reserved for generator annotations; always empty after parsing
    #[serde(default)]
    pub annotations: Vec<String>,
}

impl<T> Service<T> {
    /// Convert every method's types, failing on the first conversion error
    pub fn try_map_types<U, E>(
        self,
        mut convert: impl FnMut(T) -> std::result::Result<U, E>,
    ) -> std::result::Result<Service<U>, E> {
        let methods = self
            .methods
            .into_iter()
            .map(|method| method.try_map_types(&mut convert))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Service {
            name: self.name,
            proto_package: self.proto_package,
            output_package: self.output_package,
            methods,
            comments: self.comments,
            annotations: self.annotations,
        })
    }
}
