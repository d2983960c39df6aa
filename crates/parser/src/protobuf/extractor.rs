//! Single-pass extraction of packages, messages and services from proto files

use super::comments::{file_name_of, import_proto_package, CommentBuffer};
use super::grammar::{parse_declarations, Declaration, RpcSignature, ServiceItem};
use crate::imports::ImportLocator;
use crate::symbol_table::{SymbolTable, TypeEntry};
use proto_service_generator_common::{
    GeneratorError, Method, Result, Service, TypeReference, WELL_KNOWN_PROTO_PACKAGE,
};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

const JAVA_PACKAGE_OPTION: &str = "java_package";

/// Running state of one file's pass
#[derive(Debug, Default)]
struct FileState {
    proto_package: Option<String>,
    java_package: Option<String>,
    comments: CommentBuffer,
}

impl FileState {
    /// Output package for declarations seen now: the `java_package` option if
    /// one was given so far, else the proto package, else the default package.
    fn output_package(&self) -> &str {
        self.java_package
            .as_deref()
            .or(self.proto_package.as_deref())
            .unwrap_or_default()
    }
}

/// Walks proto files into a shared [`SymbolTable`], following imports
pub struct Extractor<'a> {
    table: &'a mut SymbolTable,
    locator: &'a dyn ImportLocator,
    lenient_syntax: bool,
    processed: HashSet<PathBuf>,
    /// Syntax errors of imported files, raised again if the file is discovered
    failed_imports: HashMap<PathBuf, GeneratorError>,
}

impl<'a> Extractor<'a> {
    pub fn new(table: &'a mut SymbolTable, locator: &'a dyn ImportLocator) -> Self {
        Self {
            table,
            locator,
            lenient_syntax: false,
            processed: HashSet::new(),
            failed_imports: HashMap::new(),
        }
    }

    /// Log and skip files the grammar cannot match instead of failing
    pub fn lenient_syntax(mut self, lenient: bool) -> Self {
        self.lenient_syntax = lenient;
        self
    }

    /// Extract a discovered file.
    ///
    /// A file already pulled in through an import is not walked again, but a
    /// syntax error it raised as an import is reported here.
    pub fn extract_path(&mut self, path: &Path) -> Result<()> {
        let identity = resource_identity(path);
        if let Some(error) = self.failed_imports.remove(&identity) {
            return self.syntax_outcome(Err(error));
        }

        if !self.processed.insert(identity) {
            debug!("Skipping {}, already extracted as an import", path.display());
            return Ok(());
        }

        let source = fs::read_to_string(path)?;
        let result = self.extract_source(&file_name_of(path), &source);
        self.syntax_outcome(result)
    }

    /// Downgrade a syntax error to a warning in lenient mode
    fn syntax_outcome(&self, result: Result<()>) -> Result<()> {
        match result {
            Err(GeneratorError::Syntax { file, message }) if self.lenient_syntax => {
                warn!("Skipping {} after syntax error: {}", file, message);
                Ok(())
            }
            result => result,
        }
    }

    /// Extract one file's source text registered under `file_name`
    pub fn extract_source(&mut self, file_name: &str, source: &str) -> Result<()> {
        let declarations = parse_declarations(file_name, source)?;
        let mut state = FileState::default();

        for declaration in declarations {
            match declaration {
                Declaration::Import { path } => self.extract_import(path),
                Declaration::Package { name } => state.proto_package = Some(name.to_string()),
                Declaration::Option { name, value } if name == JAVA_PACKAGE_OPTION => {
                    state.java_package = Some(value.to_string());
                }
                Declaration::Comment(raw) => state.comments.push(raw),
                Declaration::Message { name } => {
                    self.table.types.register(
                        state.proto_package.as_deref(),
                        name,
                        TypeEntry::new(state.output_package(), name),
                    );
                }
                Declaration::Service { name, items } => {
                    let service = Service {
                        name: name.to_string(),
                        proto_package: state.proto_package.clone(),
                        output_package: state.output_package().to_string(),
                        methods: extract_methods(items, state.proto_package.as_deref()),
                        comments: state.comments.take(),
                        annotations: Vec::new(),
                    };
                    debug!(
                        "Registered service {} with {} methods from {}",
                        service.name,
                        service.methods.len(),
                        file_name
                    );
                    self.table.services.register(file_name, service);
                }
                Declaration::Option { .. } | Declaration::Other => {
                    trace!("Skipping unmodeled declaration in {}", file_name);
                }
            }
        }

        Ok(())
    }

    /// Follow an import into the same symbol table.
    ///
    /// Imports never fail the run: missing or broken resources are logged.
    fn extract_import(&mut self, import: &str) {
        if import_proto_package(import).as_deref() == Some(WELL_KNOWN_PROTO_PACKAGE) {
            trace!("Not following well-known import {}", import);
            return;
        }

        let Some(path) = self.locator.locate(import) else {
            warn!("Can not find resource with name = {}", import);
            return;
        };

        let identity = resource_identity(&path);
        if !self.processed.insert(identity.clone()) {
            debug!("Import {} was already processed", import);
            return;
        }

        debug!("Following import {} -> {}", import, path.display());
        let result = fs::read_to_string(&path)
            .map_err(GeneratorError::from)
            .and_then(|source| self.extract_source(&file_name_of(&path), &source));

        if let Err(e) = result {
            warn!("Can not parse resource with name = {}: {}", import, e);
            if matches!(e, GeneratorError::Syntax { .. }) {
                self.failed_imports.insert(identity, e);
            }
        }
    }
}

/// Canonical path of a resource, so one file reached two ways is seen once
fn resource_identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Build the methods of a service from its items, in declaration order.
///
/// Comments directly preceding an RPC attach to that RPC only. Any other item
/// in between (an option, a streaming RPC) discards them.
fn extract_methods(
    items: Vec<ServiceItem<'_>>,
    proto_package: Option<&str>,
) -> Vec<Method<TypeReference>> {
    let mut comments = CommentBuffer::default();
    let mut methods = Vec::new();

    for item in items {
        match item {
            ServiceItem::Comment(raw) => comments.push(raw),
            ServiceItem::Rpc(RpcSignature {
                name,
                request_type,
                response_type,
            }) => methods.push(Method {
                name: name.to_string(),
                request_types: vec![type_reference(request_type, proto_package)],
                response_type: type_reference(response_type, proto_package),
                comments: comments.take(),
            }),
            ServiceItem::Other => comments.clear(),
        }
    }

    methods
}

/// Dotted names are fully qualified; bare names live in the declaring package
fn type_reference(raw: &str, proto_package: Option<&str>) -> TypeReference {
    let reference = TypeReference::parse(raw);
    if reference.package.is_some() {
        reference
    } else {
        TypeReference::new(proto_package, &reference.name)
    }
}
