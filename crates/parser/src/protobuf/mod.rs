//! Proto source parser
//!
//! Reads `.proto` source text directly (no `protoc` step) and extracts the
//! parts a service generator needs:
//! - package directives and `java_package` options
//! - top-level message names, registered in the symbol table
//! - services with their unary RPCs and attached comments
//!
//! Everything else the grammar recognizes only as opaque text.
//!
//! ## Usage
//! ```rust,ignore
//! use proto_service_generator_parser::ProtoServiceParser;
//!
//! let services = ProtoServiceParser::default().parse_directory("protos")?;
//! for service in &services {
//!     println!("{} ({} methods)", service.name, service.methods.len());
//! }
//! ```

mod comments;
mod extractor;
mod grammar;
mod parser;

pub use extractor::Extractor;
pub use parser::ProtoServiceParser;
