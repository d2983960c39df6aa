//! Grammar binding and a tagged view over its parse tree
//!
//! The pest grammar produces a generic tree of `Pair<Rule>` nodes. The
//! extractor never indexes into that tree by position; it consumes the
//! [`Declaration`] and [`ServiceItem`] views built here, which are keyed on
//! the grammar's named productions.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use proto_service_generator_common::{GeneratorError, Result};

#[derive(Parser)]
#[grammar = "protobuf/proto.pest"]
pub(crate) struct ProtoGrammar;

/// One top-level declaration of a proto file
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Declaration<'i> {
    Import { path: &'i str },
    Package { name: &'i str },
    Option { name: &'i str, value: &'i str },
    Comment(&'i str),
    Message { name: &'i str },
    Service { name: &'i str, items: Vec<ServiceItem<'i>> },
    /// syntax/edition statements and unmodeled constructs
    Other,
}

/// One entry inside a service block
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ServiceItem<'i> {
    Comment(&'i str),
    Rpc(RpcSignature<'i>),
    /// Service options, streaming RPCs and anything else unmodeled
    Other,
}

/// Name and raw type names of a unary RPC
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RpcSignature<'i> {
    pub name: &'i str,
    pub request_type: &'i str,
    pub response_type: &'i str,
}

/// Parse a whole file into its top-level declarations
pub(crate) fn parse_declarations<'i>(
    file_name: &str,
    source: &'i str,
) -> Result<Vec<Declaration<'i>>> {
    let mut pairs =
        ProtoGrammar::parse(Rule::proto, source).map_err(|e| GeneratorError::Syntax {
            file: file_name.to_string(),
            message: e.with_path(file_name).to_string(),
        })?;

    let Some(root) = pairs.next() else {
        return Ok(Vec::new());
    };

    Ok(root
        .into_inner()
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(declaration)
        .collect())
}

fn declaration(pair: Pair<'_, Rule>) -> Declaration<'_> {
    match pair.as_rule() {
        Rule::comment => Declaration::Comment(pair.as_str()),
        Rule::import_decl => match child(&pair, Rule::string_lit) {
            Some(path) => Declaration::Import {
                path: string_value(path),
            },
            None => Declaration::Other,
        },
        Rule::package_decl => match child(&pair, Rule::full_ident) {
            Some(name) => Declaration::Package {
                name: name.as_str(),
            },
            None => Declaration::Other,
        },
        Rule::option_decl => option(&pair).unwrap_or(Declaration::Other),
        Rule::message_decl => match child(&pair, Rule::ident) {
            Some(name) => Declaration::Message {
                name: name.as_str(),
            },
            None => Declaration::Other,
        },
        Rule::service_decl => service(pair),
        _ => Declaration::Other,
    }
}

fn option<'i>(pair: &Pair<'i, Rule>) -> Option<Declaration<'i>> {
    let name = child(pair, Rule::option_name)?.as_str();
    let value = constant_value(child(pair, Rule::constant)?);
    Some(Declaration::Option { name, value })
}

fn service(pair: Pair<'_, Rule>) -> Declaration<'_> {
    let mut inner = pair.into_inner().filter(|p| {
        !matches!(
            p.as_rule(),
            Rule::kw_service | Rule::line_comment | Rule::block_comment
        )
    });

    let Some(name) = inner.next().filter(|p| p.as_rule() == Rule::ident) else {
        return Declaration::Other;
    };

    let items = inner.map(service_item).collect();

    Declaration::Service {
        name: name.as_str(),
        items,
    }
}

fn service_item(pair: Pair<'_, Rule>) -> ServiceItem<'_> {
    match pair.as_rule() {
        Rule::comment => ServiceItem::Comment(pair.as_str()),
        Rule::rpc_decl => rpc(&pair).map_or(ServiceItem::Other, ServiceItem::Rpc),
        _ => ServiceItem::Other,
    }
}

fn rpc<'i>(pair: &Pair<'i, Rule>) -> Option<RpcSignature<'i>> {
    Some(RpcSignature {
        name: child(pair, Rule::method_name)?.as_str(),
        request_type: child(pair, Rule::request_type)?.as_str(),
        response_type: child(pair, Rule::response_type)?.as_str(),
    })
}

/// First direct child produced by `rule`
fn child<'i>(pair: &Pair<'i, Rule>, rule: Rule) -> Option<Pair<'i, Rule>> {
    pair.clone().into_inner().find(|p| p.as_rule() == rule)
}

/// Contents of a string literal without its quotes
fn string_value(pair: Pair<'_, Rule>) -> &str {
    pair.into_inner().next().map_or("", |chars| chars.as_str())
}

fn constant_value(pair: Pair<'_, Rule>) -> &str {
    let raw = pair.as_str();
    match pair.into_inner().next() {
        Some(inner) if inner.as_rule() == Rule::string_lit => string_value(inner),
        Some(inner) => inner.as_str(),
        None => raw,
    }
}
