//! Integration tests for the proto service parser

use proto_service_generator_common::{GeneratorConfig, GeneratorError, ResolvedType, Service};
use proto_service_generator_parser::{parse_service_descriptors, ProtoServiceParser};
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn parse_orders() -> Vec<Service<ResolvedType>> {
    let config = GeneratorConfig::default().with_import_path(fixture("include"));
    ProtoServiceParser::new(config)
        .parse_directory(fixture("orders"))
        .expect("orders fixture should resolve")
}

fn find<'a>(services: &'a [Service<ResolvedType>], name: &str) -> &'a Service<ResolvedType> {
    services
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("service {name} not found"))
}

#[test]
fn test_only_scanned_files_are_returned() {
    let services = parse_orders();

    let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
    // billing/ sorts before orders.proto; PongService comes from an import
    assert_eq!(names, vec!["Billing", "Orders"]);
}

#[test]
fn test_orders_methods_resolve() {
    let services = parse_orders();
    let orders = find(&services, "Orders");

    assert_eq!(orders.proto_package.as_deref(), Some("acme.orders"));
    assert_eq!(orders.output_package, "com.acme.orders");

    let methods: Vec<&str> = orders.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["Ping", "Clear", "Bounce"], "streaming Watch is skipped");

    let ping = &orders.methods[0];
    assert_eq!(ping.request_types.len(), 1);
    assert_eq!(ping.request_types[0].qualified_name(), "com.acme.orders.Ack");
    assert_eq!(ping.response_type.qualified_name(), "com.acme.orders.Ack");

    let clear = &orders.methods[1];
    assert_eq!(clear.request_types[0].qualified_name(), "com.google.protobuf.Empty");
    assert_eq!(clear.response_type.qualified_name(), "com.google.protobuf.Empty");

    let bounce = &orders.methods[2];
    assert_eq!(
        bounce.request_types[0].qualified_name(),
        "com.example.shared.Pong"
    );
}

#[test]
fn test_orders_comments() {
    let services = parse_orders();
    let orders = find(&services, "Orders");

    // Message declarations do not consume the buffer, so the comment above
    // `Ack` is still pending when the service is declared.
    assert_eq!(
        orders.comments,
        vec![
            "Acknowledgement returned by every order call",
            "Order management API."
        ]
    );
    assert_eq!(orders.methods[0].comments, vec!["Liveness check"]);
    assert_eq!(orders.methods[1].comments, vec!["Clears all orders"]);
    assert!(orders.methods[2].comments.is_empty());
    assert!(orders.annotations.is_empty());
}

#[test]
fn test_forward_references_across_files() {
    let services = parse_orders();
    let billing = find(&services, "Billing");
    let charge = &billing.methods[0];

    // Invoice is declared after the service, Ack in a file parsed later
    assert_eq!(
        charge.request_types[0],
        ResolvedType {
            name: "Invoice".to_string(),
            package: "com.acme.billing".to_string(),
            enclosing_classes: vec![],
        }
    );
    assert_eq!(charge.response_type.qualified_name(), "com.acme.orders.Ack");
}

#[test]
fn test_missing_import_types_fail_resolution() {
    // Without the include root, pong.proto is never found and p.Pong cannot
    // resolve.
    let err = parse_service_descriptors(fixture("orders")).unwrap_err();
    match err {
        GeneratorError::UnresolvedPackage(reference) => {
            assert_eq!(reference.package.as_deref(), Some("p"));
            assert_eq!(reference.name, "Pong");
        }
        other => panic!("expected unresolved package, got {other:?}"),
    }
}

#[test]
fn test_unresolved_package() {
    let err = parse_service_descriptors(fixture("unresolved_package")).unwrap_err();
    assert!(matches!(err, GeneratorError::UnresolvedPackage(_)));
    assert!(err.to_string().contains("nowhere.Response"));
}

#[test]
fn test_unresolved_type() {
    let err = parse_service_descriptors(fixture("unresolved_type")).unwrap_err();
    assert!(matches!(err, GeneratorError::UnresolvedType(ref r) if r.to_string() == "acme.Response"));
}

#[test]
fn test_root_is_a_file() {
    let err = parse_service_descriptors(fixture("orders/orders.proto")).unwrap_err();
    assert!(matches!(err, GeneratorError::NotADirectory(_)));
}

#[test]
fn test_root_does_not_exist() {
    let err = parse_service_descriptors(fixture("does_not_exist")).unwrap_err();
    assert!(matches!(err, GeneratorError::DirectoryNotFound(_)));
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("README.md"), "no protos here").unwrap();

    let err = parse_service_descriptors(dir.path()).unwrap_err();
    assert!(matches!(err, GeneratorError::NoProtoFiles(_)));
}

#[test]
fn test_cross_file_import_outside_scanned_set() {
    let scanned = tempfile::tempdir().unwrap();
    let includes = tempfile::tempdir().unwrap();

    fs::create_dir_all(includes.path().join("p")).unwrap();
    fs::write(
        includes.path().join("p/b.proto"),
        "package p; message Pong {}",
    )
    .unwrap();
    fs::write(
        scanned.path().join("a.proto"),
        r#"
import "p/b.proto";
package a;
service A { rpc Call(p.Pong) returns (p.Pong); }
"#,
    )
    .unwrap();

    let config = GeneratorConfig::default().with_import_path(includes.path());
    let services = ProtoServiceParser::new(config)
        .parse_directory(scanned.path())
        .unwrap();

    assert_eq!(services.len(), 1);
    assert_eq!(services[0].methods[0].response_type.qualified_name(), "p.Pong");
}

#[test]
fn test_configured_override_beats_registration() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.proto"),
        r#"
package acme.common;
option java_package = "com.acme.common";
message Shared {}
service A { rpc Call(Shared) returns (Shared); }
"#,
    )
    .unwrap();

    let config = GeneratorConfig::default().with_package_override("acme.common", "com.acme.shared");
    let services = ProtoServiceParser::new(config)
        .parse_directory(dir.path())
        .unwrap();

    assert_eq!(
        services[0].methods[0].response_type.qualified_name(),
        "com.acme.shared.Shared"
    );
}

#[test]
fn test_lenient_syntax_skips_broken_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.proto"), "service Broken {").unwrap();
    fs::write(
        dir.path().join("fine.proto"),
        "message M {} service Fine { rpc Go(M) returns (M); }",
    )
    .unwrap();

    let err = parse_service_descriptors(dir.path()).unwrap_err();
    assert!(matches!(err, GeneratorError::Syntax { .. }));

    let config = GeneratorConfig {
        lenient_syntax: true,
        ..GeneratorConfig::default()
    };
    let services = ProtoServiceParser::new(config)
        .parse_directory(dir.path())
        .unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].name, "Fine");
}

#[test]
fn test_last_service_per_file_wins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("two.proto"),
        "message M {} service First { rpc A(M) returns (M); } service Second { rpc B(M) returns (M); }",
    )
    .unwrap();

    let services = parse_service_descriptors(dir.path()).unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].name, "Second");
}

#[test]
fn test_discovered_file_broken_as_import_fails_strict_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.proto"),
        "import \"b.proto\"; message M {} service A { rpc X(M) returns (M); }",
    )
    .unwrap();
    fs::write(dir.path().join("b.proto"), "service Broken {").unwrap();

    let config = GeneratorConfig::default().with_import_path(dir.path());
    let err = ProtoServiceParser::new(config.clone())
        .parse_directory(dir.path())
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Syntax { ref file, .. } if file == "b.proto"));

    let lenient = GeneratorConfig {
        lenient_syntax: true,
        ..config
    };
    let services = ProtoServiceParser::new(lenient)
        .parse_directory(dir.path())
        .unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].name, "A");
}

#[test]
fn test_comment_inside_message_header() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.proto"),
        "package p;\nmessage M // request\n{}\nservice A { rpc X(M) // call\n returns (M); }",
    )
    .unwrap();

    let services = parse_service_descriptors(dir.path()).unwrap();
    assert_eq!(services[0].methods.len(), 1);
    assert_eq!(services[0].methods[0].response_type.qualified_name(), "p.M");
}
