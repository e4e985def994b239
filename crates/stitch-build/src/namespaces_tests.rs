use super::*;

fn index(sources: &[(&str, &str)]) -> NamespaceIndex {
    let mut idx = NamespaceIndex::default();
    for (path, content) in sources {
        idx.scan_source(path, content).unwrap();
    }
    idx
}

fn roots(namespaces: &[&str]) -> Vec<String> {
    namespaces.iter().map(|n| n.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

#[test]
fn test_scan_extracts_provides_and_requires() {
    let idx = index(&[(
        "src/app.js",
        "goog.provide('demo.app');\ngoog.require('demo.util');\ngoog.require('demo.net');\n",
    )]);
    assert_eq!(idx.len(), 1);
    assert_eq!(
        idx.resolve(&roots(&["demo.app"]), "test").unwrap_err().to_string(),
        "namespace 'demo.util' required by src/app.js is not provided by any source"
    );
}

#[test]
fn test_scan_accepts_single_and_double_quotes() {
    let idx = index(&[
        ("a.js", "goog.provide(\"demo.a\");\n"),
        ("b.js", "goog.provide('demo.b');\ngoog.require(\"demo.a\");\n"),
    ]);
    assert_eq!(
        idx.resolve(&roots(&["demo.b"]), "test").unwrap(),
        vec!["a.js", "b.js"]
    );
}

#[test]
fn test_scan_ignores_commented_requires_mid_line() {
    // The patterns are line-anchored, like the classic deps scanners.
    let idx = index(&[
        ("a.js", "goog.provide('demo.a');\n"),
        (
            "b.js",
            "goog.provide('demo.b');\nvar s = \"see goog.require('demo.ghost')\";\ngoog.require('demo.a');\n",
        ),
    ]);
    assert_eq!(
        idx.resolve(&roots(&["demo.b"]), "test").unwrap(),
        vec!["a.js", "b.js"]
    );
}

#[test]
fn test_goog_module_counts_as_provide_and_module_get_as_require() {
    let idx = index(&[
        ("widget.js", "goog.module('demo.widget');\n"),
        (
            "app.js",
            "goog.module('demo.app');\nconst widget = goog.module.get('demo.widget');\n",
        ),
    ]);
    assert_eq!(
        idx.resolve(&roots(&["demo.app"]), "test").unwrap(),
        vec!["widget.js", "app.js"]
    );
}

#[test]
fn test_assigned_goog_require_is_recognized() {
    let idx = index(&[
        ("util.js", "goog.provide('demo.util');\n"),
        (
            "app.js",
            "goog.module('demo.app');\nconst util = goog.require('demo.util');\n",
        ),
    ]);
    assert_eq!(
        idx.resolve(&roots(&["demo.app"]), "test").unwrap(),
        vec!["util.js", "app.js"]
    );
}

#[test]
fn test_duplicate_provide_across_files_is_rejected() {
    let mut idx = NamespaceIndex::default();
    idx.scan_source("a.js", "goog.provide('demo.x');").unwrap();
    let err = idx
        .scan_source("b.js", "goog.provide('demo.x');")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "namespace 'demo.x' is provided by both a.js and b.js"
    );
}

#[test]
fn test_one_file_may_provide_many_namespaces() {
    let idx = index(&[("a.js", "goog.provide('demo.a');\ngoog.provide('demo.a.extra');\n")]);
    assert_eq!(
        idx.resolve(&roots(&["demo.a", "demo.a.extra"]), "test").unwrap(),
        vec!["a.js"]
    );
}

// ---------------------------------------------------------------------------
// Resolution order
// ---------------------------------------------------------------------------

#[test]
fn test_requires_come_before_requirers() {
    let idx = index(&[
        ("app.js", "goog.provide('demo.app');\ngoog.require('demo.util');\n"),
        ("util.js", "goog.provide('demo.util');\ngoog.require('demo.base');\n"),
        ("base.js", "goog.provide('demo.base');\n"),
    ]);
    assert_eq!(
        idx.resolve(&roots(&["demo.app"]), "test").unwrap(),
        vec!["base.js", "util.js", "app.js"]
    );
}

#[test]
fn test_shared_dep_emitted_once() {
    let idx = index(&[
        ("base.js", "goog.provide('demo.base');\n"),
        ("a.js", "goog.provide('demo.a');\ngoog.require('demo.base');\n"),
        ("b.js", "goog.provide('demo.b');\ngoog.require('demo.base');\n"),
    ]);
    assert_eq!(
        idx.resolve(&roots(&["demo.a", "demo.b"]), "test").unwrap(),
        vec!["base.js", "a.js", "b.js"]
    );
}

#[test]
fn test_resolution_follows_source_require_order() {
    let idx = index(&[
        ("app.js", "goog.provide('demo.app');\ngoog.require('demo.z');\ngoog.require('demo.a');\n"),
        ("z.js", "goog.provide('demo.z');\n"),
        ("a.js", "goog.provide('demo.a');\n"),
    ]);
    assert_eq!(
        idx.resolve(&roots(&["demo.app"]), "test").unwrap(),
        vec!["z.js", "a.js", "app.js"]
    );
}

#[test]
fn test_unknown_root_namespace_names_the_origin() {
    let idx = index(&[("a.js", "goog.provide('demo.a');\n")]);
    let err = idx.resolve(&roots(&["demo.missing"]), "module 'client'").unwrap_err();
    let NamespaceError::UnknownNamespace { namespace, required_by } = err else {
        panic!("expected UnknownNamespace, got {err:?}");
    };
    assert_eq!(namespace, "demo.missing");
    assert_eq!(required_by, "module 'client'");
}

#[test]
fn test_require_cycle_reports_the_chain() {
    let idx = index(&[
        ("a.js", "goog.provide('demo.a');\ngoog.require('demo.b');\n"),
        ("b.js", "goog.provide('demo.b');\ngoog.require('demo.a');\n"),
    ]);
    let err = idx.resolve(&roots(&["demo.a"]), "test").unwrap_err();
    let NamespaceError::RequireCycle { chain } = err else {
        panic!("expected RequireCycle, got {err:?}");
    };
    assert_eq!(chain, vec!["demo.a", "demo.b", "demo.a"]);
}

#[test]
fn test_requiring_a_namespace_the_same_file_provides_is_a_cycle() {
    let idx = index(&[(
        "a.js",
        "goog.provide('demo.a');\ngoog.provide('demo.a.sub');\ngoog.require('demo.a.sub');\n",
    )]);
    let err = idx.resolve(&roots(&["demo.a"]), "test").unwrap_err();
    let NamespaceError::RequireCycle { chain } = err else {
        panic!("expected RequireCycle, got {err:?}");
    };
    assert_eq!(chain, vec!["demo.a", "demo.a.sub"]);
}
