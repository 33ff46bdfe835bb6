//! Tests for the resolver module.

use super::*;
use crate::registry::{IndexEntry, ItemKind};

fn entry(name: &str, registry_dependencies: &[&str]) -> IndexEntry {
    IndexEntry {
        name: name.to_string(),
        kind: ItemKind::Ui,
        description: None,
        dependencies: Vec::new(),
        dev_dependencies: Vec::new(),
        registry_dependencies: registry_dependencies.iter().map(|d| d.to_string()).collect(),
        files: vec![format!("ui/{name}.tsx")],
    }
}

#[test]
fn test_transitive_closure_keeps_first_occurrence() {
    let index = vec![entry("a", &["b", "c"]), entry("b", &["c"]), entry("c", &[])];

    let resolution = resolve_tree(&index, &["a"]);
    assert_eq!(resolution.items.names(), vec!["a", "b", "c"]);

    // c is visited twice (through b and directly from a); both visits are logged
    let resolved_c = resolution
        .steps
        .iter()
        .filter(|s| matches!(s, ResolutionStep::Resolved { name, .. } if name == "c"))
        .count();
    assert_eq!(resolved_c, 2);
    assert_eq!(
        resolution.steps[2],
        ResolutionStep::Resolved {
            name: "c".to_string(),
            required_by: Some("b".to_string())
        }
    );
}

#[test]
fn test_first_appearance_determines_position() {
    let index = vec![
        entry("dialog", &["button"]),
        entry("button", &["utils"]),
        entry("utils", &[]),
    ];

    let resolution = resolve_tree(&index, &["utils", "dialog"]);
    assert_eq!(resolution.items.names(), vec!["utils", "dialog", "button"]);

    let resolution = resolve_tree(&index, &["dialog", "utils"]);
    assert_eq!(resolution.items.names(), vec!["dialog", "button", "utils"]);
}

#[test]
fn test_no_name_twice_for_repeated_requests() {
    let index = vec![entry("a", &["b"]), entry("b", &[]), entry("c", &["a", "b"])];

    let resolution = resolve_tree(&index, &["a", "c", "a", "b", "c"]);
    let names = resolution.items.names();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(resolution.items.len(), 3);
}

#[test]
fn test_missing_reference_is_skipped() {
    let index = vec![entry("card", &["ghost", "button"]), entry("button", &[])];

    let resolution = resolve_tree(&index, &["nope", "card"]);
    assert_eq!(resolution.items.names(), vec!["card", "button"]);
    assert_eq!(resolution.missing(), vec!["nope", "ghost"]);
    assert!(resolution.steps.contains(&ResolutionStep::MissingReference {
        name: "ghost".to_string(),
        required_by: Some("card".to_string()),
    }));
    assert!(resolution.steps.contains(&ResolutionStep::MissingReference {
        name: "nope".to_string(),
        required_by: None,
    }));
}

#[test]
fn test_cycle_is_broken() {
    let index = vec![entry("a", &["b"]), entry("b", &["c"]), entry("c", &["a"])];

    let resolution = resolve_tree(&index, &["a"]);
    assert_eq!(resolution.items.names(), vec!["a", "b", "c"]);
    assert!(resolution.has_cycles());
    assert!(resolution.steps.contains(&ResolutionStep::CycleBroken {
        name: "a".to_string(),
        path: vec!["a".to_string(), "b".to_string(), "c".to_string()],
    }));
}

#[test]
fn test_self_dependency_is_broken() {
    let index = vec![entry("loop", &["loop"])];

    let resolution = resolve_tree(&index, &["loop"]);
    assert_eq!(resolution.items.names(), vec!["loop"]);
    assert!(resolution.has_cycles());
}

#[test]
fn test_duplicate_index_names_first_wins() {
    let mut second = entry("a", &["b"]);
    second.description = Some("shadowed".to_string());
    let index = vec![entry("a", &[]), second, entry("b", &[])];

    let resolution = resolve_tree(&index, &["a"]);
    assert_eq!(resolution.items.names(), vec!["a"]);
    assert!(resolution.items.iter().all(|e| e.description.is_none()));
}

#[test]
fn test_empty_request() {
    let index = vec![entry("a", &[])];
    let resolution = resolve_tree::<_, &str>(&index, &[]);
    assert!(resolution.items.is_empty());
    assert!(resolution.steps.is_empty());
}

#[test]
fn test_external_dependencies_union() {
    let mut a = entry("a", &["b"]);
    a.dependencies = vec!["clsx".to_string(), "tailwind-merge".to_string()];
    let mut b = entry("b", &[]);
    b.dependencies = vec!["clsx".to_string(), "@radix-ui/react-slot".to_string()];
    b.dev_dependencies = vec!["@types/node".to_string()];
    let index = vec![a, b];

    let resolution = resolve_tree(&index, &["a"]);
    let external = ExternalDependencies::collect(&resolution.items);
    assert_eq!(
        external.dependencies.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["@radix-ui/react-slot", "clsx", "tailwind-merge"]
    );
    assert_eq!(external.dev_dependencies.len(), 1);
    assert!(!external.is_empty());
    assert!(ExternalDependencies::default().is_empty());
}

#[test]
fn test_step_display() {
    let step = ResolutionStep::MissingReference {
        name: "ghost".to_string(),
        required_by: Some("card".to_string()),
    };
    assert_eq!(step.to_string(), "missing ghost (required by card)");

    let step = ResolutionStep::CycleBroken {
        name: "a".to_string(),
        path: vec!["a".to_string(), "b".to_string()],
    };
    assert_eq!(step.to_string(), "cycle a -> b -> a");
}
