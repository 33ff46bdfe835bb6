use super::*;
use crate::registry::TransportResponse;
use crate::test_utils::{StubTransport, file_json, init_test_logging, item_json};
use serde_json::{Value, json};
use tempfile::TempDir;

const BASE: &str = "https://registry.test/r";

const UTILS_TS: &str = r#"import { clsx, type ClassValue } from "clsx"
import { twMerge } from "tailwind-merge"

export function cn(...inputs: ClassValue[]) {
  return twMerge(clsx(inputs))
}
"#;

const BUTTON_TSX: &str = r#"import * as React from "react"
import { cn } from "@/lib/utils"

export interface ButtonProps extends React.ButtonHTMLAttributes<HTMLButtonElement> {
  asChild?: boolean
}

export function Button({ className, ...props }: ButtonProps) {
  return <button className={cn("btn", className)} {...props} />
}
"#;

fn registry() -> Vec<Value> {
    let utils_file = file_json("lib/utils.ts", "registry:lib", UTILS_TS);
    let mut utils = item_json("utils", "registry:lib", &[], &[utils_file]);
    utils["dependencies"] = json!(["clsx", "tailwind-merge"]);

    let button_file = file_json("ui/button.tsx", "registry:ui", BUTTON_TSX);
    let mut button = item_json("button", "registry:ui", &["utils"], &[button_file]);
    button["dependencies"] = json!(["@radix-ui/react-slot"]);

    let card = item_json(
        "card",
        "registry:ui",
        &["button", "utils"],
        &[file_json(
            "ui/card.tsx",
            "registry:ui",
            "export const Card = (p: any) => <div {...p} />\n",
        )],
    );

    vec![utils, button, card]
}

fn setup(temp: &TempDir, tsx: bool, items: Vec<Value>) -> (Installer, Arc<StubTransport>) {
    init_test_logging(None);
    let (client, transport) = StubTransport::new(BASE).with_items(items).client();
    let config = ProjectConfig {
        tsx,
        ..ProjectConfig::default()
    };
    (Installer::new(client, config, temp.path()), transport)
}

fn read(temp: &TempDir, relative: &str) -> String {
    std::fs::read_to_string(temp.path().join(relative)).unwrap()
}

#[tokio::test]
async fn test_install_with_dependencies() {
    let temp = TempDir::new().unwrap();
    let (installer, transport) = setup(&temp, true, registry());

    let report = installer.install(&["card"]).await.unwrap();

    assert_eq!(report.components, vec!["card", "button", "utils"]);
    assert_eq!(report.written.len(), 3);
    assert!(report.skipped.is_empty());
    assert!(report.missing.is_empty());
    assert_eq!(read(&temp, "components/ui/button.tsx"), BUTTON_TSX);
    assert_eq!(read(&temp, "lib/utils.ts"), UTILS_TS);

    let deps: Vec<&str> = report.external.dependencies.iter().map(String::as_str).collect();
    assert_eq!(deps, vec!["@radix-ui/react-slot", "clsx", "tailwind-merge"]);

    // one request per resource even though utils is reachable twice
    assert_eq!(transport.calls("utils.json"), 1);
    assert_eq!(transport.calls("index.json"), 1);
}

#[tokio::test]
async fn test_install_without_static_typing() {
    let temp = TempDir::new().unwrap();
    let (installer, _) = setup(&temp, false, registry());

    let report = installer.install(&["button"]).await.unwrap();
    assert_eq!(report.written.len(), 2);

    let button = read(&temp, "components/ui/button.jsx");
    assert!(!button.contains("interface"));
    assert!(!button.contains(": ButtonProps"));
    assert!(button.contains("export function Button({ className, ...props }) {"));
    assert!(!temp.path().join("components/ui/button.tsx").exists());

    let utils = read(&temp, "lib/utils.js");
    assert!(utils.contains("export function cn(...inputs) {"));
    assert!(!utils.contains("ClassValue"));
}

#[tokio::test]
async fn test_existing_files_skipped_unless_overwrite() {
    let temp = TempDir::new().unwrap();
    let button = temp.path().join("components/ui/button.tsx");
    std::fs::create_dir_all(button.parent().unwrap()).unwrap();
    std::fs::write(&button, "// customized\n").unwrap();

    let (installer, _) = setup(&temp, true, registry());
    let report = installer.install(&["button"]).await.unwrap();
    assert_eq!(
        report.skipped,
        vec![SkippedFile {
            path: button.clone(),
            reason: SkipReason::AlreadyExists,
        }]
    );
    assert_eq!(std::fs::read_to_string(&button).unwrap(), "// customized\n");

    let (installer, _) = installer_overwrite(&temp);
    let report = installer.install(&["button"]).await.unwrap();
    assert!(report.written.contains(&button));
    assert_eq!(std::fs::read_to_string(&button).unwrap(), BUTTON_TSX);
}

fn installer_overwrite(temp: &TempDir) -> (Installer, Arc<StubTransport>) {
    let (installer, transport) = setup(temp, true, registry());
    (installer.overwrite(true), transport)
}

#[tokio::test]
async fn test_helper_file_is_merged_not_overwritten() {
    let temp = TempDir::new().unwrap();
    let utils = temp.path().join("lib/utils.ts");
    std::fs::create_dir_all(utils.parent().unwrap()).unwrap();
    std::fs::write(&utils, "export const answer = 42\n").unwrap();

    let (installer, _) = installer_overwrite(&temp);
    let report = installer.install(&["utils"]).await.unwrap();
    assert_eq!(report.merged, vec![utils.clone()]);

    let merged = std::fs::read_to_string(&utils).unwrap();
    assert!(merged.contains("export const answer = 42\n"));
    assert!(merged.contains("export function cn("));

    // second run leaves it alone
    let report = installer.install(&["utils"]).await.unwrap();
    assert_eq!(report.skipped[0].reason, SkipReason::HelperPresent);
    assert_eq!(std::fs::read_to_string(&utils).unwrap(), merged);
}

#[tokio::test]
async fn test_helper_fetched_when_not_declared() {
    let temp = TempDir::new().unwrap();
    let mut items = registry();
    // button without its registryDependencies entry
    items[1]["registryDependencies"] = json!([]);
    let (installer, transport) = setup(&temp, true, items);

    let report = installer.install(&["button"]).await.unwrap();
    assert_eq!(report.components, vec!["button"]);
    assert!(report.written.contains(&temp.path().join("lib/utils.ts")));
    assert_eq!(read(&temp, "lib/utils.ts"), UTILS_TS);
    assert_eq!(transport.calls("utils.json"), 1);
}

#[tokio::test]
async fn test_missing_helper_template_is_not_fatal() {
    let temp = TempDir::new().unwrap();
    let mut items = registry();
    items[1]["registryDependencies"] = json!([]);
    let (installer, transport) = setup(&temp, true, items);
    transport.set_response("utils.json", TransportResponse::status(500));
    let installer = installer.with_template_retries(1);

    let report = installer.install(&["button"]).await.unwrap();
    assert_eq!(report.written, vec![temp.path().join("components/ui/button.tsx")]);
    assert!(!temp.path().join("lib/utils.ts").exists());
    assert_eq!(transport.calls("utils.json"), 2);
}

#[tokio::test]
async fn test_missing_and_failing_components() {
    let temp = TempDir::new().unwrap();
    let mut items = registry();
    items[2]["registryDependencies"] = json!(["button", "ghost"]);
    let (installer, transport) = setup(&temp, true, items);
    transport.set_response("button.json", TransportResponse::status(500));

    let report = installer.install(&["card", "nope"]).await.unwrap();
    assert_eq!(report.missing, vec!["ghost", "nope"]);
    assert_eq!(report.components, vec!["card", "utils"]);
    assert!(temp.path().join("components/ui/card.tsx").exists());
    assert!(!temp.path().join("components/ui/button.tsx").exists());
}

#[tokio::test]
async fn test_index_failure_is_an_error() {
    let temp = TempDir::new().unwrap();
    let (installer, transport) = setup(&temp, true, registry());
    transport.set_response("index.json", TransportResponse::status(401));

    let err = installer.install(&["button"]).await.unwrap_err();
    assert!(matches!(err, KitError::Registry(crate::registry::RegistryError::Unauthorized { .. })));
}

#[tokio::test]
async fn test_later_component_wins_same_destination() {
    let temp = TempDir::new().unwrap();
    let first_file = file_json("a/shared.tsx", "registry:ui", "first\n");
    let first = item_json("first", "registry:ui", &["second"], &[first_file]);
    let second_file = file_json("b/shared.tsx", "registry:ui", "second\n");
    let second = item_json("second", "registry:ui", &[], &[second_file]);
    let (installer, _) = setup(&temp, true, vec![first, second]);

    let report = installer.install(&["first"]).await.unwrap();
    assert_eq!(report.written.len(), 1);
    assert_eq!(read(&temp, "components/ui/shared.tsx"), "second\n");
}

#[tokio::test]
async fn test_declaration_and_empty_files_skipped() {
    let temp = TempDir::new().unwrap();
    let item = item_json(
        "types",
        "registry:lib",
        &[],
        &[
            file_json("lib/env.d.ts", "registry:lib", "declare const x: number\n"),
            json!({ "path": "lib/empty.ts", "type": "registry:lib" }),
        ],
    );
    let (installer, _) = setup(&temp, false, vec![item]);

    let report = installer.install(&["types"]).await.unwrap();
    assert!(report.is_empty());
    let reasons: Vec<SkipReason> = report.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(reasons, vec![SkipReason::DeclarationFile, SkipReason::NoContent]);
}

#[tokio::test]
async fn test_target_outside_project_is_refused() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    std::fs::create_dir(&project).unwrap();

    let mut escaping = file_json("escaped.txt", "registry:file", "gotcha\n");
    escaping["target"] = json!("../../escaped.txt");
    let mut nested = file_json("x.txt", "registry:file", "gotcha\n");
    nested["target"] = json!("app/../../outside.txt");
    let item = item_json("evil", "registry:file", &[], &[escaping, nested]);

    let (client, _) = StubTransport::new(BASE).with_items(vec![item]).client();
    let installer = Installer::new(client, ProjectConfig::default(), &project);

    let report = installer.install(&["evil"]).await.unwrap();
    assert!(report.written.is_empty());
    let reasons: Vec<SkipReason> = report.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(reasons, vec![SkipReason::InvalidPath, SkipReason::InvalidPath]);
    assert!(!temp.path().parent().unwrap().join("escaped.txt").exists());
    assert!(!temp.path().join("outside.txt").exists());
}

#[tokio::test]
async fn test_custom_merger_export_name() {
    let temp = TempDir::new().unwrap();
    let existing = "export const cx = (...c: string[]) => c.join(\" \")\n";
    std::fs::create_dir_all(temp.path().join("lib")).unwrap();
    std::fs::write(temp.path().join("lib/utils.ts"), existing).unwrap();

    let (installer, _) = setup(&temp, true, registry());
    let installer = installer.with_merger(HelperMerger::new("cx"));

    let report = installer.install(&["utils"]).await.unwrap();
    let reasons: Vec<SkipReason> = report.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(reasons, vec![SkipReason::HelperPresent]);
    assert_eq!(read(&temp, "lib/utils.ts"), existing);
}

struct Shouting;

impl SourceTransformer for Shouting {
    fn transform(&self, source: &str, wants_static_typing: bool) -> String {
        if wants_static_typing { source.to_string() } else { source.to_uppercase() }
    }
}

#[tokio::test]
async fn test_custom_transformer() {
    let temp = TempDir::new().unwrap();
    let file = file_json("hooks/use-x.ts", "registry:hook", "export {}\n");
    let item = item_json("hook", "registry:hook", &[], &[file]);
    let (installer, _) = setup(&temp, false, vec![item]);
    let installer = installer.with_transformer(Arc::new(Shouting));

    installer.install(&["hook"]).await.unwrap();
    assert_eq!(read(&temp, "hooks/use-x.js"), "EXPORT {}\n");
}
