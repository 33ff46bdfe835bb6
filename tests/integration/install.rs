use kitpm_cli::config::{ProjectConfig, RegistryConfig};
use kitpm_cli::installer::{Installer, SkipReason};
use kitpm_cli::registry::RegistryClient;
use kitpm_cli::test_utils::init_test_logging;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{BUTTON_TSX, TestRegistry, UTILS_TS, sample_items};

async fn installer_for(registry: &TestRegistry, root: &Path) -> Installer {
    init_test_logging(None);
    let config = RegistryConfig::default().with_base_url(&registry.base_url);
    let client = Arc::new(RegistryClient::new(&config).unwrap());
    let project = ProjectConfig::load(root).await.unwrap();
    Installer::new(client, project, root)
}

#[tokio::test]
async fn test_install_component_tree_into_typed_project() {
    let registry = TestRegistry::start(sample_items()).await;
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    let report = installer_for(&registry, root).await.install(&["toggle-button"]).await.unwrap();

    assert_eq!(report.components, vec!["toggle-button", "button", "utils", "use-toggle"]);
    assert_eq!(fs::read_to_string(root.join("components/ui/button.tsx")).unwrap(), BUTTON_TSX);
    assert_eq!(fs::read_to_string(root.join("lib/utils.ts")).unwrap(), UTILS_TS);
    assert!(root.join("hooks/use-toggle.ts").exists());
    assert!(root.join("components/toggle-button.tsx").exists());

    let deps: Vec<&str> = report.external.dependencies.iter().map(String::as_str).collect();
    assert_eq!(deps, vec!["@radix-ui/react-slot", "clsx", "tailwind-merge"]);
    let dev: Vec<&str> = report.external.dev_dependencies.iter().map(String::as_str).collect();
    assert_eq!(dev, vec!["@types/react"]);

    assert_eq!(registry.hits("index.json"), 1);
    assert_eq!(registry.hits("button.json"), 1);
}

#[tokio::test]
async fn test_install_into_untyped_project_with_src_dir() {
    let registry = TestRegistry::start(sample_items()).await;
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("src")).unwrap();
    fs::write(root.join("components.json"), r#"{ "tsx": false }"#).unwrap();

    let installer = installer_for(&registry, root).await;
    let report = installer.install(&["button", "use-toggle"]).await.unwrap();
    assert_eq!(report.written.len(), 3);

    let button = fs::read_to_string(root.join("src/components/ui/button.jsx")).unwrap();
    assert!(button.contains("import { cn } from \"@/lib/utils\""));
    assert!(!button.contains("interface ButtonProps"));
    assert!(!button.contains("type Variant"));
    assert!(button.contains("React.forwardRef(\n"));
    assert!(button.contains("<button ref={ref} className={cn(variant, className)} {...props} />"));

    let hook = fs::read_to_string(root.join("src/hooks/use-toggle.js")).unwrap();
    assert!(hook.contains("export function useToggle(initial = false) {"));
    assert!(hook.contains("useState(initial)"));

    let utils = fs::read_to_string(root.join("src/lib/utils.js")).unwrap();
    assert!(utils.contains("import { clsx"));
    assert!(!utils.contains("ClassValue"));
    assert!(!root.join("src/lib/utils.ts").exists());
}

#[tokio::test]
async fn test_reinstall_keeps_user_edits() {
    let registry = TestRegistry::start(sample_items()).await;
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    installer_for(&registry, root).await.install(&["button"]).await.unwrap();
    let button = root.join("components/ui/button.tsx");
    fs::write(&button, "// my button\n").unwrap();
    let utils = root.join("lib/utils.ts");
    let utils_before = fs::read_to_string(&utils).unwrap();

    let report = installer_for(&registry, root).await.install(&["button"]).await.unwrap();
    assert!(report.is_empty());
    let reasons: Vec<SkipReason> = report.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(reasons, vec![SkipReason::AlreadyExists, SkipReason::HelperPresent]);
    assert_eq!(fs::read_to_string(&button).unwrap(), "// my button\n");
    assert_eq!(fs::read_to_string(&utils).unwrap(), utils_before);

    let installer = installer_for(&registry, root).await.overwrite(true);
    let report = installer.install(&["button"]).await.unwrap();
    assert_eq!(report.written, vec![button.clone()]);
    assert_eq!(fs::read_to_string(&button).unwrap(), BUTTON_TSX);
}

#[tokio::test]
async fn test_helper_merged_into_existing_utils() {
    let registry = TestRegistry::start(sample_items()).await;
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let utils = root.join("lib/utils.ts");
    fs::create_dir_all(utils.parent().unwrap()).unwrap();
    let existing = concat!(
        "import { twMerge } from \"tailwind-merge\"\n",
        "\n",
        "export const sleep = (ms: number) => new Promise((r) => setTimeout(r, ms))\n",
    );
    fs::write(&utils, existing).unwrap();

    let report = installer_for(&registry, root).await.install(&["utils"]).await.unwrap();
    assert_eq!(report.merged, vec![utils.clone()]);

    let merged = fs::read_to_string(&utils).unwrap();
    assert!(merged.starts_with(concat!(
        "import { clsx, type ClassValue } from \"clsx\"\n",
        "import { twMerge } from \"tailwind-merge\"\n",
    )));
    assert_eq!(merged.matches("tailwind-merge").count(), 1);
    assert!(merged.contains("export const sleep"));
    assert!(merged.ends_with("  return twMerge(clsx(inputs))\n}\n"));
}
