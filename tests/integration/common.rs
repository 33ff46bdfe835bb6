//! Shared fixtures: a local registry server and sample components.

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use kitpm_cli::test_utils::{file_json, item_json};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::task::JoinHandle;

pub const UTILS_TS: &str = r#"import { clsx, type ClassValue } from "clsx"
import { twMerge } from "tailwind-merge"

export function cn(...inputs: ClassValue[]) {
  return twMerge(clsx(inputs))
}
"#;

pub const BUTTON_TSX: &str = r#"import * as React from "react"

import { cn } from "@/lib/utils"

type Variant = "default" | "outline"

export interface ButtonProps extends React.ButtonHTMLAttributes<HTMLButtonElement> {
  variant?: Variant
}

const Button = React.forwardRef<HTMLButtonElement, ButtonProps>(
  ({ className, variant = "default", ...props }, ref) => {
    return <button ref={ref} className={cn(variant, className)} {...props} />
  }
)
Button.displayName = "Button"

export { Button }
"#;

pub const USE_TOGGLE_TS: &str = r#"import { useState } from "react"

export function useToggle(initial: boolean = false): [boolean, () => void] {
  const [on, setOn] = useState<boolean>(initial)
  return [on, () => setOn((v) => !v)]
}
"#;

const TOGGLE_BUTTON_TSX: &str = r#"import { Button } from "@/components/ui/button"
import { useToggle } from "@/hooks/use-toggle"

export function ToggleButton() {
  const [on, toggle] = useToggle()
  return <Button onClick={toggle}>{on ? "On" : "Off"}</Button>
}
"#;

/// The sample registry: `utils`, `button` (needs utils), `use-toggle` and
/// `toggle-button` (needs button and use-toggle).
pub fn sample_items() -> Vec<Value> {
    let mut utils = item_json(
        "utils",
        "registry:lib",
        &[],
        &[file_json("registry/lib/utils.ts", "registry:lib", UTILS_TS)],
    );
    utils["dependencies"] = json!(["clsx", "tailwind-merge"]);

    let mut button = item_json(
        "button",
        "registry:ui",
        &["utils"],
        &[file_json("registry/ui/button.tsx", "registry:ui", BUTTON_TSX)],
    );
    button["description"] = json!("Displays a button.");
    button["dependencies"] = json!(["@radix-ui/react-slot"]);

    let toggle = item_json(
        "use-toggle",
        "registry:hook",
        &[],
        &[file_json("registry/hooks/use-toggle.ts", "registry:hook", USE_TOGGLE_TS)],
    );

    let mut toggle_button = item_json(
        "toggle-button",
        "registry:component",
        &["button", "use-toggle"],
        &[file_json(
            "registry/components/toggle-button.tsx",
            "registry:component",
            TOGGLE_BUTTON_TSX,
        )],
    );
    toggle_button["devDependencies"] = json!(["@types/react"]);

    vec![utils, button, toggle, toggle_button]
}

/// Registry served over HTTP on a random local port.
pub struct TestRegistry {
    /// Base locator, e.g. `http://127.0.0.1:40000/r`
    pub base_url: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
struct ServerState {
    routes: Arc<HashMap<String, (StatusCode, String)>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl TestRegistry {
    /// Serve `items` plus an index listing them.
    pub async fn start(items: Vec<Value>) -> Self {
        Self::start_with(items, Vec::new()).await
    }

    /// Serve `items`, with `overrides` (resource, status) replacing responses.
    pub async fn start_with(items: Vec<Value>, overrides: Vec<(&str, StatusCode)>) -> Self {
        let mut routes = HashMap::new();
        let index: Vec<Value> = items.iter().map(index_entry).collect();
        let index_body = Value::Array(index).to_string();
        routes.insert("/r/index.json".to_string(), (StatusCode::OK, index_body));
        for item in &items {
            let name = item["name"].as_str().unwrap();
            routes.insert(format!("/r/{name}.json"), (StatusCode::OK, item.to_string()));
        }
        for (resource, status) in overrides {
            routes.insert(format!("/r/{resource}"), (status, String::new()));
        }

        let hits = Arc::new(Mutex::new(HashMap::new()));
        let state = ServerState {
            routes: Arc::new(routes),
            hits: hits.clone(),
        };
        let app = Router::new().fallback(serve).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/r"),
            hits,
            handle,
        }
    }

    /// Requests received for `resource` (e.g. `"button.json"`).
    pub fn hits(&self, resource: &str) -> usize {
        self.hits.lock().unwrap().get(&format!("/r/{resource}")).copied().unwrap_or(0)
    }
}

impl Drop for TestRegistry {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(State(state): State<ServerState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    *state.hits.lock().unwrap().entry(path.clone()).or_default() += 1;
    match state.routes.get(&path) {
        Some((status, body)) if status.is_success() => {
            ([(header::CONTENT_TYPE, "application/json")], body.clone()).into_response()
        }
        Some((status, _)) => (*status).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn index_entry(item: &Value) -> Value {
    let mut entry = item.clone();
    if let Some(files) = entry.get_mut("files").and_then(Value::as_array_mut) {
        for file in files.iter_mut() {
            *file = file["path"].clone();
        }
    }
    entry
}
