//! The demo host API the terminal explorer browses.

use probe_types::{ObjectRef, ThrownError, Value};

/// Name the demo root is bound under.
pub const ROOT_NAME: &str = "host";

/// Build an editor-like object graph: window, workspace, commands, env,
/// extensions and version.
pub fn host_root() -> Value {
    let root = ObjectRef::new()
        .with("version", "1.95.0")
        .with("window", window())
        .with("workspace", workspace())
        .with("commands", commands())
        .with("env", env())
        .with("extensions", extensions())
        .with("_telemetry", ObjectRef::new().with("enabled", false));
    Value::Object(root)
}

fn position(line: i32, character: i32) -> ObjectRef {
    ObjectRef::new()
        .with("line", line)
        .with("character", character)
}

fn document(file_name: &str, language: &str, lines: &'static [&'static str]) -> ObjectRef {
    ObjectRef::new()
        .with("fileName", file_name)
        .with("languageId", language)
        .with("lineCount", lines.len())
        .with("isDirty", false)
        .with(
            "lineAt",
            ObjectRef::function("lineAt", 1, move |_, args| {
                let index = args.first().map_or(f64::NAN, Value::to_number);
                if !(index >= 0.0 && index.fract() == 0.0 && (index as usize) < lines.len()) {
                    return Err(ThrownError::range_error("Illegal value for `line`"));
                }
                Ok(Value::string(lines[index as usize]))
            }),
        )
        .with(
            "getText",
            ObjectRef::function("getText", 0, move |_, _| Ok(Value::string(lines.join("\n")))),
        )
}

fn window() -> ObjectRef {
    const MAIN: &[&str] = &["fn main() {", "    println!(\"hello\");", "}"];
    const README: &[&str] = &["# demo", "", "A small project."];

    let editor = ObjectRef::new()
        .with("document", document("/work/demo/src/main.rs", "rust", MAIN))
        .with(
            "selection",
            ObjectRef::new()
                .with("start", position(1, 4))
                .with("end", position(1, 12)),
        )
        .with("viewColumn", 1);
    let readme = ObjectRef::new()
        .with("document", document("/work/demo/README.md", "markdown", README))
        .with("viewColumn", 2);

    ObjectRef::new()
        .with("activeTextEditor", editor.clone())
        .with("visibleTextEditors", Value::array(vec![editor.into(), readme.into()]))
        .with("terminals", Value::array(vec![]))
        .with("state", ObjectRef::new().with("focused", true))
        .with(
            "showInformationMessage",
            ObjectRef::function("showInformationMessage", 1, |_, args| {
                let message = args.first().cloned().unwrap_or_default();
                Ok(Value::string(format!("info: {}", message.to_display_string())))
            }),
        )
        .with(
            "showErrorMessage",
            ObjectRef::function("showErrorMessage", 1, |_, args| {
                let message = args.first().cloned().unwrap_or_default();
                Ok(Value::string(format!("error: {}", message.to_display_string())))
            }),
        )
}

fn workspace() -> ObjectRef {
    let folder = ObjectRef::new()
        .with("name", "demo")
        .with("index", 0)
        .with("uri", ObjectRef::new().with("scheme", "file").with("path", "/work/demo"));
    ObjectRef::new()
        .with("name", "demo")
        .with("rootPath", "/work/demo")
        .with("workspaceFolders", Value::array(vec![folder.into()]))
        .with(
            "getConfiguration",
            ObjectRef::function("getConfiguration", 1, |_, args| {
                let section = args.first().cloned().unwrap_or_default();
                let settings = match section.to_display_string().as_str() {
                    "editor" => ObjectRef::new().with("tabSize", 4).with("insertSpaces", true),
                    "files" => ObjectRef::new().with("autoSave", "off"),
                    _ => ObjectRef::new(),
                };
                Ok(settings.into())
            }),
        )
}

fn commands() -> ObjectRef {
    const KNOWN: [&str; 4] = [
        "editor.action.formatDocument",
        "workbench.action.files.save",
        "workbench.action.quickOpen",
        "probe.pickExpression",
    ];
    ObjectRef::new()
        .with(
            "getCommands",
            ObjectRef::function("getCommands", 0, |_, _| {
                Ok(Value::array(KNOWN.iter().map(|c| Value::from(*c)).collect()))
            }),
        )
        .with(
            "executeCommand",
            ObjectRef::function("executeCommand", 1, |_, args| {
                let id = args.first().cloned().unwrap_or_default().to_display_string();
                if KNOWN.contains(&id.as_str()) {
                    Ok(Value::Undefined)
                } else {
                    Err(ThrownError::error(format!("command '{id}' not found")))
                }
            }),
        )
}

fn env() -> ObjectRef {
    ObjectRef::new()
        .with("appName", "Demo Editor")
        .with("language", "en")
        .with("shell", "/bin/bash")
        .with("uiKind", 1)
        .with(
            "clipboard",
            ObjectRef::new().with(
                "readText",
                ObjectRef::function("readText", 0, |_, _| Ok(Value::string(""))),
            ),
        )
}

fn extensions() -> ObjectRef {
    let installed = [("rust-lang.rust-analyzer", true), ("probe-tools.probe", true)];
    let all: Vec<Value> = installed
        .iter()
        .map(|(id, active)| {
            ObjectRef::new()
                .with("id", *id)
                .with("isActive", *active)
                .into()
        })
        .collect();
    let lookup = all.clone();
    ObjectRef::new().with("all", Value::array(all)).with(
        "getExtension",
        ObjectRef::function("getExtension", 1, move |_, args| {
            let wanted = args.first().cloned().unwrap_or_default();
            for extension in &lookup {
                if extension.get_property("id")?.strict_equals(&wanted) {
                    return Ok(extension.clone());
                }
            }
            Ok(Value::Undefined)
        }),
    )
}
