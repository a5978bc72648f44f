//! Script-module (TypeScript/JavaScript) configuration loader.
//!
//! Type annotations are stripped with `swc_ts_fast_strip` and the resulting
//! module is evaluated in an embedded QuickJS context. The context has no
//! filesystem, network or process access; the only importable module is the
//! built-in `worktree-setup` helper module, so a config file can do nothing
//! but compute its exported value.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use rquickjs::loader::{BuiltinLoader, BuiltinResolver};
use rquickjs::{Context, Ctx, Module, Runtime, Value};
use swc_common::errors::Handler;
use swc_common::sync::Lrc;
use swc_common::{GLOBALS, Globals, SourceMap};

use crate::error::ConfigError;
use crate::types::Config;

/// Name of the importable helper module.
const SDK_MODULE: &str = "worktree-setup";

const SDK_SOURCE: &str = "\
export function defineConfig(config) { return config; }
export default defineConfig;
";

const MEMORY_LIMIT: usize = 32 * 1024 * 1024;
const EVAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Load a script-module configuration file.
///
/// The module's default export is the config. A module without a default
/// export is read through its namespace object instead.
///
/// # Errors
///
/// * If the file cannot be read
/// * If type stripping or evaluation fails
/// * If the export is not an object or has fields of the wrong type
pub fn load_ts_config(path: &Path) -> Result<Config, ConfigError> {
    log::debug!("Loading script config from {}", path.display());

    let source = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_ts_config(&source, path)
}

/// Strip, evaluate and deserialize script source. `path` names the module.
pub(crate) fn parse_ts_config(source: &str, path: &Path) -> Result<Config, ConfigError> {
    let javascript = strip_types(source, path)?;
    let json = evaluate_default_export(&javascript, path)?;

    log::debug!("Script export: {json}");

    let value: serde_json::Value =
        serde_json::from_str(&json).map_err(|e| ConfigError::JsonParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    if !value.is_object() {
        return Err(ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            message: "default export must be an object".to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| ConfigError::JsonParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Remove TypeScript syntax, leaving plain ES module source.
fn strip_types(source: &str, path: &Path) -> Result<String, ConfigError> {
    let cm: Lrc<SourceMap> = Lrc::default();
    let handler = Handler::with_emitter_writer(Box::new(std::io::sink()), Some(cm.clone()));

    let options = swc_ts_fast_strip::Options {
        module: Some(true),
        filename: Some(path.to_string_lossy().into_owned()),
        ..Default::default()
    };

    GLOBALS
        .set(&Globals::new(), || {
            swc_ts_fast_strip::operate(&cm, &handler, source.to_string(), options)
        })
        .map(|output| output.code)
        .map_err(|e| ConfigError::TypeScriptEvalError {
            path: path.to_path_buf(),
            message: format!("type stripping failed: {e:?}"),
        })
}

/// Evaluate a module and return its default export serialized as JSON.
fn evaluate_default_export(javascript: &str, path: &Path) -> Result<String, ConfigError> {
    let eval_error = |message: String| ConfigError::TypeScriptEvalError {
        path: path.to_path_buf(),
        message,
    };

    let runtime = Runtime::new().map_err(|e| eval_error(e.to_string()))?;
    runtime.set_memory_limit(MEMORY_LIMIT);

    let deadline = Instant::now() + EVAL_TIMEOUT;
    runtime.set_interrupt_handler(Some(Box::new(move || Instant::now() > deadline)));

    runtime.set_loader(
        BuiltinResolver::default().with_module(SDK_MODULE),
        BuiltinLoader::default().with_module(SDK_MODULE, SDK_SOURCE),
    );

    let context = Context::full(&runtime).map_err(|e| eval_error(e.to_string()))?;
    let module_name = path.to_string_lossy().into_owned();

    context.with(|ctx| {
        match export_as_json(&ctx, &module_name, javascript) {
            Ok(Some(json)) => Ok(json),
            Ok(None) => Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                message: "module does not export a config object".to_string(),
            }),
            Err(e) => Err(eval_error(describe_js_error(&ctx, &e))),
        }
    })
}

fn export_as_json<'js>(
    ctx: &Ctx<'js>,
    name: &str,
    javascript: &str,
) -> rquickjs::Result<Option<String>> {
    let declared = Module::declare(ctx.clone(), name, javascript)?;
    let (module, promise) = declared.eval()?;
    promise.finish::<()>()?;

    let namespace = module.namespace()?;
    let default: Value<'js> = namespace.get("default")?;
    let export = if default.is_undefined() {
        namespace.into_value()
    } else {
        default
    };

    match ctx.json_stringify(export)? {
        Some(json) => json.to_string().map(Some),
        None => Ok(None),
    }
}

/// Turn a QuickJS error into a readable message, pulling thrown exceptions
/// out of the context.
fn describe_js_error(ctx: &Ctx<'_>, error: &rquickjs::Error) -> String {
    if matches!(error, rquickjs::Error::Exception) {
        let caught = ctx.catch();
        if let Some(exception) = caught.as_exception() {
            return exception
                .message()
                .unwrap_or_else(|| "uncaught exception".to_string());
        }
        if let Some(message) = caught.as_string().and_then(|s| s.to_string().ok()) {
            return message;
        }
    }
    error.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    fn parse(source: &str) -> Result<Config, ConfigError> {
        parse_ts_config(source, Path::new("/repo/worktree.config.ts"))
    }

    #[test]
    fn test_load_ts_config_from_file() {
        let dir = Builder::new().prefix("worktree-test").tempdir().unwrap();
        let path = dir.path().join("worktree.config.ts");
        fs::write(
            &path,
            r#"
interface Mapping { source: string; target: string }

const templates: Mapping[] = [{ source: ".env.example", target: ".env" }];

export default {
    description: "Test TS config",
    symlinks: ["data/cache"],
    copyUnstaged: true,
    templates,
};
"#,
        )
        .unwrap();

        let config = load_ts_config(&path).unwrap();

        assert_eq!(config.description, "Test TS config");
        assert_eq!(config.symlinks, vec!["data/cache"]);
        assert!(config.copy_unstaged);
        assert_eq!(config.templates.len(), 1);
        assert_eq!(config.templates[0].target, ".env");
    }

    #[test]
    fn test_define_config_helper() {
        let config = parse(
            r#"
import type { WorktreeConfig } from "worktree-setup";
import { defineConfig } from "worktree-setup";

const config: WorktreeConfig = defineConfig({
    description: "With helper",
    postSetup: ["bun install", "bun run build"],
});

export default config;
"#,
        )
        .unwrap();

        assert_eq!(config.description, "With helper");
        assert_eq!(config.post_setup, vec!["bun install", "bun run build"]);
    }

    #[test]
    fn test_named_exports_without_default() {
        let config = parse(
            r#"
export const description = "Named";
export const copy = [".env"];
"#,
        )
        .unwrap();

        assert_eq!(config.description, "Named");
        assert_eq!(config.copy, vec![".env"]);
    }

    #[test]
    fn test_non_object_export_is_invalid() {
        let err = parse(r#"export default ["not", "an", "object"];"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig { .. }));
    }

    #[test]
    fn test_thrown_error_is_reported() {
        let err = parse(r#"throw new Error("boom"); export default {};"#).unwrap_err();
        match err {
            ConfigError::TypeScriptEvalError { message, .. } => assert!(message.contains("boom")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_filesystem_modules() {
        let err = parse(
            r#"
import { readFileSync } from "fs";
export default { description: readFileSync("/etc/passwd", "utf8") };
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::TypeScriptEvalError { .. }));
    }
}
