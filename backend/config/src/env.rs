//! Environment variable substitution for config values.
//!
//! `${VAR_NAME}` in any string value is replaced at load time. Only uppercase
//! `[A-Z_][A-Z0-9_]*` names are matched. `$${VAR}` escapes to a literal
//! `${VAR}`.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

/// A reference, optionally preceded by the `$` escape.
static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references throughout a config value tree.
/// Unset or empty variables are an error.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute using a provided variable map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    Ok(substitute_value(value, env, "")?)
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<String> = None;
    let out = ENV_REF.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var_name) => Err(MissingEnvVarError {
            var_name,
            config_path: path.to_string(),
        }),
        None => Ok(out.into_owned()),
    }
}

/// All variable names referenced in a value tree, sorted and deduplicated.
/// Escaped references are not included.
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.extend(
            ENV_REF
                .captures_iter(s)
                .filter(|caps| caps[1].is_empty())
                .map(|caps| caps[2].to_string()),
        ),
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_token() {
        let v = json!({ "authToken": "${DISCORD_TOKEN}" });
        let result = resolve_env_vars_with(&v, &env(&[("DISCORD_TOKEN", "abc.def")])).unwrap();
        assert_eq!(result["authToken"], "abc.def");
    }

    #[test]
    fn substitutes_inside_text_and_nested() {
        let v = json!({ "logging": { "dir": "${HOME_DIR}/logs" } });
        let result = resolve_env_vars_with(&v, &env(&[("HOME_DIR", "/srv")])).unwrap();
        assert_eq!(result["logging"]["dir"], "/srv/logs");
    }

    #[test]
    fn missing_or_empty_var_names_path() {
        let v = json!({ "logging": { "dir": "${NOPE}" } });
        let err = resolve_env_vars_with(&v, &env(&[])).unwrap_err().to_string();
        assert!(err.contains("NOPE"));
        assert!(err.contains("logging.dir"));

        let v = json!({ "authToken": "${EMPTY}" });
        assert!(resolve_env_vars_with(&v, &env(&[("EMPTY", "")])).is_err());
    }

    #[test]
    fn escape_keeps_literal_reference() {
        let v = json!({ "logPrefix": "$${NOT_A_VAR} and ${REAL}" });
        let result = resolve_env_vars_with(&v, &env(&[("REAL", "x")])).unwrap();
        assert_eq!(result["logPrefix"], "${NOT_A_VAR} and x");
    }

    #[test]
    fn non_strings_and_lowercase_pass_through() {
        let v = json!({ "authorizedSenderId": 42, "commandPrefix": "${lower}" });
        let result = resolve_env_vars_with(&v, &env(&[])).unwrap();
        assert_eq!(result, v);
    }

    #[test]
    fn collects_unescaped_references() {
        let v = json!({ "a": "${FOO}", "b": { "c": ["${BAR}", "$${BAZ}", "${FOO}"] } });
        assert_eq!(collect_referenced_vars(&v), vec!["BAR", "FOO"]);
    }
}
