// src/exec/args.rs

//! Argument builder: command definition + request params → command line.
//!
//! Pure and deterministic; no I/O, no locking. Callers pass a secret table
//! snapshot they already hold.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::catalog::{CommandDefinition, ParameterSpec};
use crate::errors::{KanameError, Result};
use crate::secrets::SecretTable;
use crate::types::{ParamType, ScriptType};

/// Where the interpreters for each [`ScriptType`] live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreters {
    pub bash: PathBuf,
    pub python_venv: PathBuf,
}

impl Interpreters {
    pub fn new(bash: impl Into<PathBuf>, python_venv: impl Into<PathBuf>) -> Self {
        Self {
            bash: bash.into(),
            python_venv: python_venv.into(),
        }
    }

    /// Executable for `script_type`, or `UnsupportedScriptType`.
    pub fn resolve(&self, script_type: &ScriptType) -> Result<PathBuf> {
        match script_type {
            ScriptType::Bash => Ok(self.bash.clone()),
            ScriptType::Python => Ok(self.python_venv.join("bin").join("python")),
            ScriptType::Other(other) => Err(KanameError::UnsupportedScriptType(other.clone())),
        }
    }
}

impl Default for Interpreters {
    fn default() -> Self {
        Self::new("/bin/bash", "../scripts-dump/venv")
    }
}

/// A fully resolved command line: `<executable> <args...>`.
///
/// `args[0]` is always the script path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub executable: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn script_path(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Build the command line for `def` from the caller's `params`.
///
/// Parameters are emitted in definition order. Parameters missing from
/// `params` are skipped, required or not.
pub fn build_invocation(
    def: &CommandDefinition,
    params: &HashMap<String, String>,
    secrets: &SecretTable,
    interpreters: &Interpreters,
) -> Result<Invocation> {
    let executable = interpreters.resolve(&def.script_type)?;

    let mut args = vec![def.script_path.clone()];
    for spec in &def.parameters {
        if let Some(raw) = params.get(&spec.name) {
            let value = substitute_secret(raw, secrets);
            push_param(&mut args, spec, value);
        }
    }

    Ok(Invocation { executable, args })
}

/// `$NAME` → secret value when `NAME` is known; anything else is returned
/// unchanged, including an unknown `$NAME`.
pub fn substitute_secret<'a>(raw: &'a str, secrets: &'a SecretTable) -> &'a str {
    raw.strip_prefix('$')
        .and_then(|name| secrets.get(name))
        .unwrap_or(raw)
}

fn push_param(args: &mut Vec<String>, spec: &ParameterSpec, value: &str) {
    match spec.param_type {
        ParamType::Checkbox => {
            if value == "true" {
                args.push(spec.name.clone());
            }
        }
        ParamType::List => {
            if !value.is_empty() {
                args.push(spec.name.clone());
                // Empty pieces ("a,,b") stay as empty arguments.
                args.extend(value.split(',').map(|piece| piece.trim().to_string()));
            }
        }
        ParamType::Text | ParamType::Other(_) => {
            if !value.is_empty() {
                args.push(spec.name.clone());
                args.push(value.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, param_type: ParamType) -> ParameterSpec {
        ParameterSpec {
            name: name.to_string(),
            label: name.trim_start_matches('-').to_string(),
            param_type,
            required: false,
            options: Vec::new(),
            default: None,
        }
    }

    fn def(script_type: ScriptType, parameters: Vec<ParameterSpec>) -> CommandDefinition {
        CommandDefinition {
            id: "cmd".to_string(),
            name: "Cmd".to_string(),
            description: String::new(),
            script_path: "/scripts/run.sh".to_string(),
            script_type,
            parameters,
            icon: String::new(),
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build(d: &CommandDefinition, p: &HashMap<String, String>, s: &SecretTable) -> Invocation {
        build_invocation(d, p, s, &Interpreters::new("/bin/bash", "/venv")).unwrap()
    }

    #[test]
    fn list_param_is_split_and_trimmed() {
        let d = def(ScriptType::Bash, vec![param("--files", ParamType::List)]);
        let inv = build(&d, &params(&[("--files", "a.txt, b.txt")]), &SecretTable::default());

        assert_eq!(inv.executable, PathBuf::from("/bin/bash"));
        assert_eq!(inv.args, vec!["/scripts/run.sh", "--files", "a.txt", "b.txt"]);
    }

    #[test]
    fn list_param_keeps_empty_pieces() {
        let d = def(ScriptType::Bash, vec![param("--files", ParamType::List)]);
        let inv = build(&d, &params(&[("--files", "a,, b,")]), &SecretTable::default());

        assert_eq!(inv.args, vec!["/scripts/run.sh", "--files", "a", "", "b", ""]);
    }

    #[test]
    fn checkbox_only_emits_flag_for_true() {
        let d = def(ScriptType::Bash, vec![param("--verbose", ParamType::Checkbox)]);
        let none = SecretTable::default();

        let on = build(&d, &params(&[("--verbose", "true")]), &none);
        assert_eq!(on.args, vec!["/scripts/run.sh", "--verbose"]);

        let off = build(&d, &params(&[("--verbose", "false")]), &none);
        assert_eq!(off.args, vec!["/scripts/run.sh"]);

        let absent = build(&d, &params(&[]), &none);
        assert_eq!(absent.args, vec!["/scripts/run.sh"]);

        let upper = build(&d, &params(&[("--verbose", "TRUE")]), &none);
        assert_eq!(upper.args, vec!["/scripts/run.sh"]);
    }

    #[test]
    fn secret_reference_is_substituted() {
        let d = def(ScriptType::Bash, vec![param("--key", ParamType::Text)]);
        let secrets: SecretTable = [("API_KEY", "xyz")].into_iter().collect();

        let inv = build(&d, &params(&[("--key", "$API_KEY")]), &secrets);
        assert_eq!(inv.args, vec!["/scripts/run.sh", "--key", "xyz"]);
    }

    #[test]
    fn unknown_secret_reference_stays_literal() {
        let d = def(ScriptType::Bash, vec![param("--key", ParamType::Text)]);

        let inv = build(&d, &params(&[("--key", "$API_KEY")]), &SecretTable::default());
        assert_eq!(inv.args, vec!["/scripts/run.sh", "--key", "$API_KEY"]);
    }

    #[test]
    fn secret_can_drive_checkbox_and_list() {
        let d = def(
            ScriptType::Bash,
            vec![param("--dry", ParamType::Checkbox), param("--hosts", ParamType::List)],
        );
        let secrets: SecretTable = [("DRY", "true"), ("HOSTS", "h1 , h2")].into_iter().collect();

        let inv = build(&d, &params(&[("--dry", "$DRY"), ("--hosts", "$HOSTS")]), &secrets);
        assert_eq!(inv.args, vec!["/scripts/run.sh", "--dry", "--hosts", "h1", "h2"]);
    }

    #[test]
    fn empty_text_is_skipped_and_unknown_types_behave_as_text() {
        let d = def(
            ScriptType::Bash,
            vec![
                param("--name", ParamType::Text),
                param("--mode", ParamType::Other("select".to_string())),
            ],
        );
        let inv = build(
            &d,
            &params(&[("--name", ""), ("--mode", "fast")]),
            &SecretTable::default(),
        );
        assert_eq!(inv.args, vec!["/scripts/run.sh", "--mode", "fast"]);
    }

    #[test]
    fn params_follow_definition_order_not_request_order() {
        let d = def(
            ScriptType::Bash,
            vec![param("--b", ParamType::Text), param("--a", ParamType::Text)],
        );
        let inv = build(&d, &params(&[("--a", "1"), ("--b", "2")]), &SecretTable::default());
        assert_eq!(inv.args, vec!["/scripts/run.sh", "--b", "2", "--a", "1"]);
    }

    #[test]
    fn unlisted_request_params_are_ignored() {
        let d = def(ScriptType::Bash, vec![]);
        let inv = build(&d, &params(&[("--evil", "rm -rf")]), &SecretTable::default());
        assert_eq!(inv.args, vec!["/scripts/run.sh"]);
    }

    #[test]
    fn missing_required_param_is_not_validated_here() {
        let mut p = param("--target", ParamType::Text);
        p.required = true;
        let d = def(ScriptType::Bash, vec![p]);

        let inv = build(&d, &params(&[]), &SecretTable::default());
        assert_eq!(inv.args, vec!["/scripts/run.sh"]);
    }

    #[test]
    fn python_uses_venv_interpreter() {
        let d = def(ScriptType::Python, vec![]);
        let inv = build(&d, &params(&[]), &SecretTable::default());
        assert_eq!(inv.executable, PathBuf::from("/venv/bin/python"));
        assert_eq!(inv.script_path(), Some("/scripts/run.sh"));
    }

    #[test]
    fn unknown_script_type_is_rejected() {
        let d = def(ScriptType::Other("ruby".to_string()), vec![]);
        let err = build_invocation(&d, &params(&[]), &SecretTable::default(), &Interpreters::default())
            .unwrap_err();
        assert!(matches!(err, KanameError::UnsupportedScriptType(ref t) if t == "ruby"));
    }
}
