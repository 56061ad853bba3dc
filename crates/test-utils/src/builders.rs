#![allow(dead_code)]

use kaname::catalog::{CommandDefinition, ParameterSpec};
use kaname::types::{ParamType, ScriptType};

/// Builder for `CommandDefinition` to simplify test setup.
pub struct CommandBuilder {
    def: CommandDefinition,
}

impl CommandBuilder {
    /// A bash command `id` running `script_path`.
    pub fn new(id: &str, script_path: &str) -> Self {
        Self {
            def: CommandDefinition {
                id: id.to_string(),
                name: format!("{id} command"),
                description: String::new(),
                script_path: script_path.to_string(),
                script_type: ScriptType::Bash,
                parameters: vec![],
                icon: String::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.def.name = name.to_string();
        self
    }

    pub fn script_type(mut self, script_type: ScriptType) -> Self {
        self.def.script_type = script_type;
        self
    }

    pub fn param(mut self, param: ParameterSpec) -> Self {
        self.def.parameters.push(param);
        self
    }

    pub fn build(self) -> CommandDefinition {
        self.def
    }
}

/// Builder for `ParameterSpec`.
pub struct ParamBuilder {
    param: ParameterSpec,
}

impl ParamBuilder {
    pub fn new(name: &str, param_type: ParamType) -> Self {
        Self {
            param: ParameterSpec {
                name: name.to_string(),
                label: name.trim_start_matches('-').to_string(),
                param_type,
                required: false,
                options: vec![],
                default: None,
            },
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, ParamType::Text)
    }

    pub fn checkbox(name: &str) -> Self {
        Self::new(name, ParamType::Checkbox)
    }

    pub fn list(name: &str) -> Self {
        Self::new(name, ParamType::List)
    }

    pub fn required(mut self, val: bool) -> Self {
        self.param.required = val;
        self
    }

    pub fn option(mut self, opt: &str) -> Self {
        self.param.options.push(opt.to_string());
        self
    }

    pub fn default_value(mut self, val: serde_json::Value) -> Self {
        self.param.default = Some(val);
        self
    }

    pub fn build(self) -> ParameterSpec {
        self.param
    }
}
