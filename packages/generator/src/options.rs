use serde::{Deserialize, Serialize};

pub const DEFAULT_OUT_PKG: &str = "reinforced";
pub const DEFAULT_HEADER: &str = "Code generated by reinforcer, DO NOT EDIT.";

/// Configuration options for a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    /// Package name of the generated code
    #[serde(default = "default_out_pkg")]
    pub out_pkg: String,

    /// Emit plain pass-through calls for methods that don't return an error
    /// instead of routing them through the runner
    #[serde(default)]
    pub ignore_no_return_methods: bool,

    /// Comment placed at the top of every generated file
    #[serde(default = "default_header")]
    pub header: String,

    /// Runner type returned by the generated runner factory
    #[serde(default)]
    pub runner: RunnerRef,
}

fn default_out_pkg() -> String {
    DEFAULT_OUT_PKG.to_string()
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_pkg: default_out_pkg(),
            ignore_no_return_methods: false,
            header: default_header(),
            runner: RunnerRef::default(),
        }
    }
}

impl GenerateOptions {
    /// Options generating into `out_pkg` with everything else defaulted
    pub fn with_out_pkg(out_pkg: impl Into<String>) -> Self {
        Self {
            out_pkg: out_pkg.into(),
            ..Default::default()
        }
    }

    /// Same options with no-return methods passed straight through
    pub fn ignoring_no_return_methods(self) -> Self {
        Self {
            ignore_no_return_methods: true,
            ..self
        }
    }
}

/// Package-qualified reference to the external runner type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerRef {
    pub path: String,
    pub name: String,
}

impl Default for RunnerRef {
    fn default() -> Self {
        Self {
            path: "github.com/slok/goresilience".to_string(),
            name: "Runner".to_string(),
        }
    }
}
