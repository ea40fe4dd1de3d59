use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.tsmjs.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TsmjsConfig {
    /// Root of the TypeScript source tree.
    pub src_dir: PathBuf,
    /// Directory the compiled modules and sourcemaps are written to.
    pub out_dir: PathBuf,
    pub build: BuildOptions,
    pub esbuild: EsbuildConfig,
}

impl Default for TsmjsConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("src/ts"),
            out_dir: PathBuf::from("lib/mjs"),
            build: BuildOptions::default(),
            esbuild: EsbuildConfig::default(),
        }
    }
}

/// Compiler options sent with every build request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Inline imported modules into the output. Off: every file compiles on its own.
    pub bundle: bool,
    pub sourcemap: bool,
    pub format: ModuleFormat,
    /// Language level of the emitted code, e.g. `esnext` or `es2022`.
    pub target: String,
    /// When set, outputs mirror the source tree relative to this directory.
    pub outbase: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            bundle: false,
            sourcemap: true,
            format: ModuleFormat::Esm,
            target: "esnext".to_string(),
            outbase: None,
        }
    }
}

/// Output module format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleFormat {
    #[default]
    Esm,
    Cjs,
    Iife,
}

impl ModuleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::Esm => "esm",
            ModuleFormat::Cjs => "cjs",
            ModuleFormat::Iife => "iife",
        }
    }
}

/// Which esbuild executable to run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EsbuildConfig {
    pub program: PathBuf,
    /// Appended verbatim after the generated flags.
    pub extra_args: Vec<String>,
}

impl Default for EsbuildConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("esbuild"),
            extra_args: Vec::new(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".tsmjs.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<TsmjsConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# tsmjs configuration
src_dir: src/ts
out_dir: lib/mjs

build:
  bundle: false         # compile every file on its own
  sourcemap: true
  format: esm           # esm | cjs | iife
  target: esnext
  # outbase: src/ts     # mirror the source tree under out_dir

esbuild:
  program: esbuild
  extra_args: []
    # - --log-level=warning
"#
}
