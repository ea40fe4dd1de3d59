use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::config::EsbuildConfig;

use super::{BuildRequest, BuildTool};

/// The esbuild command-line compiler.
#[derive(Debug, Clone)]
pub struct Esbuild {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl Esbuild {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn from_config(config: &EsbuildConfig) -> Self {
        Self {
            program: config.program.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// Arguments passed to esbuild for `request`, entry point first.
    pub fn args(&self, request: &BuildRequest) -> Vec<OsString> {
        let options = &request.options;
        let mut args: Vec<OsString> = vec![request.entry_point.clone().into()];

        if options.bundle {
            args.push("--bundle".into());
        }
        if options.sourcemap {
            args.push("--sourcemap".into());
        }
        args.push(format!("--format={}", options.format.as_str()).into());
        args.push(format!("--target={}", options.target).into());

        let mut outdir = OsString::from("--outdir=");
        outdir.push(&request.out_dir);
        args.push(outdir);

        if let Some(ref outbase) = options.outbase {
            let mut flag = OsString::from("--outbase=");
            flag.push(outbase);
            args.push(flag);
        }

        args.extend(self.extra_args.iter().map(OsString::from));
        args
    }
}

impl Default for Esbuild {
    fn default() -> Self {
        Self::from_config(&EsbuildConfig::default())
    }
}

impl BuildTool for Esbuild {
    fn name(&self) -> &str {
        "esbuild"
    }

    fn command(&self, request: &BuildRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(request));
        cmd
    }
}
