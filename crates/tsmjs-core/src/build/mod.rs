//! Per-file compile requests and the tool that serves them.

pub mod dispatcher;
pub mod esbuild;
pub mod report;

use std::path::PathBuf;
use std::process::Command;

use crate::config::BuildOptions;

pub use dispatcher::Dispatcher;
pub use esbuild::Esbuild;
pub use report::{BuildOutcome, BuildReport, BuildStatus};

/// One compile of one entry point. Created per matched file and handed
/// straight to the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub entry_point: PathBuf,
    pub out_dir: PathBuf,
    pub options: BuildOptions,
}

/// An external compiler that turns a [`BuildRequest`] into a process.
///
/// The tool owns output naming, directory layout and sourcemap emission.
/// A zero exit status means the file compiled.
pub trait BuildTool {
    fn name(&self) -> &str;
    fn command(&self, request: &BuildRequest) -> Command;
}
