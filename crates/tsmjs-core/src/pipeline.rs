use std::fs;

use log::{debug, info};

use crate::build::{BuildReport, BuildTool, Dispatcher};
use crate::config::TsmjsConfig;
use crate::error::{TsmjsError, WalkError};
use crate::walk;

/// Compile every source under `config.src_dir` into `config.out_dir`.
///
/// The source root is checked first, so a bad root leaves nothing behind.
/// The output directory is created before the first build is started. Every
/// dispatched build is joined even if the walk fails part way; the walk error
/// is returned after that. Compile failures do not make this return `Err`,
/// they are in the report.
pub fn run<T: BuildTool>(config: &TsmjsConfig, tool: T) -> Result<BuildReport, TsmjsError> {
    let root = fs::metadata(&config.src_dir).map_err(|source| TsmjsError::SourceDir {
        path: config.src_dir.clone(),
        source,
    })?;
    if !root.is_dir() {
        return Err(WalkError::NotADirectory(config.src_dir.clone()).into());
    }

    fs::create_dir_all(&config.out_dir).map_err(|source| TsmjsError::OutputDir {
        path: config.out_dir.clone(),
        source,
    })?;

    info!(
        "building {} -> {}",
        config.src_dir.display(),
        config.out_dir.display()
    );

    let mut dispatcher = Dispatcher::new(tool, config.out_dir.clone(), config.build.clone());
    let walked = walk::walk(&config.src_dir, |path| dispatcher.dispatch(path));
    debug!("dispatched {} builds", dispatcher.dispatched());
    let report = dispatcher.finish();

    walked?;
    Ok(report)
}
