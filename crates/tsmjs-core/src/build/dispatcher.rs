use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};

use log::{debug, info, warn};

use crate::config::BuildOptions;

use super::{BuildOutcome, BuildReport, BuildRequest, BuildStatus, BuildTool};

// errno values shared by Linux and the BSDs.
const ENFILE: i32 = 23;
const EMFILE: i32 = 24;

/// A build whose process is still running. `slot` is its dispatch index.
struct Running {
    slot: usize,
    entry_point: PathBuf,
    child: Child,
}

/// Starts one tool process per file as soon as it is dispatched and keeps
/// them all until [`Dispatcher::finish`] joins them.
///
/// Builds run concurrently with no fixed limit and share only the output
/// directory. When the system refuses another process or pipe, the oldest
/// running build is joined and the spawn retried, so running out of
/// descriptors never fails a file. A build that fails does not stop the
/// others.
pub struct Dispatcher<T> {
    tool: T,
    out_dir: PathBuf,
    options: BuildOptions,
    running: VecDeque<Running>,
    outcomes: Vec<Option<BuildOutcome>>,
}

impl<T: BuildTool> Dispatcher<T> {
    pub fn new(tool: T, out_dir: impl Into<PathBuf>, options: BuildOptions) -> Self {
        Self {
            tool,
            out_dir: out_dir.into(),
            options,
            running: VecDeque::new(),
            outcomes: Vec::new(),
        }
    }

    /// Number of builds dispatched so far.
    pub fn dispatched(&self) -> usize {
        self.outcomes.len()
    }

    /// Start compiling `entry_point`. Returns without waiting for the tool,
    /// unless earlier builds must be joined to free resources first.
    pub fn dispatch(&mut self, entry_point: &Path) {
        let request = BuildRequest {
            entry_point: entry_point.to_path_buf(),
            out_dir: self.out_dir.clone(),
            options: self.options.clone(),
        };
        debug!(
            "dispatching {} to {}",
            request.entry_point.display(),
            self.tool.name()
        );

        let slot = self.outcomes.len();
        self.outcomes.push(None);

        loop {
            // Artifacts go to the output directory; only diagnostics are kept.
            let spawned = self
                .tool
                .command(&request)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn();

            match spawned {
                Ok(child) => {
                    self.running.push_back(Running {
                        slot,
                        entry_point: request.entry_point,
                        child,
                    });
                    return;
                }
                Err(e) if is_resource_exhausted(&e) && self.join_oldest() => {
                    debug!(
                        "{} while starting {}, joined oldest build",
                        e,
                        request.entry_point.display()
                    );
                }
                Err(e) => {
                    self.outcomes[slot] = Some(BuildOutcome {
                        entry_point: request.entry_point,
                        status: BuildStatus::ToolError {
                            message: format!("failed to start {}: {}", self.tool.name(), e),
                        },
                    });
                    return;
                }
            }
        }
    }

    /// Wait for the longest-running build. Returns `false` if none is running.
    fn join_oldest(&mut self) -> bool {
        let Some(running) = self.running.pop_front() else {
            return false;
        };
        let slot = running.slot;
        self.outcomes[slot] = Some(join(running));
        true
    }

    /// Wait for every dispatched build and collect the outcomes.
    pub fn finish(mut self) -> BuildReport {
        while self.join_oldest() {}
        let outcomes: Vec<BuildOutcome> = self.outcomes.into_iter().flatten().collect();

        for outcome in outcomes.iter().filter(|o| !o.is_success()) {
            warn!(
                "build failed for {}: {}",
                outcome.entry_point.display(),
                outcome.status
            );
        }

        let report = BuildReport::new(outcomes);
        info!(
            "{} of {} builds succeeded",
            report.succeeded().count(),
            report.len()
        );
        report
    }
}

/// Whether a spawn failed for lack of descriptors or processes rather than
/// because the tool itself is unusable.
fn is_resource_exhausted(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || (cfg!(unix) && matches!(e.raw_os_error(), Some(EMFILE | ENFILE)))
}

fn join(running: Running) -> BuildOutcome {
    let status = match running.child.wait_with_output() {
        Ok(output) if output.status.success() => BuildStatus::Succeeded,
        Ok(output) => BuildStatus::Failed {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        },
        Err(e) => BuildStatus::ToolError {
            message: format!("failed to wait for build: {e}"),
        },
    };
    BuildOutcome {
        entry_point: running.entry_point,
        status,
    }
}
