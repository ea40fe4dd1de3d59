use std::fmt;
use std::path::PathBuf;

/// How a single build ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    Succeeded,
    /// The tool ran and exited non-zero. `code` is `None` when it was killed by a signal.
    Failed { code: Option<i32>, stderr: String },
    /// The tool could not be started or waited on.
    ToolError { message: String },
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStatus::Succeeded => write!(f, "ok"),
            BuildStatus::Failed {
                code: Some(code), ..
            } => write!(f, "exited with status {code}"),
            BuildStatus::Failed { code: None, .. } => write!(f, "terminated by signal"),
            BuildStatus::ToolError { message } => write!(f, "{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub entry_point: PathBuf,
    pub status: BuildStatus,
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        self.status == BuildStatus::Succeeded
    }
}

/// Outcomes of every dispatched build, in dispatch order.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    outcomes: Vec<BuildOutcome>,
}

impl BuildReport {
    pub fn new(outcomes: Vec<BuildOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[BuildOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &BuildOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &BuildOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// True when every build succeeded, including when nothing was built.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(BuildOutcome::is_success)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
