pub mod build;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod walk;

pub use build::{BuildReport, BuildRequest, BuildTool, Esbuild};
pub use config::TsmjsConfig;
pub use error::TsmjsError;
pub use pipeline::run;
