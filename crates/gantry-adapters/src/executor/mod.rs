//! Cluster executor adapters.

mod kubectl;
mod recording;

pub use kubectl::{CommandRunner, KubectlExecutor, ShellRunner};
pub use recording::{ExecutorCall, RecordingExecutor};
