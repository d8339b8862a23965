//! `kubectl`-backed cluster executor.
//!
//! Creates are plain `kubectl create configmap`. Updates render the same
//! configmap with `--dry-run=client -o yaml` and pipe it into
//! `kubectl apply -f -`, which creates or replaces it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::{debug, instrument};

use gantry_core::{
    application::{ApplicationError, ports::ClusterExecutor},
    domain::ConfigMode,
    error::GantryResult,
};

/// Runs an external program to completion.
///
/// Abstracted so the argument lists can be tested without a cluster.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &Path, args: &[String], stdin: Option<&[u8]>)
    -> std::io::Result<Output>;
}

/// Standard runner using `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> std::io::Result<Output> {
        let mut command = Command::new(program);
        command.args(args);

        let Some(input) = stdin else {
            return command.output();
        };

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut pipe) = child.stdin.take() {
            pipe.write_all(input)?;
        }
        child.wait_with_output()
    }
}

/// Cluster executor shelling out to `kubectl`.
#[derive(Debug, Clone)]
pub struct KubectlExecutor<R = ShellRunner> {
    program: PathBuf,
    runner: R,
}

impl KubectlExecutor<ShellRunner> {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self::with_runner(program, ShellRunner)
    }
}

impl Default for KubectlExecutor<ShellRunner> {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

impl<R: CommandRunner> KubectlExecutor<R> {
    pub fn with_runner(program: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Run one command, returning stdout on success.
    fn run(&self, args: Vec<String>, stdin: Option<&[u8]>) -> GantryResult<Vec<u8>> {
        let command = format!("{} {}", self.program.display(), args.join(" "));
        debug!(%command, "Running");

        let output = self
            .runner
            .run(&self.program, &args, stdin)
            .map_err(|e| ApplicationError::CommandFailed {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            let reason = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(ApplicationError::CommandFailed { command, reason }.into());
        }
        Ok(output.stdout)
    }
}

fn create_configmap_args(name: &str, namespace: &str, source: &Path) -> Vec<String> {
    vec![
        "create".into(),
        "configmap".into(),
        name.into(),
        format!("--from-file={}", source.display()),
        "-n".into(),
        namespace.into(),
    ]
}

impl<R: CommandRunner> ClusterExecutor for KubectlExecutor<R> {
    #[instrument(skip(self, source), fields(source = %source.display()))]
    fn create_or_update_config(
        &self,
        name: &str,
        namespace: &str,
        source: &Path,
        mode: ConfigMode,
    ) -> GantryResult<()> {
        let mut args = create_configmap_args(name, namespace, source);
        match mode {
            ConfigMode::Create => {
                self.run(args, None)?;
            }
            ConfigMode::Update => {
                args.extend(["--dry-run=client".into(), "-o".into(), "yaml".into()]);
                let rendered = self.run(args, None)?;
                let apply = vec![
                    "apply".into(),
                    "-f".into(),
                    "-".into(),
                    "-n".into(),
                    namespace.into(),
                ];
                self.run(apply, Some(&rendered))?;
            }
        }
        Ok(())
    }

    #[instrument(skip(self, manifest), fields(manifest = %manifest.display()))]
    fn apply_resource(&self, namespace: &str, manifest: &Path) -> GantryResult<()> {
        let args = vec![
            "apply".into(),
            "-f".into(),
            manifest.display().to_string(),
            "-n".into(),
            namespace.into(),
        ];
        self.run(args, None).map(|_| ())
    }
}
