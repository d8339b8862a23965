//! Implementation of `gantry add api` and `gantry update api`.
//!
//! Both push a project (or a single swagger file) into the cluster as
//! configuration objects plus one API custom resource. `update` replaces
//! existing objects and stamps the manifest so the operator reconciles.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use gantry_adapters::{
    EmbeddedAssets, ExecutorCall, KubectlExecutor, LocalFilesystem, RecordingExecutor,
};
use gantry_core::{
    application::{ResourceSynchronizer, SyncReport, SyncRequest, ports::ClusterExecutor},
    domain::ConfigMode,
};

use crate::{
    cli::{ApiArgs, ResourceCommands},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Add,
    Update,
}

impl Action {
    fn mode(self) -> ConfigMode {
        match self {
            Self::Add => ConfigMode::Create,
            Self::Update => ConfigMode::Update,
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Self::Add => "added",
            Self::Update => "updated",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Report printed in JSON mode.
#[derive(Debug, Serialize)]
struct SyncSummary<'a> {
    action: Action,
    name: &'a str,
    namespace: &'a str,
    dry_run: bool,
    config_objects: Vec<&'a str>,
    manifest: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    calls: Vec<ExecutorCall>,
}

#[instrument(skip_all, fields(action = %action))]
pub fn execute(
    cmd: ResourceCommands,
    action: Action,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ResourceCommands::Api(args) => sync_api(args, action, &config, &output),
    }
}

fn sync_api(
    args: ApiArgs,
    action: Action,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let request = build_request(&args, action, config);

    // Dry runs keep a handle on the recorder to report what would be sent.
    let recorder = args.dry_run.then(RecordingExecutor::new);
    let executor: Box<dyn ClusterExecutor> = match &recorder {
        Some(recorder) => Box::new(recorder.clone()),
        None => Box::new(KubectlExecutor::new(config.cluster.kubectl.clone())),
    };

    let synchronizer = ResourceSynchronizer::new(
        Box::new(EmbeddedAssets::new()),
        Box::new(LocalFilesystem::new()),
        executor,
    );
    let report = synchronizer
        .synchronize(&request, &args.from_file)
        .with_cli_context(|| format!("synchronizing '{}'", request.name))?;

    info!(
        api = %request.name,
        objects = report.config_objects().count(),
        dry_run = args.dry_run,
        "API synchronized"
    );

    let calls = recorder.map(|r| r.calls());
    render(&request, action, &report, calls, output)
}

fn build_request(args: &ApiArgs, action: Action, config: &AppConfig) -> SyncRequest {
    let namespace = args
        .namespace
        .clone()
        .unwrap_or_else(|| config.cluster.namespace.clone());

    SyncRequest {
        replicas: args.replicas.unwrap_or(config.cluster.replicas),
        override_existing: args.override_existing,
        update_timestamp: (action == Action::Update)
            .then(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        mode: action.mode(),
        ..SyncRequest::new(args.name.clone(), namespace)
    }
}

fn render(
    request: &SyncRequest,
    action: Action,
    report: &SyncReport,
    calls: Option<Vec<ExecutorCall>>,
    output: &OutputManager,
) -> CliResult<()> {
    let dry_run = calls.is_some();

    if output.is_json() {
        output.json(&SyncSummary {
            action,
            name: request.name.as_str(),
            namespace: &request.namespace,
            dry_run,
            config_objects: report.config_objects().collect(),
            manifest: &report.manifest,
            calls: calls.unwrap_or_default(),
        })?;
        return Ok(());
    }

    if dry_run {
        output.header(&format!(
            "Dry run: would {action} API '{}' in namespace '{}'",
            request.name, request.namespace
        ))?;
    } else {
        output.success(&format!(
            "API '{}' {} in namespace '{}'",
            request.name,
            action.past_tense(),
            request.namespace
        ))?;
    }

    output.info("Configuration objects:")?;
    for name in report.config_objects() {
        output.bullet(name)?;
    }

    if dry_run {
        output.print("")?;
        output.document(&report.manifest)?;
    }

    Ok(())
}
