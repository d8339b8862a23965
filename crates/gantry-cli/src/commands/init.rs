//! Implementation of the `gantry init` command.
//!
//! Resolves the API definition (baseline, OpenAPI, overrides, initial
//! state) and lays the project out on disk.

use serde::Serialize;
use tracing::{info, instrument};

use gantry_adapters::{DocumentLoader, EmbeddedAssets, LocalFilesystem, ProcessEnvironment};
use gantry_core::application::{
    DefinitionResolver, ResolveRequest, ResolvedDefinition, ScaffoldRequest, ScaffoldService,
};

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Summary printed in JSON mode.
#[derive(Debug, Serialize)]
struct InitSummary<'a> {
    path: String,
    status: String,
    context: &'a str,
    spec_version: Option<String>,
    files: Vec<String>,
}

/// Execute the `gantry init` command.
///
/// The target is checked before anything is resolved, so a bad path fails
/// before any document is fetched.
#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(args: InitArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let scaffolder = ScaffoldService::new(
        Box::new(EmbeddedAssets::new()),
        Box::new(LocalFilesystem::new()),
    );
    scaffolder
        .check_target(&args.path, args.force)
        .with_cli_context(|| "checking project path")?;

    let resolver = DefinitionResolver::new(
        Box::new(EmbeddedAssets::new()),
        Box::new(DocumentLoader::new()),
        Box::new(ProcessEnvironment),
    );
    let resolved = resolver
        .resolve(&ResolveRequest {
            spec_source: args.oas.clone(),
            override_path: args.definition.clone(),
            initial_state: args.initial_state,
        })
        .with_cli_context(|| "resolving API definition")?;

    let ResolvedDefinition {
        definition,
        swagger_yaml,
        spec_version,
    } = resolved;

    output.header(&format!("Initialising '{}'...", args.path.display()))?;
    if args.force && args.path.exists() {
        output.warning("Writing into an existing directory; existing files may be replaced")?;
    }
    let structure = scaffolder
        .scaffold(&ScaffoldRequest {
            root: args.path.clone(),
            definition: definition.clone(),
            swagger_yaml,
            environments: config.environments.clone(),
            force: args.force,
        })
        .with_cli_context(|| "writing project")?;

    info!(entries = structure.entry_count(), "Project initialised");

    let files: Vec<String> = structure
        .files()
        .map(|f| f.path.display().to_string())
        .collect();

    if output.is_json() {
        output.json(&InitSummary {
            path: args.path.display().to_string(),
            status: definition.status.to_string(),
            context: &definition.context,
            spec_version: spec_version.map(|v| v.to_string()),
            files,
        })?;
        return Ok(());
    }

    output.success(&format!("Project initialised at {}", args.path.display()))?;
    match (&args.oas, spec_version) {
        (Some(source), Some(version)) => {
            output.info(&format!("Imported {version} document from {source}"))?
        }
        _ => output.info("Started from the default swagger document")?,
    }
    output.info(&format!("Lifecycle status: {}", definition.status))?;
    for file in &files {
        output.bullet(file)?;
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!(
        "  gantry add api -n <name> -f {}",
        args.path.display()
    ))?;

    Ok(())
}
