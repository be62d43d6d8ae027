//! Command dispatch: config loading, task registration and workflow
//! execution.

mod args;

pub use args::{Cli, Commands};

use crate::config::SiteConfig;
use crate::pipeline::{self, BuildContext};
use crate::routes::RouteTable;
use crate::serve::{self, DEFAULT_WS_PORT, ReloadHub};
use crate::task::{BuildMode, Registry, Workflow, workflow_plan};
use crate::{logger, watch};
use anyhow::Result;
use std::sync::Arc;

/// Run the selected workflow to completion (or forever, for watch and
/// serve workflows).
pub fn run(cli: &Cli) -> Result<()> {
    logger::set_verbose(cli.verbose);

    let (workflow, port) = match cli.command {
        Commands::Clean => (Workflow::Clean, None),
        Commands::Dev => (Workflow::Dev, None),
        Commands::Build => (Workflow::Build, None),
        Commands::Watch => (Workflow::Watch, None),
        Commands::Serve { port } => (Workflow::Serve, port),
        Commands::Start { port } => (Workflow::Start, port),
    };

    let config = SiteConfig::load(&cli.config, port)?;
    let routes = RouteTable::load(&config.routes_file())?;

    let mode = if workflow.is_production() {
        BuildMode::Production
    } else {
        BuildMode::Development
    };

    let ctx = Arc::new(BuildContext::new(config, routes, mode));
    let mut registry = Registry::new();
    pipeline::register_tasks(&mut registry, &ctx);

    // Live reload only exists when watching and serving together
    let reload = match workflow {
        Workflow::Start => Some(ReloadHub::start(DEFAULT_WS_PORT)?),
        _ => None,
    };

    {
        let ctx = Arc::clone(&ctx);
        let reload = reload.clone();
        registry.register("watch", move || watch::watch(&ctx, reload.clone()));
    }
    {
        let ctx = Arc::clone(&ctx);
        let reload = reload.clone();
        registry.register("serve", move || serve::serve(&ctx.config, reload.clone()));
    }

    let plan = workflow_plan(workflow);
    registry.validate(&plan)?;
    registry.run(&plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::STAGE_TASKS;

    /// Every task any workflow references has a registration.
    #[test]
    fn test_every_workflow_plan_validates() {
        let dir = tempfile::TempDir::new().unwrap();
        let ctx = Arc::new(BuildContext::test_context(
            dir.path(),
            BuildMode::Development,
        ));
        let mut registry = Registry::new();
        pipeline::register_tasks(&mut registry, &ctx);
        registry.register("watch", || Ok(()));
        registry.register("serve", || Ok(()));

        for workflow in [
            Workflow::Clean,
            Workflow::Dev,
            Workflow::Build,
            Workflow::Watch,
            Workflow::Serve,
            Workflow::Start,
        ] {
            registry.validate(&workflow_plan(workflow)).unwrap();
        }
        // The stage vocabulary is covered by the pipeline registrations
        for name in STAGE_TASKS {
            registry.validate(&crate::task::task(name)).unwrap();
        }
    }
}
