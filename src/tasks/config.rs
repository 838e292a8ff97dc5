//! Deploy the compositor configuration file.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::config_file::ConfigFileResource;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// The resource deployed by [`DeployConfig`] for `ctx`.
#[must_use]
pub fn config_resource(ctx: &Context) -> ConfigFileResource {
    ConfigFileResource::new(ctx.settings.config_source(), ctx.settings.config_dest())
}

/// Copy `config.conf` into `$XDG_CONFIG_HOME/mango/`.
#[derive(Debug)]
pub struct DeployConfig;

impl Task for DeployConfig {
    fn name(&self) -> &str {
        "Deploy configuration"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = config_resource(ctx);

        if ctx.dry_run {
            return Ok(match resource.current_state()? {
                ResourceState::Correct => TaskResult::Skipped("already up to date".to_string()),
                ResourceState::Missing => {
                    ctx.log
                        .dry_run(&format!("would copy {}", resource.description()));
                    TaskResult::DryRun
                }
                ResourceState::Incorrect { current } => {
                    ctx.log.dry_run(&format!(
                        "would overwrite {} ({current})",
                        resource.target.display()
                    ));
                    TaskResult::DryRun
                }
            });
        }

        match resource.ensure()? {
            ResourceChange::Applied => {
                ctx.log
                    .info(&format!("installed {}", resource.target.display()));
                Ok(TaskResult::Ok)
            }
            ResourceChange::AlreadyCorrect => {
                Ok(TaskResult::Skipped("already up to date".to_string()))
            }
        }
    }
}
