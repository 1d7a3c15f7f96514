use clap::Args;

use crate::state::StateError;

/// Write the current settings to config.toml
///
/// Values come from the global flags and `VCIDER_*` variables, so
/// `vcider --api-id ID --api-secret SECRET init` stores a credential.
#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("config file already exists at {0}; pass --force to overwrite")]
    AlreadyInitialized(String),
    #[error(transparent)]
    State(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut state = ctx.state.clone();
        if state.config_path.exists() && !self.force {
            return Err(InitError::AlreadyInitialized(
                state.config_path.display().to_string(),
            ));
        }

        let overrides = &ctx.overrides;
        let config = &mut state.config;
        if let Some(base_uri) = &overrides.base_uri {
            config.base_uri = Some(base_uri.clone());
        }
        if let Some(api_id) = &overrides.api_id {
            config.api_id = Some(api_id.clone());
        }
        if let Some(api_secret) = &overrides.api_secret {
            config.api_secret = Some(api_secret.clone());
        }

        state.save()?;
        Ok(format!("Wrote {}", state.config_path.display()))
    }
}
