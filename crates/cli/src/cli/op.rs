use std::error::Error;

use vcider::{ApiError, Client};

use crate::state::{AppState, StateError};

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Explicit values from the command line, highest precedence
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_uri: Option<String>,
    pub api_id: Option<String>,
    pub api_secret: Option<String>,
    /// Learn the server clock offset before running the command
    pub time_sync: bool,
}

#[derive(Debug, Clone)]
pub struct OpContext {
    /// Config directory and the merged file + environment config
    pub state: AppState,
    pub overrides: Overrides,
}

impl OpContext {
    pub fn new(state: AppState, overrides: Overrides) -> Self {
        Self { state, overrides }
    }

    /// Build a client from the merged settings
    ///
    /// Deferred until an op needs one, so `init` works before any credential
    /// exists.
    pub fn client(&self) -> Result<Client, ContextError> {
        let settings = self.state.settings(
            self.overrides.base_uri.clone(),
            self.overrides.api_id.clone(),
            self.overrides.api_secret.clone(),
        )?;
        tracing::debug!(base_uri = %settings.base_uri, api_id = %settings.api_id, "building client");
        Ok(Client::with_timeout(
            &settings.base_uri,
            settings.api_id,
            settings.api_secret,
            settings.timeout,
        )?)
    }

    /// [`OpContext::client`], synchronized with the server clock if asked to
    pub async fn connect(&self) -> Result<Client, ContextError> {
        let client = self.client()?;
        if self.overrides.time_sync {
            let offset = client.api().time_sync().await?;
            tracing::info!(offset, "clock offset applied");
        }
        Ok(client)
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
