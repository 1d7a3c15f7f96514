use clap::Args;

use super::{checked, render, RequestError};

/// Signed GET of an arbitrary path, relative to the base URI or absolute
#[derive(Args, Debug, Clone)]
pub struct Get {
    pub path: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Get {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.connect().await?;
        let response = checked(client.api().get(&self.path).await?)?;
        Ok(render(&response))
    }
}
