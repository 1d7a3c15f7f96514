use clap::Args;

use super::{checked, render, RequestError};

#[derive(Args, Debug, Clone)]
pub struct Show {
    /// Root link naming the collection, e.g. nodes_list
    pub link: String,
    /// Resource id within the collection
    pub id: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Show {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.connect().await?;
        let proxy = client.graph().proxy(&self.link).await?;
        let response = checked(proxy.get(&self.id).await?)?;
        Ok(render(&response))
    }
}
