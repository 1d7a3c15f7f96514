use clap::Args;

use super::{checked, payload, render, RequestError};

#[derive(Args, Debug, Clone)]
pub struct Update {
    /// Root link naming the collection, e.g. nodes_list
    pub link: String,
    /// Resource id within the collection
    pub id: String,

    /// Attributes to change, as a JSON object
    #[arg(long)]
    pub data: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Update {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let body = payload(&self.data)?;
        let client = ctx.connect().await?;
        let proxy = client.graph().proxy(&self.link).await?;
        let response = checked(proxy.update(&self.id, body).await?)?;

        if response.body().is_empty() {
            Ok(format!("Updated {}", proxy.item_uri(&self.id)?))
        } else {
            Ok(render(&response))
        }
    }
}
