use clap::Args;

use super::{checked, RequestError};

#[derive(Args, Debug, Clone)]
pub struct Delete {
    /// Root link naming the collection, e.g. nodes_list
    pub link: String,
    /// Resource id within the collection
    pub id: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Delete {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.connect().await?;
        let proxy = client.graph().proxy(&self.link).await?;
        checked(proxy.delete(&self.id).await?)?;
        Ok(format!("Deleted {}", proxy.item_uri(&self.id)?))
    }
}
