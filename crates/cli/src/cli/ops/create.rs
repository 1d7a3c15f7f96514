use clap::Args;

use super::{checked, payload, render, RequestError};

#[derive(Args, Debug, Clone)]
pub struct Create {
    /// Root link naming the collection, e.g. nodes_list
    pub link: String,

    /// Attributes of the new resource, as a JSON object
    #[arg(long)]
    pub data: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Create {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let body = payload(&self.data)?;
        let client = ctx.connect().await?;
        let proxy = client.graph().proxy(&self.link).await?;
        let response = checked(proxy.create(body).await?)?;

        match response.location() {
            Some(location) => Ok(format!("Created {}", location)),
            None => Ok(render(&response)),
        }
    }
}
