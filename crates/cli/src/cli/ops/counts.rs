use clap::Args;

use super::RequestError;

/// Node and network totals from the root document
#[derive(Args, Debug, Clone)]
pub struct Counts;

#[async_trait::async_trait]
impl crate::cli::op::Op for Counts {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.connect().await?;
        let (nodes, networks) = client.counts().await?;
        Ok(format!("nodes:    {}\nnetworks: {}", nodes, networks))
    }
}
