use clap::Args;

use super::RequestError;

#[derive(Args, Debug, Clone)]
pub struct List {
    /// Root link naming the collection, e.g. nodes_list
    pub link: String,

    /// Include each entry's details
    #[arg(long)]
    pub related: bool,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for List {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.connect().await?;
        let proxy = client.graph().proxy(&self.link).await?;
        let entries = proxy.entries(self.related).await?;

        if entries.is_empty() {
            return Ok("No entries found".to_string());
        }

        let output = entries
            .iter()
            .map(|entry| match &entry.related {
                Some(details) => format!("{} {}", entry.uri, details),
                None => entry.uri.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(output)
    }
}
