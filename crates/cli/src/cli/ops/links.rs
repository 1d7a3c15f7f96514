use clap::Args;

use super::RequestError;

#[derive(Args, Debug, Clone)]
pub struct Links;

#[async_trait::async_trait]
impl crate::cli::op::Op for Links {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.connect().await?;
        let root = client.graph().root().await?;

        if root.links().is_empty() {
            return Ok("No links found".to_string());
        }

        let output = root
            .links()
            .values()
            .map(|link| {
                let methods = link
                    .methods()
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{} {} [{}]", link.name(), link.uri(), methods)
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(output)
    }
}
