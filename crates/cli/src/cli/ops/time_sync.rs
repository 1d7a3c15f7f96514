use clap::Args;

use super::RequestError;

/// Measure the offset between the local clock and the server's
#[derive(Args, Debug, Clone)]
pub struct TimeSync;

#[async_trait::async_trait]
impl crate::cli::op::Op for TimeSync {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.client()?;
        let offset = client.api().time_sync().await?;
        let direction = if offset >= 0 { "ahead of" } else { "behind" };
        Ok(format!(
            "Local clock is {}s {} the server",
            offset.abs(),
            direction
        ))
    }
}
