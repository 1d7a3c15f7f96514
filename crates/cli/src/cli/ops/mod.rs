pub mod counts;
pub mod create;
pub mod delete;
pub mod get;
pub mod init;
pub mod links;
pub mod list;
pub mod show;
pub mod time_sync;
pub mod update;

pub use counts::Counts;
pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use init::Init;
pub use links::Links;
pub use list::List;
pub use show::Show;
pub use time_sync::TimeSync;
pub use update::Update;

use vcider::transport::{Response, EXCESSIVE_TIME_DRIFT};
use vcider::ApiError;

use crate::cli::op::ContextError;

/// Failure of an op that talks to the API
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Context(ContextError),
    #[error("API error: {0}")]
    Api(ApiError),
    #[error("invalid JSON in --data: {0}")]
    Data(#[from] serde_json::Error),
    #[error("server rejected the request time; check the local clock or retry with --time-sync")]
    TimeDrift,
    #[error("server answered {status}: {body}")]
    Status {
        status: http::StatusCode,
        body: String,
    },
}

// Replies the library had to interpret (root, lists, item documents) come
// back as UnexpectedStatus; a drift refusal among them gets the same hint
impl From<ApiError> for RequestError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::UnexpectedStatus { ref body, .. } if body.contains(EXCESSIVE_TIME_DRIFT) => {
                RequestError::TimeDrift
            }
            e => RequestError::Api(e),
        }
    }
}

impl From<ContextError> for RequestError {
    fn from(e: ContextError) -> Self {
        match e {
            ContextError::Api(e) => e.into(),
            e => RequestError::Context(e),
        }
    }
}

/// Turn a non-2xx reply into an error
pub fn checked(response: Response) -> Result<Response, RequestError> {
    if response.is_success() {
        Ok(response)
    } else if response.is_excessive_time_drift() {
        Err(RequestError::TimeDrift)
    } else {
        Err(RequestError::Status {
            status: response.status(),
            body: response.text(),
        })
    }
}

/// JSON bodies are pretty-printed, anything else is shown as text
pub fn render(response: &Response) -> String {
    match response.json::<serde_json::Value>() {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| response.text()),
        Err(_) => response.text(),
    }
}

/// Validate a `--data` argument before it is signed and sent
pub fn payload(data: &str) -> Result<String, RequestError> {
    let value: serde_json::Value = serde_json::from_str(data)?;
    Ok(value.to_string())
}
