//! Task submission against `in.php`.

use log::debug;

use super::error::{ApiError, CaptchaResult};
use super::response::{ResponseContext, interpret_response};
use super::transport::CaptchaHttpClient;
use super::types::{Request, TaskId};
use crate::config::ClientConfig;

pub const KEY_PARAM: &str = "key";

/// Creates a task and returns its id.
///
/// The API key overwrites any caller supplied `key` parameter. Requests with
/// attachments go out as `multipart/form-data`, everything else urlencoded.
pub async fn submit(
    http: &dyn CaptchaHttpClient,
    config: &ClientConfig,
    mut request: Request,
) -> CaptchaResult<TaskId> {
    request
        .params
        .insert(KEY_PARAM.to_string(), config.api_key.clone());

    let url = config.submit_url()?;
    debug!(
        "submitting {} task ({} files)",
        request.method().unwrap_or("<none>"),
        request.files.len()
    );

    let response = if request.has_files() {
        http.post_multipart(&url, &request.params, &request.files)
            .await?
    } else {
        http.post_form(&url, &request.params).await?
    };

    match interpret_response(ResponseContext::Submit, &response).into_result()? {
        Some(id) => {
            debug!("task {id} accepted");
            Ok(TaskId::from(id))
        }
        None => {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            Err(ApiError::Malformed(body).into())
        }
    }
}
