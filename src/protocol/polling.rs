//! Result polling against `res.php`.
//!
//! Polling always sleeps a full interval before each query. Network failures
//! are swallowed so a long poll survives connectivity blips; anything the
//! service reports as an error ends the loop.

use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::{Instant, sleep, timeout_at};

use super::error::{CaptchaError, CaptchaResult};
use super::response::{ResponseContext, interpret_response};
use super::transport::CaptchaHttpClient;
use super::types::TaskId;
use crate::config::ClientConfig;

/// State of a task while the loop is waiting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PollState {
    Waiting,
    Succeeded(String),
}

/// Queries the task once. `Ok(None)` means the service is still working.
pub async fn get_result(
    http: &dyn CaptchaHttpClient,
    config: &ClientConfig,
    task_id: &TaskId,
) -> CaptchaResult<Option<String>> {
    let url = config.result_url(&[("action", "get"), ("id", task_id.as_str())])?;
    let response = http.get(&url).await?;

    interpret_response(ResponseContext::Poll, &response)
        .into_result()
        .map_err(CaptchaError::Api)
}

async fn poll_once(
    http: &dyn CaptchaHttpClient,
    config: &ClientConfig,
    task_id: &TaskId,
) -> CaptchaResult<PollState> {
    match get_result(http, config, task_id).await {
        Ok(Some(payload)) => Ok(PollState::Succeeded(payload)),
        Ok(None) => Ok(PollState::Waiting),
        Err(err) if err.is_network() => {
            warn!("polling task {task_id} hit a network error, retrying: {err}");
            Ok(PollState::Waiting)
        }
        Err(err) => Err(err),
    }
}

/// Polls until the task is solved, the service reports an error, or
/// `timeout` elapses. May overshoot `timeout` by at most one `interval`;
/// a poll request still in flight at `timeout + interval` is abandoned.
pub async fn wait_for_result(
    http: &dyn CaptchaHttpClient,
    config: &ClientConfig,
    task_id: &TaskId,
    timeout: Duration,
    interval: Duration,
) -> CaptchaResult<String> {
    let start = Instant::now();
    let hard_deadline = start + timeout + interval;
    let mut attempts = 0u32;

    while start.elapsed() < timeout {
        sleep(interval).await;
        attempts += 1;

        let Ok(state) = timeout_at(hard_deadline, poll_once(http, config, task_id)).await else {
            warn!("task {task_id} poll still pending at the deadline, giving up");
            break;
        };

        match state? {
            PollState::Waiting => debug!("task {task_id} not ready (attempt {attempts})"),
            PollState::Succeeded(payload) => {
                info!(
                    "task {task_id} solved after {attempts} polls in {:?}",
                    start.elapsed()
                );
                return Ok(payload);
            }
        }
    }

    warn!("task {task_id} timed out after {attempts} polls");
    Err(CaptchaError::Timeout(timeout))
}
