//! HTTP gateway to the remote event API.
//!
//! The remote's response shape varies: a synchronous creation returns an
//! entity reference, an asynchronous one returns a tracked job id plus a
//! status-polling location. Classification is kept in pure functions so
//! the engine tests never touch the network.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde_json::Value;
use tracing::debug;

use cbs_model::StaticContext;

use crate::error::{Result, UploadError};

/// Per-request timeout for submissions and job polls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT_VALUE: &str = concat!("cbs-relay/", env!("CARGO_PKG_VERSION"));

/// An asynchronous import job handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedJob {
    pub id: String,
    /// Status-polling location, absolute or endpoint-relative.
    pub location: String,
}

/// What a successful submission yielded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Direct entity reference, when the creation was synchronous.
    pub entity_id: Option<String>,
    /// Tracked job, when the creation was asynchronous.
    pub job: Option<TrackedJob>,
}

/// State of an asynchronous import job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    Failed(String),
    /// Still running or scheduled; keep polling.
    Running,
}

/// The engine's seam to the remote API.
pub trait EventApi {
    /// POST one payload to the submission endpoint.
    fn submit(&self, payload: &Value) -> Result<SubmitOutcome>;

    /// GET the status of an asynchronous job.
    fn poll_job(&self, location: &str) -> Result<JobStatus>;

    /// Fetch the detailed error report for a failed job.
    fn fetch_error_report(&self, location: &str) -> Result<String>;

    /// Best-effort read-back of a created entity. `Ok(true)` means some
    /// candidate URL confirmed the record exists.
    fn read_back(&self, entity_id: &str) -> Result<bool>;
}

impl<A: EventApi + ?Sized> EventApi for &A {
    fn submit(&self, payload: &Value) -> Result<SubmitOutcome> {
        (**self).submit(payload)
    }

    fn poll_job(&self, location: &str) -> Result<JobStatus> {
        (**self).poll_job(location)
    }

    fn fetch_error_report(&self, location: &str) -> Result<String> {
        (**self).fetch_error_report(location)
    }

    fn read_back(&self, entity_id: &str) -> Result<bool> {
        (**self).read_back(entity_id)
    }
}

/// Blocking reqwest implementation of [`EventApi`].
pub struct HttpEventApi {
    client: Client,
    context: StaticContext,
}

impl HttpEventApi {
    pub fn new(context: StaticContext) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(UploadError::from)?;
        Ok(Self { client, context })
    }

    fn endpoint(&self) -> &str {
        self.context.endpoint.trim_end_matches('/')
    }
}

impl EventApi for HttpEventApi {
    fn submit(&self, payload: &Value) -> Result<SubmitOutcome> {
        let response = self
            .client
            .post(self.context.endpoint.as_str())
            .header(USER_AGENT, USER_AGENT_VALUE)
            .json(payload)
            .send()?;

        let status = response.status().as_u16();
        let text = response.text()?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        classify_submit_response(status, &body)
    }

    fn poll_job(&self, location: &str) -> Result<JobStatus> {
        let url = absolutize(self.endpoint(), location);
        let response = self
            .client
            .get(url.as_str())
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()?;

        let status = response.status().as_u16();
        let text = response.text()?;
        if !(200..300).contains(&status) {
            return Err(UploadError::Http {
                status,
                message: text,
            });
        }
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok(classify_job_response(&body))
    }

    fn fetch_error_report(&self, location: &str) -> Result<String> {
        let url = format!("{}/errors", absolutize(self.endpoint(), location));
        let response = self
            .client
            .get(url.as_str())
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()?;
        let text = response.text()?;
        Ok(text)
    }

    fn read_back(&self, entity_id: &str) -> Result<bool> {
        for url in read_back_urls(self.endpoint(), entity_id) {
            let response = self
                .client
                .get(url.as_str())
                .header(USER_AGENT, USER_AGENT_VALUE)
                .send();
            match response {
                Ok(response) if response.status().is_success() => {
                    debug!(%url, "read-back confirmed");
                    return Ok(true);
                }
                Ok(_) | Err(_) => {}
            }
        }
        Ok(false)
    }
}

/// Classify a submission response into success or a typed failure.
///
/// Non-2xx, an explicit `status: "ERROR"`, or an error-flagged import
/// summary are all failures; otherwise the outcome carries a direct
/// entity reference or an asynchronous job handle.
pub fn classify_submit_response(status: u16, body: &Value) -> Result<SubmitOutcome> {
    if !(200..300).contains(&status) {
        return Err(UploadError::Http {
            status,
            message: remote_message(body),
        });
    }

    if body["status"] == "ERROR" {
        return Err(UploadError::Remote(remote_message(body)));
    }

    let response = if body["response"].is_object() {
        &body["response"]
    } else {
        body
    };

    if let Some(summaries) = response["importSummaries"].as_array() {
        for summary in summaries {
            if summary["status"] == "ERROR" {
                return Err(UploadError::ImportSummary(remote_message(summary)));
            }
        }
    }

    if let Some(location) = response["location"].as_str() {
        let id = response["id"]
            .as_str()
            .unwrap_or("unknown")
            .to_string();
        return Ok(SubmitOutcome {
            entity_id: None,
            job: Some(TrackedJob {
                id,
                location: location.to_string(),
            }),
        });
    }

    let entity_id = response["importSummaries"]
        .get(0)
        .and_then(|summary| summary["reference"].as_str())
        .or_else(|| response["uid"].as_str())
        .or_else(|| response["reference"].as_str())
        .map(String::from);

    Ok(SubmitOutcome {
        entity_id,
        job: None,
    })
}

/// Classify a job-status response.
///
/// Handles both the object shape (`{status|completed, ...}`) and the
/// array-of-report-entries shape, where any `level: ERROR` entry fails
/// the job.
pub fn classify_job_response(body: &Value) -> JobStatus {
    if let Some(entries) = body.as_array() {
        for entry in entries {
            if entry["level"] == "ERROR" {
                let message = entry["message"]
                    .as_str()
                    .unwrap_or("error-level entry in job report")
                    .to_string();
                return JobStatus::Failed(message);
            }
        }
        if entries.iter().any(|entry| entry["completed"] == true) {
            return JobStatus::Completed;
        }
        return JobStatus::Running;
    }

    if body["completed"] == true {
        return JobStatus::Completed;
    }

    match body["status"].as_str() {
        Some("COMPLETED") | Some("SUCCESS") => JobStatus::Completed,
        Some("FAILED") | Some("ERROR") => JobStatus::Failed(remote_message(body)),
        // RUNNING, SCHEDULED, or anything unrecognized: keep polling.
        _ => JobStatus::Running,
    }
}

fn remote_message(body: &Value) -> String {
    body["message"]
        .as_str()
        .or_else(|| body["description"].as_str())
        .unwrap_or("unspecified remote error")
        .to_string()
}

/// Resolve a possibly-relative location against the endpoint.
fn absolutize(endpoint: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }
    if location.starts_with('/')
        && let Some(origin) = origin(endpoint)
    {
        return format!("{origin}{location}");
    }
    format!("{endpoint}/{}", location.trim_start_matches('/'))
}

/// Scheme + host portion of an endpoint URL.
fn origin(endpoint: &str) -> Option<&str> {
    let scheme_end = endpoint.find("://")? + 3;
    match endpoint[scheme_end..].find('/') {
        Some(position) => Some(&endpoint[..scheme_end + position]),
        None => Some(endpoint),
    }
}

/// Candidate URL shapes for the first-record read-back.
fn read_back_urls(endpoint: &str, entity_id: &str) -> Vec<String> {
    let mut urls = vec![format!("{endpoint}/{entity_id}")];
    if let Some(origin) = origin(endpoint) {
        for candidate in [
            format!("{origin}/api/events/{entity_id}"),
            format!("{origin}/api/tracker/events/{entity_id}"),
        ] {
            if !urls.contains(&candidate) {
                urls.push(candidate);
            }
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_2xx_is_a_failure() {
        let error = classify_submit_response(502, &json!({"message": "bad gateway"})).unwrap_err();
        assert!(matches!(error, UploadError::Http { status: 502, .. }));
    }

    #[test]
    fn explicit_error_status_is_a_failure() {
        let body = json!({"status": "ERROR", "message": "org unit not found"});
        let error = classify_submit_response(200, &body).unwrap_err();
        assert!(matches!(error, UploadError::Remote(message) if message.contains("org unit")));
    }

    #[test]
    fn errored_import_summary_is_a_failure() {
        let body = json!({
            "status": "OK",
            "response": {
                "importSummaries": [
                    {"status": "ERROR", "description": "value type mismatch"}
                ]
            }
        });
        let error = classify_submit_response(200, &body).unwrap_err();
        assert!(matches!(error, UploadError::ImportSummary(_)));
    }

    #[test]
    fn direct_creation_yields_entity_reference() {
        let body = json!({
            "status": "OK",
            "response": {
                "importSummaries": [
                    {"status": "SUCCESS", "reference": "ev123"}
                ]
            }
        });
        let outcome = classify_submit_response(200, &body).unwrap();
        assert_eq!(outcome.entity_id.as_deref(), Some("ev123"));
        assert!(outcome.job.is_none());
    }

    #[test]
    fn async_creation_yields_tracked_job() {
        let body = json!({
            "response": {"id": "job42", "location": "/api/system/tasks/job42"}
        });
        let outcome = classify_submit_response(201, &body).unwrap();
        assert!(outcome.entity_id.is_none());
        let job = outcome.job.unwrap();
        assert_eq!(job.id, "job42");
        assert_eq!(job.location, "/api/system/tasks/job42");
    }

    #[test]
    fn job_object_shapes() {
        assert_eq!(
            classify_job_response(&json!({"completed": true})),
            JobStatus::Completed
        );
        assert_eq!(
            classify_job_response(&json!({"status": "SUCCESS"})),
            JobStatus::Completed
        );
        assert_eq!(
            classify_job_response(&json!({"status": "RUNNING"})),
            JobStatus::Running
        );
        assert_eq!(
            classify_job_response(&json!({"status": "SCHEDULED"})),
            JobStatus::Running
        );
        assert!(matches!(
            classify_job_response(&json!({"status": "FAILED", "message": "boom"})),
            JobStatus::Failed(message) if message == "boom"
        ));
    }

    #[test]
    fn job_report_array_shapes() {
        let failing = json!([
            {"level": "INFO", "message": "started"},
            {"level": "ERROR", "message": "conflict on row 1"}
        ]);
        assert!(matches!(
            classify_job_response(&failing),
            JobStatus::Failed(message) if message.contains("conflict")
        ));

        let done = json!([{"level": "INFO", "completed": true}]);
        assert_eq!(classify_job_response(&done), JobStatus::Completed);

        let in_flight = json!([{"level": "INFO", "message": "importing"}]);
        assert_eq!(classify_job_response(&in_flight), JobStatus::Running);
    }

    #[test]
    fn locations_are_absolutized() {
        let endpoint = "https://himis.example.org/api/events";
        assert_eq!(
            absolutize(endpoint, "/api/system/tasks/j1"),
            "https://himis.example.org/api/system/tasks/j1"
        );
        assert_eq!(
            absolutize(endpoint, "https://other.example.org/x"),
            "https://other.example.org/x"
        );
        assert_eq!(absolutize(endpoint, "tasks/j1"), format!("{endpoint}/tasks/j1"));
    }

    #[test]
    fn read_back_tries_multiple_shapes() {
        let urls = read_back_urls("https://himis.example.org/api/events", "ev1");
        assert_eq!(
            urls,
            vec![
                "https://himis.example.org/api/events/ev1".to_string(),
                "https://himis.example.org/api/tracker/events/ev1".to_string(),
            ]
        );
    }
}
