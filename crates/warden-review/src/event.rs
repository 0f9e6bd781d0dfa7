//! Loading the GitHub Actions trigger payload.

use std::path::Path;

use serde::Deserialize;
use warden_core::{EventKind, IssueEvent, WardenError};

#[derive(Deserialize)]
struct Payload {
    issue: IssuePayload,
    repository: RepositoryPayload,
    comment: Option<CommentPayload>,
}

#[derive(Deserialize)]
struct IssuePayload {
    number: u64,
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<LabelPayload>,
}

#[derive(Deserialize)]
struct LabelPayload {
    name: String,
}

#[derive(Deserialize)]
struct RepositoryPayload {
    full_name: String,
}

#[derive(Deserialize)]
struct CommentPayload {
    body: Option<String>,
}

/// Parse a webhook payload of a known kind into an [`IssueEvent`].
///
/// A `null` issue body becomes the empty string.
///
/// # Errors
///
/// Returns [`WardenError::Event`] if the payload lacks the fields the event
/// kind requires.
///
/// # Examples
///
/// ```
/// use warden_core::EventKind;
/// use warden_review::event::parse_event;
///
/// let payload = r#"{
///     "issue": {"number": 3, "title": "Crash", "body": null, "labels": [{"name": "bug"}]},
///     "repository": {"full_name": "octocat/hello-world"}
/// }"#;
/// let event = parse_event(EventKind::IssueOpened, payload).unwrap();
/// assert_eq!(event.number, 3);
/// assert_eq!(event.body, "");
/// assert_eq!(event.labels, vec!["bug"]);
/// ```
pub fn parse_event(kind: EventKind, payload: &str) -> Result<IssueEvent, WardenError> {
    let parsed: Payload = serde_json::from_str(payload)
        .map_err(|e| WardenError::Event(format!("invalid {kind} payload: {e}")))?;

    let comment = match kind {
        EventKind::IssueOpened => None,
        EventKind::IssueCommented => {
            let comment = parsed.comment.ok_or_else(|| {
                WardenError::Event("issue_comment payload has no comment".into())
            })?;
            Some(comment.body.unwrap_or_default())
        }
    };

    Ok(IssueEvent {
        kind,
        number: parsed.issue.number,
        title: parsed.issue.title,
        body: parsed.issue.body.unwrap_or_default(),
        labels: parsed.issue.labels.into_iter().map(|l| l.name).collect(),
        repository: parsed.repository.full_name,
        comment,
    })
}

/// Load the trigger event named `event_name` from the payload file at `path`.
///
/// Returns `Ok(None)` for event names other than `issues` and
/// `issue_comment`; the payload is not read in that case.
///
/// # Errors
///
/// Returns [`WardenError::FileNotFound`] if the payload file does not exist,
/// [`WardenError::Io`] if it cannot be read, or [`WardenError::Event`] if it
/// cannot be parsed.
pub fn load_event(event_name: &str, path: &Path) -> Result<Option<IssueEvent>, WardenError> {
    let Some(kind) = EventKind::from_event_name(event_name) else {
        tracing::info!(event_name, "unsupported event type, nothing to check");
        return Ok(None);
    };

    if !path.exists() {
        return Err(WardenError::FileNotFound(path.to_path_buf()));
    }
    let payload = std::fs::read_to_string(path)?;
    let event = parse_event(kind, &payload)?;

    tracing::debug!(
        kind = %event.kind,
        number = event.number,
        repository = %event.repository,
        labels = event.labels.len(),
        "loaded issue event"
    );
    Ok(Some(event))
}
