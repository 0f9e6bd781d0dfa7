use std::fmt;

use serde::Serialize;
use tracing::{error, info, warn};
use warden_core::{IssueEvent, IssueType, Language, WardenError};

use crate::catalog;
use crate::classify::classify;
use crate::github::IssueTracker;
use crate::language::detect_language;
use crate::llm::ModelClient;
use crate::prompt;

/// Everything decided about an issue before the model is called.
///
/// # Examples
///
/// ```
/// use warden_core::{EventKind, IssueEvent, IssueType, Language};
/// use warden_review::pipeline::CheckPlan;
///
/// let event = IssueEvent {
///     kind: EventKind::IssueOpened,
///     number: 1,
///     title: "Add X".into(),
///     body: "Please add X".into(),
///     labels: vec!["Feature".into()],
///     repository: "octocat/hello-world".into(),
///     comment: None,
/// };
/// let plan = CheckPlan::for_event(&event);
/// assert_eq!(plan.issue_type, IssueType::Feature);
/// assert_eq!(plan.language, Language::En);
/// assert_eq!(plan.sections.len(), 3);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPlan {
    /// Issue type derived from the labels.
    pub issue_type: IssueType,
    /// Language detected from the issue body.
    pub language: Language,
    /// Sections the issue must contain.
    pub sections: &'static [&'static str],
    /// Prompt sent to the model.
    pub prompt: String,
}

impl CheckPlan {
    /// Classify the issue, pick its sections, and build the prompt.
    ///
    /// Only the issue body decides the language; a triggering comment is
    /// ignored.
    pub fn for_event(event: &IssueEvent) -> Self {
        let issue_type = classify(&event.labels);
        let language = detect_language(&event.body);
        let sections = catalog::required_sections(issue_type, language);
        let prompt = prompt::build_check_prompt(&event.title, &event.body, language, sections);
        Self {
            issue_type,
            language,
            sections,
            prompt,
        }
    }
}

/// How a review run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ReviewOutcome {
    /// The model's response was posted verbatim.
    Posted {
        /// The posted comment.
        comment: String,
    },
    /// The check failed and an error comment was posted in its place.
    ErrorReported {
        /// Description of the failure embedded in the comment.
        error: String,
    },
}

impl fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewOutcome::Posted { .. } => {
                write!(f, "Issue content check completed and comment posted.")
            }
            ReviewOutcome::ErrorReported { error } => {
                write!(f, "Issue content check failed, error comment posted: {error}")
            }
        }
    }
}

/// Review orchestrator: classify, prompt, query the model, post the result.
///
/// At most one comment is posted per run. A failure from the model or from
/// posting its answer is replaced by an error comment; a failure to post
/// that error comment is returned to the caller.
pub struct IssueReviewer<'a> {
    model: &'a dyn ModelClient,
    tracker: &'a dyn IssueTracker,
}

impl<'a> IssueReviewer<'a> {
    /// Create a reviewer from its two collaborators.
    pub fn new(model: &'a dyn ModelClient, tracker: &'a dyn IssueTracker) -> Self {
        Self { model, tracker }
    }

    /// Run the completeness check for `event` and post the result.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Tracker`] only when the error comment itself
    /// cannot be posted.
    pub async fn review(&self, event: &IssueEvent) -> Result<ReviewOutcome, WardenError> {
        let plan = CheckPlan::for_event(event);
        info!(
            number = event.number,
            repository = %event.repository,
            issue_type = %plan.issue_type,
            language = %plan.language,
            sections = plan.sections.len(),
            "checking issue content"
        );

        match self.check_and_post(event, &plan).await {
            Ok(comment) => Ok(ReviewOutcome::Posted { comment }),
            Err(e) => post_error_comment(self.tracker, event, &e.to_string()).await,
        }
    }

    async fn check_and_post(
        &self,
        event: &IssueEvent,
        plan: &CheckPlan,
    ) -> Result<String, WardenError> {
        info!(model = self.model.model(), "querying model");
        let comment = self.model.generate(&plan.prompt).await?;
        self.tracker
            .post_comment(&event.repository, event.number, &comment)
            .await?;
        Ok(comment)
    }
}

/// Post the fixed error comment for a failed check on `event`.
///
/// # Errors
///
/// Returns the tracker's error if the comment cannot be posted.
pub async fn post_error_comment(
    tracker: &dyn IssueTracker,
    event: &IssueEvent,
    description: &str,
) -> Result<ReviewOutcome, WardenError> {
    warn!(error = %description, "issue check failed, posting error comment");

    let comment = prompt::build_error_comment(description);
    tracker
        .post_comment(&event.repository, event.number, &comment)
        .await
        .inspect_err(|e| error!(error = %e, "failed to post error comment"))?;

    Ok(ReviewOutcome::ErrorReported {
        error: description.to_string(),
    })
}
