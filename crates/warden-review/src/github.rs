use async_trait::async_trait;
use tracing::{debug, instrument};
use warden_core::{GitHubConfig, WardenError};

/// Destination for the check result comment.
///
/// Failures are reported as [`WardenError::Tracker`].
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Post `body` as a comment on issue `number` of `repository` (`owner/repo`).
    async fn post_comment(
        &self,
        repository: &str,
        number: u64,
        body: &str,
    ) -> Result<(), WardenError>;
}

/// GitHub issue client for posting comments.
///
/// # Examples
///
/// ```no_run
/// use warden_core::GitHubConfig;
/// use warden_review::github::GitHubClient;
///
/// # async fn example() {
/// let client = GitHubClient::new(&GitHubConfig::default(), "ghp_xxxx").unwrap();
/// # }
/// ```
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
}

impl GitHubClient {
    /// Create a client for `config.api_base` authenticated with `token`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Config`] if the API base URL is invalid, or
    /// [`WardenError::Tracker`] if the client cannot be built.
    pub fn new(config: &GitHubConfig, token: &str) -> Result<Self, WardenError> {
        let octocrab = octocrab::Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(config.api_base.as_str())
            .map_err(|e| {
                WardenError::Config(format!("invalid GitHub API base '{}': {e}", config.api_base))
            })?
            .build()
            .map_err(|e| WardenError::Tracker(format!("failed to create GitHub client: {e}")))?;

        Ok(Self { octocrab })
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    #[instrument(skip(self, body), fields(body_len = body.len()))]
    async fn post_comment(
        &self,
        repository: &str,
        number: u64,
        body: &str,
    ) -> Result<(), WardenError> {
        let (owner, repo) = parse_repository(repository)?;
        let route = format!("/repos/{owner}/{repo}/issues/{number}/comments");
        let payload = serde_json::json!({ "body": body });

        let response: serde_json::Value = self
            .octocrab
            .post(route, Some(&payload))
            .await
            .map_err(|e| {
                WardenError::Tracker(format!("failed to post comment to issue #{number}: {e}"))
            })?;

        debug!(
            url = response.get("html_url").and_then(|u| u.as_str()).unwrap_or("-"),
            "comment posted"
        );
        Ok(())
    }
}

/// Tracker that prints comments to stdout instead of posting them.
///
/// Used for dry runs.
#[derive(Debug, Default)]
pub struct StdoutTracker;

#[async_trait]
impl IssueTracker for StdoutTracker {
    async fn post_comment(
        &self,
        repository: &str,
        number: u64,
        body: &str,
    ) -> Result<(), WardenError> {
        println!("--- comment for {repository}#{number} ---");
        println!("{body}");
        println!("--- end comment ---");
        Ok(())
    }
}

/// Split a repository full name (`owner/repo`) into its components.
///
/// # Errors
///
/// Returns [`WardenError::Event`] if the name is not of the form `owner/repo`.
///
/// # Examples
///
/// ```
/// use warden_review::github::parse_repository;
///
/// let (owner, repo) = parse_repository("octocat/hello-world").unwrap();
/// assert_eq!(owner, "octocat");
/// assert_eq!(repo, "hello-world");
/// ```
pub fn parse_repository(full_name: &str) -> Result<(&str, &str), WardenError> {
    match full_name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(WardenError::Event(format!(
            "invalid repository name '{full_name}', expected owner/repo"
        ))),
    }
}
