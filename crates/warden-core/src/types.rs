use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WardenError;

/// Kind of issue, derived from its labels.
///
/// Defaults to [`IssueType::Bug`] when no recognized label is present.
///
/// # Examples
///
/// ```
/// use warden_core::IssueType;
///
/// let t: IssueType = serde_json::from_str("\"feature\"").unwrap();
/// assert_eq!(t, IssueType::Feature);
/// assert_eq!(IssueType::default(), IssueType::Bug);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    /// Bug report (the default).
    #[default]
    Bug,
    /// Feature request.
    Feature,
    /// Documentation change request.
    Documentation,
    /// Question or consultation.
    Consult,
}

impl IssueType {
    /// All issue types, in catalog order.
    pub const ALL: [IssueType; 4] = [
        IssueType::Bug,
        IssueType::Feature,
        IssueType::Documentation,
        IssueType::Consult,
    ];

    /// The lowercase tag used in config files, logs, and the catalog.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::Bug => "bug",
            IssueType::Feature => "feature",
            IssueType::Documentation => "documentation",
            IssueType::Consult => "consult",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bug" => Ok(IssueType::Bug),
            "feature" => Ok(IssueType::Feature),
            "documentation" => Ok(IssueType::Documentation),
            "consult" => Ok(IssueType::Consult),
            other => Err(format!("unknown issue type: {other}")),
        }
    }
}

/// Language an issue is written in.
///
/// Parsing an unsupported tag is a configuration error: there is no
/// fallback language.
///
/// # Examples
///
/// ```
/// use warden_core::Language;
///
/// let lang: Language = "zh".parse().unwrap();
/// assert_eq!(lang, Language::Zh);
/// assert!("fr".parse::<Language>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Chinese.
    Zh,
    /// English.
    En,
}

impl Language {
    /// All supported languages, in catalog order.
    pub const ALL: [Language; 2] = [Language::Zh, Language::En];

    /// The two-letter tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zh" => Ok(Language::Zh),
            "en" => Ok(Language::En),
            other => Err(WardenError::Config(format!(
                "unsupported language tag '{other}', expected zh or en"
            ))),
        }
    }
}

/// The trigger that started a run.
///
/// # Examples
///
/// ```
/// use warden_core::EventKind;
///
/// assert_eq!(EventKind::from_event_name("issues"), Some(EventKind::IssueOpened));
/// assert_eq!(EventKind::from_event_name("push"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// An `issues` event.
    IssueOpened,
    /// An `issue_comment` event.
    IssueCommented,
}

impl EventKind {
    /// Map a GitHub Actions event name to a supported kind.
    ///
    /// Returns `None` for every other event name.
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "issues" => Some(EventKind::IssueOpened),
            "issue_comment" => Some(EventKind::IssueCommented),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::IssueOpened => write!(f, "issues"),
            EventKind::IssueCommented => write!(f, "issue_comment"),
        }
    }
}

/// An issue event, as read from the trigger payload.
///
/// # Examples
///
/// ```
/// use warden_core::{EventKind, IssueEvent};
///
/// let event = IssueEvent {
///     kind: EventKind::IssueOpened,
///     number: 7,
///     title: "Crash on start".into(),
///     body: "It crashes".into(),
///     labels: vec!["bug".into()],
///     repository: "octocat/hello-world".into(),
///     comment: None,
/// };
/// assert_eq!(event.number, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueEvent {
    /// Which trigger produced this event.
    pub kind: EventKind,
    /// Issue number within the repository.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Issue body; empty when the issue has none.
    pub body: String,
    /// Label names, in payload order.
    pub labels: Vec<String>,
    /// Repository in `owner/repo` form.
    pub repository: String,
    /// Text of the triggering comment, for `issue_comment` events.
    pub comment: Option<String>,
}

/// Output format for CLI subcommands.
///
/// # Examples
///
/// ```
/// use warden_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
