//! Label-based issue classification.

use warden_core::IssueType;

/// A classification rule: any label in `labels` selects `issue_type`.
struct LabelRule {
    labels: &'static [&'static str],
    issue_type: IssueType,
}

/// Rules evaluated first-match. Label matching is case-sensitive.
const RULES: &[LabelRule] = &[
    LabelRule {
        labels: &["feature", "Feature"],
        issue_type: IssueType::Feature,
    },
    LabelRule {
        labels: &["doc", "documentation", "Documentation"],
        issue_type: IssueType::Documentation,
    },
    LabelRule {
        labels: &["consult", "Consult"],
        issue_type: IssueType::Consult,
    },
];

/// Classify an issue from its label names.
///
/// Rules are checked in priority order feature → documentation → consult;
/// an issue with none of the recognized labels is a [`IssueType::Bug`].
///
/// # Examples
///
/// ```
/// use warden_core::IssueType;
/// use warden_review::classify::classify;
///
/// assert_eq!(classify(&["Feature"]), IssueType::Feature);
/// assert_eq!(classify(&["doc", "feature"]), IssueType::Feature);
/// assert_eq!(classify::<&str>(&[]), IssueType::Bug);
/// ```
pub fn classify<S: AsRef<str>>(labels: &[S]) -> IssueType {
    RULES
        .iter()
        .find(|rule| {
            labels
                .iter()
                .any(|label| rule.labels.contains(&label.as_ref()))
        })
        .map_or(IssueType::default(), |rule| rule.issue_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_labels() {
        assert_eq!(classify(&["feature"]), IssueType::Feature);
        assert_eq!(classify(&["Feature"]), IssueType::Feature);
    }

    #[test]
    fn documentation_labels() {
        for label in ["doc", "documentation", "Documentation"] {
            assert_eq!(classify(&[label]), IssueType::Documentation, "{label}");
        }
    }

    #[test]
    fn consult_labels() {
        assert_eq!(classify(&["consult"]), IssueType::Consult);
        assert_eq!(classify(&["Consult", "good first issue"]), IssueType::Consult);
    }

    #[test]
    fn unrecognized_labels_default_to_bug() {
        assert_eq!(classify(&["enhancement", "help wanted"]), IssueType::Bug);
        assert_eq!(classify(&["bug"]), IssueType::Bug);
        assert_eq!(classify::<String>(&[]), IssueType::Bug);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(classify(&["FEATURE"]), IssueType::Bug);
        assert_eq!(classify(&["Doc"]), IssueType::Bug);
        assert_eq!(classify(&["CONSULT"]), IssueType::Bug);
    }

    #[test]
    fn feature_wins_over_documentation_and_consult() {
        assert_eq!(classify(&["documentation", "Feature"]), IssueType::Feature);
        assert_eq!(classify(&["consult", "feature"]), IssueType::Feature);
    }

    #[test]
    fn documentation_wins_over_consult() {
        assert_eq!(classify(&["Consult", "doc"]), IssueType::Documentation);
    }

    #[test]
    fn accepts_owned_strings() {
        let labels = vec!["Documentation".to_string()];
        assert_eq!(classify(&labels), IssueType::Documentation);
    }
}
