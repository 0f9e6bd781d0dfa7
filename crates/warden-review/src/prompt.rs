use std::fmt::Write;

use warden_core::Language;

const PREAMBLE: &str = "\
You are an assistant that checks if GitHub issue content is complete based on the required sections.";

const REPORT_HEADER: &str = "## 问题内容检查结果";
const STATUS_HEADER: &str = "### 检查状态";
const DETAILS_HEADER: &str = "### 详细检查";
const SUGGESTIONS_HEADER: &str = "### 改进建议";
const NOTES_HEADER: &str = "### 补充说明";

/// Build the completeness-check prompt for an issue.
///
/// The prompt carries the title and body verbatim, the required sections
/// as a bulleted list, and a fixed response template: one status line,
/// one checklist line per section (in `sections` order), a suggestions
/// block, and a notes block.
///
/// # Examples
///
/// ```
/// use warden_core::Language;
/// use warden_review::prompt::build_check_prompt;
///
/// let prompt = build_check_prompt("Crash", "It crashes", Language::En, &["Python Version"]);
/// assert!(prompt.contains("Issue Title: Crash"));
/// assert!(prompt.contains("- Python Version\n"));
/// assert!(prompt.contains("- Python Version: [COMPLETE/INCOMPLETE]"));
/// ```
pub fn build_check_prompt(title: &str, body: &str, lang: Language, sections: &[&str]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "{PREAMBLE}\n");
    let _ = writeln!(prompt, "Issue Title: {title}");
    let _ = writeln!(prompt, "Issue Body:\n{body}\n");

    let _ = writeln!(prompt, "Required Sections ({lang}):");
    for section in sections {
        let _ = writeln!(prompt, "- {section}");
    }

    let _ = writeln!(
        prompt,
        "\nPlease check if the issue contains all the required sections with sufficient \
         information. For each section:\n\
         1. Indicate if it's present and complete\n\
         2. If not complete, specify what information is missing or needs to be added (in {lang})\n"
    );

    let _ = writeln!(prompt, "Format your response as follows:\n");
    let _ = writeln!(prompt, "{REPORT_HEADER}\n");
    let _ = writeln!(prompt, "{STATUS_HEADER}\n[PASS/FAIL]\n");
    let _ = writeln!(prompt, "{DETAILS_HEADER}");
    for section in sections {
        let _ = writeln!(prompt, "- {section}: [COMPLETE/INCOMPLETE]");
    }
    let _ = writeln!(
        prompt,
        "\n{SUGGESTIONS_HEADER}\n\
         [List specific suggestions for each incomplete section, or \"所有内容已完备！\"]\n"
    );
    let _ = writeln!(prompt, "{NOTES_HEADER}\n[Any additional comments]\n");

    let _ = write!(
        prompt,
        "Please respond in {lang} and ensure your response is clear and helpful."
    );
    prompt
}

/// Build the comment posted when the check itself fails.
///
/// # Examples
///
/// ```
/// use warden_review::prompt::build_error_comment;
///
/// let comment = build_error_comment("model provider error: quota exceeded");
/// assert!(comment.contains("quota exceeded"));
/// ```
pub fn build_error_comment(description: &str) -> String {
    format!(
        "## 问题内容检查失败\n\n\
         在检查问题内容时发生错误：\n\
         ```\n{description}\n```\n\n\
         请稍后重试或联系仓库管理员。\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTIONS: &[&str] = &["功能描述", "实现思路", "预期效果"];

    #[test]
    fn includes_title_and_body_verbatim() {
        let body = "line one\n  indented `code`\n";
        let prompt = build_check_prompt("Add X", body, Language::En, &["A"]);
        assert!(prompt.contains("Issue Title: Add X"));
        assert!(prompt.contains(body));
    }

    #[test]
    fn lists_sections_as_bullets() {
        let prompt = build_check_prompt("t", "b", Language::Zh, SECTIONS);
        assert!(prompt.contains("Required Sections (zh):\n- 功能描述\n- 实现思路\n- 预期效果\n"));
    }

    #[test]
    fn checklist_preserves_section_order() {
        let prompt = build_check_prompt("t", "b", Language::Zh, SECTIONS);
        let positions: Vec<usize> = SECTIONS
            .iter()
            .map(|s| {
                prompt
                    .find(&format!("- {s}: [COMPLETE/INCOMPLETE]"))
                    .unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn template_blocks_are_in_order() {
        let prompt = build_check_prompt("t", "b", Language::En, SECTIONS);
        let status = prompt.find(STATUS_HEADER).unwrap();
        let details = prompt.find(DETAILS_HEADER).unwrap();
        let suggestions = prompt.find(SUGGESTIONS_HEADER).unwrap();
        let notes = prompt.find(NOTES_HEADER).unwrap();
        assert!(status < details && details < suggestions && suggestions < notes);
        assert!(prompt.contains("[PASS/FAIL]"));
    }

    #[test]
    fn asks_for_response_language() {
        let prompt = build_check_prompt("t", "b", Language::Zh, SECTIONS);
        assert!(prompt.contains("(in zh)"));
        assert!(prompt.ends_with("Please respond in zh and ensure your response is clear and helpful."));
    }

    #[test]
    fn error_comment_embeds_description_in_code_block() {
        let comment = build_error_comment("request failed: timeout");
        assert!(comment.starts_with("## 问题内容检查失败"));
        assert!(comment.contains("```\nrequest failed: timeout\n```"));
    }
}
