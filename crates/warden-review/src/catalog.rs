//! Required issue sections per issue type and language.
//!
//! The catalog is a compile-time table; every cell is non-empty.

use warden_core::{IssueType, Language, WardenError};

const BUG_ZH: &[&str] = &[
    "操作系统及版本",
    "安装工具的python环境",
    "python版本",
    "AISBench工具版本",
    "AISBench执行命令",
    "模型配置文件或自定义配置文件内容",
    "实际行为",
];

const BUG_EN: &[&str] = &[
    "Operating System and Version",
    "Python Environment for Tool Installation",
    "Python Version",
    "AISBench Tool Version",
    "AISBench Execution Command",
    "Model Configuration File or Custom Configuration File Content",
    "Actual Behavior",
];

const FEATURE_ZH: &[&str] = &["功能描述", "实现思路", "预期效果"];

const FEATURE_EN: &[&str] = &[
    "Feature Description",
    "Implementation Ideas",
    "Expected Effects",
];

const DOCUMENTATION_ZH: &[&str] = &["文档类型", "文档位置", "修改内容"];

const DOCUMENTATION_EN: &[&str] = &[
    "Documentation Type",
    "Documentation Location",
    "Modification Content",
];

const CONSULT_ZH: &[&str] = &["咨询问题", "相关背景", "已尝试的方法"];

const CONSULT_EN: &[&str] = &[
    "Consultation Question",
    "Related Background",
    "Methods Tried",
];

/// Sections an issue of `issue_type` written in `lang` must contain, in
/// template order.
///
/// # Examples
///
/// ```
/// use warden_core::{IssueType, Language};
/// use warden_review::catalog::required_sections;
///
/// let sections = required_sections(IssueType::Feature, Language::En);
/// assert_eq!(sections[0], "Feature Description");
/// ```
pub fn required_sections(issue_type: IssueType, lang: Language) -> &'static [&'static str] {
    match (issue_type, lang) {
        (IssueType::Bug, Language::Zh) => BUG_ZH,
        (IssueType::Bug, Language::En) => BUG_EN,
        (IssueType::Feature, Language::Zh) => FEATURE_ZH,
        (IssueType::Feature, Language::En) => FEATURE_EN,
        (IssueType::Documentation, Language::Zh) => DOCUMENTATION_ZH,
        (IssueType::Documentation, Language::En) => DOCUMENTATION_EN,
        (IssueType::Consult, Language::Zh) => CONSULT_ZH,
        (IssueType::Consult, Language::En) => CONSULT_EN,
    }
}

/// Look up sections by raw type and language tags.
///
/// An unrecognized type tag falls back to the `bug` sections for the
/// requested language. There is no fallback for the language.
///
/// # Errors
///
/// Returns [`WardenError::Config`] if `lang_tag` is not `zh` or `en`.
///
/// # Examples
///
/// ```
/// use warden_core::{IssueType, Language};
/// use warden_review::catalog::{lookup, required_sections};
///
/// let sections = lookup("question", "en").unwrap();
/// assert_eq!(sections, required_sections(IssueType::Bug, Language::En));
/// assert!(lookup("bug", "de").is_err());
/// ```
pub fn lookup(type_tag: &str, lang_tag: &str) -> Result<&'static [&'static str], WardenError> {
    let lang: Language = lang_tag.parse()?;
    let issue_type = type_tag.parse::<IssueType>().unwrap_or_else(|_| {
        tracing::debug!(type_tag, "unrecognized issue type, using bug sections");
        IssueType::Bug
    });
    Ok(required_sections(issue_type, lang))
}
