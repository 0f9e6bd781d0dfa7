mod telemetry;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::Level;

use warden_core::{IssueType, Language, OutputFormat, WardenConfig};
use warden_review::github::{GitHubClient, IssueTracker, StdoutTracker};
use warden_review::pipeline::{self, CheckPlan, IssueReviewer};
use warden_review::{catalog, event, llm};

#[derive(Parser)]
#[command(
    name = "warden",
    version,
    about = "Check that GitHub issues contain every section their template requires",
    long_about = "Warden runs as a GitHub Actions step on issue and issue comment events.\n\n\
                   It classifies the issue from its labels, detects the language of its body,\n\
                   asks an LLM whether each required section is present and complete, and posts\n\
                   the answer as an issue comment.\n\n\
                   Examples:\n  \
                     warden check                       Check the issue from GITHUB_EVENT_PATH\n  \
                     warden check --dry-run             Print the comment instead of posting it\n  \
                     warden prompt --event-path e.json  Show the prompt for a saved payload\n  \
                     warden sections --type feature     List required sections\n  \
                     warden doctor                      Check setup and environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .warden.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for prompt, sections, and doctor
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Check the triggering issue and post the result as a comment
    #[command(long_about = "Check the triggering issue and post the result as a comment.\n\n\
        Reads the event name and payload path that GitHub Actions provides. Events other\n\
        than `issues` and `issue_comment` are ignored. If the model call or the comment\n\
        fails, an error comment is posted instead; the command only exits non-zero when\n\
        that error comment cannot be posted either.\n\n\
        Examples:\n  warden check\n  warden check --event-name issues --event-path event.json --dry-run")]
    Check {
        /// Trigger event name (`issues` or `issue_comment`)
        #[arg(long, env = "GITHUB_EVENT_NAME")]
        event_name: String,
        /// Path to the webhook payload JSON
        #[arg(long, env = "GITHUB_EVENT_PATH")]
        event_path: Option<PathBuf>,
        /// GitHub token (default: GITHUB_TOKEN or GH_TOKEN)
        #[arg(long)]
        github_token: Option<String>,
        /// Print the comment to stdout instead of posting it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the prompt that would be sent for an event payload
    #[command(long_about = "Print the prompt that would be sent for an event payload.\n\n\
        Makes no network calls. Use --format json to also see the detected issue type,\n\
        language, and required sections.\n\n\
        Example:\n  warden prompt --event-path event.json")]
    Prompt {
        /// Trigger event name (`issues` or `issue_comment`)
        #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "issues")]
        event_name: String,
        /// Path to the webhook payload JSON
        #[arg(long, env = "GITHUB_EVENT_PATH")]
        event_path: PathBuf,
    },
    /// List the required sections per issue type and language
    #[command(long_about = "List the required sections per issue type and language.\n\n\
        Without flags, prints every issue type in both languages. An unknown type falls\n\
        back to the bug sections; an unknown language is an error.\n\n\
        Examples:\n  warden sections\n  warden sections --type feature --lang zh")]
    Sections {
        /// Issue type (bug, feature, documentation, consult)
        #[arg(long = "type")]
        issue_type: Option<String>,
        /// Language tag (zh, en)
        #[arg(long)]
        lang: Option<String>,
    },
    /// Create a default .warden.toml configuration file
    #[command(long_about = "Create a default .warden.toml configuration file.\n\n\
        Generates a commented template with all available options.\n\
        Fails if .warden.toml already exists.")]
    Init,
    /// Check your Warden setup and environment
    Doctor,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

const DEFAULT_CONFIG: &str = r#"# Warden Configuration

[llm]
# provider = "gemini"          # gemini | openai
# model = "gemini-2.5-flash"
# api_key = "..."              # default: GEMINI_API_KEY / OPENAI_API_KEY
# base_url = "..."

[github]
# token = "..."                # default: GITHUB_TOKEN / GH_TOKEN
# api_base = "https://api.github.com"
"#;

fn load_config(path: Option<&Path>) -> Result<WardenConfig> {
    let config = match path {
        Some(path) => WardenConfig::from_file(path)?,
        None => {
            let default_path = Path::new(".warden.toml");
            if default_path.exists() {
                WardenConfig::from_file(default_path)?
            } else {
                WardenConfig::default()
            }
        }
    };
    Ok(config)
}

async fn run_check(
    config: &WardenConfig,
    event_name: &str,
    event_path: Option<&Path>,
    github_token: Option<String>,
    dry_run: bool,
) -> Result<()> {
    if warden_core::EventKind::from_event_name(event_name).is_none() {
        println!("Unsupported event type: {event_name}");
        return Ok(());
    }
    let Some(event_path) = event_path else {
        miette::bail!(miette::miette!(
            help = "GitHub Actions sets GITHUB_EVENT_PATH; pass --event-path when running locally",
            "no event payload path given"
        ));
    };
    let Some(event) = event::load_event(event_name, event_path)? else {
        return Ok(());
    };

    let tracker: Box<dyn IssueTracker> = if dry_run {
        Box::new(StdoutTracker)
    } else {
        let token = match github_token {
            Some(t) => t,
            None => config.github.resolve_token()?,
        };
        Box::new(GitHubClient::new(&config.github, &token)?)
    };

    let outcome = match llm::from_config(&config.llm) {
        Ok(model) => {
            IssueReviewer::new(model.as_ref(), tracker.as_ref())
                .review(&event)
                .await?
        }
        Err(e) => {
            tracing::warn!(error = %e, "model client unavailable");
            pipeline::post_error_comment(tracker.as_ref(), &event, &e.to_string()).await?
        }
    };

    println!("{outcome}");
    Ok(())
}

fn run_prompt(event_name: &str, event_path: &Path, format: OutputFormat) -> Result<()> {
    let Some(event) = event::load_event(event_name, event_path)? else {
        println!("Unsupported event type: {event_name}");
        return Ok(());
    };
    let plan = CheckPlan::for_event(&event);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan).into_diagnostic()?);
        }
        OutputFormat::Text | OutputFormat::Markdown => {
            println!("{}", plan.prompt);
        }
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct SectionEntry {
    #[serde(rename = "type")]
    issue_type: String,
    lang: String,
    sections: &'static [&'static str],
}

fn run_sections(
    issue_type: Option<String>,
    lang: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let types: Vec<String> = match issue_type {
        Some(t) => vec![t],
        None => IssueType::ALL.iter().map(|t| t.to_string()).collect(),
    };
    let langs: Vec<String> = match lang {
        Some(l) => vec![l],
        None => Language::ALL.iter().map(|l| l.to_string()).collect(),
    };

    let mut entries = Vec::new();
    for t in &types {
        for l in &langs {
            entries.push(SectionEntry {
                issue_type: t.clone(),
                lang: l.clone(),
                sections: catalog::lookup(t, l)?,
            });
        }
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        }
        OutputFormat::Markdown => {
            for entry in &entries {
                println!("## {} ({})\n", entry.issue_type, entry.lang);
                for s in entry.sections {
                    println!("- {s}");
                }
                println!();
            }
        }
        OutputFormat::Text => {
            for entry in &entries {
                println!("{}/{}:", entry.issue_type, entry.lang);
                for s in entry.sections {
                    println!("  - {s}");
                }
            }
        }
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "info",
            detail: detail.into(),
            hint: None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }

    fn colored_symbol(&self) -> String {
        match self.status {
            "pass" => "\x1b[32m\u{2713}\x1b[0m".into(),
            "fail" => "\x1b[31m\u{2717}\x1b[0m".into(),
            _ => "\x1b[33m~\x1b[0m".into(),
        }
    }
}

fn run_doctor(config: &WardenConfig, format: OutputFormat) -> Result<()> {
    let mut checks: Vec<CheckResult> = Vec::new();

    if Path::new(".warden.toml").exists() {
        checks.push(CheckResult::pass("config_file", ".warden.toml found"));
    } else {
        checks.push(CheckResult::info(
            "config_file",
            ".warden.toml not found, using defaults",
        ));
    }

    let provider = &config.llm.provider;
    match provider.as_str() {
        "gemini" | "openai" => checks.push(CheckResult::pass(
            "llm_provider",
            format!("{provider} (model: {})", config.llm.model),
        )),
        other => checks.push(CheckResult::fail(
            "llm_provider",
            format!("unknown provider '{other}'"),
            "set llm.provider to gemini or openai",
        )),
    }

    let key_env = config.llm.api_key_env();
    if config.llm.resolve_api_key().is_ok() {
        checks.push(CheckResult::pass("llm_api_key", format!("{key_env} set")));
    } else {
        checks.push(CheckResult::fail(
            "llm_api_key",
            format!("{key_env} not set"),
            format!("export {key_env}=... or set api_key in .warden.toml [llm]"),
        ));
    }

    if config.github.resolve_token().is_ok() {
        checks.push(CheckResult::pass("github_token", "GitHub token available"));
    } else {
        checks.push(CheckResult::fail(
            "github_token",
            "GITHUB_TOKEN not set",
            "export GITHUB_TOKEN=... (needed to post comments)",
        ));
    }

    match std::env::var("GITHUB_EVENT_NAME") {
        Ok(name) if warden_core::EventKind::from_event_name(&name).is_some() => {
            checks.push(CheckResult::pass("event_name", name));
        }
        Ok(name) => checks.push(CheckResult::info(
            "event_name",
            format!("{name} (ignored by warden check)"),
        )),
        Err(_) => checks.push(CheckResult::info(
            "event_name",
            "GITHUB_EVENT_NAME not set (pass --event-name when running locally)",
        )),
    }

    match std::env::var("GITHUB_EVENT_PATH") {
        Ok(path) if Path::new(&path).exists() => {
            checks.push(CheckResult::pass("event_payload", path));
        }
        Ok(path) => checks.push(CheckResult::fail(
            "event_payload",
            format!("{path} does not exist"),
            "GITHUB_EVENT_PATH must point at the webhook payload JSON",
        )),
        Err(_) => checks.push(CheckResult::info(
            "event_payload",
            "GITHUB_EVENT_PATH not set (pass --event-path when running locally)",
        )),
    }

    let version = env!("CARGO_PKG_VERSION");
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "version": version,
                "checks": checks,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        _ => {
            let use_color =
                std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err();
            println!("Warden v{version} — Environment Check\n");

            for check in &checks {
                let sym = if use_color {
                    check.colored_symbol()
                } else {
                    check.symbol().to_string()
                };
                let label = check.name.replace('_', " ");
                println!("  {sym} {label:<16} {}", check.detail);
                if let Some(hint) = &check.hint {
                    println!("    hint: {hint}");
                }
            }

            let passed = checks.iter().filter(|c| c.status == "pass").count();
            let failed = checks.iter().filter(|c| c.status == "fail").count();
            let info = checks.iter().filter(|c| c.status == "info").count();
            println!("\n{passed} checks passed, {failed} failed, {info} info");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    telemetry::init_tracing(cli.log_json, level);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        None => {
            let version = env!("CARGO_PKG_VERSION");
            println!("warden v{version} — issue completeness checks for GitHub Actions\n");
            println!("  warden check      Check the triggering issue and post a comment");
            println!("  warden prompt     Print the prompt for an event payload");
            println!("  warden sections   List required sections");
            println!("  warden doctor     Check your setup and environment");
            println!("  warden init       Create default configuration\n");
            println!("Run 'warden <command> --help' for details.");
        }
        Some(Command::Check {
            ref event_name,
            ref event_path,
            github_token,
            dry_run,
        }) => {
            run_check(
                &config,
                event_name,
                event_path.as_deref(),
                github_token,
                dry_run,
            )
            .await?;
        }
        Some(Command::Prompt {
            ref event_name,
            ref event_path,
        }) => {
            run_prompt(event_name, event_path, cli.format)?;
        }
        Some(Command::Sections { issue_type, lang }) => {
            run_sections(issue_type, lang, cli.format)?;
        }
        Some(Command::Init) => {
            let path = Path::new(".warden.toml");
            if path.exists() {
                miette::bail!(".warden.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .warden.toml with default configuration");
        }
        Some(Command::Doctor) => {
            run_doctor(&config, cli.format)?;
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "warden", &mut std::io::stdout());
        }
    }

    Ok(())
}
