//! Deployment of the docs directory.
//!
//! Two targets are supported, picked by `deployment.kind`:
//!
//! - **git**: `git add .`, `git commit -m <message>` and, when a remote
//!   URL is configured, `git push origin <branch>`, all run inside
//!   `output_dir`. A commit with nothing to commit is reported as success.
//! - **cloudflare**: `wrangler pages deploy <output_dir> --project-name <name>`.
//!
//! Every deploy runs the environment check for its target first. External
//! tools are invoked through [`CommandRunner`] so tests can substitute a
//! recording fake for real processes. Generation never depends on the
//! outcome of a deploy.

use crate::config::{DeploymentKind, SiteConfig};
use chrono::{DateTime, TimeZone};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("{tool} is not available: {hint}")]
    ToolUnavailable { tool: String, hint: String },
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),
    #[error("Not logged in to Cloudflare; run `wrangler login` first")]
    NotLoggedIn,
    #[error("Cloudflare Pages deployment needs deployment.cloudflare.project_name")]
    MissingProjectName,
    #[error("`{command}` failed: {output}")]
    CommandFailed { command: String, output: String },
}

/// A process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stderr if present, otherwise stdout, trimmed.
    pub fn message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Runs external commands.
pub trait CommandRunner {
    /// Run to completion. `Err` means the process could not be started.
    fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(cwd) = &command.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &command.env {
            cmd.env(key, value);
        }
        let output = cmd.output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Outcome of a check or deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub message: String,
    pub commit_message: Option<String>,
    pub output: Option<String>,
}

impl DeployReport {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            commit_message: None,
            output: None,
        }
    }
}

/// Verify the tools for the configured deployment target are usable.
pub fn check_environment(
    config: &SiteConfig,
    runner: &impl CommandRunner,
) -> Result<DeployReport, DeployError> {
    match config.deployment.kind {
        DeploymentKind::Git => check_git(config, runner),
        DeploymentKind::Cloudflare => check_cloudflare(config, runner),
    }
}

/// Check the environment, then deploy `output_dir` to the configured target.
pub fn deploy<Tz: TimeZone>(
    config: &SiteConfig,
    runner: &impl CommandRunner,
    now: &DateTime<Tz>,
) -> Result<DeployReport, DeployError>
where
    Tz::Offset: fmt::Display,
{
    check_environment(config, runner)?;
    tracing::info!(kind = %config.deployment.kind, "deploying");
    match config.deployment.kind {
        DeploymentKind::Git => deploy_git(config, runner, now),
        DeploymentKind::Cloudflare => deploy_cloudflare(config, runner),
    }
}

/// Fill the commit message placeholders.
///
/// `{{date}}` → `2024-05-01 09:30:00`, `{{dateShort}}` → `2024-05-01`,
/// `{{time}}` → `09:30:00`, `{{timestamp}}` → Unix milliseconds.
pub fn render_commit_message<Tz: TimeZone>(template: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    template
        .replace("{{date}}", &now.format("%Y-%m-%d %H:%M:%S").to_string())
        .replace("{{dateShort}}", &now.format("%Y-%m-%d").to_string())
        .replace("{{time}}", &now.format("%H:%M:%S").to_string())
        .replace("{{timestamp}}", &now.timestamp_millis().to_string())
}

fn git_program(config: &SiteConfig) -> &str {
    non_empty_or(&config.deployment.git.executable_path, "git")
}

fn wrangler_program(config: &SiteConfig) -> &str {
    non_empty_or(&config.deployment.cloudflare.wrangler_path, "wrangler")
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Run a command, turning spawn failures and non-zero exits into `CommandFailed`.
fn run_checked(
    runner: &impl CommandRunner,
    command: &CommandSpec,
) -> Result<CommandOutput, DeployError> {
    tracing::debug!(command = %command, "running");
    let output = runner
        .run(command)
        .map_err(|e| DeployError::CommandFailed {
            command: command.to_string(),
            output: e.to_string(),
        })?;
    if !output.success {
        return Err(DeployError::CommandFailed {
            command: command.to_string(),
            output: output.message(),
        });
    }
    Ok(output)
}

fn tool_responds(runner: &impl CommandRunner, command: &CommandSpec) -> bool {
    matches!(runner.run(command), Ok(output) if output.success)
}

fn check_git(config: &SiteConfig, runner: &impl CommandRunner) -> Result<DeployReport, DeployError> {
    let git = git_program(config);

    if !tool_responds(runner, &CommandSpec::new(git, &["--version"])) {
        let hint = if config.deployment.git.executable_path.trim().is_empty() {
            "install git or set deployment.git.executable_path".to_string()
        } else {
            format!("could not run {git}")
        };
        return Err(DeployError::ToolUnavailable {
            tool: "git".to_string(),
            hint,
        });
    }

    let status = CommandSpec::new(git, &["status"]).current_dir(&config.output_dir);
    if !tool_responds(runner, &status) {
        return Err(DeployError::NotARepository(config.output_dir.clone()));
    }

    Ok(DeployReport::new(format!("git environment ok ({git})")))
}

fn check_cloudflare(
    config: &SiteConfig,
    runner: &impl CommandRunner,
) -> Result<DeployReport, DeployError> {
    if config.deployment.cloudflare.project_name.trim().is_empty() {
        return Err(DeployError::MissingProjectName);
    }
    let wrangler = wrangler_program(config);

    if !tool_responds(runner, &CommandSpec::new(wrangler, &["--version"])) {
        let hint = if config.deployment.cloudflare.wrangler_path.trim().is_empty() {
            "run `npm install -g wrangler` or set deployment.cloudflare.wrangler_path".to_string()
        } else {
            format!("could not run {wrangler}")
        };
        return Err(DeployError::ToolUnavailable {
            tool: "wrangler".to_string(),
            hint,
        });
    }

    if !tool_responds(runner, &CommandSpec::new(wrangler, &["whoami"])) {
        return Err(DeployError::NotLoggedIn);
    }

    Ok(DeployReport::new(format!("cloudflare environment ok ({wrangler})")))
}

fn deploy_git<Tz: TimeZone>(
    config: &SiteConfig,
    runner: &impl CommandRunner,
    now: &DateTime<Tz>,
) -> Result<DeployReport, DeployError>
where
    Tz::Offset: fmt::Display,
{
    let git = git_program(config);
    let work_dir = &config.output_dir;

    run_checked(runner, &CommandSpec::new(git, &["add", "."]).current_dir(work_dir))?;

    let commit_message = render_commit_message(&config.deployment.git.commit_message, now);
    let commit = CommandSpec::new(git, &["commit", "-m", commit_message.as_str()]).current_dir(work_dir);
    let output = runner.run(&commit).map_err(|e| DeployError::CommandFailed {
        command: commit.to_string(),
        output: e.to_string(),
    })?;
    if !output.success {
        if format!("{}{}", output.stdout, output.stderr).contains("nothing to commit") {
            tracing::info!("no changes to commit");
            return Ok(DeployReport::new("no changes detected, commit skipped"));
        }
        return Err(DeployError::CommandFailed {
            command: commit.to_string(),
            output: output.message(),
        });
    }

    if !config.deployment.git.remote_url.trim().is_empty() {
        let branch = non_empty_or(&config.deployment.git.branch, "main");
        run_checked(
            runner,
            &CommandSpec::new(git, &["push", "origin", branch]).current_dir(work_dir),
        )?;
    }

    Ok(DeployReport {
        message: "git deployment complete".to_string(),
        commit_message: Some(commit_message),
        output: None,
    })
}

fn deploy_cloudflare(
    config: &SiteConfig,
    runner: &impl CommandRunner,
) -> Result<DeployReport, DeployError> {
    let cloudflare = &config.deployment.cloudflare;
    let output_dir = config.output_dir.to_string_lossy().into_owned();
    let mut command = CommandSpec::new(
        wrangler_program(config),
        &[
            "pages",
            "deploy",
            output_dir.as_str(),
            "--project-name",
            cloudflare.project_name.as_str(),
        ],
    );
    if !cloudflare.account_id.trim().is_empty() {
        command = command.env("CLOUDFLARE_ACCOUNT_ID", &cloudflare.account_id);
    }

    let output = run_checked(runner, &command)?;
    Ok(DeployReport {
        message: "cloudflare pages deployment complete".to_string(),
        commit_message: None,
        output: Some(output.stdout.trim().to_string()),
    })
}
