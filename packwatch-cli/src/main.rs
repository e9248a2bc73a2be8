mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use config::PackwatchConfig;
use packwatch_core::adapters::{GithubCommitSource, ReasoningClient, ShellGit};
use packwatch_core::ports::{RegenerationService, Summarizer};
use packwatch_core::settings::DEFAULT_MAX_COMMITS;
use packwatch_core::{AnalyzeSettings, ValidateSettings, WatchError, run_analyze, run_validate};
use packwatch_render::{render_analysis, render_issue_json, render_validation, validation_issue};
use packwatch_types::RepoLocator;
use std::process::ExitCode;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "packwatch",
    version,
    about = "Watches upstream repositories for packaging changes and validates maintained patches."
)]
struct Cli {
    /// Repository to watch: `owner/repo` shorthand or a full clone URL.
    repository: String,

    /// Base ref (tag or sha) of the comparison window.
    #[arg(long, required_unless_present = "check_patch_apply_only")]
    from_tag: Option<String>,

    /// Head ref of the comparison window. In patch-check mode this is
    /// the reference the patches are validated against (default: main).
    #[arg(long, required_unless_present = "check_patch_apply_only")]
    to_tag: Option<String>,

    /// Maximum commits examined from the comparison.
    #[arg(long, default_value_t = DEFAULT_MAX_COMMITS)]
    max_commits: usize,

    /// Directory of `.patch`/`.diff`/`.txt` files. When set, only the
    /// paths named by those files are watched.
    #[arg(long)]
    patches_dir: Option<Utf8PathBuf>,

    /// Only check that the maintained patches still apply; skips commit
    /// analysis entirely.
    #[arg(long, default_value_t = false)]
    check_patch_apply_only: bool,

    /// On validation failure print a machine-readable JSON report to
    /// stdout; print nothing on success.
    #[arg(long, default_value_t = false)]
    json_output: bool,

    /// Regeneration attempts per rejected patch (overrides the config file).
    #[arg(long)]
    regen_attempts: Option<u32>,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.json_output && !cli.check_patch_apply_only {
        return Err(WatchError::Configuration(
            "--json-output requires --check-patch-apply-only".to_string(),
        )
        .into());
    }

    let locator = RepoLocator::parse(&cli.repository).ok_or_else(|| {
        WatchError::Configuration(format!(
            "unrecognized repository locator '{}'",
            cli.repository
        ))
    })?;

    let mut file_config =
        config::load_or_default(Utf8Path::new(".")).context("load packwatch.toml config")?;
    config::overlay_env(&mut file_config, |name| std::env::var(name).ok());
    debug!(
        github_token = file_config.github.token.is_some(),
        gitlab_credentials = file_config.gitlab.token.is_some(),
        reasoning_endpoint = file_config.reasoning.endpoint.is_some(),
        "configuration loaded"
    );

    if cli.check_patch_apply_only {
        cmd_validate(&cli, locator, &file_config)
    } else {
        cmd_analyze(&cli, locator, &file_config)
    }
}

fn cmd_analyze(
    cli: &Cli,
    locator: RepoLocator,
    config: &PackwatchConfig,
) -> anyhow::Result<ExitCode> {
    let (Some(from_ref), Some(to_ref)) = (cli.from_tag.as_deref(), cli.to_tag.as_deref()) else {
        return Err(WatchError::Configuration(
            "commit analysis needs --from-tag and --to-tag".to_string(),
        )
        .into());
    };

    let mut settings = AnalyzeSettings::new(locator, from_ref, to_ref);
    settings.max_commits = cli.max_commits;
    settings.patches_dir = cli.patches_dir.clone();

    let http = config.http_settings();
    let source = GithubCommitSource::new(&http, &config.credentials())?;
    let reasoning = ReasoningClient::from_settings(&http, &config.reasoning_settings())?;
    let summarizer = reasoning.as_ref().map(|client| client as &dyn Summarizer);

    let outcome = run_analyze(&settings, &source, summarizer)?;
    if outcome.skipped > 0 {
        warn!(
            skipped = outcome.skipped,
            "some commits were dropped because their detail could not be fetched"
        );
    }
    print!(
        "{}",
        render_analysis(
            &outcome.locator,
            &outcome.from_ref,
            &outcome.to_ref,
            &outcome.commits
        )
    );
    Ok(ExitCode::from(0))
}

fn cmd_validate(
    cli: &Cli,
    locator: RepoLocator,
    config: &PackwatchConfig,
) -> anyhow::Result<ExitCode> {
    let Some(patches_dir) = cli.patches_dir.clone() else {
        return Err(WatchError::Configuration(
            "--check-patch-apply-only needs --patches-dir".to_string(),
        )
        .into());
    };

    let mut settings = ValidateSettings::new(locator, patches_dir);
    if let Some(reference) = &cli.to_tag {
        settings.reference = reference.clone();
    }
    settings.regen_attempts = config.regen_attempts(cli.regen_attempts);

    let git = ShellGit::new(config.credentials());
    let reasoning =
        ReasoningClient::from_settings(&config.http_settings(), &config.reasoning_settings())?;
    let regen = reasoning
        .as_ref()
        .map(|client| client as &dyn RegenerationService);

    let outcome = run_validate(&settings, &git, regen)?;

    if cli.json_output {
        if let Some(issue) =
            validation_issue(&outcome.locator, &outcome.reference, &outcome.results)
        {
            println!(
                "{}",
                render_issue_json(&issue).context("serialize issue report")?
            );
        }
    } else {
        print!(
            "{}",
            render_validation(&outcome.locator, &outcome.reference, &outcome.results)
        );
    }

    Ok(ExitCode::from(if outcome.all_applied() { 0 } else { 1 }))
}
