//! `jadegate policy show|init` — render or persist a default policy.

use std::path::Path;

use anyhow::{Context, Result};
use jadegate_config::Config;
use jadegate_policy::Policy;

use crate::theme::Theme;

fn resolve(config: &Config) -> Result<Policy> {
    match &config.policy_path {
        Some(path) if path.exists() => Policy::from_file(path)
            .with_context(|| format!("loading policy from {}", path.display())),
        _ => Ok(Policy::default()),
    }
}

/// Print the policy currently in effect (from `config.policy_path` if one
/// exists on disk, otherwise the embedded default), as pretty JSON.
pub(crate) fn show(config: &Config) -> Result<()> {
    let policy = resolve(config)?;
    let json = serde_json::to_string_pretty(&policy).context("serializing policy")?;
    println!("{json}");
    Ok(())
}

/// Persist a fresh default policy to `output`, or `config.policy_path`,
/// or the default trust-adjacent location if neither is given.
pub(crate) fn init(config: &Config, output: Option<&Path>) -> Result<()> {
    let path = match output.map(Path::to_path_buf).or_else(|| config.policy_path.clone()) {
        Some(path) => path,
        None => {
            anyhow::bail!(
                "no output path given and no policy_path configured; pass --output <path>"
            )
        }
    };

    if path.exists() {
        anyhow::bail!(
            "{} already exists; remove it first or pass a different --output",
            path.display()
        );
    }

    let policy = Policy::default();
    policy
        .save(&path)
        .with_context(|| format!("writing policy to {}", path.display()))?;

    println!(
        "{}",
        Theme::success(&format!("Wrote default policy to {}", path.display()))
    );
    Ok(())
}
