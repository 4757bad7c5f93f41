//! Redline - compare two text files line by line and character by character

mod cli;
mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::Config;
use redline_core::{split_lines, DiffEngine, DiffOptions};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let options = resolve_options(config.diff, cli);

    let old_content = std::fs::read_to_string(&cli.old)
        .with_context(|| format!("Failed to read {}", cli.old.display()))?;
    let new_content = std::fs::read_to_string(&cli.new)
        .with_context(|| format!("Failed to read {}", cli.new.display()))?;

    let engine = DiffEngine::new()
        .with_ignore_trim_whitespace(options.ignore_trim_whitespace)
        .with_max_computation_time(options.max_computation_time());
    let diff = engine.diff_strings(&old_content, &new_content);
    if diff.quit_early {
        tracing::warn!("diff computation timed out, showing a coarse result");
    }

    if cli.json {
        println!("{}", render::render_json(&diff)?);
    } else {
        let old_lines = split_lines(&old_content);
        let new_lines = split_lines(&new_content);
        print!("{}", render::render_text(&diff, &old_lines, &new_lines));
    }
    Ok(())
}

/// Command line flags override the config file
fn resolve_options(mut options: DiffOptions, cli: &Cli) -> DiffOptions {
    if cli.ignore_trim_whitespace {
        options.ignore_trim_whitespace = true;
    }
    if let Some(ms) = cli.max_computation_time {
        options.max_computation_time_ms = Some(ms);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "redline",
            "--ignore-trim-whitespace",
            "--max-computation-time",
            "10",
            "a",
            "b",
        ])
        .expect("valid args");
        let options = resolve_options(DiffOptions::default(), &cli);
        assert!(options.ignore_trim_whitespace);
        assert_eq!(options.max_computation_time(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_config_kept_without_flags() {
        let cli = Cli::try_parse_from(["redline", "a", "b"]).expect("valid args");
        let file_options = DiffOptions {
            ignore_trim_whitespace: true,
            max_computation_time_ms: Some(5000),
        };
        assert_eq!(resolve_options(file_options.clone(), &cli), file_options);
    }

    #[test]
    fn test_run_on_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let old = dir.path().join("old.txt");
        let new = dir.path().join("new.txt");
        let config = dir.path().join("config.toml");
        std::fs::write(&old, "a\nb\n").expect("write old");
        std::fs::write(&new, "a\nc\n").expect("write new");
        std::fs::write(&config, "").expect("write config");

        let path = |p: &std::path::Path| p.to_str().expect("utf-8 path").to_string();
        let missing_path = dir.path().join("missing");

        let cli = Cli::try_parse_from([
            "redline".to_string(),
            "--config".to_string(),
            path(config.as_path()),
            path(old.as_path()),
            path(new.as_path()),
        ])
        .expect("valid args");
        assert!(run(&cli).is_ok());

        let missing = Cli::try_parse_from([
            "redline".to_string(),
            "--config".to_string(),
            path(config.as_path()),
            path(missing_path.as_path()),
            path(new.as_path()),
        ])
        .expect("valid args");
        assert!(run(&missing).is_err());
    }
}
