use anyhow::{Result, bail};

use crate::config::Config;
use crate::transport::slack::SlackApi;

pub async fn run(config: &Config, api: &dyn SlackApi) -> Result<()> {
    println!("◆ commsbot doctor");
    println!();

    let setup_ok = print_setup_health(config);
    let auth_ok = if config.slack.validate_tokens().is_ok() {
        print_auth_health(api).await
    } else {
        false
    };

    if setup_ok && auth_ok {
        Ok(())
    } else {
        bail!("doctor found problems; see above")
    }
}

// ── Setup Health ──

fn print_setup_health(config: &Config) -> bool {
    println!("  Setup Health");
    println!("  {}", "─".repeat(50));
    let checks = run_setup_checks(config);
    let failures = checks.iter().filter(|(pass, _)| !pass).count();
    for (pass, msg) in &checks {
        println!("  {} {msg}", if *pass { "✓" } else { "✗" });
    }
    if failures == 0 {
        println!("  All setup checks passed.");
    } else {
        println!(
            "  {failures} issue(s) found. Edit {} or set the SLACK_* variables.",
            config.config_path.display()
        );
    }
    println!();
    failures == 0
}

fn run_setup_checks(config: &Config) -> Vec<(bool, String)> {
    let mut checks = vec![(true, format!("config: {}", config.config_path.display()))];

    match config.slack.validate_tokens() {
        Ok(()) => checks.push((true, "bot and app tokens present".into())),
        Err(e) => checks.push((false, e.to_string())),
    }
    match config.validate() {
        Ok(()) => checks.push((true, "settings are valid".into())),
        Err(e) => checks.push((false, e.to_string())),
    }
    checks.push((
        true,
        format!(
            "shortcut callback id: {}",
            config.modal.shortcut_callback_id
        ),
    ));
    checks.push((true, format!("Web API base: {}", config.slack.api_base_url)));

    checks
}

// ── Slack ──

async fn print_auth_health(api: &dyn SlackApi) -> bool {
    println!("  Slack");
    println!("  {}", "─".repeat(50));
    let ok = match api.auth_test().await {
        Ok(identity) => {
            println!(
                "  ✓ bot token belongs to {} ({}) in {}",
                identity.user.as_deref().unwrap_or("unknown bot"),
                identity.user_id,
                identity.team.as_deref().unwrap_or("unknown workspace"),
            );
            true
        }
        Err(e) => {
            println!("  ✗ auth.test failed: {e}");
            false
        }
    };
    println!();
    ok
}
