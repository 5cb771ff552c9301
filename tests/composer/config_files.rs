use std::fs;

use tempfile::TempDir;

use commsbot::Config;
use commsbot::config::LogLevel;

#[test]
fn first_run_writes_a_usable_config() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_init_in(dir.path()).unwrap();

    assert!(dir.path().join("config.toml").exists());
    assert!(config.validate().is_ok());
    assert!(config.slack.validate_tokens().is_err());
    assert_eq!(config.modal.shortcut_callback_id, "bt_comms_shortcut");
}

#[test]
fn edited_file_drives_the_composer_settings() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        r#"
[slack]
bot_token = "xoxb-1"
app_token = "xapp-1"

[modal]
title = "Team News"

[broadcast]
max_concurrent_sends = 2

[observability]
log_level = "debug"
"#,
    )
    .unwrap();

    let config = Config::load_or_init_in(dir.path()).unwrap();
    assert!(config.validate().is_ok());
    assert!(config.slack.validate_tokens().is_ok());
    assert_eq!(config.modal.title, "Team News");
    assert_eq!(config.modal.submit_label, "Submit");
    assert_eq!(config.broadcast.max_concurrent_sends, 2);
    assert_eq!(config.observability.log_level, LogLevel::Debug);
}

#[test]
fn overlong_title_fails_validation() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[modal]\ntitle = \"A title far too long for a Slack modal\"\n",
    )
    .unwrap();

    let config = Config::load_or_init_in(dir.path()).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("modal.title"));
}
