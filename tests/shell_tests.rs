use apology_scene::cli::Cli;
use apology_scene::config::AppConfig;
use apology_scene::shell::{
    ApologyDialog, Choice, Credentials, DialogState, LoginGate, MessageLength, Transport,
    LOGIN_ERROR, SHORT_MESSAGE,
};
use clap::Parser;

#[test]
fn test_login_then_full_dialog_flow() {
    let mut gate = LoginGate::new(Credentials::default());
    assert!(!gate.submit("sonu", "wrong"));
    assert_eq!(gate.error(), Some(LOGIN_ERROR));
    assert!(gate.submit("sonu", "sonu"));
    assert!(gate.error().is_none());

    let mut dialog = ApologyDialog::new();
    assert!(!dialog.show_short());
    dialog.open();
    assert_eq!(dialog.state(), DialogState::Opened(MessageLength::Long));
    assert!(!dialog.answer(Choice::Forgiven));
    assert!(dialog.show_short());
    assert_eq!(dialog.message(), Some(SHORT_MESSAGE));
    assert!(dialog.answer(Choice::Forgiven));
    assert_eq!(dialog.state(), DialogState::Answered(Choice::Forgiven));

    dialog.close();
    assert_eq!(dialog.state(), DialogState::Closed);
    gate.logout();
    assert!(!gate.is_logged_in());
}

#[test]
fn test_config_credentials_drive_the_gate() {
    let config = AppConfig::from_json(
        r#"{ "credentials": { "username": "ana", "password": "rose" } }"#,
    )
    .unwrap();
    let mut gate = LoginGate::new(config.credentials);
    assert!(!gate.submit("sonu", "sonu"));
    assert!(gate.submit("ana", "rose"));
}

#[test]
fn test_transport_wraps_around_default_playlist() {
    let config = AppConfig::default();
    let mut transport = Transport::new(config.playlist).unwrap();
    assert_eq!(transport.len(), 4);

    transport.play_pause();
    transport.previous();
    assert_eq!(transport.index(), 3);
    assert!(transport.is_playing());
    for _ in 0..4 {
        transport.next();
    }
    assert_eq!(transport.index(), 3);

    transport.start_failed("autoplay blocked");
    assert!(!transport.is_playing());
}

#[test]
fn test_cli_overrides_config_seed() {
    let cli = Cli::parse_from(["apology-scene", "--headless", "--seed", "3", "--width", "640"]);
    let mut config = AppConfig::from_json(r#"{ "seed": 1 }"#).unwrap();
    config.apply_cli(&cli);
    assert_eq!(config.seed, Some(3));
    assert_eq!(config.window.width, 640);
    assert_eq!(config.window.height, 768);
}
