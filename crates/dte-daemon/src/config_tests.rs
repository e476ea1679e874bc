use super::*;
use std::io::Write;

#[test]
fn missing_file_falls_back_to_defaults() {
    let config = DaemonConfig::load(Some(Path::new("/nonexistent/dte.toml"))).expect("load");
    assert_eq!(config.reconnect_grace_secs, 5);
}

#[test]
fn none_path_uses_defaults() {
    let config = DaemonConfig::load(None).expect("load");
    assert_eq!(config.reconnect_grace_secs, 5);
}

#[test]
fn loads_dispatcher_tunables_from_toml() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, "reconnect_grace_secs = 9\n\n[dispatcher]\nmax_concurrent_orchestration_turns = 3\nmax_concurrent_activity_turns = 7\nmax_turn_duration_secs = 120\n")
        .expect("write");

    let config = DaemonConfig::load(Some(file.path())).expect("load");
    assert_eq!(config.reconnect_grace_secs, 9);
    assert_eq!(config.dispatcher.max_concurrent_orchestration_turns, 3);
    assert_eq!(config.dispatcher.max_concurrent_activity_turns, 7);
}

#[test]
fn env_override_wins_over_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, "reconnect_grace_secs = 9\n").expect("write");

    std::env::set_var("DTE_RECONNECT_GRACE_SECS", "42");
    let config = DaemonConfig::load(Some(file.path())).expect("load");
    std::env::remove_var("DTE_RECONNECT_GRACE_SECS");

    assert_eq!(config.reconnect_grace_secs, 42);
}
