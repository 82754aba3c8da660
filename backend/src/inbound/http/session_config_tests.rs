//! Unit tests for session configuration parsing.

use std::collections::HashMap;
use std::io::Write as _;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp key file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

struct ReleaseVars {
    _key: NamedTempFile,
    vars: HashMap<&'static str, String>,
}

#[fixture]
fn release_vars() -> ReleaseVars {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let vars = HashMap::from([
        (KEY_FILE_ENV, key.path().to_string_lossy().into_owned()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);
    ReleaseVars { _key: key, vars }
}

#[rstest]
fn complete_release_configuration_is_accepted(release_vars: ReleaseVars) {
    let settings = session_settings_from_env(&mock_env(release_vars.vars), BuildMode::Release)
        .expect("valid release settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(mut release_vars: ReleaseVars, #[case] missing: &'static str) {
    release_vars.vars.remove(missing);

    let error = session_settings_from_env(&mock_env(release_vars.vars), BuildMode::Release)
        .err()
        .expect("missing toggle must fail");

    assert!(matches!(error, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
fn release_rejects_unparsable_toggles(
    mut release_vars: ReleaseVars,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    release_vars.vars.insert(name, value.to_owned());

    let error = session_settings_from_env(&mock_env(release_vars.vars), BuildMode::Release)
        .err()
        .expect("invalid toggle must fail");

    assert!(matches!(error, SessionConfigError::InvalidEnv { name: got, .. } if got == name));
}

#[rstest]
fn release_refuses_same_site_none_without_secure(mut release_vars: ReleaseVars) {
    release_vars.vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    release_vars.vars.insert(SAMESITE_ENV, "None".to_owned());

    let error = session_settings_from_env(&mock_env(release_vars.vars), BuildMode::Release)
        .err()
        .expect("insecure SameSite=None");

    assert!(matches!(error, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_refuses_ephemeral_keys(mut release_vars: ReleaseVars) {
    release_vars.vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());

    let error = session_settings_from_env(&mock_env(release_vars.vars), BuildMode::Release)
        .err()
        .expect("ephemeral keys in release");

    assert!(matches!(error, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
#[case(BuildMode::Release, SESSION_KEY_MIN_LEN - 1)]
#[case(BuildMode::Debug, SESSION_KEY_DERIVE_MIN_LEN - 1)]
fn short_keys_are_rejected(
    mut release_vars: ReleaseVars,
    #[case] mode: BuildMode,
    #[case] length: usize,
) {
    let short = key_file(length);
    release_vars
        .vars
        .insert(KEY_FILE_ENV, short.path().to_string_lossy().into_owned());

    let error = session_settings_from_env(&mock_env(release_vars.vars), mode)
        .err()
        .expect("short key");

    assert!(matches!(error, SessionConfigError::KeyTooShort { length: got, .. } if got == length));
}

#[rstest]
fn release_without_key_file_fails(mut release_vars: ReleaseVars) {
    release_vars
        .vars
        .insert(KEY_FILE_ENV, "/nonexistent/session_key".to_owned());

    let error = session_settings_from_env(&mock_env(release_vars.vars), BuildMode::Release)
        .err()
        .expect("unreadable key");

    assert!(matches!(error, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let vars = HashMap::from([
        (KEY_FILE_ENV, "/nonexistent/session_key".to_owned()),
        (SAMESITE_ENV, "bogus".to_owned()),
    ]);

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug defaults");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}
