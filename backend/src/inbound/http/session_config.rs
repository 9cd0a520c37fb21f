//! Cookie session settings read from the environment.
//!
//! Release builds insist on a real signing key and explicit cookie flags;
//! debug builds fall back to an ephemeral key and warn.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

pub(crate) const KEY_FILE_ENV: &str = "TIMESHEET_SESSION_KEY_FILE";
pub(crate) const COOKIE_SECURE_ENV: &str = "TIMESHEET_SESSION_COOKIE_SECURE";
pub(crate) const SAMESITE_ENV: &str = "TIMESHEET_SESSION_SAMESITE";
const KEY_FILE_DEFAULT: &str = "/var/run/secrets/timesheet_session_key";
const KEY_MIN_LEN: usize = 64;

/// Whether configuration mistakes are fatal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("{SAMESITE_ENV}=None requires {COOKIE_SECURE_ENV}=1")]
    InsecureSameSiteNone,
}

/// Read session settings through `env`.
///
/// # Errors
///
/// In [`BuildMode::Release`], any malformed toggle, a missing or short key
/// file, or `SameSite=None` without secure cookies.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = match env.string(COOKIE_SECURE_ENV) {
        None => true,
        Some(value) => match parse_bool(&value) {
            Some(flag) => flag,
            None => lenient(mode, COOKIE_SECURE_ENV, value, "1|0|true|false", true)?,
        },
    };

    let same_site = match env.string(SAMESITE_ENV).map(|v| v.to_ascii_lowercase()) {
        None => SameSite::Lax,
        Some(value) => match value.as_str() {
            "lax" => SameSite::Lax,
            "strict" => SameSite::Strict,
            "none" if cookie_secure => SameSite::None,
            "none" if mode == BuildMode::Debug => {
                warn!("SameSite=None without secure cookies; browsers may drop the session");
                SameSite::None
            }
            "none" => return Err(SessionConfigError::InsecureSameSiteNone),
            _ => lenient(mode, SAMESITE_ENV, value, "Strict|Lax|None", SameSite::Lax)?,
        },
    };

    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| KEY_FILE_DEFAULT.to_owned()),
    );
    let key = load_key(path, mode)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn lenient<T>(
    mode: BuildMode,
    name: &'static str,
    value: String,
    expected: &'static str,
    fallback: T,
) -> Result<T, SessionConfigError> {
    if mode == BuildMode::Release {
        return Err(SessionConfigError::InvalidEnv {
            name,
            value,
            expected,
        });
    }
    warn!(name, value = %value, "invalid session setting; using default");
    Ok(fallback)
}

fn load_key(path: PathBuf, mode: BuildMode) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < KEY_MIN_LEN && mode == BuildMode::Release {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if mode == BuildMode::Release => {
            Err(SessionConfigError::KeyRead { path, source })
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "using ephemeral session key");
            Ok(Key::generate())
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use std::collections::HashMap;
    use uuid::Uuid;

    struct KeyFile(PathBuf);

    impl KeyFile {
        fn with_len(len: usize) -> Self {
            let path = std::env::temp_dir().join(format!("timesheet-key-{}", Uuid::new_v4()));
            std::fs::write(&path, vec![b'k'; len]).expect("write key file");
            Self(path)
        }

        fn path(&self) -> String {
            self.0.to_string_lossy().into_owned()
        }
    }

    impl Drop for KeyFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn env(vars: &[(&'static str, String)]) -> MockEnv {
        let vars: HashMap<&'static str, String> = vars.iter().cloned().collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    #[rstest]
    fn release_accepts_complete_settings() {
        let key = KeyFile::with_len(64);
        let env = env(&[
            (KEY_FILE_ENV, key.path()),
            (COOKIE_SECURE_ENV, "1".to_owned()),
            (SAMESITE_ENV, "Strict".to_owned()),
        ]);
        let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    fn release_rejects_short_key() {
        let key = KeyFile::with_len(8);
        let env = env(&[(KEY_FILE_ENV, key.path())]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("short key rejected");
        assert!(matches!(err, SessionConfigError::KeyTooShort { length: 8, .. }));
    }

    #[rstest]
    fn release_rejects_missing_key_file() {
        let env = env(&[(KEY_FILE_ENV, "/nonexistent/timesheet-key".to_owned())]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("missing key rejected");
        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }

    #[rstest]
    fn debug_falls_back_to_ephemeral_key_and_defaults() {
        let env = env(&[
            (KEY_FILE_ENV, "/nonexistent/timesheet-key".to_owned()),
            (COOKIE_SECURE_ENV, "maybe".to_owned()),
        ]);
        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug tolerates");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn same_site_none_needs_secure_cookies_in_release() {
        let key = KeyFile::with_len(64);
        let env = env(&[
            (KEY_FILE_ENV, key.path()),
            (COOKIE_SECURE_ENV, "0".to_owned()),
            (SAMESITE_ENV, "None".to_owned()),
        ]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("insecure SameSite=None rejected");
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
    }

    #[rstest]
    #[case("1", Some(true))]
    #[case(" yes ", Some(true))]
    #[case("FALSE", Some(false))]
    #[case("2", None)]
    fn parses_boolean_toggles(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw), expected);
    }
}
