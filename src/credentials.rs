use std::env;

use keyring::Entry;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;
#[cfg(test)]
use mockall::predicate::*;

const KEYRING_SERVICE: &str = "heron";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Failed to access keyring: {0}")]
    KeyringAccess(String),

    #[error("Failed to save to keyring: {0}")]
    KeyringSave(String),

    #[error("Failed to access environment variable: {0}")]
    EnvVarAccess(String),
}

impl From<keyring::Error> for CredentialError {
    fn from(err: keyring::Error) -> Self {
        CredentialError::KeyringAccess(err.to_string())
    }
}

impl From<env::VarError> for CredentialError {
    fn from(err: env::VarError) -> Self {
        CredentialError::EnvVarAccess(err.to_string())
    }
}

/// Read access to named secrets. Tools and providers depend on this seam
/// rather than on any concrete store, so interactive prompting stays out
/// of the agent loop entirely.
pub trait CredentialSource: Send + Sync {
    /// The secret for `key`, or None when it is absent or empty.
    fn get(&self, key: &str) -> Option<String>;
}

// Seams over the keyring and the process environment so retrieval logic
// can be tested without touching either.
#[cfg_attr(test, automock)]
pub trait Keyring: Send + Sync {
    fn get_password(&self) -> Result<String, CredentialError>;
    fn set_password(&self, password: &str) -> Result<(), CredentialError>;
}

#[cfg_attr(test, automock)]
pub trait Environment: Send + Sync {
    fn get_var(&self, key: &str) -> Result<String, env::VarError>;
}

pub struct RealEnvironment;

impl Environment for RealEnvironment {
    fn get_var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}

impl Keyring for Entry {
    fn get_password(&self) -> Result<String, CredentialError> {
        self.get_password().map_err(CredentialError::from)
    }

    fn set_password(&self, password: &str) -> Result<(), CredentialError> {
        self.set_password(password).map_err(CredentialError::from)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub enum KeyRetrievalStrategy {
    /// Only look in environment variables
    EnvironmentOnly,
    /// Only look in the system keyring
    KeyringOnly,
    /// Try keyring first, then environment variables
    #[default]
    Both,
}

/// Keyring-backed credential store with environment fallback.
pub struct KeyStore {
    strategy: KeyRetrievalStrategy,
}

impl KeyStore {
    pub fn new(strategy: KeyRetrievalStrategy) -> Self {
        Self { strategy }
    }

    pub fn lookup(&self, key: &str) -> Result<String, CredentialError> {
        let env = RealEnvironment;
        let entry = Entry::new(KEYRING_SERVICE, key).map_err(CredentialError::from)?;
        lookup_with(key, self.strategy, &entry, &env)
    }

    /// Persist a secret so later runs do not have to ask for it again.
    pub fn save(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let entry = Entry::new(KEYRING_SERVICE, key).map_err(CredentialError::from)?;
        Keyring::set_password(&entry, value)
            .map_err(|e| CredentialError::KeyringSave(format!("Failed to save key {}: {}", key, e)))
    }
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new(KeyRetrievalStrategy::default())
    }
}

impl CredentialSource for KeyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).ok().filter(|value| !value.is_empty())
    }
}

pub fn lookup_with(
    key: &str,
    strategy: KeyRetrievalStrategy,
    keyring: &impl Keyring,
    env: &impl Environment,
) -> Result<String, CredentialError> {
    match strategy {
        KeyRetrievalStrategy::EnvironmentOnly => env.get_var(key).map_err(CredentialError::from),
        KeyRetrievalStrategy::KeyringOnly => keyring.get_password(),
        KeyRetrievalStrategy::Both => match keyring.get_password() {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::debug!("could not retrieve {key} from keyring: {e}");
                env.get_var(key).map_err(|_| {
                    CredentialError::EnvVarAccess(format!(
                        "Could not find {} in keyring or environment variables",
                        key
                    ))
                })
            }
        },
    }
}

#[cfg(test)]
pub use fixed::StaticCredentials;


#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "TEST_KEY";

    #[test]
    fn test_lookup_environment_only() {
        let mut mock_env = MockEnvironment::new();
        let mut mock_keyring = MockKeyring::new();

        mock_env
            .expect_get_var()
            .with(eq(TEST_KEY))
            .times(1)
            .return_once(|_| Ok("env_value".to_string()));

        mock_keyring.expect_get_password().times(0);

        let result = lookup_with(
            TEST_KEY,
            KeyRetrievalStrategy::EnvironmentOnly,
            &mock_keyring,
            &mock_env,
        );

        assert!(matches!(result.as_deref(), Ok("env_value")));
    }

    #[test]
    fn test_lookup_environment_only_missing() {
        let mut mock_env = MockEnvironment::new();
        let mut mock_keyring = MockKeyring::new();

        mock_env
            .expect_get_var()
            .with(eq(TEST_KEY))
            .times(1)
            .return_once(|_| Err(env::VarError::NotPresent));

        mock_keyring.expect_get_password().times(0);

        let result = lookup_with(
            TEST_KEY,
            KeyRetrievalStrategy::EnvironmentOnly,
            &mock_keyring,
            &mock_env,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_keyring_only() {
        let mut mock_env = MockEnvironment::new();
        let mut mock_keyring = MockKeyring::new();

        mock_keyring
            .expect_get_password()
            .times(1)
            .return_once(|| Ok("keyring_value".to_string()));

        mock_env.expect_get_var().times(0);

        let result = lookup_with(
            TEST_KEY,
            KeyRetrievalStrategy::KeyringOnly,
            &mock_keyring,
            &mock_env,
        );

        assert!(matches!(result.as_deref(), Ok("keyring_value")));
    }

    #[test]
    fn test_lookup_both_keyring_succeeds() {
        let mut mock_env = MockEnvironment::new();
        let mut mock_keyring = MockKeyring::new();

        mock_keyring
            .expect_get_password()
            .times(1)
            .return_once(|| Ok("keyring_value".to_string()));

        mock_env.expect_get_var().times(0);

        let result = lookup_with(
            TEST_KEY,
            KeyRetrievalStrategy::Both,
            &mock_keyring,
            &mock_env,
        );

        assert!(matches!(result.as_deref(), Ok("keyring_value")));
    }

    #[test]
    fn test_lookup_both_keyring_fails_env_succeeds() {
        let mut mock_env = MockEnvironment::new();
        let mut mock_keyring = MockKeyring::new();

        mock_keyring
            .expect_get_password()
            .times(1)
            .return_once(|| Err(CredentialError::KeyringAccess("Failed".to_string())));

        mock_env
            .expect_get_var()
            .with(eq(TEST_KEY))
            .times(1)
            .return_once(|_| Ok("env_value".to_string()));

        let result = lookup_with(
            TEST_KEY,
            KeyRetrievalStrategy::Both,
            &mock_keyring,
            &mock_env,
        );

        assert!(matches!(result.as_deref(), Ok("env_value")));
    }

    #[test]
    fn test_lookup_both_all_fail() {
        let mut mock_env = MockEnvironment::new();
        let mut mock_keyring = MockKeyring::new();

        mock_keyring
            .expect_get_password()
            .times(1)
            .return_once(|| Err(CredentialError::KeyringAccess("Failed".to_string())));

        mock_env
            .expect_get_var()
            .with(eq(TEST_KEY))
            .times(1)
            .return_once(|_| Err(env::VarError::NotPresent));

        let result = lookup_with(
            TEST_KEY,
            KeyRetrievalStrategy::Both,
            &mock_keyring,
            &mock_env,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_static_credentials_filter() {
        let source = StaticCredentials::new(&[("A", "1")]);
        assert_eq!(source.get("A").as_deref(), Some("1"));
        assert_eq!(source.get("B"), None);
    }
}
