//! Explicit toast factories.
//!
//! Nothing registers itself. The host builds a registry, registers each
//! name once, and creates controllers from it. Registering a name twice is
//! a no-op that keeps the first factory.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use super::controller::ToastController;

pub type Factory = Box<dyn Fn() -> ToastController + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Registered,
    AlreadyRegistered,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid toast name {0:?}: expected lowercase letters, digits and at least one hyphen")]
    InvalidName(String),

    #[error("no toast registered as {0:?}")]
    Unknown(String),
}

#[derive(Default)]
pub struct ToastRegistry {
    factories: BTreeMap<String, Factory>,
}

impl fmt::Debug for ToastRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToastRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<Registration, RegistryError>
    where
        F: Fn() -> ToastController + Send + Sync + 'static,
    {
        validate_name(name)?;
        if self.factories.contains_key(name) {
            tracing::debug!(name, "toast already registered");
            return Ok(Registration::AlreadyRegistered);
        }
        self.factories.insert(name.to_string(), Box::new(factory));
        tracing::debug!(name, "toast registered");
        Ok(Registration::Registered)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &str) -> Result<ToastController, RegistryError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

/// Custom-element style names: start with a letter, lowercase ASCII letters,
/// digits and hyphens, with at least one hyphen.
fn validate_name(name: &str) -> Result<(), RegistryError> {
    let valid = name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.contains('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidName(name.to_string()))
    }
}
