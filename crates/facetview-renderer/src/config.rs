//! Layer configuration: immutable snapshots behind a swap cell, plus the
//! declarative parameter tables hosts use to build editing widgets.

use std::convert::Infallible;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layer::LayerId;
use crate::observer::Observers;

/// Editing metadata for one parameter. Bounds are advisory and never enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    Number {
        min: f64,
        max: f64,
        increment: f64,
        /// Decimal places shown by an editor.
        precision: u8,
    },
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Flag(bool),
}

impl ParamValue {
    pub fn as_number(self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(v),
            ParamValue::Flag(_) => None,
        }
    }

    pub fn as_flag(self) -> Option<bool> {
        match self {
            ParamValue::Flag(v) => Some(v),
            ParamValue::Number(_) => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown parameter '{0}'")]
    UnknownParam(String),

    #[error("Parameter '{name}' expects a {expected} value")]
    TypeMismatch { name: String, expected: &'static str },
}

impl ConfigError {
    pub(crate) fn number(name: &str) -> Self {
        ConfigError::TypeMismatch {
            name: name.to_string(),
            expected: "number",
        }
    }

    pub(crate) fn flag(name: &str) -> Self {
        ConfigError::TypeMismatch {
            name: name.to_string(),
            expected: "flag",
        }
    }
}

/// A configuration value type with a static parameter table.
pub trait Configurable: Clone + PartialEq + Send + Sync + 'static {
    fn params() -> &'static [ParamSpec];

    fn value(&self, name: &str) -> Option<ParamValue>;

    fn apply(&mut self, name: &str, value: ParamValue) -> Result<(), ConfigError>;
}

/// Untyped access to a layer's configuration, as exposed to hosts.
pub trait LayerConfig: Send + Sync {
    fn params(&self) -> &'static [ParamSpec];

    fn get(&self, name: &str) -> Option<ParamValue>;

    /// Returns `true` if the value changed, in which case observers were
    /// notified exactly once.
    fn set(&self, name: &str, value: ParamValue) -> Result<bool, ConfigError>;
}

/// Holds the current configuration as an `Arc` snapshot.
///
/// Writers clone, modify and swap in a new value; readers take the `Arc` and
/// keep using it, so a render call never sees a half-applied update.
#[derive(Debug)]
pub struct ConfigCell<C> {
    current: RwLock<Arc<C>>,
    observers: Observers,
}

impl<C: Clone + PartialEq> ConfigCell<C> {
    pub fn new(layer: LayerId, initial: C) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            observers: Observers::new(layer),
        }
    }

    pub fn snapshot(&self) -> Arc<C> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Applies `f` to a copy of the current value and publishes it if it
    /// differs. Observers run after the lock is released.
    pub fn try_update<E>(&self, f: impl FnOnce(&mut C) -> Result<(), E>) -> Result<bool, E> {
        let changed = {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let mut next = C::clone(&guard);
            f(&mut next)?;
            if next == **guard {
                false
            } else {
                *guard = Arc::new(next);
                true
            }
        };
        if changed {
            self.observers.notify();
        }
        Ok(changed)
    }

    pub fn update(&self, f: impl FnOnce(&mut C)) -> bool {
        let result: Result<bool, Infallible> = self.try_update(|c| {
            f(c);
            Ok(())
        });
        match result {
            Ok(changed) => changed,
            Err(never) => match never {},
        }
    }

    /// Swaps in a whole new value, e.g. one restored from settings.
    pub fn replace(&self, next: C) -> bool {
        self.update(|c| *c = next)
    }

    pub fn observers(&self) -> &Observers {
        &self.observers
    }
}

impl<C: Configurable> LayerConfig for ConfigCell<C> {
    fn params(&self) -> &'static [ParamSpec] {
        C::params()
    }

    fn get(&self, name: &str) -> Option<ParamValue> {
        self.snapshot().value(name)
    }

    fn set(&self, name: &str, value: ParamValue) -> Result<bool, ConfigError> {
        let changed = self.try_update(|c| c.apply(name, value))?;
        if changed {
            log::debug!("Parameter '{}' set to {:?}", name, value);
        }
        Ok(changed)
    }
}
