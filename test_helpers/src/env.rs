//! Scoped environment variables for tests that read the real process
//! environment.
//!
//! Every mutation happens while a process-wide re-entrant lock is held. A
//! [`PrefixedEnv`] keeps that lock for its whole lifetime, so two tests
//! overlaying the same prefix never observe each other's variables, and
//! restores the previous values when dropped.
//!
//! # Examples
//!
//! ```
//! use poly_config_test_helpers::env::PrefixedEnv;
//!
//! let env = PrefixedEnv::new("XP_TOWER_DEFENSE_").set("HEALTH_MULTIPLIER", "1.5");
//! assert_eq!(std::env::var("XP_TOWER_DEFENSE_HEALTH_MULTIPLIER").as_deref(), Ok("1.5"));
//! drop(env);
//! ```

use std::ffi::OsString;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_LOCK: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Hold the environment lock until the guard is dropped.
pub fn lock() -> ReentrantMutexGuard<'static, ()> {
    ENV_LOCK.lock()
}

/// Variables set under one prefix, restored on drop.
#[must_use = "dropping restores the previous environment"]
pub struct PrefixedEnv {
    prefix: String,
    saved: Vec<(String, Option<OsString>)>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl PrefixedEnv {
    /// Scope for variables starting with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            saved: Vec::new(),
            _lock: lock(),
        }
    }

    /// Set `{prefix}{suffix}` to `value`.
    pub fn set(mut self, suffix: &str, value: &str) -> Self {
        let key = format!("{}{suffix}", self.prefix);
        self.saved.push((key.clone(), std::env::var_os(&key)));
        // SAFETY: mutations are serialised by `ENV_LOCK`, held by `self`.
        unsafe { std::env::set_var(&key, value) };
        self
    }

    /// Remove `{prefix}{suffix}` for the lifetime of the scope.
    pub fn remove(mut self, suffix: &str) -> Self {
        let key = format!("{}{suffix}", self.prefix);
        self.saved.push((key.clone(), std::env::var_os(&key)));
        // SAFETY: mutations are serialised by `ENV_LOCK`, held by `self`.
        unsafe { std::env::remove_var(&key) };
        self
    }

    /// Prefix this scope writes under.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Drop for PrefixedEnv {
    fn drop(&mut self) {
        while let Some((key, original)) = self.saved.pop() {
            // SAFETY: the lock is still held; `_lock` drops after this body.
            match original {
                Some(value) => unsafe { std::env::set_var(&key, value) },
                None => unsafe { std::env::remove_var(&key) },
            }
        }
    }
}
