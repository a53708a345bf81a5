//! Running assertions inside a `figment::Jail`.
//!
//! A jail gives the closure a private working directory and restores every
//! environment variable it sets once the closure returns.

use anyhow::{Result, anyhow};

/// Execute `f` inside a [`figment::Jail`] and hand back its output.
///
/// # Errors
///
/// Returns an error if the jail cannot be created or the closure fails.
///
/// # Examples
///
/// ```
/// use poly_config_test_helpers::jail::with_jail;
///
/// let value = with_jail(|jail| {
///     jail.set_env("XP_TOWER_DEFENSE_MITOSIS", "false");
///     Ok(std::env::var("XP_TOWER_DEFENSE_MITOSIS").unwrap_or_default())
/// })?;
/// assert_eq!(value, "false");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure produced no value"))
}

/// Convert any displayable error into a [`figment::Error`] so it can be
/// returned from a jail closure with `?`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a `map_err` adaptor on owned errors"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
