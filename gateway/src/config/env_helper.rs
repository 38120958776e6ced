use std::str::FromStr;

use anyhow::Result;

use crate::errors::ConfigError;

/// Load an environment variable and parse it to the given type
///
/// # Errors
///
/// Returns a [`ConfigError`] if the variable is not set or does not parse
pub fn load_env_var<T: FromStr>(var_name: &'static str) -> Result<T> {
    load_optional_env_var(var_name)?.ok_or_else(|| ConfigError::Missing(var_name).into())
}

/// Like [`load_env_var`], falling back to `default` when the variable is unset or empty
pub fn load_env_var_or<T: FromStr>(var_name: &'static str, default: T) -> Result<T> {
    Ok(load_optional_env_var(var_name)?.unwrap_or(default))
}

/// `None` when the variable is unset or empty
pub fn load_optional_env_var<T: FromStr>(var_name: &'static str) -> Result<Option<T>> {
    let var = match std::env::var(var_name) {
        Ok(var) if !var.trim().is_empty() => var,
        _ => return Ok(None),
    };
    var.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| {
            ConfigError::Invalid {
                name: var_name,
                reason: format!("cannot parse {:?}", var),
            }
            .into()
        })
}
