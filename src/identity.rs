//! Operator identity resolution.
//!
//! Board documents are keyed by operator identity. Rather than
//! requiring `--as` on every invocation, identity is resolved through
//! a chain:
//!
//! 1. `--as <identity>` — explicit per-command override
//! 2. `MOORINGS_IDENTITY` env var — shell/session level
//! 3. `~/.moorings/config.toml` — global default (`identity = "..."`)
//!
//! The panel requires a resolved identity: whole-document saves are
//! keyed by it. The status board does not — with no identity anywhere
//! it shows the legacy unscoped document, the same as a display link
//! without a user parameter.

use std::{env, fs};

use serde::Deserialize;

#[derive(Deserialize)]
struct Config {
    identity: Option<String>,
}

/// Error message shown when identity cannot be resolved.
pub const IDENTITY_REQUIRED: &str = "identity required: pass --as <identity>, \
    set MOORINGS_IDENTITY, or add `identity = \"...\"` to ~/.moorings/config.toml";

/// Resolve the acting identity from the tiered resolution chain.
///
/// Returns an error with [`IDENTITY_REQUIRED`] when no source yields a
/// value.
pub fn resolve(explicit: Option<&str>) -> Result<String, String> {
    lookup(explicit)?.ok_or_else(|| IDENTITY_REQUIRED.to_string())
}

/// Like [`resolve`], but a fully absent identity is acceptable: the
/// caller falls back to the legacy unscoped document.
pub fn resolve_optional(explicit: Option<&str>) -> Result<Option<String>, String> {
    lookup(explicit)
}

fn lookup(explicit: Option<&str>) -> Result<Option<String>, String> {
    // 1. Explicit --as flag.
    if let Some(id) = explicit {
        return Ok(Some(id.to_string()));
    }

    // 2. MOORINGS_IDENTITY environment variable.
    if let Ok(id) = env::var("MOORINGS_IDENTITY")
        && !id.is_empty()
    {
        return Ok(Some(id));
    }

    // 3. ~/.moorings/config.toml.
    read_config_identity()
}

/// Read the `identity` field from `~/.moorings/config.toml`, if it
/// exists.
fn read_config_identity() -> Result<Option<String>, String> {
    let Some(home) = dirs::home_dir() else {
        return Ok(None);
    };

    let path = home.join(".moorings").join("config.toml");

    let contents = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
    };

    let config: Config = toml::from_str(&contents)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;

    Ok(config.identity.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_wins() {
        // When an explicit identity is provided, it is returned
        // immediately without touching the env or filesystem.
        assert_eq!(resolve(Some("alice")).unwrap(), "alice");
        assert_eq!(resolve_optional(Some("alice")).unwrap().as_deref(), Some("alice"));
    }
}
