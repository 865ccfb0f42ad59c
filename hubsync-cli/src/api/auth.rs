//! HubSpot token resolution

use anyhow::{Result, bail};

/// Environment keys checked in order.
pub const TOKEN_KEYS: [&str; 2] = ["HUBSPOT_TOKEN", "hubspot_token"];

/// Environment first (either casing of the key), then the config file's
/// inline token. Whitespace-only values count as unset.
pub fn resolve_token(inline: Option<&str>) -> Result<String> {
    resolve_with(|key| std::env::var(key).ok(), inline)
}

fn resolve_with<F>(lookup: F, inline: Option<&str>) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    for key in TOKEN_KEYS {
        if let Some(value) = lookup(key) {
            let value = value.trim();
            if !value.is_empty() {
                return Ok(value.to_string());
            }
        }
    }

    if let Some(inline) = inline {
        let inline = inline.trim();
        if !inline.is_empty() {
            return Ok(inline.to_string());
        }
    }

    bail!(
        "No HubSpot token. Set HUBSPOT_TOKEN in the environment (a .env file works) or `token` in the config file."
    )
}
