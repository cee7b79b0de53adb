use crate::address::{Address, DEFAULT_SHORTEN_CHARS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Address to human readable name, as resolved by the identity layer.
pub type NameMap = HashMap<Address, String>;

pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;
pub const DEFAULT_PERCENT_DECIMALS: u32 = 3;

/// Static description of the governance protocol being displayed.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolSettings {
    pub id: String,
    pub name: String,
    pub token_symbol: String,
    pub token_decimals: u32,
    /// Hex digits kept on each side when shortening an address.
    pub address_chars: usize,
    pub percent_decimals: u32,
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self {
            id: "uniswap".to_string(),
            name: "Uniswap".to_string(),
            token_symbol: "UNI".to_string(),
            token_decimals: DEFAULT_TOKEN_DECIMALS,
            address_chars: DEFAULT_SHORTEN_CHARS,
            percent_decimals: DEFAULT_PERCENT_DECIMALS,
        }
    }
}

/// Builds a [`NameMap`] out of loosely typed identity data, skipping
/// entries whose key is not an address.
pub fn name_map_from_raw<I>(raw: I) -> NameMap
where
    I: IntoIterator<Item = (String, String)>,
{
    raw.into_iter()
        .filter_map(|(key, name)| match key.parse::<Address>() {
            Ok(address) if !name.trim().is_empty() => Some((address, name)),
            Ok(address) => {
                tracing::debug!(%address, "ignoring empty display name");
                None
            }
            Err(error) => {
                tracing::warn!(key = %key, %error, "ignoring name for invalid address");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_use_defaults() {
        let settings: ProtocolSettings =
            serde_json::from_str(r#"{ "id": "compound", "tokenSymbol": "COMP" }"#).unwrap();
        assert_eq!(settings.id, "compound");
        assert_eq!(settings.token_symbol, "COMP");
        assert_eq!(settings.token_decimals, DEFAULT_TOKEN_DECIMALS);
        assert_eq!(settings.address_chars, DEFAULT_SHORTEN_CHARS);
        assert_eq!(settings.percent_decimals, DEFAULT_PERCENT_DECIMALS);
    }

    #[test]
    fn names_skip_invalid_keys() {
        let raw: HashMap<String, String> = serde_json::from_str(
            r#"{
                "0x00000000000000000000000000000000000000AB": "alice.eth",
                "0x00000000000000000000000000000000000000cd": "",
                "bob": "bob.eth"
            }"#,
        )
        .unwrap();
        let names = name_map_from_raw(raw);
        assert_eq!(names.len(), 1);
        assert_eq!(
            names.get(&"0x00000000000000000000000000000000000000ab".parse().unwrap()),
            Some(&"alice.eth".to_string())
        );
    }
}
