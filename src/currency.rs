//! Currency lookup table (numeric id -> display symbol)
//!
//! Loaded once per run from a JSON object keyed by string-encoded ids:
//!
//! ```json
//! { "1": "USD", "2": "EUR", "3": "JPY" }
//! ```

use crate::error::{StatsError, StatsResult};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyTable {
    symbols: HashMap<i64, String>,
}

impl CurrencyTable {
    /// Load the table from a JSON file
    ///
    /// A missing file, invalid JSON or a non-integer key is fatal.
    pub fn load(path: impl AsRef<Path>) -> StatsResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let table = Self::from_json(&json)?;

        log::info!("Loaded {} currencies from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_json(json: &str) -> StatsResult<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;

        let mut symbols = HashMap::with_capacity(raw.len());
        for (key, symbol) in raw {
            let id: i64 = key
                .trim()
                .parse()
                .map_err(|_| StatsError::Config(format!("currency id is not an integer: {:?}", key)))?;
            symbols.insert(id, symbol);
        }

        Ok(Self { symbols })
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        Self {
            symbols: pairs.into_iter().map(|(id, s)| (id, s.into())).collect(),
        }
    }

    pub fn symbol(&self, id: i64) -> Option<&str> {
        self.symbols.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_string_keys() {
        let table = CurrencyTable::from_json(r#"{"1": "USD", "2": "EUR", "1000": "BTC"}"#).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.symbol(1), Some("USD"));
        assert_eq!(table.symbol(1000), Some("BTC"));
        assert_eq!(table.symbol(99), None);
    }

    #[test]
    fn test_non_integer_key_is_rejected() {
        let result = CurrencyTable::from_json(r#"{"usd": "USD"}"#);
        assert!(matches!(result, Err(StatsError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"1": "USD", "2": "EUR"}}"#).unwrap();

        let table = CurrencyTable::load(file.path()).unwrap();
        assert_eq!(table.symbol(2), Some("EUR"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = CurrencyTable::load("/nonexistent/currencies.json");
        assert!(matches!(result, Err(StatsError::Io(_))));
    }
}
