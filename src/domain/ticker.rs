//! Ticker symbols and the static symbol → display-name catalog.
//!
//! The catalog is validated once when it is built; afterwards every lookup of
//! an unknown symbol is an explicit `InvalidParameter` error.

use crate::domain::error::DashboardError;
use crate::ports::config_port::ConfigPort;
use std::collections::BTreeMap;
use std::fmt;

pub const TICKERS_SECTION: &str = "tickers";

/// Default BIST 100 subset offered when no `[tickers]` section is configured.
pub const DEFAULT_TICKERS: [(&str, &str); 5] = [
    ("ASELS.IS", "Aselsan Elektronik Sanayi ve Ticaret A.Ş."),
    ("THYAO.IS", "Türk Hava Yolları A.O."),
    ("SISE.IS", "Şişecam A.Ş."),
    ("BIMAS.IS", "BİM Birleşik Mağazalar A.Ş."),
    ("EREGL.IS", "Ereğli Demir ve Çelik Fabrikaları T.A.Ş."),
];

/// Upper-cased exchange symbol such as `THYAO.IS`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, DashboardError> {
        let symbol = input.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(DashboardError::invalid("ticker", "symbol is empty"));
        }
        if let Some(c) = symbol
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
        {
            return Err(DashboardError::invalid(
                "ticker",
                format!("unexpected character {:?} in {}", c, symbol),
            ));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerCatalog {
    names: BTreeMap<Ticker, String>,
}

impl TickerCatalog {
    pub fn new<I, S, N>(entries: I) -> Result<Self, DashboardError>
    where
        I: IntoIterator<Item = (S, N)>,
        S: AsRef<str>,
        N: Into<String>,
    {
        let mut names = BTreeMap::new();
        for (symbol, name) in entries {
            let symbol = symbol.as_ref();
            let ticker =
                Ticker::parse(symbol).map_err(|e| config_invalid(symbol, e.to_string()))?;
            let name: String = name.into();
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(config_invalid(symbol, "display name is empty".into()));
            }
            if names.insert(ticker.clone(), name).is_some() {
                return Err(config_invalid(
                    symbol,
                    format!("duplicate symbol {}", ticker),
                ));
            }
        }
        if names.is_empty() {
            return Err(config_invalid("*", "no tickers configured".into()));
        }
        Ok(Self { names })
    }

    pub fn bist_default() -> Self {
        Self {
            names: DEFAULT_TICKERS
                .iter()
                .map(|(symbol, name)| (Ticker(symbol.to_string()), name.to_string()))
                .collect(),
        }
    }

    /// Reads `[tickers]`; falls back to the BIST default set when the section is absent.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DashboardError> {
        let entries = config.section_entries(TICKERS_SECTION);
        if entries.is_empty() {
            return Ok(Self::bist_default());
        }
        Self::new(entries)
    }

    /// Resolves raw user input to a catalog member.
    pub fn resolve(&self, input: &str) -> Result<Ticker, DashboardError> {
        let ticker = Ticker::parse(input)?;
        if self.names.contains_key(&ticker) {
            Ok(ticker)
        } else {
            Err(DashboardError::invalid(
                "ticker",
                format!("unknown ticker code {}", ticker),
            ))
        }
    }

    pub fn display_name(&self, ticker: &Ticker) -> Result<&str, DashboardError> {
        self.names.get(ticker).map(String::as_str).ok_or_else(|| {
            DashboardError::invalid("ticker", format!("unknown ticker code {}", ticker))
        })
    }

    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.names.contains_key(ticker)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, &str)> {
        self.names.iter().map(|(t, n)| (t, n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn config_invalid(key: &str, reason: String) -> DashboardError {
    DashboardError::ConfigInvalid {
        section: TICKERS_SECTION.to_string(),
        key: key.to_string(),
        reason,
    }
}
