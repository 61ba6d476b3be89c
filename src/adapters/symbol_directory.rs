//! Instrument directory: the list of companies offered in the dashboard's
//! picker.
//!
//! `;`-separated CSV with at least the columns `snome` (display name) and
//! `sigla_acao` (ticker without exchange suffix).

use crate::domain::error::PlotosError;
use std::path::Path;

pub const DEFAULT_SUFFIX: &str = ".SA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub name: String,
    pub ticker: String,
}

impl Listing {
    /// Ticker as the market-data provider knows it, e.g. `PETR4` + `.SA`.
    pub fn market_symbol(&self, suffix: &str) -> String {
        if suffix.is_empty() || self.ticker.ends_with(suffix) {
            self.ticker.clone()
        } else {
            format!("{}{}", self.ticker, suffix)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolDirectory {
    listings: Vec<Listing>,
}

impl SymbolDirectory {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PlotosError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PlotosError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_csv(&content)
    }

    pub fn from_csv(content: &str) -> Result<Self, PlotosError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| PlotosError::Data {
                reason: format!("symbol list header: {}", e),
            })?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| PlotosError::Data {
                    reason: format!("symbol list has no {} column", name),
                })
        };
        let name_col = column("snome")?;
        let ticker_col = column("sigla_acao")?;

        let mut listings = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| PlotosError::Data {
                reason: format!("symbol list parse error: {}", e),
            })?;
            let name = record.get(name_col).unwrap_or_default().trim();
            let ticker = record.get(ticker_col).unwrap_or_default().trim();
            if name.is_empty() || ticker.is_empty() {
                continue;
            }
            listings.push(Listing {
                name: name.to_string(),
                ticker: ticker.to_uppercase(),
            });
        }

        Ok(Self { listings })
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// First listing whose display name matches, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&Listing> {
        let needle = name.trim().to_lowercase();
        self.listings
            .iter()
            .find(|l| l.name.to_lowercase() == needle)
    }

    pub fn find_by_ticker(&self, ticker: &str) -> Option<&Listing> {
        let needle = ticker.trim().to_uppercase();
        self.listings.iter().find(|l| l.ticker == needle)
    }
}
