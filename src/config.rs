//! Environment configuration

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::pricing::PriceTable;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub tax_rate: Option<Decimal>,
    pub prices_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8000, tax_rate: None, prices_file: None }
    }
}

impl Config {
    /// Reads `HOST`, `PORT`, `PIZZERIA_TAX_RATE` and `PIZZERIA_PRICES_FILE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where F: Fn(&str) -> Option<String> {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => defaults.port,
        };
        let tax_rate = lookup("PIZZERIA_TAX_RATE")
            .map(|raw| Decimal::from_str(raw.trim()).with_context(|| format!("PIZZERIA_TAX_RATE is not a decimal: {:?}", raw)))
            .transpose()?;
        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            tax_rate,
            prices_file: lookup("PIZZERIA_PRICES_FILE").map(PathBuf::from),
        })
    }

    pub fn bind_addr(&self) -> String { format!("{}:{}", self.host, self.port) }

    /// The reference table, or the configured file, with any tax override applied.
    pub fn price_table(&self) -> Result<PriceTable> {
        let mut table = match &self.prices_file {
            Some(path) => PriceTable::from_json_file(path)?,
            None => PriceTable::default(),
        };
        if let Some(rate) = self.tax_rate {
            table = table.with_tax_rate(rate);
        }
        table.check_complete()?;
        Ok(table)
    }
}
