//! Fetch, decode and report one market's last trade price.

use std::fmt;
use std::io::Write;

use tracing::{info, instrument, warn};

use crate::error::{TickerError, TickerResult};
use crate::journal::Journal;
use crate::market_data::adapters::cryptsy::CryptsyAdapter;
use crate::market_data::adapters::cryptsy_types::{Market, MarketSnapshot};
use crate::market_data::adapters::Transport;
use crate::market_data::normaliser::Normaliser;
use crate::market_data::top_of_book::TopOfBook;

/// Label and last trade price, as sent by the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub label: String,
    pub last_trade_price: String,
}

impl From<&Market> for Quote {
    fn from(market: &Market) -> Self {
        Self {
            label: market.label.clone(),
            last_trade_price: market.last_trade_price.clone(),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.label, self.last_trade_price)
    }
}

/// Parse a response body. A body with `success != 1` is rejected.
pub fn decode(payload: &[u8]) -> TickerResult<MarketSnapshot> {
    let snapshot: MarketSnapshot = serde_json::from_slice(payload)?;
    if snapshot.success != 1 {
        return Err(TickerError::Rejected {
            success: snapshot.success,
            message: snapshot.error.unwrap_or_default(),
        });
    }
    Ok(snapshot)
}

pub struct Reporter<T> {
    pub adapter: CryptsyAdapter<T>,
    pub market_code: String, // e.g. "DOGE"
    pub normaliser: Normaliser,
}

impl<T: Transport> Reporter<T> {
    pub fn new(adapter: CryptsyAdapter<T>, market_code: &str, normaliser: Normaliser) -> Self {
        Self { adapter, market_code: market_code.to_string(), normaliser }
    }

    /// One fetch-decode-report cycle.
    ///
    /// Writes `<label> : <price>` to `out` only when every step succeeded.
    /// Decode and lookup failures are journaled here, fetch failures by the
    /// adapter; the error is returned either way.
    #[instrument(skip_all, fields(market = %self.market_code))]
    pub async fn run<W: Write>(&self, journal: &mut dyn Journal, out: &mut W) -> TickerResult<Quote> {
        let payload = self.adapter.fetch(journal).await?;

        let quote = match self.extract(&payload) {
            Ok(quote) => quote,
            Err(e) => {
                journal.record(&format!("ERROR: {}", e));
                return Err(e);
            }
        };

        writeln!(out, "{}", quote)?;
        journal.record(&format!("SUCCESS: {}", quote));
        info!(label = %quote.label, price = %quote.last_trade_price, "Reported quote");
        Ok(quote)
    }

    fn extract(&self, payload: &[u8]) -> TickerResult<Quote> {
        let snapshot = decode(payload)?;
        let market = snapshot.market(&self.market_code)?;
        self.log_top_of_book(market);
        Ok(Quote::from(market))
    }

    fn log_top_of_book(&self, market: &Market) {
        match TopOfBook::from_market(market, &self.normaliser) {
            Ok(tob) => {
                let fmt_px = |px: Option<i64>| px.map(|p| self.normaliser.format_ticks(p));
                info!(
                    best_bid = ?fmt_px(tob.best_bid),
                    best_ask = ?fmt_px(tob.best_ask),
                    spread = ?fmt_px(tob.spread()),
                    trades = market.recent_trades.len(),
                    "Top of book"
                );
            }
            Err(e) => warn!(error = %e, "Skipping top of book"),
        }
    }
}
