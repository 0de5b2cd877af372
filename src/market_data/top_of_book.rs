use crate::error::TickerResult;
use crate::market_data::adapters::cryptsy_types::{Market, Order};
use crate::market_data::normaliser::Normaliser;

// Best bid / best ask of one market, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopOfBook {
    pub best_bid: Option<i64>, // highest buy price
    pub best_ask: Option<i64>, // lowest sell price
}

impl TopOfBook {
    pub fn from_market(market: &Market, norm: &Normaliser) -> TickerResult<Self> {
        let bids = prices(&market.buy_orders, norm)?;
        let asks = prices(&market.sell_orders, norm)?;
        Ok(Self {
            best_bid: bids.into_iter().max(),
            best_ask: asks.into_iter().min(),
        })
    }

    // None for a one-sided book or a spread that does not fit in i64
    pub fn spread(&self) -> Option<i64> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => ask.checked_sub(bid),
            _ => None,
        }
    }
}

fn prices(orders: &[Order], norm: &Normaliser) -> TickerResult<Vec<i64>> {
    orders.iter().map(|o| norm.to_ticks(&o.price)).collect()
}
