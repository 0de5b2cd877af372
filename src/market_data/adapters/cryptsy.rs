// Cryptsy public API adapter: single-market fetch with 502 retry

use std::time::Duration;

use metrics::counter;
use reqwest::StatusCode;
use tracing::{debug, info, instrument, warn};

use super::{ReqwestTransport, Transport};
use crate::error::{TickerError, TickerResult};
use crate::journal::Journal;

pub const DEFAULT_API_URL: &str =
    "http://pubapi.cryptsy.com/api.php?method=singlemarketdata&marketid=";
pub const DOGE_MARKET_ID: u32 = 132;

/// How many times a 502 Bad Gateway is retried and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32, // retries after the first request
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 5, delay: Duration::from_secs(5) }
    }
}

pub struct CryptsyAdapter<T = ReqwestTransport> {
    pub base_url: String,  // everything up to the market id
    pub market_id: u32,    // e.g. 132 for DOGE/BTC
    pub retry: RetryPolicy,
    transport: T,
}

impl CryptsyAdapter<ReqwestTransport> {
    pub fn new(base_url: &str, market_id: u32) -> Self {
        Self::with_transport(base_url, market_id, ReqwestTransport::new())
    }
}

impl<T: Transport> CryptsyAdapter<T> {
    pub fn with_transport(base_url: &str, market_id: u32, transport: T) -> Self {
        Self {
            base_url: base_url.to_string(),
            market_id,
            retry: RetryPolicy::default(),
            transport,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn request_url(&self) -> String {
        format!("{}{}", self.base_url, self.market_id)
    }

    /// GET the market payload.
    ///
    /// 200 returns the body. 502 is retried up to `retry.attempts` times with
    /// `retry.delay` between requests. Anything else, including a transport
    /// error, fails straight away. Each outcome leaves one line in `journal`.
    #[instrument(skip_all, fields(market_id = self.market_id))]
    pub async fn fetch(&self, journal: &mut dyn Journal) -> TickerResult<Vec<u8>> {
        let url = self.request_url();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            counter!("wst_fetch_requests_total").increment(1);
            debug!(attempt, url = %url, "Requesting market data");

            let reply = match self.transport.get(&url).await {
                Ok(reply) => reply,
                Err(e) => {
                    journal.record(&format!("ERROR OCCURRED DURING HTTP REQUEST: {}", e));
                    counter!("wst_fetch_outcomes_total", "outcome" => "transport_error").increment(1);
                    return Err(TickerError::Transport(e));
                }
            };

            match reply.status {
                StatusCode::OK => {
                    info!(attempt, bytes = reply.body.len(), "Fetched market data");
                    journal.record(&format!(
                        "Fetched {} bytes from {} (attempt {})",
                        reply.body.len(),
                        url,
                        attempt
                    ));
                    counter!("wst_fetch_outcomes_total", "outcome" => "success").increment(1);
                    return Ok(reply.body);
                }
                StatusCode::BAD_GATEWAY if attempt <= self.retry.attempts => {
                    warn!(attempt, max_retries = self.retry.attempts, delay = ?self.retry.delay, "Bad gateway, retrying");
                    journal.record(&format!(
                        "BAD GATEWAY, retry {} of {} in {:?}",
                        attempt, self.retry.attempts, self.retry.delay
                    ));
                    counter!("wst_fetch_retries_total").increment(1);
                    tokio::time::sleep(self.retry.delay).await;
                }
                StatusCode::BAD_GATEWAY => {
                    journal.record(&format!("ERROR: still BAD GATEWAY after {} attempts, giving up", attempt));
                    counter!("wst_fetch_outcomes_total", "outcome" => "retries_exhausted").increment(1);
                    return Err(TickerError::RetriesExhausted { attempts: attempt });
                }
                status => {
                    journal.record(&format!("ERROR STATUS RETURNED: {}", status.as_u16()));
                    counter!("wst_fetch_outcomes_total", "outcome" => "terminal_status").increment(1);
                    return Err(TickerError::TerminalStatus { status });
                }
            }
        }
    }
}
