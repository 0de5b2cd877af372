// Market data module entrypoint
pub mod adapters;     // venue-specific fetchers (Cryptsy)
pub mod normaliser;   // converts strings -> ticks
pub mod top_of_book;  // best bid / ask derived from a market's order lists
