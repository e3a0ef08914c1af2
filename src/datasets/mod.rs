//! Dataset read paths
//!
//! One module per logical dataset. Each exposes its wire types and an async read function
//! taking the injected cache (and source of record, where the dataset has one); the HTTP
//! handlers only translate the outcome into a response.

pub mod alternates;
pub mod hit_streaks;
pub mod markets;
pub mod mispriced_odds;
pub mod props_rows;
pub mod raw_key;
pub mod top_ev;
