pub mod analytics;
pub mod health;
pub mod landing;
pub mod props;
pub mod redis;

pub use analytics::{debug_mispriced_odds, get_hit_streaks, get_mispriced_odds};
pub use health::health_check;
pub use landing::get_top_ev;
pub use props::{alternates_without_sid, get_alternates, get_markets, post_prop_rows};
pub use redis::{delete_raw_key, get_raw_key};
