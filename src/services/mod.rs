pub mod cache;
pub mod classifier;
pub mod dedup;
pub mod feed_client;
pub mod finished;
pub mod live;
pub mod poller;
pub mod power_play;
pub mod store;
