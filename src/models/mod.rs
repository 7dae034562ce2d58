pub mod feed;
pub mod live;
pub mod score_log;
pub mod summary;
