use crate::models::feed::{FeedCategory, MatchStatus};

/// Feed categories split by match status, each bucket in feed order.
#[derive(Debug, Default)]
pub struct Classified {
    pub finished: Vec<FeedCategory>,
    pub in_progress: Vec<FeedCategory>,
}

/// Partition categories into finished and in-progress fixtures. Anything else
/// (scheduled, abandoned, statuses we have never seen) is dropped.
pub fn classify(categories: Vec<FeedCategory>) -> Classified {
    categories
        .into_iter()
        .fold(Classified::default(), |mut acc, category| {
            match category.status() {
                MatchStatus::Finished => acc.finished.push(category),
                MatchStatus::InProgress => acc.in_progress.push(category),
                MatchStatus::Other(status) => {
                    tracing::debug!(goal_id = %category.id, %status, "ignoring category");
                }
            }
            acc
        })
}
