use crate::models::score_log::ScoreLogEntry;
use crate::models::summary::MatchSummary;

/// What the poller should do with a freshly derived record given what the
/// store already holds under the same natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    Insert,
    /// Keep the stored summary but fill in the award the feed published late.
    UpdatePlayerOfMatch,
    NoOp,
}

/// Insert-once policy for records keyed by a natural key.
pub trait Dedup {
    fn decide(&self, existing: Option<&Self>) -> WriteDecision;
}

impl Dedup for MatchSummary {
    fn decide(&self, existing: Option<&Self>) -> WriteDecision {
        match existing {
            None => WriteDecision::Insert,
            Some(stored) if !stored.has_player_of_the_match() && self.has_player_of_the_match() => {
                WriteDecision::UpdatePlayerOfMatch
            }
            Some(_) => WriteDecision::NoOp,
        }
    }
}

impl Dedup for ScoreLogEntry {
    fn decide(&self, existing: Option<&Self>) -> WriteDecision {
        match existing {
            None => WriteDecision::Insert,
            Some(_) => WriteDecision::NoOp,
        }
    }
}

pub fn decide<R: Dedup>(new: &R, existing: Option<&R>) -> WriteDecision {
    new.decide(existing)
}
