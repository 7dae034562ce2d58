// services/poller.rs
//
// One poll cycle: fetch the feed, persist finished summaries, log completed
// overs and publish the live snapshot list. Cycles run back to back with a
// fixed pause in between and never overlap.
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::feed::{FeedCategory, FeedDocument};
use crate::models::live::{LiveSnapshot, SnapshotOutcome};
use crate::services::cache::LiveCache;
use crate::services::classifier::classify;
use crate::services::dedup::{decide, WriteDecision};
use crate::services::feed_client::FeedSource;
use crate::services::finished::summarize;
use crate::services::live::build_snapshot;
use crate::services::power_play::highest_power_play_score;
use crate::services::store::ScoreStore;

const PLAYER_OF_THE_MATCH_FIELD: &str = "player_of_the_match";

/// Counters for one completed cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub finished: usize,
    pub summaries_inserted: usize,
    pub summaries_updated: usize,
    pub live: usize,
    pub overs_logged: usize,
    pub skipped_categories: usize,
    pub pruned_overs: u64,
}

pub struct Poller {
    feed: Arc<dyn FeedSource>,
    store: Arc<dyn ScoreStore>,
    cache: Arc<dyn LiveCache>,
    config: Arc<AppConfig>,
    last_prune: Option<DateTime<Utc>>,
}

impl Poller {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        store: Arc<dyn ScoreStore>,
        cache: Arc<dyn LiveCache>,
        config: Arc<AppConfig>,
    ) -> Self {
        Poller {
            feed,
            store,
            cache,
            config,
            last_prune: None,
        }
    }

    /// Poll forever. A failed cycle is logged and the next one still runs.
    pub async fn run(mut self) {
        tracing::info!(
            "Starting livescore poller (feed: {}, interval: {:?})",
            self.config.redacted_feed_url(),
            self.config.poll_interval
        );

        loop {
            let started = Instant::now();

            match self.run_cycle().await {
                Ok(report) => tracing::info!(
                    finished = report.finished,
                    inserted = report.summaries_inserted,
                    updated = report.summaries_updated,
                    live = report.live,
                    overs = report.overs_logged,
                    skipped = report.skipped_categories,
                    "Poll completed in {:?}",
                    started.elapsed()
                ),
                Err(e) => tracing::error!("Poll failed: {}", e),
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let document = self.feed.fetch().await?;
        let feed = FeedDocument::parse(&document)?;

        let mut report = CycleReport {
            skipped_categories: feed.rejected.len(),
            ..CycleReport::default()
        };
        for rejected in &feed.rejected {
            tracing::warn!(
                position = rejected.position,
                goal_id = rejected.id.as_deref().unwrap_or("?"),
                "Skipping undecodable category: {}",
                rejected.reason
            );
        }

        let classified = classify(feed.categories);
        report.finished = classified.finished.len();
        report.live = classified.in_progress.len();

        for category in &classified.finished {
            match self.persist_summary(category).await {
                Ok(WriteDecision::Insert) => report.summaries_inserted += 1,
                Ok(WriteDecision::UpdatePlayerOfMatch) => report.summaries_updated += 1,
                Ok(WriteDecision::NoOp) => {}
                Err(e) => skip_or_abort(category, e, &mut report)?,
            }
        }

        let mut snapshots = Vec::with_capacity(classified.in_progress.len());
        for category in &classified.in_progress {
            match self.process_live(category).await {
                Ok(Some((snapshot, logged))) => {
                    if logged {
                        report.overs_logged += 1;
                    }
                    snapshots.push(snapshot);
                }
                Ok(None) => {
                    tracing::debug!(goal_id = %category.id, "No commentary yet");
                }
                Err(e) => skip_or_abort(category, e, &mut report)?,
            }
        }

        self.publish(&snapshots).await?;
        report.pruned_overs = self.prune_if_due().await?;

        Ok(report)
    }

    async fn persist_summary(&self, category: &FeedCategory) -> Result<WriteDecision> {
        let mut summary = summarize(category)?;
        let existing = self.store.find_summary(&summary.natural_key()).await?;
        let decision = decide(&summary, existing.as_ref());

        match decision {
            WriteDecision::Insert => {
                let log = self
                    .store
                    .query_over_log(&summary.home_team, &summary.visitor_team, &summary.match_date)
                    .await?;
                summary.highest_first_six_overs_score =
                    highest_power_play_score(&log, &summary.home_team, &summary.visitor_team);
                self.store.insert_summary(&summary).await?;
                tracing::info!(goal_id = %summary.goal_id, "Stored summary for {} v {}", summary.home_team, summary.visitor_team);
            }
            WriteDecision::UpdatePlayerOfMatch => {
                let id = existing
                    .and_then(|stored| stored.id)
                    .ok_or(AppError::DocumentNotFound)?;
                self.store
                    .update_field(&id, PLAYER_OF_THE_MATCH_FIELD, &summary.player_of_the_match)
                    .await?;
                tracing::info!(goal_id = %summary.goal_id, "Player of the match set to {}", summary.player_of_the_match);
            }
            WriteDecision::NoOp => {}
        }

        Ok(decision)
    }

    /// Snapshot for one live category plus whether a new over row was logged.
    async fn process_live(&self, category: &FeedCategory) -> Result<Option<(LiveSnapshot, bool)>> {
        let mut snapshot = match build_snapshot(category, None)? {
            SnapshotOutcome::Snapshot(snapshot) => *snapshot,
            SnapshotOutcome::Skip => return Ok(None),
        };

        let mut log = self
            .store
            .query_over_log(&snapshot.home_team, &snapshot.visitor_team, &snapshot.match_date)
            .await?;
        snapshot.first_six_overs_leader =
            highest_power_play_score(&log, &snapshot.home_team, &snapshot.visitor_team);

        let Some(entry) = snapshot.over_entry() else {
            return Ok(Some((snapshot, false)));
        };

        let existing = self.store.find_over(&entry.natural_key()).await?;
        if decide(&entry, existing.as_ref()) != WriteDecision::Insert {
            return Ok(Some((snapshot, false)));
        }

        self.store.insert_over(&entry).await?;
        tracing::debug!(
            goal_id = %entry.goal_id,
            batting_team = %entry.batting_team,
            over = entry.over,
            runs = entry.runs,
            "Logged over"
        );

        // Keep the leader in step with the row just written.
        log.push(entry);
        snapshot.first_six_overs_leader =
            highest_power_play_score(&log, &snapshot.home_team, &snapshot.visitor_team);

        Ok(Some((snapshot, true)))
    }

    async fn publish(&self, snapshots: &[LiveSnapshot]) -> Result<()> {
        let payload = serde_json::to_string(snapshots)
            .map_err(|e| AppError::service(format!("failed to encode live snapshots: {}", e)))?;
        self.cache
            .set_with_ttl(&self.config.live_cache_key, &payload, self.config.live_cache_ttl_secs)
            .await
    }

    async fn prune_if_due(&mut self) -> Result<u64> {
        let now = Utc::now();
        let due = self
            .last_prune
            .map_or(true, |last| now - last >= ChronoDuration::days(1));
        if !due {
            return Ok(0);
        }

        let retention = ChronoDuration::days(i64::from(self.config.over_log_retention_days));
        let cutoff = now.checked_sub_signed(retention).ok_or_else(|| {
            AppError::configuration(format!(
                "over-log retention of {} days is out of range",
                self.config.over_log_retention_days
            ))
        })?;
        let pruned = self.store.prune_over_log(cutoff).await?;
        self.last_prune = Some(now);

        if pruned > 0 {
            tracing::info!("Pruned {} over rows older than {}", pruned, cutoff.to_rfc3339());
        }
        Ok(pruned)
    }
}

/// Category-local failures are logged and counted; anything else ends the cycle.
fn skip_or_abort(category: &FeedCategory, error: AppError, report: &mut CycleReport) -> Result<()> {
    if !error.is_category_local() {
        return Err(error);
    }
    tracing::warn!(goal_id = %category.id, "Skipping category: {}", error);
    report.skipped_categories += 1;
    Ok(())
}
