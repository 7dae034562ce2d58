use crate::errors::{AppError, Result};
use crate::models::feed::{
    over_part, Commentary, FeedCategory, Innings, LineupPlayer, Match, MatchStatus, PlayerList,
    Side, STATUS_IN_PROGRESS,
};
use crate::models::live::{
    ActiveBowler, BallUpdate, CreaseBatsman, InningsState, LiveSnapshot, SnapshotOutcome,
};
use crate::models::score_log::ScoreLogEntry;
use crate::services::power_play::highest_power_play_score;

/// The most recently finished over, 1-indexed, and the runs it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedOver {
    pub over: u32,
    pub runs: u32,
}

/// Build the live snapshot for an in-progress fixture.
///
/// Returns [`SnapshotOutcome::Skip`] while the feed has no commentary for the
/// match yet. `log`, when given, is the stored over log for this fixture and is
/// used to report the first-six-overs leader so far.
pub fn build_snapshot(
    category: &FeedCategory,
    log: Option<&[ScoreLogEntry]>,
) -> Result<SnapshotOutcome> {
    if category.status() != MatchStatus::InProgress {
        return Err(AppError::invalid_state(STATUS_IN_PROGRESS, &category.fixture.status));
    }

    let fixture = &category.fixture;
    let commentary = fixture.commentary();
    if commentary.is_empty() {
        return Ok(SnapshotOutcome::Skip);
    }

    let active = active_innings(fixture).ok_or_else(|| {
        AppError::malformed(format!("in-progress match {} has no innings", category.id))
    })?;
    let previous = (fixture.innings.len() > 1)
        .then(|| fixture.innings_number(1))
        .flatten()
        .filter(|first| !std::ptr::eq(*first, active));

    let last_over = last_completed_over(commentary);
    let home_team = fixture.localteam.name.clone();
    let visitor_team = fixture.visitorteam.name.clone();

    let snapshot = LiveSnapshot {
        goal_id: category.id.clone(),
        match_id: fixture.id.clone(),
        in_progress: true,
        match_type: fixture.match_type.clone(),
        match_date: fixture.iso_date()?,
        batting_team: batting_team(fixture, active).to_string(),
        last_over: last_over.map(|o| o.over),
        last_over_score: last_over.map(|o| o.runs),
        wickets_count: last_over
            .map(|o| wickets_in_over(fixture, o.over))
            .unwrap_or_default(),
        current_innings: current_innings_state(active),
        previous_innings: previous.map(innings_state),
        latest_ball: commentary.first().map(|c| BallUpdate {
            over: c.over.clone(),
            over_ended: c.ends_over(),
            runs: c.runs,
            post: c.post.clone(),
        }),
        post: fixture
            .comment
            .as_ref()
            .map(|c| c.post.clone())
            .filter(|p| !p.trim().is_empty()),
        first_six_overs_leader: log
            .and_then(|entries| highest_power_play_score(entries, &home_team, &visitor_team)),
        home_team,
        visitor_team,
    };

    Ok(SnapshotOutcome::Snapshot(Box::new(snapshot)))
}

/// Newest commentary entry flagged as ending an over. The feed numbers balls
/// from `0.1`, so the over that just ended is the whole part plus one.
pub fn last_completed_over(commentary: &[Commentary]) -> Option<CompletedOver> {
    let ended = commentary.iter().find(|c| c.ends_over())?;
    let over = over_part(&ended.over)? + 1;
    Some(CompletedOver { over, runs: ended.runs })
}

/// Second innings once it exists, otherwise the only one.
fn active_innings(fixture: &Match) -> Option<&Innings> {
    if fixture.innings.len() > 1 {
        fixture
            .innings_number(2)
            .or_else(|| fixture.innings.last())
    } else {
        fixture.innings.first()
    }
}

/// The side whose lineup holds the active innings' first batsman. When the
/// lineups are missing or name neither side, the innings' own side marker decides.
fn batting_team<'a>(fixture: &'a Match, active: &Innings) -> &'a str {
    let home = fixture.localteam.name.as_str();
    let visitor = fixture.visitorteam.name.as_str();

    let opener = active
        .batsmen()
        .first()
        .map(|b| b.batsman.trim())
        .unwrap_or_default();
    let listed = |players: &PlayerList<LineupPlayer>| {
        !opener.is_empty() && players.player.iter().any(|p| p.name.trim() == opener)
    };

    match fixture.lineups.as_ref() {
        Some(lineups) if listed(&lineups.visitorteam) => visitor,
        Some(lineups) if listed(&lineups.localteam) => home,
        _ => match active.side() {
            Side::Home => home,
            Side::Visitor => visitor,
        },
    }
}

fn wickets_in_over(fixture: &Match, over: u32) -> u32 {
    fixture
        .wicket_falls()
        .iter()
        .filter(|w| over_part(&w.overs).map(|o| o + 1) == Some(over))
        .count() as u32
}

fn innings_state(innings: &Innings) -> InningsState {
    InningsState {
        inning_number: innings.inningnum,
        team: strip_innings_suffix(&innings.name),
        score: innings.total.tot.clone(),
        wickets: innings.total.wickets.clone(),
        batsmen: Vec::new(),
        bowler: None,
    }
}

fn current_innings_state(innings: &Innings) -> InningsState {
    let batsmen = innings
        .batsmen()
        .iter()
        .filter(|b| b.status.trim().eq_ignore_ascii_case("not out"))
        .map(|b| CreaseBatsman {
            name: b.batsman.clone(),
            runs: b.runs,
            balls: b.balls,
            fours: b.fours,
            sixes: b.sixes,
        })
        .collect();

    let bowler = match innings.bowlers() {
        [only] => Some(only),
        many => many.iter().find(|b| b.is_bowling()),
    }
    .map(|b| ActiveBowler {
        name: b.bowler.clone(),
        overs: b.overs.clone(),
        maidens: b.maidens,
        runs: b.runs,
        wickets: b.wickets,
    });

    InningsState {
        batsmen,
        bowler,
        ..innings_state(innings)
    }
}

/// `"India 2 INN"` -> `"India"`.
fn strip_innings_suffix(name: &str) -> String {
    let trimmed = name.trim_end();
    let Some(rest) = trimmed.strip_suffix("INN") else {
        return trimmed.to_string();
    };
    let mut words = rest.trim_end().rsplitn(2, ' ');
    match (words.next(), words.next()) {
        (Some(number), Some(team))
            if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) =>
        {
            team.trim_end().to_string()
        }
        _ => trimmed.to_string(),
    }
}
