use std::cmp::Ordering;

use crate::errors::{AppError, Result};
use crate::models::feed::{
    leading_number, Batsman, FeedCategory, Innings, MatchStatus, Side, STATUS_FINISHED,
};
use crate::models::summary::{join_entries, BatsmanMilestone, MatchSummary, SideTally};

/// A side's total is read as all out when the feed gives no wicket count.
const ALL_OUT: u32 = 10;

/// Per-side accumulators gathered while walking a side's batting card.
#[derive(Debug, Default, Clone, Copy)]
struct SideStats {
    sixes: u32,
    fours: u32,
    run_outs: u32,
    opening_partnership: u32,
}

#[derive(Debug, Default)]
struct BattingFold {
    home: SideStats,
    visitor: SideStats,
    fifties: Vec<BatsmanMilestone>,
    centuries: Vec<BatsmanMilestone>,
    top_six_hitter: Option<(String, u32)>,
    first_innings_score: u32,
    second_innings_score: u32,
}

impl BattingFold {
    fn absorb_innings(mut self, innings: &Innings) -> Self {
        let total = leading_number(&innings.total.tot).unwrap_or_default();
        if innings.inningnum == 1 {
            self.first_innings_score = total;
        } else {
            self.second_innings_score = total;
        }

        let side = innings.side();
        innings
            .batsmen()
            .iter()
            .enumerate()
            .fold(self, |acc, (position, batsman)| acc.absorb_batsman(side, position, batsman))
    }

    fn absorb_batsman(mut self, side: Side, position: usize, batsman: &Batsman) -> Self {
        let stats = match side {
            Side::Home => &mut self.home,
            Side::Visitor => &mut self.visitor,
        };
        stats.sixes += batsman.sixes;
        stats.fours += batsman.fours;
        if batsman.status.to_ascii_lowercase().contains("run out") {
            stats.run_outs += 1;
        }
        if position < 2 {
            stats.opening_partnership += batsman.runs;
        }

        let milestone = || BatsmanMilestone {
            batsman: batsman.batsman.clone(),
            runs: batsman.runs,
        };
        if batsman.runs > 100 {
            self.centuries.push(milestone());
        } else if batsman.runs > 50 {
            self.fifties.push(milestone());
        }

        let best = self.top_six_hitter.as_ref().map(|(_, s)| *s).unwrap_or(0);
        if batsman.sixes > best {
            self.top_six_hitter = Some((batsman.batsman.clone(), batsman.sixes));
        }

        self
    }
}

/// Derive the stored summary for a finished fixture. Pure: the same category
/// always yields the same record.
pub fn summarize(category: &FeedCategory) -> Result<MatchSummary> {
    let status = category.status();
    if status != MatchStatus::Finished {
        return Err(AppError::invalid_state(STATUS_FINISHED, &category.fixture.status));
    }

    let fixture = &category.fixture;
    let home_team = fixture.localteam.name.clone();
    let visitor_team = fixture.visitorteam.name.clone();
    let (home_score, home_wickets) = split_total(&fixture.localteam.totalscore);
    let (visitor_score, visitor_wickets) = split_total(&fixture.visitorteam.totalscore);

    let batting = fixture
        .innings
        .iter()
        .fold(BattingFold::default(), BattingFold::absorb_innings);

    let won = match home_score.cmp(&visitor_score) {
        Ordering::Greater => Some(home_team.clone()),
        Ordering::Less => Some(visitor_team.clone()),
        Ordering::Equal => None,
    };

    let most_run_outs = most_run_outs(
        SideTally { team: &home_team, count: batting.home.run_outs },
        SideTally { team: &visitor_team, count: batting.visitor.run_outs },
    );

    let toss = fixture
        .info("Toss")
        .and_then(|value| value.split(',').next())
        .map(|team| team.trim().to_string())
        .unwrap_or_default();

    let player_of_the_match = fixture
        .info_entries()
        .iter()
        .find(|entry| entry.name.to_ascii_lowercase().contains("of the match"))
        .map(|entry| entry.value.trim().to_string())
        .unwrap_or_default();

    Ok(MatchSummary {
        id: None,
        goal_id: category.id.clone(),
        match_id: fixture.id.clone(),
        match_type: format!("{} - {}", fixture.match_type, category.name),
        match_date: fixture.iso_date()?,
        match_status: STATUS_FINISHED.to_string(),
        home_team,
        visitor_team,
        home_team_score: home_score,
        visitor_team_score: visitor_score,
        home_team_wickets: home_wickets,
        visitor_team_wickets: visitor_wickets,
        won,
        total_match_runs: home_score + visitor_score,
        home_team_sixes: batting.home.sixes,
        visitor_team_sixes: batting.visitor.sixes,
        total_sixes: batting.home.sixes + batting.visitor.sixes,
        home_team_fours: batting.home.fours,
        visitor_team_fours: batting.visitor.fours,
        total_fours: batting.home.fours + batting.visitor.fours,
        first_innings_score: batting.first_innings_score,
        second_innings_score: batting.second_innings_score,
        toss,
        player_of_the_match,
        fifty_scorers: batting.fifties,
        century_scorers: batting.centuries,
        player_to_hit_most_sixes: batting.top_six_hitter.map(|(name, _)| name),
        most_run_outs,
        highest_opening_partnership: batting
            .home
            .opening_partnership
            .max(batting.visitor.opening_partnership),
        highest_first_six_overs_score: None,
    })
}

/// `"245/6"` -> (245, 6); `"245"` -> (245, 10). Trailing text after either
/// number is ignored.
fn split_total(total: &str) -> (u32, u32) {
    let mut parts = total.split('/');
    let score = parts
        .next()
        .and_then(leading_number)
        .unwrap_or_default();
    let wickets = parts
        .next()
        .and_then(leading_number)
        .unwrap_or(ALL_OUT);
    (score, wickets)
}

fn most_run_outs(home: SideTally<'_>, visitor: SideTally<'_>) -> String {
    match home.count.cmp(&visitor.count) {
        Ordering::Greater => home.to_string(),
        Ordering::Less => visitor.to_string(),
        Ordering::Equal => join_entries(&[home, visitor]),
    }
}
