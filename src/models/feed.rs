// models/feed.rs
//
// Typed view over the GoalServe cricket livescore document. The provider sends a
// bare object wherever a list happens to hold exactly one element, so every list
// here goes through `one_or_many` and downstream code only ever sees a `Vec`.
use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::{AppError, Result};

pub const STATUS_FINISHED: &str = "Finished";
pub const STATUS_IN_PROGRESS: &str = "In Progress";

/// Free-text match status as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    Finished,
    InProgress,
    Other(String),
}

impl From<&str> for MatchStatus {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            STATUS_FINISHED => MatchStatus::Finished,
            STATUS_IN_PROGRESS => MatchStatus::InProgress,
            other => MatchStatus::Other(other.to_string()),
        }
    }
}

/// Result of decoding a whole feed document. Categories that failed to decode
/// are kept aside so the rest of the cycle can carry on without them.
#[derive(Debug, Default)]
pub struct FeedDocument {
    pub categories: Vec<FeedCategory>,
    pub rejected: Vec<RejectedCategory>,
}

#[derive(Debug)]
pub struct RejectedCategory {
    pub position: usize,
    pub id: Option<String>,
    pub reason: String,
}

impl FeedDocument {
    /// Decode `{"scores": {"category": ...}}`.
    ///
    /// A missing `scores` object fails the whole document; a missing or null
    /// `category` means there are no fixtures right now.
    pub fn parse(document: &Value) -> Result<Self> {
        let scores = document
            .get("scores")
            .filter(|s| s.is_object())
            .ok_or_else(|| AppError::malformed("feed document has no 'scores' object"))?;

        let raw_categories: Vec<&Value> = match scores.get("category") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().collect(),
            Some(single) => vec![single],
        };

        let mut parsed = FeedDocument::default();
        for (position, raw) in raw_categories.into_iter().enumerate() {
            match FeedCategory::deserialize(raw) {
                Ok(category) => parsed.categories.push(category),
                Err(e) => parsed.rejected.push(RejectedCategory {
                    position,
                    id: raw.get("id").map(value_to_text),
                    reason: e.to_string(),
                }),
            }
        }

        Ok(parsed)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedCategory {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(rename = "match")]
    pub fixture: Match,
}

impl FeedCategory {
    pub fn status(&self) -> MatchStatus {
        MatchStatus::from(self.fixture.status.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Match {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub status: String,
    #[serde(rename = "type", default, deserialize_with = "text")]
    pub match_type: String,
    #[serde(default, deserialize_with = "text")]
    pub date: String,
    pub localteam: FeedTeam,
    pub visitorteam: FeedTeam,
    #[serde(rename = "inning", default, deserialize_with = "one_or_many")]
    pub innings: Vec<Innings>,
    #[serde(default, deserialize_with = "or_blank")]
    pub lineups: Option<Lineups>,
    #[serde(default, deserialize_with = "or_blank")]
    pub commentaries: Option<Commentaries>,
    #[serde(default, deserialize_with = "or_blank")]
    pub wickets: Option<WicketList>,
    #[serde(default, deserialize_with = "or_blank")]
    pub matchinfo: Option<MatchInfo>,
    #[serde(default, deserialize_with = "or_blank")]
    pub comment: Option<MatchComment>,
}

impl Match {
    /// Commentary entries, newest first.
    pub fn commentary(&self) -> &[Commentary] {
        self.commentaries
            .as_ref()
            .map(|c| c.commentary.as_slice())
            .unwrap_or_default()
    }

    pub fn wicket_falls(&self) -> &[WicketFall] {
        self.wickets
            .as_ref()
            .map(|w| w.wicket.as_slice())
            .unwrap_or_default()
    }

    /// Looks up a `matchinfo` entry by exact name.
    pub fn info(&self, name: &str) -> Option<&str> {
        self.info_entries()
            .iter()
            .find(|i| i.name.trim() == name)
            .map(|i| i.value.as_str())
    }

    pub fn info_entries(&self) -> &[InfoEntry] {
        self.matchinfo
            .as_ref()
            .map(|m| m.info.as_slice())
            .unwrap_or_default()
    }

    pub fn innings_number(&self, number: u32) -> Option<&Innings> {
        self.innings.iter().find(|i| i.inningnum == number)
    }

    /// Match date as `YYYY-MM-DD`. The provider writes `day.month.year`.
    pub fn iso_date(&self) -> Result<String> {
        NaiveDate::parse_from_str(self.date.trim(), "%d.%m.%Y")
            .map(|d| d.format("%Y-%m-%d").to_string())
            .map_err(|e| AppError::malformed(format!("unreadable match date '{}': {}", self.date, e)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedTeam {
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub totalscore: String,
}

/// Which side of the fixture an innings belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Visitor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Innings {
    #[serde(default, deserialize_with = "number")]
    pub inningnum: u32,
    /// `localteam` or `visitorteam`.
    #[serde(default, deserialize_with = "text")]
    pub team: String,
    /// Display name such as `India 2 INN`.
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "or_blank")]
    pub total: InningsTotal,
    #[serde(default, deserialize_with = "or_blank")]
    pub batsmanstats: PlayerList<Batsman>,
    #[serde(default, deserialize_with = "or_blank")]
    pub bowlers: PlayerList<Bowler>,
}

impl Innings {
    pub fn side(&self) -> Side {
        if self.team.trim() == "localteam" {
            Side::Home
        } else {
            Side::Visitor
        }
    }

    pub fn batsmen(&self) -> &[Batsman] {
        &self.batsmanstats.player
    }

    pub fn bowlers(&self) -> &[Bowler] {
        &self.bowlers.player
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InningsTotal {
    #[serde(default, deserialize_with = "text")]
    pub tot: String,
    #[serde(default, deserialize_with = "text")]
    pub wickets: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PlayerList<T> {
    #[serde(default, deserialize_with = "one_or_many")]
    pub player: Vec<T>,
}

impl<T> Default for PlayerList<T> {
    fn default() -> Self {
        PlayerList { player: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Batsman {
    #[serde(default, deserialize_with = "text")]
    pub batsman: String,
    #[serde(rename = "r", default, deserialize_with = "number")]
    pub runs: u32,
    #[serde(rename = "b", default, deserialize_with = "number")]
    pub balls: u32,
    #[serde(rename = "s4", default, deserialize_with = "number")]
    pub fours: u32,
    #[serde(rename = "s6", default, deserialize_with = "number")]
    pub sixes: u32,
    /// Dismissal text, `not out` while batting.
    #[serde(default, deserialize_with = "text")]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bowler {
    #[serde(default, deserialize_with = "text")]
    pub bowler: String,
    #[serde(rename = "o", default, deserialize_with = "text")]
    pub overs: String,
    #[serde(rename = "m", default, deserialize_with = "number")]
    pub maidens: u32,
    #[serde(rename = "r", default, deserialize_with = "number")]
    pub runs: u32,
    #[serde(rename = "w", default, deserialize_with = "number")]
    pub wickets: u32,
    #[serde(default, deserialize_with = "text")]
    pub ball: String,
}

impl Bowler {
    pub fn is_bowling(&self) -> bool {
        self.ball.trim().eq_ignore_ascii_case("true")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Lineups {
    #[serde(default, deserialize_with = "or_blank")]
    pub localteam: PlayerList<LineupPlayer>,
    #[serde(default, deserialize_with = "or_blank")]
    pub visitorteam: PlayerList<LineupPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupPlayer {
    #[serde(default, deserialize_with = "text")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commentaries {
    #[serde(default, deserialize_with = "one_or_many")]
    pub commentary: Vec<Commentary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commentary {
    /// Ball reference such as `5.6`.
    #[serde(default, deserialize_with = "text")]
    pub over: String,
    #[serde(default, deserialize_with = "text")]
    pub over_ended: String,
    #[serde(default, deserialize_with = "number")]
    pub runs: u32,
    #[serde(default, deserialize_with = "text")]
    pub post: String,
}

impl Commentary {
    pub fn ends_over(&self) -> bool {
        self.over_ended.trim().eq_ignore_ascii_case("true")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WicketList {
    #[serde(default, deserialize_with = "one_or_many")]
    pub wicket: Vec<WicketFall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WicketFall {
    /// Ball reference at which the wicket fell, e.g. `5.3`.
    #[serde(default, deserialize_with = "text")]
    pub overs: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchInfo {
    #[serde(default, deserialize_with = "one_or_many")]
    pub info: Vec<InfoEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfoEntry {
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchComment {
    #[serde(default, deserialize_with = "text")]
    pub post: String,
}

/// Whole-overs part of a ball reference (`"5.3"` -> 5).
pub fn over_part(ball: &str) -> Option<u32> {
    ball.trim().split('.').next()?.trim().parse().ok()
}

/// Leading run of digits in free text (`"181 (19.2 ov)"` -> 181).
pub fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text
        .trim_start()
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

fn one_or_many<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(T::deserialize)
            .collect::<std::result::Result<_, _>>()
            .map_err(de::Error::custom),
        Some(single) => T::deserialize(single)
            .map(|item| vec![item])
            .map_err(de::Error::custom),
    }
}

/// The provider sends `""` in place of an empty container; read it as absent.
fn or_blank<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(T::default()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(de::Error::custom),
    }
}

fn text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .map(|v| value_to_text(&v))
        .unwrap_or_default())
}

fn number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|v| v as u32)
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
