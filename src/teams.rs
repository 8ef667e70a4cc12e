use crate::rng::GameRng;
use crate::{MAX_PLAYERS, MIN_PLAYERS};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Identifies one of the two teams.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TeamId {
    First,
    Second,
}

impl TeamId {
    /// Both teams, in play order.
    pub const ALL: [TeamId; 2] = [TeamId::First, TeamId::Second];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            TeamId::First => 0,
            TeamId::Second => 1,
        }
    }
}

/// A player. The team is assigned once, when the teams are drawn.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Player {
    name: String,
    team: TeamId,
}

impl Player {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The team this player belongs to.
    #[inline]
    pub fn team(&self) -> TeamId {
        self.team
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A team and its members, in the order they were drawn.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(try_from = "RawTeam")]
pub struct Team {
    id: TeamId,
    name: String,
    members: Vec<Player>,
    score: u64,
}

#[derive(Deserialize)]
struct RawTeam {
    id: TeamId,
    name: String,
    members: Vec<Player>,
    score: u64,
}

impl TryFrom<RawTeam> for Team {
    type Error = TeamSetupError;

    fn try_from(raw: RawTeam) -> Result<Self, Self::Error> {
        if raw.members.iter().any(|p| p.team != raw.id) {
            return Err(TeamSetupError::InconsistentRoster(
                "a player belongs to another team",
            ));
        }
        Ok(Team {
            id: raw.id,
            name: raw.name,
            members: raw.members,
            score: raw.score,
        })
    }
}

impl Team {
    fn new(id: TeamId, name: String) -> Team {
        Team {
            id,
            name,
            members: Vec::with_capacity(MAX_PLAYERS / 2),
            score: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> TeamId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in roll order.
    #[inline]
    pub fn members(&self) -> &[Player] {
        &self.members
    }

    /// Points scored so far.
    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub(crate) fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    fn add_members(&mut self, names: impl IntoIterator<Item = String>) {
        let team = self.id;
        self.members
            .extend(names.into_iter().map(|name| Player { name, team }));
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// The two teams of a game.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(try_from = "RawRoster")]
pub struct Roster {
    teams: [Team; 2],
}

#[derive(Deserialize)]
struct RawRoster {
    teams: [Team; 2],
}

impl TryFrom<RawRoster> for Roster {
    type Error = TeamSetupError;

    /// Rejects rosters [`set_teams`] couldn't have drawn.
    fn try_from(raw: RawRoster) -> Result<Self, Self::Error> {
        let [first, second] = &raw.teams;
        if first.id != TeamId::First || second.id != TeamId::Second {
            return Err(TeamSetupError::InconsistentRoster("teams are out of order"));
        }
        validate_player_count(first.members.len() + second.members.len())?;
        if first.members.len() != second.members.len() {
            return Err(TeamSetupError::InconsistentRoster("teams have different sizes"));
        }
        Ok(Roster { teams: raw.teams })
    }
}

impl Roster {
    #[inline]
    pub fn team(&self, id: TeamId) -> &Team {
        &self.teams[id.index()]
    }

    #[inline]
    pub(crate) fn team_mut(&mut self, id: TeamId) -> &mut Team {
        &mut self.teams[id.index()]
    }

    /// Both teams, in play order.
    #[inline]
    pub fn teams(&self) -> &[Team; 2] {
        &self.teams
    }

    /// Every player, first team's members first.
    pub fn players(&self) -> impl Iterator<Item = &'_ Player> {
        self.teams.iter().flat_map(|t| t.members.iter())
    }
}

impl Display for Roster {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [first, second] = &self.teams;
        write!(
            f,
            "{} players: {} \n{} players: {}",
            first.name,
            first.members.iter().join(", "),
            second.name,
            second.members.iter().join(", "),
        )
    }
}

#[derive(Error, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum TeamSetupError {
    /// Not enough players (see [`MIN_PLAYERS`]).
    #[error("minimum number of players is {0}, but {1} were provided")]
    NotEnoughPlayers(usize, usize),
    /// Too many players (see [`MAX_PLAYERS`]).
    #[error("maximum number of players is {0}, but {1} were provided")]
    TooManyPlayers(usize, usize),
    /// The players can't be split in two teams of the same size.
    #[error("an even number of players is needed, but {0} were provided")]
    OddPlayerCount(usize),
    /// A roster that couldn't have been drawn.
    #[error("inconsistent roster: {0}")]
    InconsistentRoster(&'static str),
}

impl TeamSetupError {
    /// What to tell the user before asking for the players again.
    pub fn hint(&self) -> String {
        match self {
            TeamSetupError::NotEnoughPlayers(min, _) => {
                format!("Minimum number of players is {min}. Please provide a valid number")
            }
            TeamSetupError::TooManyPlayers(max, _) => {
                format!("Maximum number of players is {max}. Please provide a valid number")
            }
            TeamSetupError::OddPlayerCount(_) => "Enter an even number of players".to_owned(),
            TeamSetupError::InconsistentRoster(_) => self.to_string(),
        }
    }
}

/// Splits a line of space-separated player names.
pub fn parse_player_names(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Checks that `count` players can be split in two teams.
pub fn validate_player_count(count: usize) -> Result<(), TeamSetupError> {
    if count < MIN_PLAYERS {
        Err(TeamSetupError::NotEnoughPlayers(MIN_PLAYERS, count))
    } else if count > MAX_PLAYERS {
        Err(TeamSetupError::TooManyPlayers(MAX_PLAYERS, count))
    } else if count % 2 != 0 {
        Err(TeamSetupError::OddPlayerCount(count))
    } else {
        Ok(())
    }
}

/// Randomly splits `players` in two teams of the same size.
///
/// The players are shuffled, then the first half joins the first team and the second half the
/// second team, both keeping the shuffled order.
pub fn set_teams(
    first_name: impl Into<String>,
    second_name: impl Into<String>,
    mut players: Vec<String>,
    rng: &mut impl GameRng,
) -> Result<Roster, TeamSetupError> {
    validate_player_count(players.len())?;

    rng.shuffle(&mut players);
    let second_half = players.split_off(players.len() / 2);

    let mut first = Team::new(TeamId::First, first_name.into());
    let mut second = Team::new(TeamId::Second, second_name.into());
    first.add_members(players);
    second.add_members(second_half);

    let roster = Roster {
        teams: [first, second],
    };
    log::info!("teams drawn: {}", roster.to_string().replace('\n', ";"));
    Ok(roster)
}
