//! Turn tracker: an ordered sequence of entries grouped into named teams.

use common::{EntryId, ObjectId};
use serde::{Deserialize, Serialize};

/// A named group of turn entries.
///
/// The first team is the default destination when no team name is
/// supplied with an insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
}

impl Team {
    /// Creates a team with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A single entry in the turn order.
///
/// Entry positions are 0-based indices into the live sequence; the
/// `EntryId` is the stable identity actions use to re-validate
/// presence before applying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEntry {
    pub id: EntryId,
    pub object: ObjectId,
    pub value: i32,
    pub team: String,
}

impl TurnEntry {
    /// Creates an entry for an object with a fresh identity.
    ///
    /// The owning team is resolved when the entry is inserted into a
    /// tracker.
    pub fn new(object: ObjectId, value: i32) -> Self {
        Self {
            id: EntryId::new(),
            object,
            value,
            team: String::new(),
        }
    }
}

/// Ordered sequence of turn entries, grouped into named teams.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnTracker {
    teams: Vec<Team>,
    entries: Vec<TurnEntry>,
}

impl TurnTracker {
    /// Creates an empty tracker with no teams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a team to the tracker.
    pub fn add_team(&mut self, name: impl Into<String>) {
        self.teams.push(Team::new(name));
    }

    /// Returns the teams in order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Returns the default (first) team, if any.
    pub fn default_team(&self) -> Option<&Team> {
        self.teams.first()
    }

    /// Resolves a requested team name to an owned team.
    ///
    /// An unknown or absent name falls back to the first team. Returns
    /// `None` only when the tracker has no teams at all.
    pub fn resolve_team(&self, requested: Option<&str>) -> Option<&str> {
        if let Some(name) = requested
            && let Some(team) = self.teams.iter().find(|t| t.name == name)
        {
            return Some(&team.name);
        }
        self.teams.first().map(|t| t.name.as_str())
    }

    /// Inserts an entry at the given position under the requested team.
    ///
    /// `index: None` appends; an index past the end clamps to append.
    /// Returns the position the entry landed at, or `None` when the
    /// tracker has no team to own it (the entry is not inserted).
    pub fn insert_entry(
        &mut self,
        mut entry: TurnEntry,
        index: Option<usize>,
        team: Option<&str>,
    ) -> Option<usize> {
        let team = self.resolve_team(team)?.to_string();
        entry.team = team;

        let at = index.unwrap_or(self.entries.len()).min(self.entries.len());
        self.entries.insert(at, entry);
        Some(at)
    }

    /// Removes the entry with the given identity.
    ///
    /// Returns the position it occupied and the entry itself, or `None`
    /// if no such entry is present.
    pub fn remove_entry(&mut self, id: EntryId) -> Option<(usize, TurnEntry)> {
        let at = self.entry_position(id)?;
        Some((at, self.entries.remove(at)))
    }

    /// Returns true if an entry with the given identity is present.
    pub fn contains_entry(&self, id: EntryId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Returns the current position of an entry, if present.
    pub fn entry_position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Returns the entries in turn order.
    pub fn entries(&self) -> &[TurnEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tracker has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
