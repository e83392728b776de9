//! Capacity labels and headcounts.
//!
//! Team capacities arrive from the optimizer keyed by labels such as
//! `"Mechanic Team 1 (Skill 2)"` or bare team names like `"Quality Team 1"`.
//! Labels are parsed once into a [`CapacityKey`] at ingestion; nothing
//! downstream re-parses label strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Coarse worker category, derived from a team label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleClass {
    /// Mechanics and every other production team.
    Standard,
    /// Quality inspectors.
    Quality,
    /// Customer representatives.
    Customer,
}

impl RoleClass {
    /// Derives the role-class from a team name.
    ///
    /// `"Quality"` anywhere in the name marks quality teams, `"Customer"`
    /// marks customer teams; everything else is standard.
    pub fn from_team(team: &str) -> Self {
        if team.contains("Quality") {
            Self::Quality
        } else if team.contains("Customer") {
            Self::Customer
        } else {
            Self::Standard
        }
    }

    /// Noun used for display labels.
    pub fn worker_noun(&self) -> &'static str {
        match self {
            Self::Standard => "Mechanic",
            Self::Quality => "Inspector",
            Self::Customer => "Customer Rep",
        }
    }
}

/// A team + optional skill capacity key.
///
/// Parsed from `"Team (Skill)"`; a label without a trailing parenthesised
/// qualifier has no skill. Serialized back as the original label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapacityKey {
    /// Team name without the skill qualifier.
    pub team: String,
    /// Skill qualifier, if the label carries one.
    pub skill: Option<String>,
}

impl CapacityKey {
    /// Creates a key from its parts.
    pub fn new(team: impl Into<String>, skill: Option<String>) -> Self {
        Self {
            team: team.into(),
            skill,
        }
    }

    /// Creates a bare team key (no skill).
    pub fn team(team: impl Into<String>) -> Self {
        Self::new(team, None)
    }

    /// Parses a `"Team (Skill)"` label. Never fails: unmatched labels
    /// become bare team keys.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if let Some(body) = label.strip_suffix(')') {
            if let Some((team, skill)) = body.rsplit_once(" (") {
                let team = team.trim();
                let skill = skill.trim();
                if !team.is_empty() && !skill.is_empty() && !skill.contains('(') {
                    return Self::new(team, Some(skill.to_string()));
                }
            }
        }
        Self::team(label)
    }

    /// Role-class of workers under this key.
    pub fn role(&self) -> RoleClass {
        RoleClass::from_team(&self.team)
    }

    /// Whether the key names a skill.
    pub fn has_skill(&self) -> bool {
        self.skill.is_some()
    }
}

impl fmt::Display for CapacityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.skill {
            Some(skill) => write!(f, "{} ({})", self.team, skill),
            None => f.write_str(&self.team),
        }
    }
}

impl FromStr for CapacityKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for CapacityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CapacityKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::parse(&label))
    }
}

/// Headcount per capacity key, iterated in label order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapacityMap {
    entries: BTreeMap<CapacityKey, u32>,
}

impl CapacityMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an entry by label.
    pub fn with(mut self, label: &str, headcount: u32) -> Self {
        self.set(CapacityKey::parse(label), headcount);
        self
    }

    /// Sets the headcount for a key.
    pub fn set(&mut self, key: CapacityKey, headcount: u32) {
        self.entries.insert(key, headcount);
    }

    /// Headcount for a key (0 when absent).
    pub fn headcount(&self, key: &CapacityKey) -> u32 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    /// Iterates entries in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&CapacityKey, u32)> {
        self.entries.iter().map(|(k, &v)| (k, v))
    }

    /// Number of labels (including zero-headcount ones).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no labels.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total headcount across all labels.
    pub fn total_headcount(&self) -> u32 {
        self.entries.values().sum()
    }

    /// Total headcount for one role-class.
    pub fn headcount_for_role(&self, role: RoleClass) -> u32 {
        self.entries
            .iter()
            .filter(|(k, _)| k.role() == role)
            .map(|(_, &v)| v)
            .sum()
    }
}

impl FromIterator<(CapacityKey, u32)> for CapacityMap {
    fn from_iter<I: IntoIterator<Item = (CapacityKey, u32)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_team_with_skill() {
        let key = CapacityKey::parse("Mechanic Team 1 (Skill 2)");
        assert_eq!(key.team, "Mechanic Team 1");
        assert_eq!(key.skill.as_deref(), Some("Skill 2"));
        assert_eq!(key.to_string(), "Mechanic Team 1 (Skill 2)");
    }

    #[test]
    fn test_parse_bare_team() {
        let key = CapacityKey::parse("Quality Team 1");
        assert_eq!(key.team, "Quality Team 1");
        assert!(key.skill.is_none());
        assert_eq!(key.to_string(), "Quality Team 1");
    }

    #[test]
    fn test_parse_malformed_labels_stay_bare() {
        assert!(CapacityKey::parse("Team ()").skill.is_none());
        assert!(CapacityKey::parse("(Skill 1)").skill.is_none());
        assert_eq!(CapacityKey::parse("  Team 3  ").team, "Team 3");
    }

    #[test]
    fn test_role_from_team() {
        assert_eq!(RoleClass::from_team("Mechanic Team 4"), RoleClass::Standard);
        assert_eq!(RoleClass::from_team("Quality Team 2"), RoleClass::Quality);
        assert_eq!(RoleClass::from_team("Customer Team 1"), RoleClass::Customer);
    }

    #[test]
    fn test_capacity_map_serde_uses_labels() {
        let map = CapacityMap::new()
            .with("Mechanic Team 1 (Skill 1)", 2)
            .with("Quality Team 1", 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Mechanic Team 1 (Skill 1)":2,"Quality Team 1":1}"#);

        let back: CapacityMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
        assert_eq!(back.total_headcount(), 3);
        assert_eq!(back.headcount_for_role(RoleClass::Quality), 1);
    }

    #[test]
    fn test_headcount_missing_key() {
        let map = CapacityMap::new().with("Mechanic Team 1", 3);
        assert_eq!(map.headcount(&CapacityKey::team("Mechanic Team 9")), 0);
        assert_eq!(map.headcount(&CapacityKey::team("Mechanic Team 1")), 3);
    }
}
