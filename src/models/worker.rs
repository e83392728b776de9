//! Worker model.
//!
//! Workers are not independently persisted: they are synthesized from
//! capacity headcounts, one per ordinal under each capacity label, and are
//! referenced elsewhere only by their [`WorkerId`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::{CapacityKey, RoleClass};

/// Stable worker identity: capacity label plus 1-based ordinal.
///
/// Rendered as `"<label>_<ordinal>"`, e.g. `"Mechanic Team 2_1"` or
/// `"Mechanic Team 1 (Skill 1)_2"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId {
    /// Capacity label the worker was synthesized from.
    pub key: CapacityKey,
    /// Position under that label (1..=headcount).
    pub ordinal: u32,
}

/// A worker id string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWorkerIdError(pub String);

impl fmt::Display for ParseWorkerIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed worker id '{}'", self.0)
    }
}

impl std::error::Error for ParseWorkerIdError {}

impl WorkerId {
    /// Creates an id from a key and ordinal.
    pub fn new(key: CapacityKey, ordinal: u32) -> Self {
        Self { key, ordinal }
    }

    /// Parses a label and ordinal pair.
    pub fn from_label(label: &str, ordinal: u32) -> Self {
        Self::new(CapacityKey::parse(label), ordinal)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.key, self.ordinal)
    }
}

impl FromStr for WorkerId {
    type Err = ParseWorkerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseWorkerIdError(s.to_string());
        let (label, ordinal) = s.rsplit_once('_').ok_or_else(err)?;
        let ordinal: u32 = ordinal.parse().map_err(|_| err())?;
        if ordinal == 0 || label.trim().is_empty() {
            return Err(err());
        }
        Ok(Self::from_label(label, ordinal))
    }
}

impl Serialize for WorkerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorkerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A concrete worker available to the assignment engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Identity.
    pub id: WorkerId,
    /// Role-class derived from the team label.
    pub role: RoleClass,
    /// Human-readable label.
    pub name: String,
}

impl Worker {
    /// Synthesizes the worker at `ordinal` under `key`.
    pub fn new(key: CapacityKey, ordinal: u32) -> Self {
        let role = key.role();
        let name = format!("{} {} #{}", key.team, role.worker_noun(), ordinal);
        Self {
            id: WorkerId::new(key, ordinal),
            role,
            name,
        }
    }

    /// Team name.
    pub fn team(&self) -> &str {
        &self.id.key.team
    }

    /// Skill, if the worker's label carries one.
    pub fn skill(&self) -> Option<&str> {
        self.id.key.skill.as_deref()
    }

    /// Ordinal under the worker's label (stable tie-break).
    pub fn ordinal(&self) -> u32 {
        self.id.ordinal
    }

    /// Whether the worker carries the given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skill() == Some(skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_id_roundtrip_display() {
        let id = WorkerId::from_label("Mechanic Team 1 (Skill 1)", 2);
        assert_eq!(id.to_string(), "Mechanic Team 1 (Skill 1)_2");
        let parsed: WorkerId = "Mechanic Team 1 (Skill 1)_2".parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.key.skill.as_deref(), Some("Skill 1"));
    }

    #[test]
    fn test_worker_id_bare_team() {
        let id: WorkerId = "Mechanic Team 2_1".parse().unwrap();
        assert_eq!(id.key.team, "Mechanic Team 2");
        assert!(id.key.skill.is_none());
        assert_eq!(id.ordinal, 1);
    }

    #[test]
    fn test_worker_id_rejects_malformed() {
        assert!("Mechanic Team 2".parse::<WorkerId>().is_err());
        assert!("Mechanic Team 2_x".parse::<WorkerId>().is_err());
        assert!("Mechanic Team 2_0".parse::<WorkerId>().is_err());
        assert!("_3".parse::<WorkerId>().is_err());
        assert!("".parse::<WorkerId>().is_err());
    }

    #[test]
    fn test_worker_id_orders_by_label_then_ordinal() {
        let a = WorkerId::from_label("Mechanic Team 1", 2);
        let b = WorkerId::from_label("Mechanic Team 1", 10);
        let c = WorkerId::from_label("Mechanic Team 2", 1);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_worker_synthesis() {
        let w = Worker::new(CapacityKey::parse("Quality Team 3"), 1);
        assert_eq!(w.role, RoleClass::Quality);
        assert_eq!(w.name, "Quality Team 3 Inspector #1");
        assert_eq!(w.team(), "Quality Team 3");
        assert!(w.skill().is_none());
        assert_eq!(w.ordinal(), 1);
    }

    #[test]
    fn test_worker_skill() {
        let w = Worker::new(CapacityKey::parse("Mechanic Team 1 (Skill 2)"), 4);
        assert!(w.has_skill("Skill 2"));
        assert!(!w.has_skill("Skill 1"));
    }

    #[test]
    fn test_worker_id_serde_as_string() {
        let id = WorkerId::from_label("Mechanic Team 2", 1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""Mechanic Team 2_1""#);
        let back: WorkerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
