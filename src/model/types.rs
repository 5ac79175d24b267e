//! View model types for the four tracking endpoints.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use super::lenient;

/// Placeholder for a missing time value
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a missing origin room
pub const NO_ROOM: &str = "-";

/// Occupancy of a single room
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RoomStatus {
    /// Number of people currently inside
    #[serde(default, deserialize_with = "lenient::count")]
    pub count: u64,
    /// Identifiers of the people inside
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub persons: Vec<String>,
}

/// Occupancy of every monitored room, in the order the server sent them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomsSnapshot {
    rooms: Vec<(String, RoomStatus)>,
}

impl RoomsSnapshot {
    /// Number of distinct rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoomStatus)> {
        self.rooms.iter().map(|(name, status)| (name.as_str(), status))
    }

    /// Look up a room by name
    pub fn get(&self, name: &str) -> Option<&RoomStatus> {
        self.rooms
            .iter()
            .find(|(room, _)| room == name)
            .map(|(_, status)| status)
    }

    /// Sum of all room counts, saturating at `u64::MAX`
    pub fn total_people(&self) -> u64 {
        self.rooms
            .iter()
            .fold(0u64, |total, (_, status)| total.saturating_add(status.count))
    }

    /// Insert or replace a room. A replaced room keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, status: RoomStatus) {
        let name = name.into();
        match self.rooms.iter_mut().find(|(room, _)| *room == name) {
            Some(entry) => entry.1 = status,
            None => self.rooms.push((name, status)),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, RoomStatus)> for RoomsSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, RoomStatus)>>(iter: I) -> Self {
        let mut snapshot = RoomsSnapshot::default();
        for (name, status) in iter {
            snapshot.insert(name, status);
        }
        snapshot
    }
}

impl<'de> Deserialize<'de> for RoomsSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SnapshotVisitor)
    }
}

struct SnapshotVisitor;

impl<'de> Visitor<'de> for SnapshotVisitor {
    type Value = RoomsSnapshot;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of room name to room status")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(RoomsSnapshot::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(RoomsSnapshot::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut snapshot = RoomsSnapshot::default();
        while let Some((name, value)) = map.next_entry::<String, Value>()? {
            // A room whose status is not an object still counts as a room
            let status = RoomStatus::deserialize(value).unwrap_or_default();
            snapshot.insert(name, status);
        }
        Ok(snapshot)
    }
}

/// An open presence record of a person in a room
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Visit {
    #[serde(default, deserialize_with = "lenient::text")]
    pub person_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub room_name: Option<String>,
    /// Minutes spent in the room so far
    #[serde(default, deserialize_with = "lenient::minutes")]
    pub duration_min: Option<f64>,
    /// Entry time pre-formatted by the server (time of day only)
    #[serde(default, deserialize_with = "lenient::text")]
    pub enter_time_str: Option<String>,
    /// Raw entry timestamp
    #[serde(default, deserialize_with = "lenient::text")]
    pub enter_time: Option<String>,
}

impl Visit {
    pub fn person(&self) -> &str {
        self.person_id.as_deref().unwrap_or_default()
    }

    pub fn room(&self) -> &str {
        self.room_name.as_deref().unwrap_or_default()
    }

    /// Entry time, preferring the pre-formatted field
    pub fn entered_at(&self) -> &str {
        first_filled(&[&self.enter_time_str, &self.enter_time]).unwrap_or(NOT_AVAILABLE)
    }
}

/// A single person moving between rooms
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Movement {
    #[serde(default, deserialize_with = "lenient::text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub person_id: Option<String>,
    /// Absent when the person entered from outside
    #[serde(default, deserialize_with = "lenient::text")]
    pub from_room: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub to_room: Option<String>,
}

impl Movement {
    /// Time of the movement, preferring `time` over `timestamp`
    pub fn time_label(&self) -> &str {
        first_filled(&[&self.time, &self.timestamp]).unwrap_or(NOT_AVAILABLE)
    }

    pub fn person(&self) -> &str {
        self.person_id.as_deref().unwrap_or_default()
    }

    pub fn origin(&self) -> &str {
        first_filled(&[&self.from_room]).unwrap_or(NO_ROOM)
    }

    pub fn destination(&self) -> &str {
        self.to_room.as_deref().unwrap_or_default()
    }
}

/// Several people sharing a group id moving together
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroupMovement {
    #[serde(default, deserialize_with = "lenient::text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub group_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub members: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub from_room: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub to_room: Option<String>,
}

impl GroupMovement {
    pub fn time_label(&self) -> &str {
        first_filled(&[&self.time, &self.timestamp]).unwrap_or(NOT_AVAILABLE)
    }

    pub fn group(&self) -> &str {
        self.group_id.as_deref().unwrap_or_default()
    }

    /// Members joined with `", "`
    pub fn members_joined(&self) -> String {
        self.members.join(", ")
    }

    pub fn origin(&self) -> &str {
        first_filled(&[&self.from_room]).unwrap_or(NO_ROOM)
    }

    pub fn destination(&self) -> &str {
        self.to_room.as_deref().unwrap_or_default()
    }
}

/// First value that is present and non-empty
fn first_filled<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_preserves_key_order() {
        let snapshot: RoomsSnapshot =
            serde_json::from_str(r#"{"Zeta": {"count": 1}, "Alpha": {"count": 2}, "Mid": {}}"#)
                .unwrap();

        let names: Vec<&str> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_snapshot_malformed_rooms() {
        let snapshot: RoomsSnapshot = serde_json::from_str(
            r#"{"A": {"count": 2}, "B": {"count": 0, "persons": []}, "C": null, "D": 7}"#,
        )
        .unwrap();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.total_people(), 2);
        assert_eq!(snapshot.get("C"), Some(&RoomStatus::default()));
        assert_eq!(snapshot.get("D"), Some(&RoomStatus::default()));
    }

    #[test]
    fn test_total_people_saturates() {
        let snapshot: RoomsSnapshot = serde_json::from_str(
            r#"{"A": {"count": 18446744073709551615}, "B": {"count": 1}, "C": {"count": 1e30}}"#,
        )
        .unwrap();

        assert_eq!(snapshot.get("C").unwrap().count, u64::MAX);
        assert_eq!(snapshot.total_people(), u64::MAX);
    }

    #[test]
    fn test_snapshot_duplicate_key_keeps_position() {
        let snapshot: RoomsSnapshot =
            serde_json::from_str(r#"{"A": {"count": 1}, "B": {}, "A": {"count": 5}}"#).unwrap();

        let rooms: Vec<(&str, u64)> = snapshot.iter().map(|(n, s)| (n, s.count)).collect();
        assert_eq!(rooms, vec![("A", 5), ("B", 0)]);
    }

    #[test]
    fn test_snapshot_null_is_empty() {
        let snapshot: RoomsSnapshot = serde_json::from_str("null").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_snapshot_rejects_list() {
        assert!(serde_json::from_str::<RoomsSnapshot>("[1, 2]").is_err());
    }

    #[test]
    fn test_visit_entry_time_preference() {
        let visit: Visit = serde_json::from_str(
            r#"{"person_id": "p1", "enter_time": "2024-01-15 11:32:10", "enter_time_str": "11:32:10"}"#,
        )
        .unwrap();
        assert_eq!(visit.entered_at(), "11:32:10");

        let visit: Visit =
            serde_json::from_str(r#"{"enter_time": "2024-01-15 11:32:10", "enter_time_str": ""}"#)
                .unwrap();
        assert_eq!(visit.entered_at(), "2024-01-15 11:32:10");

        let visit: Visit = serde_json::from_str("{}").unwrap();
        assert_eq!(visit.entered_at(), NOT_AVAILABLE);
        assert_eq!(visit.person(), "");
    }

    #[test]
    fn test_movement_fallbacks() {
        let movement: Movement =
            serde_json::from_str(r#"{"timestamp": "2024-01-15 11:32:10", "person_id": 3, "to_room": "Hall"}"#)
                .unwrap();

        assert_eq!(movement.time_label(), "2024-01-15 11:32:10");
        assert_eq!(movement.person(), "3");
        assert_eq!(movement.origin(), NO_ROOM);
        assert_eq!(movement.destination(), "Hall");

        let movement: Movement = serde_json::from_str(r#"{"from_room": ""}"#).unwrap();
        assert_eq!(movement.time_label(), NOT_AVAILABLE);
        assert_eq!(movement.origin(), NO_ROOM);
    }

    #[test]
    fn test_group_movement_members() {
        let movement: GroupMovement = serde_json::from_str(
            r#"{"time": "10:00:00", "group_id": "g1", "members": ["a", "b"], "from_room": "Lab", "to_room": "Hall"}"#,
        )
        .unwrap();

        assert_eq!(movement.members_joined(), "a, b");
        assert_eq!(movement.origin(), "Lab");
        assert_eq!(movement.group(), "g1");
    }
}
