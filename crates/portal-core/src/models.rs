//! Record types exchanged with the backend.
//!
//! Field names and optionality follow the backend wire format exactly, so the
//! same types deserialize live responses and describe the seed catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::defaults;
use crate::error::{Error, Result};

// =============================================================================
// COLLECTION KEYS
// =============================================================================

/// Logical dataset identifier used for reads, caching and invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKey {
    Bookmarks,
    Switches,
    Tasks,
}

impl CollectionKey {
    /// Every collection, in display order.
    pub const ALL: [CollectionKey; 3] = [Self::Bookmarks, Self::Switches, Self::Tasks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bookmarks => "bookmarks",
            Self::Switches => "switches",
            Self::Tasks => "tasks",
        }
    }

    /// Backend command that lists this collection.
    pub fn list_command(&self) -> &'static str {
        match self {
            Self::Bookmarks => defaults::CMD_GET_BOOKMARK_SECTIONS,
            Self::Switches => defaults::CMD_LIST_SWITCHES,
            Self::Tasks => defaults::CMD_LIST_TASKS,
        }
    }

    /// Collection listed by `command`, if it is a list command.
    pub fn from_list_command(command: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.list_command() == command)
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bookmarks" => Ok(Self::Bookmarks),
            "switches" => Ok(Self::Switches),
            "tasks" => Ok(Self::Tasks),
            other => Err(Error::InvalidInput(format!(
                "unknown collection '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A record with an id that is unique within its collection.
pub trait Record {
    fn id(&self) -> i64;
}

/// A link shown on the dashboard, grouped by section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub label: String,
    pub url: String,
    /// Owning section id. Advisory: filtering never checks it.
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Record for Bookmark {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A titled group of bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkSection {
    pub id: String,
    pub title: String,
    pub links: Vec<Bookmark>,
}

/// A managed network switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub id: i64,
    pub name: String,
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for Switch {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A to-do item. The backend stores completion as an integer flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(with = "completed_flag")]
    pub completed: bool,
    pub created_at: String,
}

impl Record for Task {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Wire encoding of `Task::completed`: `0`/`1`, with booleans also accepted.
mod completed_flag {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(i64::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        struct FlagVisitor;

        impl<'de> Visitor<'de> for FlagVisitor {
            type Value = bool;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("0, 1, or a boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
                match v {
                    0 => Ok(false),
                    1 => Ok(true),
                    other => Err(E::invalid_value(de::Unexpected::Signed(other), &self)),
                }
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
                match v {
                    0 => Ok(false),
                    1 => Ok(true),
                    other => Err(E::invalid_value(de::Unexpected::Unsigned(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}

// =============================================================================
// COLLECTIONS
// =============================================================================

/// The full result set of one collection read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    Bookmarks(Vec<BookmarkSection>),
    Switches(Vec<Switch>),
    Tasks(Vec<Task>),
}

impl Collection {
    pub fn key(&self) -> CollectionKey {
        match self {
            Self::Bookmarks(_) => CollectionKey::Bookmarks,
            Self::Switches(_) => CollectionKey::Switches,
            Self::Tasks(_) => CollectionKey::Tasks,
        }
    }

    /// Number of records. Sections themselves are not counted.
    pub fn record_count(&self) -> usize {
        match self {
            Self::Bookmarks(sections) => sections.iter().map(|s| s.links.len()).sum(),
            Self::Switches(switches) => switches.len(),
            Self::Tasks(tasks) => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    pub fn bookmark_sections(&self) -> Option<&[BookmarkSection]> {
        match self {
            Self::Bookmarks(sections) => Some(sections),
            _ => None,
        }
    }

    pub fn switches(&self) -> Option<&[Switch]> {
        match self {
            Self::Switches(switches) => Some(switches),
            _ => None,
        }
    }

    pub fn tasks(&self) -> Option<&[Task]> {
        match self {
            Self::Tasks(tasks) => Some(tasks),
            _ => None,
        }
    }
}

// =============================================================================
// WRITE DRAFTS
// =============================================================================

/// New task to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
}

/// New bookmark to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    pub label: String,
    pub url: String,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Switch to save. With `id` set the backend updates that switch, otherwise
/// it inserts a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchDraft {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for a create operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Task(TaskDraft),
    Bookmark(BookmarkDraft),
    Switch(SwitchDraft),
}

impl Draft {
    /// Collection the draft belongs to.
    pub fn key(&self) -> CollectionKey {
        match self {
            Self::Task(_) => CollectionKey::Tasks,
            Self::Bookmark(_) => CollectionKey::Bookmarks,
            Self::Switch(_) => CollectionKey::Switches,
        }
    }

    /// Trim text fields and reject drafts missing required text.
    pub fn normalized(self) -> Result<Self> {
        match self {
            Self::Task(draft) => {
                let title = required("title", &draft.title)?;
                Ok(Self::Task(TaskDraft { title }))
            }
            Self::Bookmark(draft) => Ok(Self::Bookmark(BookmarkDraft {
                label: required("label", &draft.label)?,
                url: required("url", &draft.url)?,
                section: required("section", &draft.section)?,
                description: optional(draft.description),
                tags: draft.tags.map(|tags| {
                    tags.into_iter()
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                }),
            })),
            Self::Switch(draft) => Ok(Self::Switch(SwitchDraft {
                id: draft.id,
                name: required("name", &draft.name)?,
                ip: required("ip", &draft.ip)?,
                location: optional(draft.location),
                notes: optional(draft.notes),
            })),
        }
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_key_round_trip_through_str() {
        for key in CollectionKey::ALL {
            assert_eq!(key.as_str().parse::<CollectionKey>().unwrap(), key);
        }
        assert_eq!(" Switches ".parse::<CollectionKey>().unwrap(), CollectionKey::Switches);
        assert!("vlans".parse::<CollectionKey>().is_err());
    }

    #[test]
    fn test_collection_key_list_commands() {
        assert_eq!(CollectionKey::Bookmarks.list_command(), "get_bookmark_sections");
        assert_eq!(CollectionKey::Switches.list_command(), "list_switches");
        assert_eq!(CollectionKey::Tasks.list_command(), "list_tasks");
    }

    #[test]
    fn test_collection_key_from_list_command() {
        for key in CollectionKey::ALL {
            assert_eq!(CollectionKey::from_list_command(key.list_command()), Some(key));
        }
        assert_eq!(CollectionKey::from_list_command("create_task"), None);
    }

    #[test]
    fn test_task_completed_accepts_integer_and_bool() {
        let task: Task = serde_json::from_value(json!({
            "id": 1, "title": "Rotar respaldos", "completed": 1, "created_at": "2024-05-01 09:00:00"
        }))
        .unwrap();
        assert!(task.completed);

        let task: Task = serde_json::from_value(json!({
            "id": 2, "title": "x", "completed": false, "created_at": "2024-05-01 09:00:00"
        }))
        .unwrap();
        assert!(!task.completed);
    }

    #[test]
    fn test_task_completed_rejects_other_integers() {
        let result = serde_json::from_value::<Task>(json!({
            "id": 1, "title": "x", "completed": 2, "created_at": "2024-05-01"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_task_completed_serializes_as_integer() {
        let task = Task {
            id: 3,
            title: "x".to_string(),
            completed: true,
            created_at: "2024-05-01".to_string(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["completed"], json!(1));
    }

    #[test]
    fn test_switch_optional_fields_default_to_none() {
        let switch: Switch =
            serde_json::from_value(json!({"id": 7, "name": "Edge", "ip": "10.0.0.7"})).unwrap();
        assert_eq!(switch.location, None);
        assert_eq!(switch.notes, None);
    }

    #[test]
    fn test_collection_record_count_ignores_sections() {
        let collection = Collection::Bookmarks(vec![
            BookmarkSection {
                id: "a".to_string(),
                title: "A".to_string(),
                links: vec![],
            },
            BookmarkSection {
                id: "b".to_string(),
                title: "B".to_string(),
                links: vec![Bookmark {
                    id: 1,
                    label: "NAS".to_string(),
                    url: "https://nas".to_string(),
                    section: "b".to_string(),
                    description: None,
                    tags: None,
                }],
            },
        ]);
        assert_eq!(collection.record_count(), 1);
        assert_eq!(collection.key(), CollectionKey::Bookmarks);
        assert!(collection.switches().is_none());
    }

    #[test]
    fn test_draft_normalized_trims_title() {
        let draft = Draft::Task(TaskDraft {
            title: "  Cambiar UPS  ".to_string(),
        })
        .normalized()
        .unwrap();
        assert_eq!(
            draft,
            Draft::Task(TaskDraft {
                title: "Cambiar UPS".to_string()
            })
        );
    }

    #[test]
    fn test_draft_normalized_rejects_blank_required_field() {
        let err = Draft::Task(TaskDraft {
            title: "   ".to_string(),
        })
        .normalized()
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = Draft::Switch(SwitchDraft {
            id: None,
            name: "Edge".to_string(),
            ip: "".to_string(),
            location: None,
            notes: None,
        })
        .normalized()
        .unwrap_err();
        assert!(err.to_string().contains("ip"));
    }

    #[test]
    fn test_draft_normalized_drops_blank_optionals() {
        let draft = Draft::Bookmark(BookmarkDraft {
            label: "Wiki".to_string(),
            url: "https://wiki".to_string(),
            section: "tools".to_string(),
            description: Some("  ".to_string()),
            tags: Some(vec![" docs ".to_string(), "".to_string()]),
        })
        .normalized()
        .unwrap();

        match draft {
            Draft::Bookmark(b) => {
                assert_eq!(b.description, None);
                assert_eq!(b.tags, Some(vec!["docs".to_string()]));
            }
            _ => panic!("Expected bookmark draft"),
        }
    }
}
