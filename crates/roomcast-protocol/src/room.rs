//! Room naming and the room → topic mapping.
//!
//! Room ids are part of the public surface: any service that wants to
//! talk in the same room must build the id the same way, so the course
//! and direct-message forms live here rather than in callers.

use std::fmt;

use roomcast_transport::Topic;
use serde::{Deserialize, Serialize};

/// Topic prefix shared by every room of a deployment.
pub const DEFAULT_TOPIC_NAMESPACE: &str = "roomcast/rooms/";

/// Caller-chosen logical room identifier.
///
/// Any string is a valid room id; [`course`](Self::course) and
/// [`direct`](Self::direct) build the two conventional forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps an arbitrary room id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The chat room of a course: `course-<course_id>`.
    pub fn course(course_id: impl fmt::Display) -> Self {
        Self(format!("course-{course_id}"))
    }

    /// The direct-message room between two users: `dm-<lo>-<hi>`.
    ///
    /// The ids are sorted first, so both participants compute the same
    /// room whichever way round they pass them.
    pub fn direct(user_a: &str, user_b: &str) -> Self {
        let (lo, hi) = if user_a <= user_b {
            (user_a, user_b)
        } else {
            (user_b, user_a)
        };
        Self(format!("dm-{lo}-{hi}"))
    }

    /// Returns the raw room id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Maps room ids onto transport topics: namespace prefix + room id.
///
/// Distinct room ids always give distinct topics within one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMapper {
    namespace: String,
}

impl TopicMapper {
    /// Creates a mapper with the given namespace prefix.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Returns the namespace prefix.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the transport topic for `room`.
    pub fn topic_for(&self, room: &RoomId) -> Topic {
        Topic::new(format!("{}{}", self.namespace, room.as_str()))
    }
}

impl Default for TopicMapper {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC_NAMESPACE)
    }
}
