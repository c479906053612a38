use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};

/// The user on whose behalf a tool runs
#[derive(Debug, Clone)]
pub struct UserIdentity {
    /// User identifier
    pub id: String,
    /// Wall-clock instant the request was received
    pub now: Timestamp,
    /// The user's time zone
    pub time_zone: TimeZone,
}

impl UserIdentity {
    /// Identity stamped with the current instant
    pub fn new(id: impl Into<String>, time_zone: TimeZone) -> Self {
        Self {
            id: id.into(),
            now: Timestamp::now(),
            time_zone,
        }
    }

    /// Identity stamped with a fixed instant
    pub fn at(id: impl Into<String>, now: Timestamp, time_zone: TimeZone) -> Self {
        Self {
            id: id.into(),
            now,
            time_zone,
        }
    }

    /// `now` expressed in the user's time zone
    pub fn local_now(&self) -> Zoned {
        self.now.to_zoned(self.time_zone.clone())
    }
}

/// The agent a conversation is held with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    /// Agent identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl AgentIdentity {
    /// Create an agent identity
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::tz::offset;

    use super::*;

    #[test]
    fn local_now_applies_time_zone() {
        let now: Timestamp = "2024-03-01T12:00:00Z".parse().unwrap();
        let user = UserIdentity::at("u1", now, TimeZone::fixed(offset(-5)));

        let local = user.local_now();
        assert_eq!(local.hour(), 7);
        assert_eq!(local.timestamp(), now);
    }
}
