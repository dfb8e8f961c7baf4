//! Observable events
//!
//! Every log line carries one of these as its `event` field.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    BootStart,
    ConfigLoaded,
    Serving,
    ShutdownComplete,

    // Query processing
    QueryPlanned,
    QueryExecuted,
    QueryRejected,

    // Users
    UserCreated,
    UserUpdated,
    UserDeleted,
    InvitationSent,
    InvitationFailed,

    // Clients
    ClientCreated,
    ClientUpdated,
    ClientDeleted,

    // Projects
    ProjectCreated,
    ProjectUpdated,
    ProjectDeleted,
    TeamMemberAdded,
    TeamMemberRemoved,

    // Contact form
    ContactReceived,
    ContactAcknowledged,
    ContactEmailFailed,
    ContactAcknowledgeFailed,

    // Outbound email without a relay
    EmailLogged,

    /// Request ended in a server error
    RequestFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "ATLASDESK_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "ATLASDESK_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::QueryPlanned => "QUERY_PLANNED",
            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",

            Event::UserCreated => "USER_CREATED",
            Event::UserUpdated => "USER_UPDATED",
            Event::UserDeleted => "USER_DELETED",
            Event::InvitationSent => "INVITATION_SENT",
            Event::InvitationFailed => "INVITATION_FAILED",

            Event::ClientCreated => "CLIENT_CREATED",
            Event::ClientUpdated => "CLIENT_UPDATED",
            Event::ClientDeleted => "CLIENT_DELETED",

            Event::ProjectCreated => "PROJECT_CREATED",
            Event::ProjectUpdated => "PROJECT_UPDATED",
            Event::ProjectDeleted => "PROJECT_DELETED",
            Event::TeamMemberAdded => "TEAM_MEMBER_ADDED",
            Event::TeamMemberRemoved => "TEAM_MEMBER_REMOVED",

            Event::ContactReceived => "CONTACT_RECEIVED",
            Event::ContactAcknowledged => "CONTACT_ACKNOWLEDGED",
            Event::ContactEmailFailed => "CONTACT_EMAIL_FAILED",
            Event::ContactAcknowledgeFailed => "CONTACT_ACKNOWLEDGE_FAILED",

            Event::EmailLogged => "EMAIL_LOGGED",

            Event::RequestFailed => "REQUEST_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_upper_snake() {
        let events = [
            Event::BootStart,
            Event::ConfigLoaded,
            Event::Serving,
            Event::ShutdownComplete,
            Event::QueryPlanned,
            Event::QueryExecuted,
            Event::QueryRejected,
            Event::UserCreated,
            Event::UserUpdated,
            Event::UserDeleted,
            Event::InvitationSent,
            Event::InvitationFailed,
            Event::ClientCreated,
            Event::ClientUpdated,
            Event::ClientDeleted,
            Event::ProjectCreated,
            Event::ProjectUpdated,
            Event::ProjectDeleted,
            Event::TeamMemberAdded,
            Event::TeamMemberRemoved,
            Event::ContactReceived,
            Event::ContactAcknowledged,
            Event::ContactEmailFailed,
            Event::ContactAcknowledgeFailed,
            Event::EmailLogged,
            Event::RequestFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Event::QueryPlanned.to_string(), "QUERY_PLANNED");
    }
}
