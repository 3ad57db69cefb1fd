//! Message types.

use chrono::{DateTime, Utc};
use declara_shared::types::{MessageId, OrganizationId, OrganizationKind};
use serde::{Deserialize, Serialize};

/// Direction of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// From a regional council to the national council.
    CraToCfa,
    /// Broadcast from the national council to every regional council.
    CfaToCras,
}

impl MessageKind {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CraToCfa => "cra_to_cfa",
            Self::CfaToCras => "cfa_to_cras",
        }
    }

    /// Parses the stored representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cra_to_cfa" => Some(Self::CraToCfa),
            "cfa_to_cras" => Some(Self::CfaToCras),
            _ => None,
        }
    }

    /// The only direction an organization of this kind may send.
    #[must_use]
    pub fn sent_by(kind: OrganizationKind) -> Self {
        match kind {
            OrganizationKind::Cfa => Self::CfaToCras,
            OrganizationKind::Cra => Self::CraToCfa,
        }
    }
}

/// A message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID.
    pub id: MessageId,
    /// Sending organization.
    pub sender_org: OrganizationId,
    /// Direction.
    pub kind: MessageKind,
    /// Text.
    pub content: String,
    /// Whether a recipient marked it read.
    pub read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Whether a member of `org` (of the given kind) may see this message.
    #[must_use]
    pub fn is_visible_to(&self, org: OrganizationId, kind: OrganizationKind) -> bool {
        match kind {
            OrganizationKind::Cfa => true,
            OrganizationKind::Cra => self.kind == MessageKind::CfaToCras || self.sender_org == org,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(kind: MessageKind, sender: OrganizationId) -> Message {
        Message {
            id: MessageId::new(),
            sender_org: sender,
            kind,
            content: "Prazo prorrogado".into(),
            read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_visibility() {
        let own = OrganizationId::new();
        let other = OrganizationId::new();
        let broadcast = message(MessageKind::CfaToCras, OrganizationId::new());
        let mine = message(MessageKind::CraToCfa, own);
        let theirs = message(MessageKind::CraToCfa, other);

        assert!(broadcast.is_visible_to(own, OrganizationKind::Cra));
        assert!(mine.is_visible_to(own, OrganizationKind::Cra));
        assert!(!theirs.is_visible_to(own, OrganizationKind::Cra));
        assert!(theirs.is_visible_to(OrganizationId::new(), OrganizationKind::Cfa));
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [MessageKind::CraToCfa, MessageKind::CfaToCras] {
            assert_eq!(MessageKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::sent_by(OrganizationKind::Cra), MessageKind::CraToCfa);
    }
}
