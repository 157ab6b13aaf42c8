//! Per-connection lifecycle.
//!
//! ```text
//! Unregistered --register-----> Member --changeUsername--> Member
//!      |                          |
//!      +-------adminLogin---> Admin
//!                                 |
//!   any state --disconnect / EOF / ban / shutdown--> Closed
//! ```
//!
//! The phase is owned by the connection task; nothing else mutates it.

use super::presence::Role;

/// Name and color of a registered connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub color: u8,
}

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Unregistered,
    Member(Identity),
    Admin(Identity),
    Closed,
}

impl Phase {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Member(id) | Self::Admin(id) => Some(id),
            Self::Unregistered | Self::Closed => None,
        }
    }

    pub fn identity_mut(&mut self) -> Option<&mut Identity> {
        match self {
            Self::Member(id) | Self::Admin(id) => Some(id),
            Self::Unregistered | Self::Closed => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Member(_) => Some(Role::Member),
            Self::Admin(_) => Some(Role::Admin),
            Self::Unregistered | Self::Closed => None,
        }
    }

    #[inline]
    pub fn is_registered(&self) -> bool {
        self.identity().is_some()
    }

    /// Move to `Closed`, returning what the connection was.
    pub fn close(&mut self) -> Phase {
        std::mem::replace(self, Phase::Closed)
    }

    /// Short label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unregistered => "unregistered",
            Self::Member(_) => "member",
            Self::Admin(_) => "admin",
            Self::Closed => "closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_is_terminal_and_returns_previous() {
        let mut phase = Phase::Member(Identity {
            name: "alice".into(),
            color: 1,
        });
        let before = phase.close();
        assert_eq!(before.role(), Some(Role::Member));
        assert_eq!(phase, Phase::Closed);
        assert_eq!(phase.close(), Phase::Closed);
        assert!(!phase.is_registered());
    }
}
