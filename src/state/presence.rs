//! Who is online.
//!
//! The registry maps a folded username to the live connection that owns it.
//! Uniqueness is enforced by the map itself: a claim only succeeds through a
//! vacant entry, so two concurrent registrations of the same folded name
//! cannot both win.
//!
//! # Lock discipline
//!
//! Shard guards are never held across another registry call or an `.await`.
//! Lookups clone the entry out and drop the guard immediately.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parlor_proto::{fold_name, ADMIN_NAME};

use super::outbound::{ConnId, Outbound};

/// What a registered connection may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Member,
    Admin,
}

/// One online user.
#[derive(Debug, Clone)]
pub struct PresenceEntry {
    /// Display name as the user typed it.
    pub name: String,
    pub color: u8,
    pub role: Role,
    /// Join sequence number; roster order.
    pub joined: u64,
    pub outbound: Outbound,
}

impl PresenceEntry {
    #[inline]
    pub fn conn_id(&self) -> ConnId {
        self.outbound.id()
    }
}

/// The folded name is already owned by another connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameTaken;

/// Why a rename did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameError {
    /// Another connection owns the new name.
    Taken,
    /// This connection no longer owns its old name (it was evicted).
    Evicted,
}

/// Registry of online users keyed by folded name.
#[derive(Debug, Default)]
pub struct Presence {
    entries: DashMap<String, PresenceEntry>,
    seq: AtomicU64,
}

impl Presence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim `name` for `outbound`'s connection.
    ///
    /// The caller has already checked the name's syntax.
    pub fn claim(
        &self,
        name: &str,
        color: u8,
        role: Role,
        outbound: &Outbound,
    ) -> Result<PresenceEntry, NameTaken> {
        self.claim_with(name, role, outbound, || color)
    }

    /// Like [`Presence::claim`], but `color` only runs once the name is
    /// known to be free.
    pub fn claim_with(
        &self,
        name: &str,
        role: Role,
        outbound: &Outbound,
        color: impl FnOnce() -> u8,
    ) -> Result<PresenceEntry, NameTaken> {
        match self.entries.entry(fold_name(name)) {
            Entry::Occupied(_) => Err(NameTaken),
            Entry::Vacant(slot) => {
                let entry = PresenceEntry {
                    name: name.to_string(),
                    color: color(),
                    role,
                    joined: self.seq.fetch_add(1, Ordering::Relaxed),
                    outbound: outbound.clone(),
                };
                slot.insert(entry.clone());
                Ok(entry)
            }
        }
    }

    /// Move connection `conn` from `old` to `new`.
    ///
    /// The new key is claimed first and the old key released second, so at
    /// no point can a third connection register either name in between.
    /// For a moment both keys point at `conn`; [`Presence::snapshot`]
    /// de-duplicates by connection.
    pub fn rename(&self, old: &str, new: &str, conn: ConnId) -> Result<(), RenameError> {
        let old_key = fold_name(old);
        let new_key = fold_name(new);

        if old_key == new_key {
            // Case-only change: same key, just update the display name.
            return match self.entries.get_mut(&old_key) {
                Some(mut entry) if entry.conn_id() == conn => {
                    entry.name = new.to_string();
                    Ok(())
                }
                _ => Err(RenameError::Evicted),
            };
        }

        let current = self
            .entries
            .get(&old_key)
            .filter(|entry| entry.conn_id() == conn)
            .map(|entry| entry.value().clone())
            .ok_or(RenameError::Evicted)?;

        match self.entries.entry(new_key.clone()) {
            Entry::Occupied(_) => return Err(RenameError::Taken),
            Entry::Vacant(slot) => {
                slot.insert(PresenceEntry {
                    name: new.to_string(),
                    ..current
                });
            }
        }

        if self
            .entries
            .remove_if(&old_key, |_, entry| entry.conn_id() == conn)
            .is_none()
        {
            // Evicted between the lookup and the claim; give the new name back.
            self.entries
                .remove_if(&new_key, |_, entry| entry.conn_id() == conn);
            return Err(RenameError::Evicted);
        }
        Ok(())
    }

    /// Release `name` if `conn` still owns it. Safe to call more than once.
    pub fn release(&self, name: &str, conn: ConnId) -> Option<PresenceEntry> {
        self.entries
            .remove_if(&fold_name(name), |_, entry| entry.conn_id() == conn)
            .map(|(_, entry)| entry)
    }

    /// Look up a user by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<PresenceEntry> {
        self.entries
            .get(&fold_name(name))
            .map(|entry| entry.value().clone())
    }

    pub fn is_admin_online(&self) -> bool {
        self.entries.contains_key(ADMIN_NAME)
    }

    /// Consistent copy of everyone online, one entry per connection, in
    /// join order.
    pub fn snapshot(&self) -> Vec<PresenceEntry> {
        let mut seen = HashSet::new();
        let mut entries: Vec<PresenceEntry> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|entry| seen.insert(entry.conn_id()))
            .collect();
        entries.sort_by_key(|entry| entry.joined);
        entries
    }

    /// Number of online users.
    pub fn count(&self) -> usize {
        self.snapshot().len()
    }

    /// Display names in join order.
    pub fn names(&self) -> Vec<String> {
        self.snapshot().into_iter().map(|entry| entry.name).collect()
    }
}
