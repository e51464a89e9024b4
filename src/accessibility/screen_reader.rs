//! Screen reader announcements.
//!
//! Screens push short messages ("Image analyzed", "Settings restored") that
//! the shell hands to the platform accessibility layer. Assertive messages
//! interrupt; polite ones wait their turn.

use std::collections::VecDeque;

/// Maximum queued polite announcements; older ones are dropped first.
const MAX_PENDING: usize = 16;

/// Announcement urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Politeness {
    /// Read after the current utterance.
    Polite,
    /// Interrupts whatever is being read.
    Assertive,
}

/// A queued announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub message: String,
    pub politeness: Politeness,
}

/// Live region: only announces when its content actually changes.
#[derive(Debug, Clone, Default)]
pub struct LiveRegion {
    content: String,
    dirty: bool,
}

impl LiveRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the content; marks the region dirty only on change.
    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        let new_content = content.into();
        if self.content != new_content {
            self.content = new_content;
            self.dirty = true;
        }
        self.dirty
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

/// Queues announcements while a screen reader is active.
#[derive(Debug, Default)]
pub struct Announcer {
    enabled: bool,
    pending: VecDeque<Announcement>,
    status: LiveRegion,
}

impl Announcer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Follow the screen-reader flag of the current settings snapshot.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            tracing::info!(
                "Screen reader announcements {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        self.enabled = enabled;
        if !enabled {
            self.pending.clear();
        }
    }

    pub fn announce(&mut self, message: impl Into<String>) {
        self.push(message.into(), Politeness::Polite);
    }

    /// Announce immediately, dropping queued polite messages.
    pub fn announce_urgent(&mut self, message: impl Into<String>) {
        self.pending.retain(|a| a.politeness == Politeness::Assertive);
        self.push(message.into(), Politeness::Assertive);
    }

    /// Update the status live region, announcing only when it changed.
    pub fn set_status(&mut self, status: impl Into<String>) {
        if self.status.set_content(status) {
            let message = self.status.content().to_string();
            self.status.mark_clean();
            self.announce(message);
        }
    }

    /// Next announcement to hand to the platform, assertive first.
    pub fn pop(&mut self) -> Option<Announcement> {
        if let Some(idx) = self
            .pending
            .iter()
            .position(|a| a.politeness == Politeness::Assertive)
        {
            return self.pending.remove(idx);
        }
        self.pending.pop_front()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn push(&mut self, message: String, politeness: Politeness) {
        if !self.enabled || message.trim().is_empty() {
            return;
        }
        tracing::debug!("Screen reader {:?}: {}", politeness, message);
        if self.pending.len() >= MAX_PENDING {
            self.pending.pop_front();
        }
        self.pending.push_back(Announcement {
            message,
            politeness,
        });
    }
}
