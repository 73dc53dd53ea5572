//! # Mailboxes
//! Single slot handoffs between the tasks that produce input (network listener, buttons) and the
//! alarm clock tick loop that consumes it. A new value overwrites a pending one, so the consumer
//! always sees the latest message. Access is serialized by the signal's critical section mutex.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::message::MAX_PAYLOAD_LEN;
use crate::scheduler::KeyEvent;

/// A raw alarm payload, truncated to [`MAX_PAYLOAD_LEN`] bytes
pub type AlarmPayload = heapless::Vec<u8, MAX_PAYLOAD_LEN>;

/// Handoff for alarm payloads, last message wins
pub struct AlarmMailbox {
    /// The slot holding the pending payload
    slot: Signal<CriticalSectionRawMutex, AlarmPayload>,
}

impl AlarmMailbox {
    /// Create an empty mailbox
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    /// Post a payload, replacing any payload that has not been taken yet.
    /// Bytes beyond [`MAX_PAYLOAD_LEN`] are dropped.
    pub fn post(&self, bytes: &[u8]) {
        let payload: AlarmPayload = bytes.iter().copied().take(MAX_PAYLOAD_LEN).collect();
        if self.slot.signaled() {
            debug!("Overwriting pending alarm payload");
        }
        self.slot.signal(payload);
    }

    /// Take the pending payload without waiting
    pub fn take(&self) -> Option<AlarmPayload> {
        self.slot.try_take()
    }

    /// Wait for the next payload
    pub async fn wait(&self) -> AlarmPayload {
        self.slot.wait().await
    }
}

impl Default for AlarmMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Handoff for key presses, last press wins
pub struct KeyMailbox {
    /// The slot holding the pending key press
    slot: Signal<CriticalSectionRawMutex, KeyEvent>,
}

impl KeyMailbox {
    /// Create an empty mailbox
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    /// Post a key press. [`KeyEvent::None`] is not a press and is ignored.
    pub fn post(&self, key: KeyEvent) {
        if key != KeyEvent::None {
            self.slot.signal(key);
        }
    }

    /// Take the pending key press, or [`KeyEvent::None`] if there is none
    pub fn take(&self) -> KeyEvent {
        self.slot.try_take().unwrap_or(KeyEvent::None)
    }

    /// Wait for the next key press
    pub async fn wait(&self) -> KeyEvent {
        self.slot.wait().await
    }
}

impl Default for KeyMailbox {
    fn default() -> Self {
        Self::new()
    }
}
