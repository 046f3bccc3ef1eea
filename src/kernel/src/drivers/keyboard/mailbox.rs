//! Single-slot character handoff from the keyboard interrupt to the poller.
//!
//! The slot holds at most one character. Posting while a character is still
//! pending overwrites it: the earlier key is lost. Consumers that cannot
//! tolerate this must read faster than the user types.

use core::{
    pin::Pin,
    sync::atomic::{AtomicBool, AtomicU8, Ordering},
    task::{Context, Poll},
};
use futures_util::{stream::Stream, task::AtomicWaker};

/// Slot value meaning "no character pending".
const EMPTY: u8 = 0;

/// Interrupt-to-poller character mailbox.
pub struct CharacterMailbox {
    slot: AtomicU8,
    exit_requested: AtomicBool,
    waker: AtomicWaker,
}

impl Default for CharacterMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterMailbox {
    /// Creates an empty mailbox.
    pub const fn new() -> Self {
        Self {
            slot: AtomicU8::new(EMPTY),
            exit_requested: AtomicBool::new(false),
            waker: AtomicWaker::new(),
        }
    }

    /// Stores `ch`, replacing any character not yet consumed.
    ///
    /// Called from interrupt context. NUL cannot be delivered and is dropped.
    pub fn post(&self, ch: u8) {
        if ch == EMPTY {
            return;
        }
        self.slot.store(ch, Ordering::Release);
        self.waker.wake();
    }

    /// Takes the pending character, leaving the slot empty.
    pub fn take(&self) -> Option<u8> {
        match self.slot.swap(EMPTY, Ordering::AcqRel) {
            EMPTY => None,
            ch => Some(ch),
        }
    }

    /// Returns true if a character is waiting.
    pub fn is_pending(&self) -> bool {
        self.slot.load(Ordering::Acquire) != EMPTY
    }

    /// Spins until a character arrives, then consumes it.
    ///
    /// Interrupts must be enabled, or this never returns.
    pub fn blocking_read(&self) -> u8 {
        loop {
            if let Some(ch) = self.take() {
                return ch;
            }
            core::hint::spin_loop();
        }
    }

    /// Raises the exit request set by ESC.
    pub fn request_exit(&self) {
        self.exit_requested.store(true, Ordering::Release);
    }

    /// Returns true while an exit request is outstanding.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::Acquire)
    }

    /// Clears the exit request once a reader has honoured it.
    pub fn clear_exit_request(&self) {
        self.exit_requested.store(false, Ordering::Release);
    }

    /// Returns a stream yielding each character as it is consumed.
    pub fn stream(&self) -> KeyStream<'_> {
        KeyStream { mailbox: self }
    }
}

/// Asynchronous view of a [`CharacterMailbox`].
///
/// Never terminates; each item is one consumed character.
pub struct KeyStream<'a> {
    mailbox: &'a CharacterMailbox,
}

impl Stream for KeyStream<'_> {
    type Item = u8;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<u8>> {
        // fast path
        if let Some(ch) = self.mailbox.take() {
            return Poll::Ready(Some(ch));
        }

        self.mailbox.waker.register(cx.waker());
        match self.mailbox.take() {
            Some(ch) => {
                self.mailbox.waker.take();
                Poll::Ready(Some(ch))
            }
            None => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{stream::StreamExt, task::noop_waker_ref};

    #[test]
    fn test_take_empties_the_slot() {
        let mailbox = CharacterMailbox::new();
        assert_eq!(mailbox.take(), None);
        mailbox.post(b'a');
        assert!(mailbox.is_pending());
        assert_eq!(mailbox.take(), Some(b'a'));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_second_post_overwrites_first() {
        let mailbox = CharacterMailbox::new();
        mailbox.post(b'a');
        mailbox.post(b'b');
        assert_eq!(mailbox.blocking_read(), b'b');
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_nul_is_not_delivered() {
        let mailbox = CharacterMailbox::new();
        mailbox.post(b'x');
        mailbox.post(0);
        assert_eq!(mailbox.take(), Some(b'x'));
    }

    #[test]
    fn test_exit_request_flag() {
        let mailbox = CharacterMailbox::new();
        assert!(!mailbox.exit_requested());
        mailbox.request_exit();
        assert!(mailbox.exit_requested());
        mailbox.clear_exit_request();
        assert!(!mailbox.exit_requested());
    }

    #[test]
    fn test_stream_pending_until_posted() {
        let mailbox = CharacterMailbox::new();
        let mut stream = mailbox.stream();
        let mut cx = Context::from_waker(noop_waker_ref());

        assert_eq!(stream.poll_next_unpin(&mut cx), Poll::Pending);
        mailbox.post(b'k');
        assert_eq!(stream.poll_next_unpin(&mut cx), Poll::Ready(Some(b'k')));
        assert_eq!(stream.poll_next_unpin(&mut cx), Poll::Pending);
    }
}
