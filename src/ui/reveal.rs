//! Progressive character reveal
//!
//! [`reveal`] turns a message into the lazy, finite sequence of its prefixes,
//! one more character each step. [`Typewriter`] plays that sequence to a
//! writer at a fixed interval, keyed by message identity: a message it has
//! already played is not replayed, a new one starts from empty.

use crate::session::SessionId;
use std::io::{self, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Prefixes of a string, from empty to complete
///
/// Prefixes always end on a character boundary.
#[derive(Debug, Clone)]
pub struct Reveal<'a> {
    content: &'a str,
    end: usize,
    done: bool,
}

/// Reveal `content` one character at a time
///
/// # Examples
///
/// ```
/// use nova_scribe::ui::reveal;
///
/// let steps: Vec<&str> = reveal("Hé!").collect();
/// assert_eq!(steps, vec!["", "H", "Hé", "Hé!"]);
/// ```
pub fn reveal(content: &str) -> Reveal<'_> {
    Reveal {
        content,
        end: 0,
        done: false,
    }
}

impl<'a> Iterator for Reveal<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let prefix = &self.content[..self.end];
        match self.content[self.end..].chars().next() {
            Some(c) => self.end += c.len_utf8(),
            None => self.done = true,
        }
        Some(prefix)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = self.content[self.end..].chars().count() + 1;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Reveal<'_> {}

/// Identity of a displayed message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageKey {
    /// Session the message belongs to, if any
    pub session: Option<SessionId>,
    /// Position in the transcript
    pub index: usize,
}

/// Timed player for [`Reveal`] sequences
#[derive(Debug, Clone)]
pub struct Typewriter {
    interval: Duration,
    current: Option<MessageKey>,
}

impl Typewriter {
    /// Create a typewriter revealing one character per `interval`
    ///
    /// A zero interval writes messages in one go.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            current: None,
        }
    }

    /// Play a message
    ///
    /// Returns without writing if `key` is the message played last.
    /// Cancelling `cancel` writes the rest of the message at once.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`
    pub async fn play<W: Write>(
        &mut self,
        key: MessageKey,
        content: &str,
        out: &mut W,
        cancel: &CancellationToken,
    ) -> io::Result<()> {
        if self.current == Some(key) {
            return Ok(());
        }
        self.current = Some(key);

        if self.interval.is_zero() || cancel.is_cancelled() {
            out.write_all(content.as_bytes())?;
            return out.flush();
        }

        let mut shown = 0;
        for prefix in reveal(content).skip(1) {
            out.write_all(prefix[shown..].as_bytes())?;
            out.flush()?;
            shown = prefix.len();

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => {
                    out.write_all(content[shown..].as_bytes())?;
                    return out.flush();
                }
            }
        }

        Ok(())
    }

    /// Forget the last played message so it can be played again
    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(index: usize) -> MessageKey {
        MessageKey {
            session: Some(1),
            index,
        }
    }

    #[test]
    fn test_reveal_empty_string_yields_single_empty_prefix() {
        let steps: Vec<&str> = reveal("").collect();
        assert_eq!(steps, vec![""]);
    }

    #[test]
    fn test_reveal_is_exact_size() {
        let r = reveal("Hi there");
        assert_eq!(r.len(), 9);
        assert_eq!(r.last(), Some("Hi there"));
    }

    #[test]
    fn test_reveal_handles_multibyte_characters() {
        let steps: Vec<&str> = reveal("日本").collect();
        assert_eq!(steps, vec!["", "日", "日本"]);
    }

    #[tokio::test]
    async fn test_play_writes_full_message() {
        let mut typewriter = Typewriter::new(Duration::from_millis(1));
        let mut out = Vec::new();
        typewriter
            .play(key(0), "Hi there", &mut out, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hi there");
    }

    #[tokio::test]
    async fn test_play_same_key_does_not_replay() {
        let mut typewriter = Typewriter::new(Duration::ZERO);
        let mut out = Vec::new();
        let cancel = CancellationToken::new();
        typewriter.play(key(0), "once", &mut out, &cancel).await.unwrap();
        typewriter.play(key(0), "once", &mut out, &cancel).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "once");
    }

    #[tokio::test]
    async fn test_play_new_key_restarts() {
        let mut typewriter = Typewriter::new(Duration::ZERO);
        let mut out = Vec::new();
        let cancel = CancellationToken::new();
        typewriter.play(key(0), "a", &mut out, &cancel).await.unwrap();
        typewriter.play(key(1), "b", &mut out, &cancel).await.unwrap();
        typewriter.reset();
        typewriter.play(key(1), "b", &mut out, &cancel).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "abb");
    }

    #[tokio::test]
    async fn test_cancelled_play_still_writes_everything() {
        let mut typewriter = Typewriter::new(Duration::from_secs(60));
        let mut out = Vec::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        typewriter
            .play(key(0), "no waiting", &mut out, &cancel)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "no waiting");
    }

    #[tokio::test]
    async fn test_cancel_during_play_flushes_remainder() {
        let mut typewriter = Typewriter::new(Duration::from_secs(60));
        let mut out = Vec::new();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        typewriter
            .play(key(0), "slow text", &mut out, &cancel)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "slow text");
    }
}
