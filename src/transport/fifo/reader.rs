//! Activity log reading for the FIFO transport

use std::io::SeekFrom;
use std::time::Duration;

use futures::Stream;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::Instant;

use crate::control::protocol::{Envelope, decode};
use crate::error::{DroidError, Result};
use crate::types::identifiers::SessionId;

use super::channel::FifoTransport;

impl FifoTransport {
    /// Tail the activity log starting at byte `from_offset`
    ///
    /// Yields trimmed, non-blank lines in append order. At end-of-file the
    /// stream sleeps and polls again instead of ending, because the log keeps
    /// growing while the session lives; a trailing partial line is held back
    /// until its newline arrives. An I/O error is yielded once and ends the
    /// stream. Drop the stream to stop tailing.
    pub fn tail_log(
        &self,
        from_offset: u64,
    ) -> impl Stream<Item = Result<String>> + Send + use<> {
        let path = self.log_path.clone();
        let interval = self.tail_interval;

        async_stream::try_stream! {
            let mut file = tokio::fs::File::open(&path).await.map_err(DroidError::from)?;
            file.seek(SeekFrom::Start(from_offset)).await.map_err(DroidError::from)?;
            let mut reader = BufReader::new(file);
            let mut pending: Vec<u8> = Vec::new();

            loop {
                let read = reader
                    .read_until(b'\n', &mut pending)
                    .await
                    .map_err(DroidError::from)?;

                if read == 0 || pending.last() != Some(&b'\n') {
                    tokio::time::sleep(interval).await;
                    continue;
                }

                let line = String::from_utf8_lossy(&pending).trim().to_string();
                pending.clear();
                if !line.is_empty() {
                    yield line;
                }
            }
        }
    }

    /// Poll the log until a response carrying `result.sessionId` appears
    ///
    /// The whole log is re-read every `poll` until `timeout` elapses; the
    /// first matching line wins. Unreadable or undecodable content counts as
    /// "not yet".
    ///
    /// # Returns
    /// The session ID, or `None` on timeout
    pub async fn wait_for_session_id(
        &self,
        timeout: Duration,
        poll: Duration,
    ) -> Option<SessionId> {
        let deadline = Instant::now() + timeout;

        loop {
            match tokio::fs::read(&self.log_path).await {
                Ok(bytes) => {
                    if let Some(id) = find_session_id(&String::from_utf8_lossy(&bytes)) {
                        log::debug!("[{}] session id {}", self.scope, id);
                        return Some(id);
                    }
                }
                Err(e) => log::debug!("[{}] log not readable yet: {}", self.scope, e),
            }

            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }
    }
}

/// First `result.sessionId` carried by a response line in `content`
fn find_session_id(content: &str) -> Option<SessionId> {
    content
        .lines()
        .filter(|line| line.contains("\"sessionId\""))
        .find_map(|line| match decode(line)? {
            Envelope::Response(response) => response.session_id(),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_session_id() {
        let content = concat!(
            "garbage\n",
            r#"{"type":"notification","method":"x","params":{"sessionId":"nope"}}"#,
            "\n",
            r#"{"type":"response","id":"init","result":{"sessionId":"first"}}"#,
            "\n",
            r#"{"type":"response","id":"init","result":{"sessionId":"second"}}"#,
            "\n",
        );
        assert_eq!(find_session_id(content), Some(SessionId::new("first")));
    }

    #[test]
    fn ignores_error_responses_and_partial_lines() {
        let content = concat!(
            r#"{"type":"response","id":"init","error":{"sessionId":"x"}}"#,
            "\n",
            r#"{"type":"response","id":"init","result":{"sessionId":"trunc"#,
        );
        assert_eq!(find_session_id(content), None);
    }
}
