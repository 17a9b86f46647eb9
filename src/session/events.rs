//! Event streams over the activity log

use futures::{Stream, StreamExt, future};

use crate::error::Result;
use crate::message::parse_event;
use crate::types::events::Event;

use super::core::DroidSession;

impl DroidSession {
    /// Stream events from the start of the current log
    ///
    /// # Errors
    /// `DroidError::SessionNotAlive` if no channel pair is attached
    pub fn stream_events(&self) -> Result<impl Stream<Item = Result<Event>> + Send + use<>> {
        self.stream_events_from(0)
    }

    /// Stream events starting at byte `offset` of the log
    ///
    /// Only session notifications become events; every other line is
    /// skipped. The stream never ends on its own. Drop it to stop.
    ///
    /// # Errors
    /// `DroidError::SessionNotAlive` if no channel pair is attached
    pub fn stream_events_from(
        &self,
        offset: u64,
    ) -> Result<impl Stream<Item = Result<Event>> + Send + use<>> {
        let transport = self.require_transport()?;
        let lines = transport.tail_log(offset);

        Ok(lines.filter_map(|line| {
            future::ready(match line {
                Ok(line) => parse_event(&line).map(Ok),
                Err(e) => Some(Err(e)),
            })
        }))
    }
}
