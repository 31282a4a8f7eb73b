//! Event parser: decoded lines to structured event records.
//!
//! Only lines starting with the `data:` frame prefix carry events;
//! everything else (blank keepalive lines, protocol comments) is
//! ignored. A line whose remainder fails to deserialize is logged and
//! skipped — stream continuity takes priority over single-event
//! fidelity, so a corrupt frame never terminates the stream.

use tracing::warn;
use vb_protocol::BuildEvent;

/// Prefix marking an event-carrying frame.
pub const DATA_PREFIX: &str = "data:";

/// Parse one decoded line into an event record, if it carries one.
///
/// Returns `None` for non-event lines and for malformed payloads.
pub fn parse_event_line(line: &str) -> Option<BuildEvent> {
    let rest = line.strip_prefix(DATA_PREFIX)?.trim_start();
    if rest.is_empty() {
        return None;
    }

    match serde_json::from_str::<BuildEvent>(rest) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(error = %e, line, "skipping malformed event frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vb_protocol::EventStatus;

    #[test]
    fn test_parses_prefixed_event_line() {
        let event = parse_event_line(r#"data: {"step": 3, "status": "starting"}"#)
            .expect("prefixed line should parse");
        assert_eq!(event.step, 3);
        assert_eq!(event.status, EventStatus::Starting);
    }

    #[test]
    fn test_prefix_without_space_is_accepted() {
        let event = parse_event_line(r#"data:{"step": 1}"#).expect("tight prefix should parse");
        assert_eq!(event.step, 1);
    }

    #[test]
    fn test_non_event_lines_are_ignored() {
        assert!(parse_event_line("").is_none());
        assert!(parse_event_line(": keepalive").is_none());
        assert!(parse_event_line("event: message").is_none());
        assert!(parse_event_line(r#"{"step": 1}"#).is_none());
    }

    #[test]
    fn test_empty_data_frame_is_ignored() {
        assert!(parse_event_line("data:").is_none());
        assert!(parse_event_line("data:   ").is_none());
    }

    #[test]
    fn test_malformed_payload_is_skipped_not_fatal() {
        assert!(parse_event_line("data: {bad json").is_none());
        // The parser stays usable afterwards.
        assert!(parse_event_line(r#"data: {"step": 2}"#).is_some());
    }
}
