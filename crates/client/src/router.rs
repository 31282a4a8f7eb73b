//! Event classifier and router.
//!
//! Maps one event record to zero or more Render Intents and, for
//! artifact-bearing events, asks the session to promote the new value.
//! The decision policy is evaluated strictly in order; intents derived
//! from one event always precede intents derived from the next.

use vb_protocol::{AgentId, BuildEvent, ChatClassification, EventStatus, RenderIntent};

use crate::session::Session;

/// Route one event record into Render Intents.
///
/// `session` is consulted (and possibly mutated) for artifact
/// promotion only; all other decisions are pure functions of the event.
pub fn route_event(event: &BuildEvent, session: &mut Session) -> Vec<RenderIntent> {
    let mut intents = Vec::new();

    // Hard stream-level failure wins over everything else in the record.
    if let Some(error) = &event.error {
        intents.push(RenderIntent::ChatEntry {
            identity: AgentId::System,
            text: error.clone(),
            classification: ChatClassification::Error,
            detail: None,
        });
        return intents;
    }

    // Conversational messages bypass the pipeline rules.
    if event.is_chat() {
        intents.push(RenderIntent::ChatEntry {
            identity: AgentId::System,
            text: event.message.clone().unwrap_or_default(),
            classification: ChatClassification::Complete,
            detail: None,
        });
        return intents;
    }

    let identity = AgentId::from_step(event.step);

    // Progress updates go to the transient status indicator.
    if event.status == EventStatus::Starting {
        if let Some(message) = &event.message {
            session.set_status_message(message.clone());
            intents.push(RenderIntent::StatusUpdate {
                text: message.clone(),
                visible: true,
            });
        }
    }

    // Chat log entries. A bare "starting" with no payload already
    // surfaced via the status indicator and is suppressed here.
    if let Some(message) = &event.message {
        let chat_worthy = event.status.is_terminal()
            || (event.status == EventStatus::Starting
                && event.step > 0
                && event.payload.is_some());
        if chat_worthy {
            let classification = match event.status {
                EventStatus::Complete | EventStatus::Passed => ChatClassification::Success,
                EventStatus::Failed => ChatClassification::Error,
                _ => ChatClassification::Working,
            };
            intents.push(RenderIntent::ChatEntry {
                identity,
                text: message.clone(),
                classification,
                detail: event.payload.clone(),
            });
        }
    }

    // Artifact promotion, gated by exact-equality change detection so a
    // repeated artifact never re-renders the preview.
    if let Some(candidate) = event.artifact_candidate() {
        if session.promote_artifact(candidate) {
            intents.push(RenderIntent::ArtifactUpdate {
                content: candidate.to_string(),
            });
        }
    }

    // Only final_code exposes the terminal affordance; intermediate
    // code/fixed_code/refined_code updates must not.
    if event.final_code.is_some() {
        intents.push(RenderIntent::TerminalArtifact { available: true });
    }

    intents
}

#[cfg(test)]
mod tests {
    use super::*;
    use vb_protocol::EventPayload;

    fn event_json(json: &str) -> BuildEvent {
        serde_json::from_str(json).expect("test event should parse")
    }

    fn chat_entries(intents: &[RenderIntent]) -> Vec<&RenderIntent> {
        intents
            .iter()
            .filter(|i| matches!(i, RenderIntent::ChatEntry { .. }))
            .collect()
    }

    #[test]
    fn test_error_record_short_circuits() {
        let mut session = Session::new();
        let event = event_json(r#"{"error": "LLM unavailable", "status": "complete", "message": "ignored"}"#);

        let intents = route_event(&event, &mut session);
        assert_eq!(intents.len(), 1);
        match &intents[0] {
            RenderIntent::ChatEntry {
                identity,
                text,
                classification,
                ..
            } => {
                assert_eq!(*identity, AgentId::System);
                assert_eq!(text, "LLM unavailable");
                assert_eq!(*classification, ChatClassification::Error);
            }
            other => panic!("unexpected intent: {:?}", other),
        }
    }

    #[test]
    fn test_chat_phase_renders_as_system_complete() {
        let mut session = Session::new();
        let event = event_json(r#"{"step": 0, "phase": "chat", "message": "Hello!"}"#);

        let intents = route_event(&event, &mut session);
        assert_eq!(intents.len(), 1);
        assert_eq!(
            intents[0],
            RenderIntent::ChatEntry {
                identity: AgentId::System,
                text: "Hello!".to_string(),
                classification: ChatClassification::Complete,
                detail: None,
            }
        );
    }

    #[test]
    fn test_starting_without_payload_is_status_only() {
        let mut session = Session::new();
        let event = event_json(r#"{"step": 3, "status": "starting", "message": "Writing code..."}"#);

        let intents = route_event(&event, &mut session);
        assert_eq!(intents.len(), 1);
        assert_eq!(
            intents[0],
            RenderIntent::StatusUpdate {
                text: "Writing code...".to_string(),
                visible: true,
            }
        );
        assert_eq!(session.status_message(), Some("Writing code..."));
    }

    #[test]
    fn test_starting_with_payload_also_reaches_chat() {
        let mut session = Session::new();
        let event = event_json(
            r#"{"step": 1, "status": "starting", "message": "Researching...", "data": {"thinking": "hm"}}"#,
        );

        let intents = route_event(&event, &mut session);
        assert_eq!(intents.len(), 2);
        assert!(matches!(intents[0], RenderIntent::StatusUpdate { .. }));
        match &intents[1] {
            RenderIntent::ChatEntry {
                identity,
                classification,
                detail,
                ..
            } => {
                assert_eq!(*identity, AgentId::Researcher);
                assert_eq!(*classification, ChatClassification::Working);
                assert!(detail.is_some());
            }
            other => panic!("unexpected intent: {:?}", other),
        }
    }

    #[test]
    fn test_starting_at_step_zero_never_reaches_chat() {
        let mut session = Session::new();
        let event = event_json(
            r#"{"step": 0, "status": "starting", "message": "Initializing...", "data": {"thinking": "x"}}"#,
        );

        let intents = route_event(&event, &mut session);
        assert!(chat_entries(&intents).is_empty());
    }

    #[test]
    fn test_terminal_statuses_classify_correctly() {
        let mut session = Session::new();
        for (status, expected) in [
            ("complete", ChatClassification::Success),
            ("passed", ChatClassification::Success),
            ("failed", ChatClassification::Error),
        ] {
            let event = event_json(&format!(
                r#"{{"step": 4, "status": "{}", "message": "done"}}"#,
                status
            ));
            let intents = route_event(&event, &mut session);
            match &intents[0] {
                RenderIntent::ChatEntry { classification, .. } => {
                    assert_eq!(*classification, expected, "status {}", status);
                }
                other => panic!("unexpected intent: {:?}", other),
            }
        }
    }

    #[test]
    fn test_unrecognized_status_is_not_rendered_as_chat() {
        let mut session = Session::new();
        let event = event_json(r#"{"step": 2, "status": "retrying", "message": "again"}"#);
        let intents = route_event(&event, &mut session);
        assert!(intents.is_empty());
    }

    #[test]
    fn test_artifact_promotion_is_idempotent() {
        let mut session = Session::new();
        let event = event_json(
            r#"{"step": 3, "status": "complete", "message": "Code ready", "data": {"code": "<html>v1</html>"}}"#,
        );

        let first = route_event(&event, &mut session);
        let artifact_count = |intents: &[RenderIntent]| {
            intents
                .iter()
                .filter(|i| matches!(i, RenderIntent::ArtifactUpdate { .. }))
                .count()
        };
        assert_eq!(artifact_count(&first), 1);

        // Identical artifact again: chat still renders, preview does not.
        let second = route_event(&event, &mut session);
        assert_eq!(artifact_count(&second), 0);
        assert_eq!(chat_entries(&second).len(), 1);
    }

    #[test]
    fn test_final_code_emits_terminal_affordance_without_duplicate_artifact() {
        let mut session = Session::new();

        let progress = event_json(
            r#"{"step": 3, "status": "complete", "message": "Code ready", "data": {"code": "<html>app</html>"}}"#,
        );
        route_event(&progress, &mut session);

        // Same artifact arrives as final_code: terminal flag, no re-render.
        let export = event_json(
            r#"{"step": 4, "status": "complete", "message": "Build complete", "final_code": "<html>app</html>"}"#,
        );
        let intents = route_event(&export, &mut session);
        assert!(!intents
            .iter()
            .any(|i| matches!(i, RenderIntent::ArtifactUpdate { .. })));
        assert!(intents
            .iter()
            .any(|i| *i == RenderIntent::TerminalArtifact { available: true }));
    }

    #[test]
    fn test_intermediate_code_does_not_expose_terminal_affordance() {
        let mut session = Session::new();
        let event = event_json(
            r#"{"step": 6, "status": "complete", "message": "Fixed", "data": {"fixed_code": "<html>v2</html>"}}"#,
        );
        let intents = route_event(&event, &mut session);
        assert!(intents
            .iter()
            .any(|i| matches!(i, RenderIntent::ArtifactUpdate { .. })));
        assert!(!intents
            .iter()
            .any(|i| matches!(i, RenderIntent::TerminalArtifact { .. })));
    }

    #[test]
    fn test_order_preservation_across_records() {
        let mut session = Session::new();
        let records = [
            event_json(r#"{"step": 1, "status": "starting", "message": "Researching..."}"#),
            event_json(r#"{"step": 1, "status": "complete", "message": "Research done"}"#),
            event_json(
                r#"{"step": 3, "status": "complete", "message": "Code ready", "data": {"code": "<html></html>"}}"#,
            ),
        ];

        let mut all = Vec::new();
        let mut boundaries = Vec::new();
        for record in &records {
            let intents = route_event(record, &mut session);
            boundaries.push(all.len() + intents.len());
            all.extend(intents);
        }

        // Intents derived from record i all sit before any intent from
        // record i+1.
        assert!(matches!(all[0], RenderIntent::StatusUpdate { .. }));
        assert!(boundaries[0] <= 1);
        match &all[boundaries[0]] {
            RenderIntent::ChatEntry { text, .. } => assert_eq!(text, "Research done"),
            other => panic!("unexpected intent: {:?}", other),
        }
        assert!(matches!(all.last(), Some(RenderIntent::ArtifactUpdate { .. })));
    }

    #[test]
    fn test_detail_payload_is_attached_to_chat_entry() {
        let mut session = Session::new();
        let event = BuildEvent {
            step: 2,
            status: EventStatus::Complete,
            message: Some("Architecture ready".to_string()),
            payload: Some(EventPayload {
                components: vec!["header".to_string(), "list".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };

        let intents = route_event(&event, &mut session);
        match &intents[0] {
            RenderIntent::ChatEntry { detail, .. } => {
                let detail = detail.as_ref().expect("detail attached");
                assert_eq!(detail.components.len(), 2);
            }
            other => panic!("unexpected intent: {:?}", other),
        }
    }
}
