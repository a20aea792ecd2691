// src/types.rs
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// The primary video track being edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ARoll {
    pub url: String,
    pub metadata: String,
}

/// A supplementary clip eligible for insertion into the a-roll timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BRoll {
    pub id: String,
    pub metadata: String,
    pub url: String,
}

/// The single mutable source-of-truth document the operator edits.
///
/// Round-trips to and from the JSON text shown in the editor; everything
/// downstream (plan requests, render payloads) is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputDocument {
    pub a_roll: ARoll,
    pub b_rolls: Vec<BRoll>,
}

impl InputDocument {
    /// The document a fresh session starts with: empty a-roll plus a single
    /// empty b-roll slot for the operator to fill in.
    pub fn default_skeleton() -> Self {
        Self {
            a_roll: ARoll {
                url: String::new(),
                metadata: String::new(),
            },
            b_rolls: vec![BRoll {
                id: "broll_1".to_string(),
                metadata: String::new(),
                url: String::new(),
            }],
        }
    }

    /// Parse the editable JSON text into a document.
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize back to the pretty-printed form shown in the editor.
    pub fn to_text(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn find_broll(&self, id: &str) -> Option<&BRoll> {
        self.b_rolls.iter().find(|b| b.id == id)
    }

    /// B-roll ids that appear more than once. Uniqueness is the planner
    /// service's constraint to enforce; this exists so the presentation layer
    /// can warn before a round trip is wasted.
    pub fn duplicate_broll_ids(&self) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        let mut dupes = Vec::new();
        for b in &self.b_rolls {
            if seen.contains(&b.id.as_str()) {
                if !dupes.contains(&b.id) {
                    dupes.push(b.id.clone());
                }
            } else {
                seen.push(b.id.as_str());
            }
        }
        dupes
    }
}

/// One transcript line produced by the planning service. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// One placement decision: which b-roll goes where, for how long, and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insertion {
    pub broll_id: String,
    pub start_sec: f64,
    pub duration_sec: f64,
    pub confidence: f64,
    pub reason: String,
}

impl Insertion {
    /// End of the timeline span this insertion occupies.
    pub fn end_sec(&self) -> f64 {
        self.start_sec + self.duration_sec
    }
}

/// Full output of the planning phase. Immutable once received; replaced
/// wholesale by the next successful plan, never merged or patched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub a_roll_duration: f64,
    pub transcript_segments: Vec<TranscriptSegment>,
    pub insertions: Vec<Insertion>,
}

impl Plan {
    /// Insertions whose span runs past the end of the a-roll. These are
    /// reported, not clamped; the plan is the planner's to fix.
    pub fn overrunning_insertions(&self) -> Vec<&Insertion> {
        self.insertions
            .iter()
            .filter(|ins| ins.end_sec() > self.a_roll_duration)
            .collect()
    }
}

/// Payload for the render service, rebuilt fresh before every render call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderRequest {
    pub a_roll_url: String,
    pub b_rolls: Vec<BRoll>,
    pub insertions: Vec<Insertion>,
}

/// Terminal success value of a render: where the final video landed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderResult {
    pub video_path: String,
}

/// Derive a render payload from the current document and the held plan.
///
/// The a-roll url and b-roll pool come from the document as it is now; the
/// insertions come from the plan as it was generated. Those two moments can
/// drift apart, so every insertion's `broll_id` is resolved against the
/// document here and a dangling reference is an explicit error rather than a
/// payload the render service has to reject.
pub fn build_render_request(
    document: &InputDocument,
    plan: &Plan,
) -> Result<RenderRequest, WorkflowError> {
    for insertion in &plan.insertions {
        if document.find_broll(&insertion.broll_id).is_none() {
            return Err(WorkflowError::MissingBRoll {
                broll_id: insertion.broll_id.clone(),
            });
        }
    }

    Ok(RenderRequest {
        a_roll_url: document.a_roll.url.clone(),
        b_rolls: document.b_rolls.clone(),
        insertions: plan.insertions.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> InputDocument {
        InputDocument {
            a_roll: ARoll {
                url: "a.mp4".to_string(),
                metadata: "talking head".to_string(),
            },
            b_rolls: vec![BRoll {
                id: "b1".to_string(),
                metadata: "city shots".to_string(),
                url: "b.mp4".to_string(),
            }],
        }
    }

    fn sample_plan() -> Plan {
        Plan {
            a_roll_duration: 30.0,
            transcript_segments: vec![TranscriptSegment {
                start: 0.0,
                end: 4.5,
                text: "welcome to the tour".to_string(),
            }],
            insertions: vec![Insertion {
                broll_id: "b1".to_string(),
                start_sec: 2.0,
                duration_sec: 1.5,
                confidence: 0.9,
                reason: "intro".to_string(),
            }],
        }
    }

    #[test]
    fn test_default_skeleton_round_trip() {
        let doc = InputDocument::default_skeleton();
        let text = doc.to_text();
        let parsed = InputDocument::from_text(&text).unwrap();
        assert_eq!(doc, parsed);
        assert_eq!(parsed.b_rolls[0].id, "broll_1");
    }

    #[test]
    fn test_build_render_request_derives_payload() {
        let request = build_render_request(&sample_document(), &sample_plan()).unwrap();
        assert_eq!(request.a_roll_url, "a.mp4");
        assert_eq!(request.b_rolls, sample_document().b_rolls);
        assert_eq!(request.insertions, sample_plan().insertions);
    }

    #[test]
    fn test_build_render_request_rejects_dangling_reference() {
        let mut doc = sample_document();
        doc.b_rolls.clear();
        let err = build_render_request(&doc, &sample_plan()).unwrap_err();
        match err {
            WorkflowError::MissingBRoll { broll_id } => assert_eq!(broll_id, "b1"),
            other => panic!("expected MissingBRoll, got {other}"),
        }
    }

    #[test]
    fn test_overrunning_insertions_reported_not_clamped() {
        let mut plan = sample_plan();
        plan.insertions.push(Insertion {
            broll_id: "b1".to_string(),
            start_sec: 29.0,
            duration_sec: 5.0,
            confidence: 0.4,
            reason: "outro".to_string(),
        });
        let overruns = plan.overrunning_insertions();
        assert_eq!(overruns.len(), 1);
        assert_eq!(overruns[0].start_sec, 29.0);
        assert_eq!(plan.insertions.len(), 2);
    }

    #[test]
    fn test_duplicate_broll_ids() {
        let mut doc = sample_document();
        doc.b_rolls.push(doc.b_rolls[0].clone());
        doc.b_rolls.push(BRoll {
            id: "b2".to_string(),
            metadata: String::new(),
            url: String::new(),
        });
        assert_eq!(doc.duplicate_broll_ids(), vec!["b1".to_string()]);
    }

    #[test]
    fn test_malformed_text_fails_to_parse() {
        assert!(InputDocument::from_text("{ not json").is_err());
        assert!(InputDocument::from_text(r#"{"a_roll": {"url": ""}}"#).is_err());
    }
}
