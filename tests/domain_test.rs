use std::str::FromStr;

use podscribe::domain::{EpisodeId, PipelineStage, PlannedChunk, TranscriptSegment};

#[test]
fn given_two_episode_ids_when_generated_then_are_unique() {
    let id1 = EpisodeId::new();
    let id2 = EpisodeId::new();
    assert_ne!(id1, id2);
}

#[test]
fn given_local_segment_when_shifted_then_both_ends_move_by_offset() {
    let segment = TranscriptSegment::new(1_000, 4_000, "hello");

    let shifted = segment.shifted_by(200_000);

    assert_eq!(shifted.start_ms, 201_000);
    assert_eq!(shifted.end_ms, 204_000);
    assert_eq!(shifted.text, "hello");
}

#[test]
fn given_planned_chunk_when_asking_duration_then_returns_range_length() {
    let chunk = PlannedChunk {
        index: 2,
        start_ms: 400_000,
        end_ms: 403_500,
    };

    assert_eq!(chunk.duration_ms(), 3_500);
}

#[test]
fn given_stage_string_when_parsing_then_round_trips_through_display() {
    for stage in [
        PipelineStage::Planning,
        PipelineStage::Extracting,
        PipelineStage::Transcribing,
        PipelineStage::Merging,
        PipelineStage::Done,
        PipelineStage::Failed,
    ] {
        let parsed = PipelineStage::from_str(stage.as_str()).unwrap();
        assert_eq!(parsed, stage);
        assert_eq!(stage.to_string(), stage.as_str());
    }
}

#[test]
fn given_unknown_stage_string_when_parsing_then_fails() {
    assert!(PipelineStage::from_str("UPLOADING").is_err());
}

#[test]
fn given_segment_without_confidence_when_serializing_then_field_is_omitted() {
    let segment = TranscriptSegment::new(0, 5_000, "a");

    let json = serde_json::to_value(&segment).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"start_ms": 0, "end_ms": 5000, "text": "a"})
    );
}
