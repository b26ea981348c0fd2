use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use podscribe::application::ports::TranscriptionError;
use podscribe::application::services::{PipelineConfig, PipelineError, TranscriptionPipeline};
use podscribe::domain::{AudioSource, TranscriptSegment};
use podscribe::infrastructure::audio::MockChunkExtractor;
use podscribe::infrastructure::transcription::{MockOutcome, MockTranscriptionEngine};

const MIB: u64 = 1024 * 1024;

fn ten_minute_source() -> AudioSource {
    AudioSource::new("/episodes/show-001.mp3", 600_000, 24 * MIB)
}

fn config_with_scratch(root: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        byte_ceiling: 8 * MIB,
        concurrency: 4,
        language: Some("en".to_string()),
        scratch_root: Some(root.to_path_buf()),
    }
}

fn scratch_is_empty(root: &std::path::Path) -> bool {
    std::fs::read_dir(root).unwrap().next().is_none()
}

fn segment(start_ms: u64, end_ms: u64, text: &str) -> TranscriptSegment {
    TranscriptSegment::new(start_ms, end_ms, text)
}

#[tokio::test]
async fn given_three_chunks_when_running_then_merged_transcript_is_on_global_axis() {
    let scratch_root = tempfile::tempdir().unwrap();
    let engine = MockTranscriptionEngine::new()
        .with_outcome(0, MockOutcome::Segments(vec![segment(0, 5_000, "a")]))
        .with_outcome(1, MockOutcome::Segments(vec![segment(0, 4_000, "b")]))
        .with_outcome(2, MockOutcome::Segments(vec![segment(0, 3_000, "c")]));
    let pipeline = TranscriptionPipeline::new(
        Arc::new(MockChunkExtractor::new()),
        Arc::new(engine),
        config_with_scratch(scratch_root.path()),
    );

    let transcript = pipeline
        .run(&ten_minute_source(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        transcript.segments(),
        &[
            segment(0, 5_000, "a"),
            segment(200_000, 204_000, "b"),
            segment(400_000, 403_000, "c"),
        ]
    );
    assert!(scratch_is_empty(scratch_root.path()));
}

#[tokio::test]
async fn given_reversed_completion_order_when_running_then_output_is_still_in_chunk_order() {
    let scratch_root = tempfile::tempdir().unwrap();
    // Four chunks of 150 000 ms; earlier chunks finish last.
    let source = AudioSource::new("/episodes/show-002.mp3", 600_000, 24 * MIB);
    let engine = MockTranscriptionEngine::new()
        .with_outcome(0, MockOutcome::Segments(vec![segment(0, 1_000, "s0")]))
        .with_outcome(1, MockOutcome::Segments(vec![segment(0, 1_000, "s1")]))
        .with_outcome(2, MockOutcome::Segments(vec![segment(0, 1_000, "s2")]))
        .with_outcome(3, MockOutcome::Segments(vec![segment(0, 1_000, "s3")]))
        .with_delay(0, Duration::from_millis(120))
        .with_delay(1, Duration::from_millis(80))
        .with_delay(2, Duration::from_millis(40))
        .with_delay(3, Duration::from_millis(0));
    let pipeline = TranscriptionPipeline::new(
        Arc::new(MockChunkExtractor::new()),
        Arc::new(engine),
        PipelineConfig {
            byte_ceiling: 6 * MIB,
            concurrency: 4,
            language: None,
            scratch_root: Some(scratch_root.path().to_path_buf()),
        },
    );

    let transcript = pipeline.run(&source, CancellationToken::new()).await.unwrap();

    let texts: Vec<&str> = transcript
        .segments()
        .iter()
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(texts, vec!["s0", "s1", "s2", "s3"]);
    assert_eq!(
        transcript
            .segments()
            .iter()
            .map(|s| s.start_ms)
            .collect::<Vec<_>>(),
        vec![0, 150_000, 300_000, 450_000]
    );
}

#[tokio::test]
async fn given_extraction_fails_at_chunk_one_when_running_then_error_carries_index_and_scratch_is_removed(
) {
    let scratch_root = tempfile::tempdir().unwrap();
    let pipeline = TranscriptionPipeline::new(
        Arc::new(MockChunkExtractor::failing_at(1)),
        Arc::new(MockTranscriptionEngine::new()),
        config_with_scratch(scratch_root.path()),
    );

    let result = pipeline.run(&ten_minute_source(), CancellationToken::new()).await;

    match result {
        Err(PipelineError::Extraction(e)) => assert_eq!(e.chunk_index(), Some(1)),
        other => panic!("expected extraction error, got {:?}", other),
    }
    assert!(scratch_is_empty(scratch_root.path()));
}

#[tokio::test]
async fn given_transcription_fails_at_chunk_one_when_running_then_error_carries_index_and_scratch_is_removed(
) {
    let scratch_root = tempfile::tempdir().unwrap();
    let engine = MockTranscriptionEngine::new()
        .with_outcome(0, MockOutcome::Segments(vec![segment(0, 5_000, "a")]))
        .with_outcome(
            1,
            MockOutcome::Exhausted {
                attempts: 3,
                last_error: "status 503: overloaded".to_string(),
            },
        )
        .with_outcome(2, MockOutcome::Segments(vec![segment(0, 3_000, "c")]));
    let pipeline = TranscriptionPipeline::new(
        Arc::new(MockChunkExtractor::new()),
        Arc::new(engine),
        config_with_scratch(scratch_root.path()),
    );

    let result = pipeline.run(&ten_minute_source(), CancellationToken::new()).await;

    match result {
        Err(PipelineError::Transcription { index, source }) => {
            assert_eq!(index, 1);
            assert!(matches!(
                source,
                TranscriptionError::RetriesExhausted { attempts: 3, .. }
            ));
        }
        other => panic!("expected transcription error, got {:?}", other),
    }
    assert!(scratch_is_empty(scratch_root.path()));
}

#[tokio::test]
async fn given_content_rejection_when_running_then_no_partial_transcript_escapes() {
    let scratch_root = tempfile::tempdir().unwrap();
    let engine = MockTranscriptionEngine::new()
        .with_outcome(0, MockOutcome::Segments(vec![segment(0, 5_000, "a")]))
        .with_outcome(1, MockOutcome::Rejected("unsupported audio".to_string()))
        .with_outcome(2, MockOutcome::Segments(vec![segment(0, 3_000, "c")]));
    let pipeline = TranscriptionPipeline::new(
        Arc::new(MockChunkExtractor::new()),
        Arc::new(engine),
        config_with_scratch(scratch_root.path()),
    );

    let result = pipeline.run(&ten_minute_source(), CancellationToken::new()).await;

    assert!(matches!(
        result,
        Err(PipelineError::Transcription {
            index: 1,
            source: TranscriptionError::ContentRejected(_),
        })
    ));
    assert!(scratch_is_empty(scratch_root.path()));
}

#[tokio::test]
async fn given_cancellation_mid_run_when_running_then_returns_cancelled_and_scratch_is_removed() {
    let scratch_root = tempfile::tempdir().unwrap();
    let engine = MockTranscriptionEngine::new()
        .with_outcome(0, MockOutcome::Segments(vec![segment(0, 5_000, "a")]))
        .with_outcome(1, MockOutcome::Segments(vec![segment(0, 4_000, "b")]))
        .with_outcome(2, MockOutcome::Segments(vec![segment(0, 3_000, "c")]))
        .with_delay(0, Duration::from_secs(30))
        .with_delay(1, Duration::from_secs(30))
        .with_delay(2, Duration::from_secs(30));
    let pipeline = TranscriptionPipeline::new(
        Arc::new(MockChunkExtractor::new()),
        Arc::new(engine),
        config_with_scratch(scratch_root.path()),
    );

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    let source = ten_minute_source();
    let (result, _) = tokio::join!(pipeline.run(&source, cancel), async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    assert!(matches!(result, Err(PipelineError::Cancelled)));
    assert!(scratch_is_empty(scratch_root.path()));
}

#[tokio::test]
async fn given_zero_duration_source_when_running_then_fails_fast_with_invalid_input() {
    let scratch_root = tempfile::tempdir().unwrap();
    let source = AudioSource::new("/episodes/empty.mp3", 0, 1_000);
    let pipeline = TranscriptionPipeline::new(
        Arc::new(MockChunkExtractor::new()),
        Arc::new(MockTranscriptionEngine::new()),
        config_with_scratch(scratch_root.path()),
    );

    let result = pipeline.run(&source, CancellationToken::new()).await;

    assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    assert!(scratch_is_empty(scratch_root.path()));
}

#[tokio::test]
async fn given_single_worker_when_running_then_all_chunks_are_still_processed() {
    let scratch_root = tempfile::tempdir().unwrap();
    let engine = MockTranscriptionEngine::new()
        .with_outcome(0, MockOutcome::Segments(vec![segment(0, 5_000, "a")]))
        .with_outcome(1, MockOutcome::Segments(vec![segment(0, 4_000, "b")]))
        .with_outcome(2, MockOutcome::Segments(vec![segment(0, 3_000, "c")]));
    let pipeline = TranscriptionPipeline::new(
        Arc::new(MockChunkExtractor::new()),
        Arc::new(engine),
        PipelineConfig {
            byte_ceiling: 8 * MIB,
            concurrency: 1,
            language: None,
            scratch_root: Some(scratch_root.path().to_path_buf()),
        },
    );

    let transcript = pipeline
        .run(&ten_minute_source(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(transcript.segments().len(), 3);
}
