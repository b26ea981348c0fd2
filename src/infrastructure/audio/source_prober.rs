use std::fs::File;
use std::path::Path;

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::ExtractionError;
use crate::domain::AudioSource;

use super::audio_decoder::decode_audio_to_pcm;

/// Build an [`AudioSource`] for a file on disk.
///
/// Duration comes from the container metadata when the track declares its
/// frame count; otherwise the file is decoded once to measure it (some MP3
/// streams carry no frame count).
pub fn probe_source(path: &Path) -> Result<AudioSource, ExtractionError> {
    let byte_len = std::fs::metadata(path)
        .map_err(|e| ExtractionError::DecodeFailed(format!("stat source: {}", e)))?
        .len();

    let file = File::open(path)
        .map_err(|e| ExtractionError::DecodeFailed(format!("open source: {}", e)))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ExtractionError::DecodeFailed(format!("probe: {}", e)))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| ExtractionError::DecodeFailed("no audio track found".to_string()))?;

    let params = &track.codec_params;
    let duration_ms = match (params.time_base, params.n_frames) {
        (Some(time_base), Some(n_frames)) => {
            let time = time_base.calc_time(n_frames);
            time.seconds * 1000 + (time.frac * 1000.0) as u64
        }
        _ => {
            let data = std::fs::read(path)
                .map_err(|e| ExtractionError::DecodeFailed(format!("read source: {}", e)))?;
            let extension = path.extension().and_then(|e| e.to_str());
            decode_audio_to_pcm(&data, extension)?.duration_ms()
        }
    };

    tracing::debug!(
        path = %path.display(),
        duration_ms,
        byte_len,
        "Audio source probed"
    );

    Ok(AudioSource::new(path, duration_ms, byte_len))
}
