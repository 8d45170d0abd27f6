//! Segments a synthetic AAC stream into HLS transport stream files.
//!
//! Output goes to `VDKIO_TS_SEGMENT_TEMPLATE` / `VDKIO_TS_OUTPUT_FILE` when
//! set, else to `output/audio_$Number%03d$.ts`. Run with
//! `RUST_LOG=info` to see the muxer events.

use std::sync::Arc;
use vdkio_ts::av::{Codec, MediaSample, StreamInfo};
use vdkio_ts::config::MuxerOptions;
use vdkio_ts::event::LoggingListener;
use vdkio_ts::format::ts::{SegmentInfo, TsMuxer};

const SAMPLE_RATE: u32 = 44100;
const FRAME_SAMPLES: i64 = 1024;
const FRAMES_PER_SEGMENT: i64 = 258;
const SEGMENTS: i64 = 3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut options = MuxerOptions::from_env();
    if options.segment_template.is_empty() && options.output_file_name.is_empty() {
        std::fs::create_dir_all("output")?;
        options = options.with_segment_template("output/audio_$Number%03d$.ts");
    }

    // AAC LC, 44.1 kHz, stereo.
    let stream = StreamInfo::audio(Codec::Aac, SAMPLE_RATE).with_codec_config(vec![0x12, 0x10]);

    let mut muxer = TsMuxer::new(options).with_listener(Arc::new(LoggingListener));
    muxer.add_stream(stream)?;
    muxer.initialize()?;

    for segment in 0..SEGMENTS {
        let first = segment * FRAMES_PER_SEGMENT;
        for frame in first..first + FRAMES_PER_SEGMENT {
            let payload = vec![(frame & 0xff) as u8; 200 + (frame % 7) as usize * 13];
            let sample = MediaSample::new(payload)
                .with_timestamp(frame * FRAME_SAMPLES)
                .with_duration(FRAME_SAMPLES)
                .with_key_flag(true);
            muxer.add_media_sample(&sample)?;
        }
        muxer.finalize_segment(&SegmentInfo {
            start_timestamp: first * FRAME_SAMPLES,
            duration: FRAMES_PER_SEGMENT * FRAME_SAMPLES,
            ..Default::default()
        })?;
    }
    muxer.finalize()?;

    if let Some(segmenter) = muxer.segmenter() {
        println!(
            "Wrote {} segments, {:.2}s of audio",
            segmenter.segment_number(),
            segmenter.duration()
        );
    }
    Ok(())
}
