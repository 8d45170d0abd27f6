#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use vdkio_ts::av::{Codec, MediaSample, StreamInfo};
    use vdkio_ts::config::MuxerOptions;
    use vdkio_ts::event::{ContainerType, MediaRanges, MuxerListener};
    use vdkio_ts::file::memory;
    use vdkio_ts::format::range::{are_contiguous, Range};
    use vdkio_ts::format::ts::{MuxerState, SegmentInfo, TsMuxer, PID_NULL, TS_PACKET_SIZE};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        MediaStart {
            time_scale: u32,
            container_type: ContainerType,
        },
        SampleDurationReady(u32),
        KeyFrame {
            timestamp: i64,
            start: u64,
            size: u64,
        },
        NewSegment {
            name: String,
            start: i64,
            duration: i64,
            size: u64,
        },
        MediaEnd {
            ranges: MediaRanges,
            duration_seconds: f32,
        },
    }

    #[derive(Default)]
    struct RecordingListener {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingListener {
        fn events(&self) -> Vec<Event> {
            self.events.lock().clone()
        }

        fn new_segments(&self) -> Vec<(String, i64, i64, u64)> {
            self.events
                .lock()
                .iter()
                .filter_map(|e| match e {
                    Event::NewSegment {
                        name,
                        start,
                        duration,
                        size,
                    } => Some((name.clone(), *start, *duration, *size)),
                    _ => None,
                })
                .collect()
        }
    }

    impl MuxerListener for RecordingListener {
        fn on_media_start(
            &self,
            _options: &MuxerOptions,
            _stream_info: &StreamInfo,
            time_scale: u32,
            container_type: ContainerType,
        ) {
            self.events.lock().push(Event::MediaStart {
                time_scale,
                container_type,
            });
        }

        fn on_sample_duration_ready(&self, sample_duration: u32) {
            self.events
                .lock()
                .push(Event::SampleDurationReady(sample_duration));
        }

        fn on_key_frame(&self, timestamp: i64, start_byte_offset: u64, size: u64) {
            self.events.lock().push(Event::KeyFrame {
                timestamp,
                start: start_byte_offset,
                size,
            });
        }

        fn on_new_segment(&self, segment_name: &str, start_time: i64, duration: i64, segment_file_size: u64) {
            self.events.lock().push(Event::NewSegment {
                name: segment_name.to_string(),
                start: start_time,
                duration,
                size: segment_file_size,
            });
        }

        fn on_media_end(&self, media_ranges: &MediaRanges, duration_seconds: f32) {
            self.events.lock().push(Event::MediaEnd {
                ranges: media_ranges.clone(),
                duration_seconds,
            });
        }
    }

    const SAMPLE_DURATION: i64 = 3600;

    fn audio_sample(index: i64) -> MediaSample {
        MediaSample::new(vec![0x5A; 100])
            .with_timestamp(index * SAMPLE_DURATION)
            .with_duration(SAMPLE_DURATION)
            .with_key_flag(true)
    }

    fn new_muxer(options: MuxerOptions, stream: StreamInfo) -> (TsMuxer, Arc<RecordingListener>) {
        let listener = Arc::new(RecordingListener::default());
        let mut muxer = TsMuxer::new(options).with_listener(listener.clone());
        muxer.add_stream(stream).unwrap();
        muxer.initialize().unwrap();
        (muxer, listener)
    }

    // Feeds `segments` segments of `per_segment` one-packet MP3 samples at 90 kHz.
    fn mux_audio(muxer: &mut TsMuxer, segments: i64, per_segment: i64) {
        for segment in 0..segments {
            let first = segment * per_segment;
            for i in first..first + per_segment {
                muxer.add_media_sample(&audio_sample(i)).unwrap();
            }
            muxer
                .finalize_segment(&SegmentInfo {
                    start_timestamp: first * SAMPLE_DURATION,
                    duration: per_segment * SAMPLE_DURATION,
                    ..Default::default()
                })
                .unwrap();
        }
    }

    #[test]
    fn test_multi_file_segments_numbered_and_padded() {
        let template = "memory://it/multi/seg_$Number$_$Time$.ts";
        let (mut muxer, listener) = new_muxer(
            MuxerOptions::new().with_segment_template(template),
            StreamInfo::audio(Codec::Mp3, 90000),
        );
        mux_audio(&mut muxer, 3, 2);
        muxer.finalize().unwrap();

        let segments = listener.new_segments();
        assert_eq!(
            segments,
            vec![
                ("memory://it/multi/seg_2_0.ts".to_string(), 0, 7200, 752),
                ("memory://it/multi/seg_3_7200.ts".to_string(), 7200, 7200, 752),
                ("memory://it/multi/seg_4_14400.ts".to_string(), 14400, 7200, 752),
            ]
        );

        for (name, _, _, size) in &segments {
            let bytes = memory::read_file(name).unwrap();
            // 752 % 32 == 16: sixteen 0x10 filler bytes.
            assert_eq!(bytes.len() as u64, size + 16);
            assert_eq!(bytes.len() % 32, 0);
            assert!(bytes[752..].iter().all(|&b| b == 0x10));
            assert!(bytes[..752].chunks(TS_PACKET_SIZE).all(|p| p[0] == 0x47));
            memory::delete_file(name);
        }

        match listener.events().last() {
            Some(Event::MediaEnd { ranges, .. }) => {
                assert_eq!(ranges, &MediaRanges::default());
            }
            other => panic!("unexpected last event {:?}", other),
        }
    }

    #[test]
    fn test_single_file_ranges_contiguous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.ts");
        let (mut muxer, listener) = new_muxer(
            MuxerOptions::new().with_output_file_name(path.display().to_string()),
            StreamInfo::audio(Codec::Mp3, 90000),
        );
        mux_audio(&mut muxer, 3, 2);
        muxer.finalize().unwrap();
        assert_eq!(muxer.state(), MuxerState::Finalized);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 3 * 768);

        let Some(Event::MediaEnd {
            ranges,
            duration_seconds,
        }) = listener.events().last().cloned()
        else {
            panic!("media end not reported last");
        };
        assert_eq!(ranges.init_range, Some(Range::from_offset_and_size(0, 0)));
        assert_eq!(ranges.index_range, Some(Range::from_offset_and_size(0, 0)));
        assert!(ranges.init_range.map_or(false, |r| r.is_empty()));
        assert_eq!(
            ranges.subsegment_ranges,
            vec![Range::new(0, 767), Range::new(768, 1535), Range::new(1536, 2303)]
        );
        assert!(are_contiguous(&ranges.subsegment_ranges));
        assert!((duration_seconds - 0.24).abs() < 1e-6);

        let names: Vec<String> = listener.new_segments().into_iter().map(|s| s.0).collect();
        assert_eq!(names, vec![path.display().to_string(); 3]);
    }

    #[test]
    fn test_events_in_order() {
        let path = "memory://it/order.ts";
        let (mut muxer, listener) = new_muxer(
            MuxerOptions::new().with_output_file_name(path),
            StreamInfo::audio(Codec::Mp3, 90000),
        );
        mux_audio(&mut muxer, 1, 2);
        muxer.finalize().unwrap();

        let events = listener.events();
        assert_eq!(
            &events[..3],
            &[
                Event::MediaStart {
                    time_scale: 90000,
                    container_type: ContainerType::Mpeg2Ts,
                },
                Event::SampleDurationReady(3600),
                Event::NewSegment {
                    name: path.to_string(),
                    start: 0,
                    duration: 7200,
                    size: 752,
                },
            ]
        );
        assert!(matches!(events[3], Event::MediaEnd { .. }));
        assert_eq!(events.len(), 4);
        memory::delete_file(path);
    }

    #[test]
    fn test_finalize_without_open_segment_is_silent() {
        let template = "memory://it/idle/seg_$Number$.ts";
        let (mut muxer, listener) = new_muxer(
            MuxerOptions::new().with_segment_template(template),
            StreamInfo::audio(Codec::Mp3, 90000),
        );
        let info = SegmentInfo {
            start_timestamp: 0,
            duration: 90000,
            ..Default::default()
        };
        muxer.finalize_segment(&info).unwrap();
        muxer.finalize_segment(&info).unwrap();

        assert!(listener.new_segments().is_empty());
        assert!(memory::read_file("memory://it/idle/seg_1.ts").is_none());
        assert!(memory::read_file("memory://it/idle/seg_2.ts").is_none());
        assert_eq!(muxer.segmenter().map(|s| s.segment_number()), Some(0));
    }

    #[test]
    fn test_more_than_one_stream_rejected() {
        let listener = Arc::new(RecordingListener::default());
        let mut muxer = TsMuxer::new(MuxerOptions::new().with_output_file_name("memory://it/two.ts"))
            .with_listener(listener.clone());
        muxer.add_stream(StreamInfo::audio(Codec::Aac, 48000)).unwrap();
        muxer.add_stream(StreamInfo::video(Codec::H264, 90000)).unwrap();

        let err = muxer.initialize().unwrap_err();
        assert!(err.is_muxer_failure());
        assert!(muxer.segmenter().is_none());
        assert!(listener.events().is_empty());
        assert!(memory::read_file("memory://it/two.ts").is_none());
    }

    #[test]
    fn test_sample_duration_reported_once_in_ts_scale() {
        let path = "memory://it/duration.ts";
        let (mut muxer, listener) = new_muxer(
            MuxerOptions::new().with_output_file_name(path),
            StreamInfo::audio(Codec::Mp3, 48000),
        );
        for i in 0..4 {
            let sample = MediaSample::new(vec![0u8; 64])
                .with_timestamp(i * 1024)
                .with_duration(1024)
                .with_key_flag(true);
            muxer.add_media_sample(&sample).unwrap();
        }

        let durations: Vec<u32> = listener
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Event::SampleDurationReady(d) => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(durations, vec![1920]);
        muxer.finalize().unwrap();
        memory::delete_file(path);
    }

    #[test]
    fn test_small_ac3_sample_fails() {
        let template = "memory://it/ac3/seg_$Number$.ts";
        let (mut muxer, listener) = new_muxer(
            MuxerOptions::new().with_segment_template(template),
            StreamInfo::audio(Codec::Ac3, 48000),
        );
        let sample = MediaSample::new(vec![0x0B, 0x77, 1, 2, 3, 4, 5, 6]).with_key_flag(true);
        let err = muxer.add_media_sample(&sample).unwrap_err();
        assert!(err.is_muxer_failure());

        muxer
            .finalize_segment(&SegmentInfo {
                duration: 1536,
                ..Default::default()
            })
            .unwrap();
        assert!(listener.new_segments().is_empty());
        assert!(listener
            .events()
            .iter()
            .all(|e| !matches!(e, Event::KeyFrame { .. })));

        // A full syncframe afterwards is accepted.
        let sample = MediaSample::new(vec![0x0B; 64]).with_key_flag(true);
        muxer.add_media_sample(&sample).unwrap();
    }

    #[test]
    fn test_aac_frame_too_large_for_adts_fails() {
        let path = "memory://it/adts_oversize.ts";
        let (mut muxer, _listener) = new_muxer(
            MuxerOptions::new().with_output_file_name(path),
            StreamInfo::audio(Codec::Aac, 44100).with_codec_config(vec![0x12, 0x10]),
        );
        let sample = MediaSample::new(vec![0u8; 9000]).with_key_flag(true);
        let err = muxer.add_media_sample(&sample).unwrap_err();
        assert!(err.is_muxer_failure());
        assert!(err.to_string().contains("too large for ADTS"));

        let sample = MediaSample::new(vec![0u8; 8184]).with_key_flag(true);
        muxer.add_media_sample(&sample).unwrap();
        muxer.finalize().unwrap();
        memory::delete_file(path);
    }

    #[test]
    fn test_remainder_24_gets_eight_filler_bytes() {
        let path = "memory://it/pad24.ts";
        let (mut muxer, listener) = new_muxer(
            MuxerOptions::new().with_output_file_name(path),
            StreamInfo::audio(Codec::Mp3, 90000),
        );
        // PAT + PMT + 8 PES packets = 1880 bytes, 1880 % 32 == 24.
        mux_audio(&mut muxer, 1, 8);
        muxer.finalize().unwrap();

        assert_eq!(listener.new_segments()[0].3, 1880);
        let bytes = memory::read_file(path).unwrap();
        assert_eq!(bytes.len(), 1888);
        assert_eq!(&bytes[1880..], &[0x08; 8]);
        assert!(bytes
            .chunks(TS_PACKET_SIZE)
            .take(10)
            .all(|p| ((p[1] as u16 & 0x1F) << 8 | p[2] as u16) != PID_NULL));
        memory::delete_file(path);
    }

    #[test]
    fn test_remainder_0_gets_stuffing_packets() {
        let path = "memory://it/pad0.ts";
        let (mut muxer, _listener) = new_muxer(
            MuxerOptions::new().with_output_file_name(path),
            StreamInfo::audio(Codec::Mp3, 90000),
        );
        // 8 packets = 1504 bytes, 1504 % 32 == 0.
        mux_audio(&mut muxer, 1, 6);
        muxer.finalize().unwrap();

        let bytes = memory::read_file(path).unwrap();
        assert_eq!(bytes.len(), 1504 + 4 * TS_PACKET_SIZE + 16);
        for packet in bytes[1504..1504 + 4 * TS_PACKET_SIZE].chunks(TS_PACKET_SIZE) {
            assert_eq!(&packet[..4], &[0x47, 0x1F, 0xFF, 0x10]);
        }
        assert!(bytes[bytes.len() - 16..].iter().all(|&b| b == 0x10));
        memory::delete_file(path);
    }

    #[test]
    fn test_timestamps_scaled_and_offset() {
        let template = "memory://it/offset/seg_$Time$.ts";
        let options = MuxerOptions::new()
            .with_segment_template(template)
            .with_timestamp_offset_ms(100);
        let (mut muxer, listener) = new_muxer(options, StreamInfo::audio(Codec::Mp3, 48000));

        let sample = MediaSample::new(vec![0u8; 64])
            .with_timestamp(48000)
            .with_duration(1024)
            .with_key_flag(true);
        muxer.add_media_sample(&sample).unwrap();
        muxer
            .finalize_segment(&SegmentInfo {
                start_timestamp: 48000,
                duration: 48000,
                ..Default::default()
            })
            .unwrap();

        // One second at 90 kHz plus 100 ms of offset.
        let segments = listener.new_segments();
        assert_eq!(segments[0].0, "memory://it/offset/seg_99000.ts");
        assert_eq!(segments[0].1, 99000);
        assert_eq!(segments[0].2, 90000);
        memory::delete_file(&segments[0].0);
    }

    #[test]
    fn test_video_key_frames_and_encryption() {
        let template = "memory://it/video/seg_$Number$.ts";
        let (mut muxer, listener) = new_muxer(
            MuxerOptions::new().with_segment_template(template),
            StreamInfo::video(Codec::H264, 90000),
        );
        let frame = vec![0u8, 0, 0, 1, 0x65, 0x88, 0x84];

        for (i, key) in [true, false, true].into_iter().enumerate() {
            let sample = MediaSample::new(frame.clone())
                .with_timestamp(i as i64 * 3000)
                .with_duration(3000)
                .with_key_flag(key)
                .with_encrypted(i == 2);
            if i == 2 {
                muxer
                    .finalize_segment(&SegmentInfo {
                        start_timestamp: 0,
                        duration: 6000,
                        ..Default::default()
                    })
                    .unwrap();
            }
            muxer.add_media_sample(&sample).unwrap();
        }
        muxer
            .finalize_segment(&SegmentInfo {
                start_timestamp: 6000,
                duration: 3000,
                is_encrypted: true,
                ..Default::default()
            })
            .unwrap();
        muxer.finalize().unwrap();

        let key_frames: Vec<Event> = listener
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::KeyFrame { .. }))
            .collect();
        let packet = TS_PACKET_SIZE as u64;
        assert_eq!(
            key_frames,
            vec![
                Event::KeyFrame {
                    timestamp: 0,
                    start: 2 * packet,
                    size: packet,
                },
                Event::KeyFrame {
                    timestamp: 6000,
                    start: 2 * packet,
                    size: packet,
                },
            ]
        );

        let clear = memory::read_file("memory://it/video/seg_2.ts").unwrap();
        let encrypted = memory::read_file("memory://it/video/seg_3.ts").unwrap();
        // Stream type in the PMT's only ES entry.
        assert_eq!(clear[TS_PACKET_SIZE + 5 + 12], 0x1B);
        assert_eq!(encrypted[TS_PACKET_SIZE + 5 + 12], 0xDB);
        memory::delete_file("memory://it/video/seg_2.ts");
        memory::delete_file("memory://it/video/seg_3.ts");
    }

    #[test]
    fn test_local_multi_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let template = format!("{}/seg_$Number%03d$.ts", dir.path().display());
        let (mut muxer, _listener) = new_muxer(
            MuxerOptions::new().with_segment_template(template),
            StreamInfo::audio(Codec::Mp3, 90000),
        );
        mux_audio(&mut muxer, 2, 3);
        muxer.finalize().unwrap();

        // The counter is bumped before naming and $Number$ renders it one-based.
        assert!(!dir.path().join("seg_001.ts").exists());
        for name in ["seg_002.ts", "seg_003.ts"] {
            let bytes = std::fs::read(dir.path().join(name)).unwrap();
            // PAT + PMT + 3 packets = 940 bytes, 940 % 32 == 12.
            assert_eq!(bytes.len(), 940 + 7 * TS_PACKET_SIZE + 16);
            assert_eq!(bytes.len() % 32, 0);
        }
    }

    #[test]
    fn test_output_is_deterministic() {
        fn run() -> (Vec<u8>, Vec<Event>) {
            let path = "memory://it/determinism.ts";
            let (mut muxer, listener) = new_muxer(
                MuxerOptions::new()
                    .with_output_file_name(path)
                    .with_timestamp_offset_ms(10),
                StreamInfo::audio(Codec::Mp3, 44100),
            );
            for i in 0..12 {
                let sample = MediaSample::new(vec![i as u8; 300])
                    .with_timestamp(i * 1152)
                    .with_duration(1152)
                    .with_key_flag(true);
                muxer.add_media_sample(&sample).unwrap();
                if i % 4 == 3 {
                    muxer
                        .finalize_segment(&SegmentInfo {
                            start_timestamp: (i - 3) * 1152,
                            duration: 4 * 1152,
                            ..Default::default()
                        })
                        .unwrap();
                }
            }
            muxer.finalize().unwrap();
            let bytes = memory::read_file(path).unwrap();
            memory::delete_file(path);
            (bytes, listener.events())
        }

        let first = run();
        let second = run();
        assert!(!first.0.is_empty());
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }
}
