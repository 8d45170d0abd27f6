use bytes::Bytes;

/// One decoded access unit, timestamps in the stream's source time scale.
#[derive(Debug, Clone)]
pub struct MediaSample {
    /// Payload, length-prefixed NAL units for video.
    pub data: Bytes,
    /// Presentation timestamp.
    pub pts: i64,
    /// Decode timestamp.
    pub dts: i64,
    /// Duration in the source time scale.
    pub duration: i64,
    /// Whether decoding can start at this sample.
    pub is_key_frame: bool,
    /// Whether the payload is SAMPLE-AES encrypted.
    pub is_encrypted: bool,
}

impl MediaSample {
    /// A non-key, clear sample at time 0.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pts: 0,
            dts: 0,
            duration: 0,
            is_key_frame: false,
            is_encrypted: false,
        }
    }

    /// Sets both pts and dts.
    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.pts = ts;
        self.dts = ts;
        self
    }

    /// Sets the presentation timestamp.
    pub fn with_pts(mut self, pts: i64) -> Self {
        self.pts = pts;
        self
    }

    /// Sets the decode timestamp.
    pub fn with_dts(mut self, dts: i64) -> Self {
        self.dts = dts;
        self
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = duration;
        self
    }

    /// Marks the sample as a key frame.
    pub fn with_key_flag(mut self, is_key: bool) -> Self {
        self.is_key_frame = is_key;
        self
    }

    /// Marks the sample as encrypted.
    pub fn with_encrypted(mut self, is_encrypted: bool) -> Self {
        self.is_encrypted = is_encrypted;
        self
    }

    /// Payload length in bytes.
    pub fn data_size(&self) -> usize {
        self.data.len()
    }
}
