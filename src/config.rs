use std::env;

/// Environment variable overriding [`MuxerOptions::segment_template`].
pub const ENV_SEGMENT_TEMPLATE: &str = "VDKIO_TS_SEGMENT_TEMPLATE";
/// Environment variable overriding [`MuxerOptions::output_file_name`].
pub const ENV_OUTPUT_FILE: &str = "VDKIO_TS_OUTPUT_FILE";
/// Environment variable overriding [`MuxerOptions::bandwidth`].
pub const ENV_BANDWIDTH: &str = "VDKIO_TS_BANDWIDTH";
/// Environment variable overriding [`MuxerOptions::transport_stream_timestamp_offset_ms`].
pub const ENV_TIMESTAMP_OFFSET_MS: &str = "VDKIO_TS_TIMESTAMP_OFFSET_MS";

/// Options shared by a [`TsMuxer`](crate::format::ts::TsMuxer) and its segmenter.
///
/// A non-empty `segment_template` selects multi-file output; otherwise every
/// segment is appended to `output_file_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MuxerOptions {
    /// Naming pattern for per-segment files, e.g. `seg_$Number%05d$.ts`.
    pub segment_template: String,
    /// Target path for single-file output.
    pub output_file_name: String,
    /// Bandwidth hint, substituted for `$Bandwidth$` in the template.
    pub bandwidth: u32,
    /// Fixed bias added to every emitted timestamp.
    pub transport_stream_timestamp_offset_ms: i32,
}

impl MuxerOptions {
    /// Empty options: no output configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-segment file name template.
    pub fn with_segment_template(mut self, template: impl Into<String>) -> Self {
        self.segment_template = template.into();
        self
    }

    /// Sets the single-file output path.
    pub fn with_output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = name.into();
        self
    }

    /// Sets the bandwidth hint.
    pub fn with_bandwidth(mut self, bandwidth: u32) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    /// Sets the timestamp offset in milliseconds.
    pub fn with_timestamp_offset_ms(mut self, offset_ms: i32) -> Self {
        self.transport_stream_timestamp_offset_ms = offset_ms;
        self
    }

    /// Builds options from the defaults overlaid with any `VDKIO_TS_*`
    /// environment variables that are set. Unparsable numbers are ignored.
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// Overlays `VDKIO_TS_*` environment variables on top of `self`.
    pub fn overlay_env(mut self) -> Self {
        if let Ok(template) = env::var(ENV_SEGMENT_TEMPLATE) {
            self.segment_template = template;
        }
        if let Ok(name) = env::var(ENV_OUTPUT_FILE) {
            self.output_file_name = name;
        }
        if let Some(bandwidth) = parse_env(ENV_BANDWIDTH) {
            self.bandwidth = bandwidth;
        }
        if let Some(offset) = parse_env(ENV_TIMESTAMP_OFFSET_MS) {
            self.transport_stream_timestamp_offset_ms = offset;
        }
        self
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}: cannot parse {:?}", key, raw);
            None
        }
    }
}
