#![allow(dead_code)]

use transjob::config::{JobFile, RawJobFile};

/// Builder for `JobFile` to simplify test setup.
pub struct JobFileBuilder {
    raw: RawJobFile,
}

impl JobFileBuilder {
    pub fn new(input: &str, output: &str) -> Self {
        let mut raw = RawJobFile::default();
        raw.job.input = Some(input.to_string());
        raw.job.output = Some(output.to_string());
        Self { raw }
    }

    pub fn binary(mut self, binary: &str) -> Self {
        self.raw.encoder.binary = binary.to_string();
        self
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.raw.job.duration = Some(secs);
        self
    }

    pub fn overwrite(mut self, val: bool) -> Self {
        self.raw.job.overwrite = val;
        self
    }

    pub fn args(mut self, text: &str) -> Self {
        self.raw.job.args = Some(text.to_string());
        self
    }

    pub fn filters(mut self, text: &str) -> Self {
        self.raw.job.filters = Some(text.to_string());
        self
    }

    pub fn disable(mut self, name: &str) -> Self {
        self.raw.job.disabled.push(name.to_string());
        self
    }

    pub fn encoder(mut self, codec: &str) -> Self {
        self.raw.options.encoder = Some(codec.to_string());
        self
    }

    pub fn resolution(mut self, text: &str) -> Self {
        self.raw.options.resolution = Some(text.to_string());
        self
    }

    pub fn speed(mut self, val: f64) -> Self {
        self.raw.options.speed = Some(val);
        self
    }

    pub fn raw(self) -> RawJobFile {
        self.raw
    }

    pub fn build(self) -> JobFile {
        JobFile::try_from(self.raw).expect("Failed to build valid job file from builder")
    }
}
