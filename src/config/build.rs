// src/config/build.rs

//! Turning a validated [`JobFile`] into the encoder's argument set.

use crate::args::ArgumentSet;
use crate::config::model::JobFile;

/// Kilobits per mebibyte.
const KBITS_PER_MB: f64 = 8.0 * 1024.0;

impl JobFile {
    /// The duration used for progress: the configured value, else `probed`.
    pub fn input_duration(&self, probed: Option<f64>) -> Option<f64> {
        self.job.duration.or(probed).filter(|d| *d > 0.0)
    }

    /// Length of the output given the input length, accounting for the
    /// playback speed option.
    pub fn output_duration(&self, input_duration: f64) -> f64 {
        match self.options.speed {
            Some(speed) if speed > 0.0 => input_duration / speed,
            _ => input_duration,
        }
    }

    /// Video filter chain: `[job].filters` plus the speed option.
    pub fn filter_set(&self) -> ArgumentSet {
        let mut filters = ArgumentSet::assignments();
        if let Some(text) = &self.job.filters {
            filters.hydrate(text);
        }
        if let Some(speed) = self.options.speed {
            if (speed - 1.0).abs() > f64::EPSILON {
                filters.set("setpts", format!("PTS/{speed}"));
            }
        }
        filters
    }

    /// Full encoder argument set.
    ///
    /// Typed options come first, free-form `[job].args` may override them,
    /// the filter chain goes into `-vf`, then `disabled` names are switched
    /// off and the output path is appended.
    pub fn argument_set(&self, input_duration: Option<f64>) -> ArgumentSet {
        let mut args = ArgumentSet::flags();
        let opts = &self.options;

        args.set("y", self.job.overwrite).set("i", self.input.as_str());

        if let Some(encoder) = &opts.encoder {
            args.set("c:v", encoder.as_str());
        }
        args.set("an", opts.no_audio);
        if let Some(fps) = opts.fps {
            args.set("r", fps);
        }
        if let Some(bitrate) = opts
            .file_size_mb
            .zip(input_duration.map(|d| self.output_duration(d)))
            .and_then(|(size, duration)| target_bitrate_kbits(size, duration))
        {
            args.set("b:v", format!("{bitrate}k"));
        }
        if let Some(limit) = opts.frame_limit {
            args.set("frames:v", limit);
        }
        if let Some(resolution) = self.resolution {
            args.set("s", resolution.to_string());
        }

        if let Some(text) = &self.job.args {
            args.hydrate(text);
        }

        let chain = self.filter_set().filter_chain();
        if !chain.is_empty() {
            args.set("vf", chain);
        }

        for name in &self.job.disabled {
            if !args.is_disabled(name) {
                args.toggle_disabled(name);
            }
        }

        args.push_positional(self.output.as_str());
        args
    }
}

/// Video bitrate (kbit/s) that fills `size_mb` over `duration` seconds.
pub fn target_bitrate_kbits(size_mb: f64, duration: f64) -> Option<u64> {
    if !(size_mb > 0.0 && duration > 0.0) {
        return None;
    }
    Some((size_mb * KBITS_PER_MB / duration).floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::RawJobFile;

    fn job(toml_text: &str) -> JobFile {
        let raw: RawJobFile = toml::from_str(toml_text).unwrap();
        JobFile::try_from(raw).unwrap()
    }

    #[test]
    fn minimal_job_emits_overwrite_input_output() {
        let j = job(
            r#"
[job]
input = "in.mp4"
output = "out.mp4"
"#,
        );
        assert_eq!(j.argument_set(None).emit(), vec!["-y", "-i", "in.mp4", "out.mp4"]);
    }

    #[test]
    fn typed_options_and_free_args() {
        let j = job(
            r#"
[job]
input = "in.mp4"
output = "out.mp4"
args = "-preset fast -c:v libx265"
filters = "scale=1280:720"
disabled = ["preset"]

[options]
encoder = "libx264"
no_audio = true
fps = 30
file_size_mb = 10.0
speed = 2.0
"#,
        );

        let tokens = j.argument_set(Some(20.0)).serialize();
        assert_eq!(
            tokens,
            "-y -i in.mp4 -c:v libx265 -an -r 30 -b:v 8192k -vf scale=1280:720,setpts=PTS/2 out.mp4"
        );
        assert_eq!(j.output_duration(20.0), 10.0);
    }

    #[test]
    fn bitrate_needs_duration() {
        assert_eq!(target_bitrate_kbits(10.0, 0.0), None);
        assert_eq!(target_bitrate_kbits(1.0, 8.0), Some(1024));
    }
}
