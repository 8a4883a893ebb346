// tests/config_errors.rs

use std::io::Write;
use tempfile::NamedTempFile;
use transjob::config::{load_and_validate, load_from_path};
use transjob::errors::TransjobError;
use transjob_test_utils::builders::JobFileBuilder;

fn job_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_job_file_builds_the_command_line() {
    let file = job_file(
        r#"
[encoder]
binary = "ffmpeg"

[job]
input = "in.mp4"
output = "out.webm"
duration = 20.0
args = "-c:v libvpx-vp9 -b:a 96k -an"
filters = "scale=1280:720"
disabled = ["an"]

[options]
resolution = "1280x720"
"#,
    );

    let job = load_and_validate(file.path()).unwrap();
    let args = job.argument_set(job.input_duration(None));

    assert_eq!(job.input_duration(None), Some(20.0));
    assert!(args.is_disabled("an"));
    assert_eq!(
        args.serialize(),
        "-y -i in.mp4 -s 1280x720 -c:v libvpx-vp9 -b:a 96k -vf scale=1280:720 out.webm"
    );
}

#[test]
fn missing_output_is_a_config_error() {
    let file = job_file(
        r#"
[job]
input = "in.mp4"
"#,
    );

    match load_and_validate(file.path()) {
        Err(TransjobError::ConfigError(msg)) => assert!(msg.contains("output"), "{msg}"),
        Err(e) => panic!("Expected ConfigError, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_speed_is_rejected() {
    let file = job_file(
        r#"
[job]
input = "in.mp4"
output = "out.mp4"

[options]
speed = 0.0
"#,
    );

    match load_and_validate(file.path()) {
        Err(TransjobError::ConfigError(msg)) => assert!(msg.contains("speed"), "{msg}"),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn bad_resolution_is_rejected() {
    let raw = JobFileBuilder::new("in.mp4", "out.mp4").resolution("wide").raw();
    let err = transjob::config::JobFile::try_from(raw).unwrap_err();
    assert!(matches!(err, TransjobError::ConfigError(_)), "{err:?}");
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = job_file("[job\ninput = ");
    assert!(matches!(
        load_from_path(file.path()),
        Err(TransjobError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_from_path(dir.path().join("absent.toml")),
        Err(TransjobError::IoError(_))
    ));
}

#[test]
fn builder_speed_adds_setpts_filter() {
    let job = JobFileBuilder::new("in.mp4", "out.mp4")
        .overwrite(false)
        .speed(4.0)
        .build();

    assert_eq!(job.filter_set().filter_chain(), "setpts=PTS/4");
    assert_eq!(job.output_duration(20.0), 5.0);
    assert_eq!(
        job.argument_set(None).emit(),
        vec!["-i", "in.mp4", "-vf", "setpts=PTS/4", "out.mp4"]
    );
}
