use std::path::Path;

use transjob::media::{FrameSource, Resolution, frame_args, strip_timestamps};
use transjob_test_utils::fakes::FakeFrameSource;

#[tokio::test]
async fn strip_requests_one_frame_per_timestamp() {
    let source = FakeFrameSource::new();
    let resolution: Resolution = "160x90".parse().unwrap();
    let timestamps = strip_timestamps(30.0, 640.0, 160.0);
    assert_eq!(timestamps.len(), 5);

    let mut frames = Vec::new();
    for ts in &timestamps {
        frames.push(source.get_frame(Path::new("in.mp4"), *ts, resolution).await.unwrap());
    }

    let requests = source.requests();
    assert_eq!(requests.len(), 5);
    assert_eq!(requests[1].timestamp, 6.0);
    assert_eq!(requests[4].resolution, resolution);
    assert_eq!(frames[2], 12_000u64.to_le_bytes().to_vec());
}

#[tokio::test]
async fn frame_errors_surface_to_the_caller() {
    let source = FakeFrameSource::new();
    let res = source
        .get_frame(Path::new("in.mp4"), -1.0, Resolution::new(64, 36))
        .await;
    assert!(res.is_err());
}

#[test]
fn frame_arguments_pipe_a_single_webp() {
    let args = frame_args(Path::new("clip.mkv"), 2.5, Resolution::new(320, 180));
    assert_eq!(
        args.serialize(),
        "-ss 2.500 -i clip.mkv -frames:v 1 -s 320x180 -c:v webp -f image2pipe -"
    );
}
