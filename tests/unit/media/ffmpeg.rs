use super::*;

#[test]
fn opts_builders_override_binaries() {
    let opts = FfmpegOpts::default()
        .with_ffmpeg_bin("/opt/ff/bin/ffmpeg")
        .with_ffprobe_bin("/opt/ff/bin/ffprobe");
    assert_eq!(opts.ffmpeg_bin(), std::path::Path::new("/opt/ff/bin/ffmpeg"));
    assert_eq!(opts.ffprobe_bin(), std::path::Path::new("/opt/ff/bin/ffprobe"));
}

#[test]
fn missing_asset_fails_with_reader_open() {
    let opener = FfmpegOpener::default();
    let err = opener
        .open(&MediaAsset::new("/definitely/not/here.mp4"))
        .err()
        .unwrap();
    assert!(err.is_reader_open(), "{err}");
    assert!(err.to_string().contains("/definitely/not/here.mp4"));
}

#[test]
fn missing_ffprobe_binary_fails_with_reader_open() {
    let opener =
        FfmpegOpener::new(FfmpegOpts::default().with_ffprobe_bin("/nonexistent/ffprobe-xyz"));
    let err = opener.open(&MediaAsset::new("clip.mp4")).err().unwrap();
    assert!(err.is_reader_open());
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn frame_rates_parse_from_rationals() {
    use super::probe::parse_rate;

    assert_eq!(parse_rate("30/1"), Some(30.0));
    assert!((parse_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
    assert_eq!(parse_rate("25"), Some(25.0));
    assert_eq!(parse_rate("0/0"), None);
    assert_eq!(parse_rate("garbage"), None);
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn quarter_turn_rotation_swaps_axes() {
    use super::probe::displayed_size;

    assert_eq!(displayed_size(64, 32, 0.0), (64, 32));
    assert_eq!(displayed_size(64, 32, 90.0), (32, 64));
    assert_eq!(displayed_size(64, 32, -90.0), (32, 64));
    assert_eq!(displayed_size(64, 32, 270.0), (32, 64));
    assert_eq!(displayed_size(64, 32, 180.0), (64, 32));
    assert_eq!(displayed_size(64, 32, f64::NAN), (64, 32));
}

/// Hands out at most `chunk` bytes per read, like a pipe under load.
#[cfg(feature = "media-ffmpeg")]
struct Trickle<'a> {
    data: &'a [u8],
    chunk: usize,
}

#[cfg(feature = "media-ffmpeg")]
impl std::io::Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn packed_frames_assemble_across_short_reads() {
    use super::process::read_packed_frame;

    let data: Vec<u8> = (0..2 * 2 * 4 * 2).map(|i| i as u8).collect();
    let mut src = Trickle {
        data: &data,
        chunk: 5,
    };
    let first = read_packed_frame(&mut src, 2, 2).unwrap().unwrap();
    assert_eq!(first.get_pixel(1, 1).0, [12, 13, 14, 15]);
    let second = read_packed_frame(&mut src, 2, 2).unwrap().unwrap();
    assert_eq!(second.get_pixel(0, 0).0, [16, 17, 18, 19]);
    assert!(read_packed_frame(&mut src, 2, 2).unwrap().is_none());
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn truncated_frame_is_a_decode_error() {
    use super::process::read_packed_frame;

    let data = [7u8; 10];
    let mut src = Trickle {
        data: &data,
        chunk: 64,
    };
    let err = read_packed_frame(&mut src, 2, 2).unwrap_err();
    assert!(matches!(err, ScreenError::Decode(_)), "{err}");
    assert!(err.to_string().contains("10 of 16"));
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn frame_times_follow_rate() {
    use std::time::Duration;

    let (pts, dur) = super::process::frame_time(4.0, 3);
    assert_eq!(pts, Duration::from_millis(750));
    assert_eq!(dur, Duration::from_millis(250));
}
