use std::path::PathBuf;

use crate::foundation::error::{ScreenError, ScreenResult};
use crate::media::reader::{AssetReader, MediaAsset, MediaOpener};

/// Executable locations for the process-backed reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FfmpegOpts {
    pub(crate) ffmpeg_bin: PathBuf,
    pub(crate) ffprobe_bin: PathBuf,
}

impl Default for FfmpegOpts {
    /// `ffmpeg`/`ffprobe` from `PATH`, unless `SCREENSTAGE_FFMPEG` / `SCREENSTAGE_FFPROBE` are set.
    fn default() -> Self {
        let from_env = |var: &str, fallback: &str| {
            std::env::var_os(var)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(fallback))
        };
        Self {
            ffmpeg_bin: from_env("SCREENSTAGE_FFMPEG", "ffmpeg"),
            ffprobe_bin: from_env("SCREENSTAGE_FFPROBE", "ffprobe"),
        }
    }
}

impl FfmpegOpts {
    pub fn with_ffmpeg_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.ffmpeg_bin = bin.into();
        self
    }

    pub fn with_ffprobe_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.ffprobe_bin = bin.into();
        self
    }

    pub fn ffmpeg_bin(&self) -> &std::path::Path {
        &self.ffmpeg_bin
    }

    pub fn ffprobe_bin(&self) -> &std::path::Path {
        &self.ffprobe_bin
    }
}

/// [`MediaOpener`] that probes with `ffprobe` and decodes through an `ffmpeg` child process.
#[derive(Clone, Debug, Default)]
pub struct FfmpegOpener {
    opts: FfmpegOpts,
}

impl FfmpegOpener {
    pub fn new(opts: FfmpegOpts) -> Self {
        Self { opts }
    }

    pub fn opts(&self) -> &FfmpegOpts {
        &self.opts
    }
}

#[cfg(feature = "media-ffmpeg")]
impl MediaOpener for FfmpegOpener {
    #[tracing::instrument(skip(self, asset), fields(asset = %asset))]
    fn open(&self, asset: &MediaAsset) -> ScreenResult<Box<dyn AssetReader>> {
        let tracks = probe::video_tracks(&self.opts.ffprobe_bin, asset)
            .map_err(|e| ScreenError::reader_open(asset.to_string(), format!("{e:#}")))?;
        tracing::debug!(tracks = tracks.len(), "probed media asset");
        Ok(Box::new(FfmpegReader {
            opts: self.opts.clone(),
            asset: asset.clone(),
            tracks,
            output: None,
            child: None,
            frame_index: 0,
        }))
    }
}

#[cfg(not(feature = "media-ffmpeg"))]
impl MediaOpener for FfmpegOpener {
    /// Always fails: media decoding requires the `media-ffmpeg` feature.
    fn open(&self, asset: &MediaAsset) -> ScreenResult<Box<dyn AssetReader>> {
        Err(ScreenError::reader_open(
            asset.to_string(),
            "media assets require the 'media-ffmpeg' feature",
        ))
    }
}

#[cfg(feature = "media-ffmpeg")]
pub use process::FfmpegReader;

#[cfg(feature = "media-ffmpeg")]
mod probe {
    use std::path::Path;
    use std::time::Duration;

    use anyhow::Context;

    use crate::media::reader::{MediaAsset, TrackInfo};

    #[derive(serde::Deserialize)]
    struct ProbeStream {
        index: u32,
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        avg_frame_rate: Option<String>,
        duration: Option<String>,
        #[serde(default)]
        tags: ProbeTags,
        #[serde(default)]
        side_data_list: Vec<ProbeSideData>,
    }

    #[derive(Default, serde::Deserialize)]
    struct ProbeTags {
        rotate: Option<String>,
    }

    #[derive(serde::Deserialize)]
    struct ProbeSideData {
        rotation: Option<f64>,
    }

    impl ProbeStream {
        /// Display-matrix rotation in degrees, falling back to the legacy `rotate` tag.
        fn rotation(&self) -> f64 {
            self.side_data_list
                .iter()
                .find_map(|sd| sd.rotation)
                .or_else(|| self.tags.rotate.as_deref().and_then(|r| r.trim().parse().ok()))
                .unwrap_or(0.0)
        }
    }

    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
    }

    /// Frame size ffmpeg emits after autorotation: quarter turns swap the coded axes.
    pub(super) fn displayed_size(width: u32, height: u32, rotation_deg: f64) -> (u32, u32) {
        if !rotation_deg.is_finite() {
            return (width, height);
        }
        let quarter_turns = (rotation_deg / 90.0).round() as i64;
        if quarter_turns.rem_euclid(2) == 1 {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Video streams with known dimensions, in container order.
    ///
    /// Dimensions are the displayed (rotation-applied) size, matching the decoder pipe.
    pub(super) fn video_tracks(
        ffprobe: &Path,
        asset: &MediaAsset,
    ) -> anyhow::Result<Vec<TrackInfo>> {
        let out = std::process::Command::new(ffprobe)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(asset.path())
            .output()
            .with_context(|| format!("failed to run '{}'", ffprobe.display()))?;
        if !out.status.success() {
            anyhow::bail!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }

        let parsed: ProbeOut =
            serde_json::from_slice(&out.stdout).context("ffprobe json parse failed")?;
        Ok(parsed
            .streams
            .into_iter()
            .filter(|s| s.codec_type.as_deref() == Some("video"))
            .filter_map(|s| {
                let coded_w = s.width.filter(|w| *w > 0)?;
                let coded_h = s.height.filter(|h| *h > 0)?;
                let (width, height) = displayed_size(coded_w, coded_h, s.rotation());
                Some(TrackInfo {
                    index: s.index,
                    width,
                    height,
                    frame_rate: s.avg_frame_rate.as_deref().and_then(parse_rate),
                    duration: s
                        .duration
                        .as_deref()
                        .and_then(|d| d.parse::<f64>().ok())
                        .filter(|d| d.is_finite() && *d >= 0.0)
                        .map(Duration::from_secs_f64),
                })
            })
            .collect())
    }

    /// Parse ffprobe rationals such as `30000/1001`. `0/0` and non-positive rates yield `None`.
    pub(super) fn parse_rate(s: &str) -> Option<f64> {
        let rate = match s.split_once('/') {
            Some((n, d)) => {
                let n: f64 = n.trim().parse().ok()?;
                let d: f64 = d.trim().parse().ok()?;
                if d == 0.0 {
                    return None;
                }
                n / d
            }
            None => s.trim().parse().ok()?,
        };
        (rate.is_finite() && rate > 0.0).then_some(rate)
    }
}

#[cfg(feature = "media-ffmpeg")]
mod process {
    use std::io::Read;
    use std::process::{Child, ChildStdout, Command, Stdio};
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::Context;
    use image::RgbaImage;

    use super::FfmpegOpts;
    use crate::foundation::error::{ScreenError, ScreenResult};
    use crate::media::reader::{AssetReader, MediaAsset, OutputSettings, PixelFormat, TrackInfo};
    use crate::video::frame::VideoFrame;

    /// Used when the container does not report an average frame rate.
    const FALLBACK_FPS: f64 = 30.0;

    /// [`AssetReader`] that streams raw RGBA frames from an `ffmpeg` child's stdout.
    #[derive(Debug)]
    pub struct FfmpegReader {
        pub(super) opts: FfmpegOpts,
        pub(super) asset: MediaAsset,
        pub(super) tracks: Vec<TrackInfo>,
        pub(super) output: Option<(TrackInfo, OutputSettings)>,
        pub(super) child: Option<(Child, ChildStdout)>,
        pub(super) frame_index: u64,
    }

    impl FfmpegReader {
        fn spawn(
            &self,
            track: &TrackInfo,
            settings: OutputSettings,
        ) -> anyhow::Result<(Child, ChildStdout)> {
            let pix_fmt = match settings.pixel_format {
                PixelFormat::Rgba8 => "rgba",
            };
            let mut child = Command::new(&self.opts.ffmpeg_bin)
                .args(["-v", "error", "-nostdin", "-i"])
                .arg(self.asset.path())
                .args([
                    "-map",
                    &format!("0:{}", track.index),
                    "-f",
                    "rawvideo",
                    "-pix_fmt",
                    pix_fmt,
                    "pipe:1",
                ])
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::null())
                .spawn()
                .with_context(|| format!("failed to spawn '{}'", self.opts.ffmpeg_bin.display()))?;
            let stdout = child
                .stdout
                .take()
                .context("ffmpeg child has no stdout pipe")?;
            Ok((child, stdout))
        }

        /// Read one packed frame of `w`x`h` from the pipe.
        ///
        /// A clean end of stream is `Ok(None)`; a truncated frame is a decode error.
        fn read_frame(&mut self, w: u32, h: u32) -> ScreenResult<Option<RgbaImage>> {
            let Some((_, stdout)) = self.child.as_mut() else {
                return Ok(None);
            };
            read_packed_frame(stdout, w, h)
        }
    }

    /// Fill one `w`x`h` RGBA frame from `src`, tolerating short reads from the pipe.
    pub(super) fn read_packed_frame(
        src: &mut impl Read,
        w: u32,
        h: u32,
    ) -> ScreenResult<Option<RgbaImage>> {
        let mut buf = vec![0u8; w as usize * h as usize * 4];
        let mut filled = 0;
        while filled < buf.len() {
            match src.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => return Err(ScreenError::decode(format!("ffmpeg pipe: {err}"))),
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        if filled < buf.len() {
            return Err(ScreenError::decode(format!(
                "truncated frame: got {filled} of {} bytes for {w}x{h}",
                buf.len()
            )));
        }
        RgbaImage::from_raw(w, h, buf)
            .map(Some)
            .ok_or_else(|| ScreenError::decode(format!("frame buffer does not fit {w}x{h}")))
    }

    /// Presentation time and duration of frame `index` at a constant `fps`.
    pub(super) fn frame_time(fps: f64, index: u64) -> (Duration, Duration) {
        (
            Duration::from_secs_f64(index as f64 / fps),
            Duration::from_secs_f64(1.0 / fps),
        )
    }

    impl AssetReader for FfmpegReader {
        fn video_tracks(&self) -> &[TrackInfo] {
            &self.tracks
        }

        fn attach_output(
            &mut self,
            track: &TrackInfo,
            settings: OutputSettings,
        ) -> ScreenResult<()> {
            if !self.tracks.iter().any(|t| t.index == track.index) {
                return Err(ScreenError::validation(format!(
                    "track {} is not a video track of '{}'",
                    track.index, self.asset
                )));
            }
            self.output = Some((track.clone(), settings));
            Ok(())
        }

        fn start(&mut self) -> ScreenResult<()> {
            let (track, settings) = self
                .output
                .clone()
                .ok_or_else(|| ScreenError::validation("no output attached before start"))?;
            self.cancel();
            self.child = Some(self.spawn(&track, settings)?);
            self.frame_index = 0;
            Ok(())
        }

        fn next_frame(&mut self) -> Option<VideoFrame> {
            let (w, h, fps) = {
                let (track, _) = self.output.as_ref()?;
                let fps = track.frame_rate.unwrap_or(FALLBACK_FPS);
                (track.width, track.height, fps)
            };
            let image = match self.read_frame(w, h) {
                Ok(Some(image)) => image,
                Ok(None) => {
                    tracing::debug!(asset = %self.asset, "ffmpeg stream ended");
                    self.cancel();
                    return None;
                }
                Err(err) => {
                    tracing::warn!(asset = %self.asset, error = %err, "ffmpeg stream aborted");
                    self.cancel();
                    return None;
                }
            };
            let (pts, duration) = frame_time(fps, self.frame_index);
            self.frame_index += 1;
            Some(VideoFrame::new(Arc::new(image), pts).with_duration(duration))
        }

        fn cancel(&mut self) {
            if let Some((mut child, stdout)) = self.child.take() {
                drop(stdout);
                if let Err(err) = child.kill() {
                    tracing::debug!(error = %err, "ffmpeg child already exited");
                }
                if let Err(err) = child.wait() {
                    tracing::warn!(error = %err, "failed to reap ffmpeg child");
                }
            }
        }
    }

    impl Drop for FfmpegReader {
        fn drop(&mut self) {
            self.cancel();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/ffmpeg.rs"]
mod tests;
