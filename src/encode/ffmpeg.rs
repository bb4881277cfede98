use crate::encode::process::EncoderProcess;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Color, FrameIndex};
use crate::foundation::error::{BounceError, BounceResult};
use crate::raster::Raster;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Options for [`EncoderSink`] output.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncoderOpts {
    /// Encoder executable, looked up on `PATH`.
    pub program: String,
    /// Output file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Video codec passed to `-c:v`.
    pub codec: String,
    /// Output pixel format; `None` lets the encoder choose.
    pub output_pix_fmt: Option<String>,
    /// Encoder `-loglevel`.
    pub loglevel: String,
}

impl EncoderOpts {
    /// H.264 MP4 output to `out_path` through the system `ffmpeg`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            program: "ffmpeg".to_owned(),
            out_path: out_path.into(),
            overwrite: true,
            codec: "libx264".to_owned(),
            output_pix_fmt: Some("yuv420p".to_owned()),
            loglevel: "error".to_owned(),
        }
    }
}

/// Full encoder argument list for a raw frame stream on stdin.
///
/// The declared pixel format, resolution and rate must describe the bytes written exactly;
/// the encoder has no way to detect a mismatch.
pub fn encoder_args(cfg: &SinkConfig, opts: &EncoderOpts) -> Vec<OsString> {
    let overwrite = if opts.overwrite { "-y" } else { "-n" };
    let resolution = cfg.canvas.resolution();
    let rate = cfg.fps.to_arg();

    let mut args: Vec<OsString> = vec![overwrite.into()];
    for a in [
        "-loglevel",
        opts.loglevel.as_str(),
        "-f",
        "rawvideo",
        "-pix_fmt",
        Color::RAW_PIX_FMT,
        "-s",
        resolution.as_str(),
        // For rawvideo input, `-r` before `-i` sets the input rate.
        "-r",
        rate.as_str(),
        "-i",
        "pipe:0",
        "-an",
        "-c:v",
        opts.codec.as_str(),
    ] {
        args.push(a.into());
    }
    if let Some(pix_fmt) = opts.output_pix_fmt.as_deref() {
        args.push("-pix_fmt".into());
        args.push(pix_fmt.into());
    }
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Sink that spawns the encoder and streams raw frames to its stdin.
#[derive(Debug)]
pub struct EncoderSink {
    opts: EncoderOpts,
    process: Option<EncoderProcess>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl EncoderSink {
    /// Create a new sink; nothing is spawned until `begin`.
    pub fn new(opts: EncoderOpts) -> Self {
        Self {
            opts,
            process: None,
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for EncoderSink {
    fn begin(&mut self, cfg: SinkConfig) -> BounceResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(BounceError::validation("fps must be non-zero"));
        }
        if cfg.canvas.width == 0 || cfg.canvas.height == 0 {
            return Err(BounceError::validation(
                "encoder sink width/height must be non-zero",
            ));
        }
        if self.process.is_some() {
            return Err(BounceError::validation("encoder sink already started"));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(BounceError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let mut cmd = Command::new(&self.opts.program);
        cmd.args(encoder_args(&cfg, &self.opts))
            .stdout(Stdio::null());

        tracing::info!(
            program = %self.opts.program,
            resolution = %cfg.canvas.resolution(),
            fps = cfg.fps.as_f64(),
            out = %self.opts.out_path.display(),
            "starting encoder"
        );
        self.process = Some(EncoderProcess::spawn(cmd)?);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Raster) -> BounceResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| BounceError::transport("encoder sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(BounceError::transport(
                "encoder sink received out-of-order frame index",
            ));
        }
        if frame.canvas() != cfg.canvas {
            return Err(BounceError::validation(format!(
                "frame size mismatch: got {}, expected {}",
                frame.canvas().resolution(),
                cfg.canvas.resolution()
            )));
        }
        let bytes = frame.raw_bytes();
        if bytes.len() != cfg.frame_bytes() {
            return Err(BounceError::validation(
                "raster byte length does not match width*height*4",
            ));
        }

        let Some(process) = self.process.as_mut() else {
            return Err(BounceError::transport("encoder sink is already finalized"));
        };
        if let Err(err) = process.write_frame(bytes) {
            // The process is already torn down; drop it so `end` reports the abort.
            self.process = None;
            return Err(err);
        }
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> BounceResult<()> {
        let process = self
            .process
            .take()
            .ok_or_else(|| BounceError::encoder("encoder sink not running"))?;
        self.cfg = None;
        process.finish()
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> BounceResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `program -version` runs successfully from `PATH`.
pub fn is_encoder_on_path(program: &str) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_encoder_on_path("ffmpeg")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
