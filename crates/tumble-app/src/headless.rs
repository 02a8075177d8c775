use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tumble_core::config::TumbleConfig;
use tumble_core::engine::{EngineState, TumbleEngine};
use tumble_core::error::CoreError;
use tumble_core::raster::CharGrid;
use tumble_core::traits::FrameSink;

/// Writes each frame as plain text, frames separated by a blank line.
///
/// `deliver` cannot fail, so the first I/O error is kept and reported by
/// [`TextSink::finish`]; later frames are dropped.
pub struct TextSink<W: Write> {
    out: W,
    error: Option<io::Error>,
    written: u64,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            error: None,
            written: 0,
        }
    }

    /// Frames written so far.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and hand back the writer, or the first error seen.
    ///
    /// # Errors
    /// Returns the first write error, or a flush error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_frame(&mut self, frame: &CharGrid) -> io::Result<()> {
        write!(self.out, "{frame}")?;
        writeln!(self.out)
    }
}

impl<W: Write> FrameSink for TextSink<W> {
    fn deliver(&mut self, frame: CharGrid) {
        if self.error.is_some() {
            return;
        }
        match self.write_frame(&frame) {
            Ok(()) => self.written += 1,
            Err(e) => self.error = Some(e),
        }
    }
}

/// Render `frames` ticks into `out`, stopping early once `stop` is set.
///
/// The stop flag is only checked between ticks: a tick in progress always
/// completes and is written.
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] when the config has no fixed
/// grid size, or the first write error.
pub fn run<W: Write>(config: &TumbleConfig, frames: u64, out: W, stop: &AtomicBool) -> Result<W> {
    let mut engine = TumbleEngine::from_config(config, (0, 0));
    if engine.state() != EngineState::Ready {
        return Err(CoreError::InvalidDimensions {
            width: config.width,
            height: config.height,
        })
        .context("Le mode headless requiert --size ou width/height dans la config");
    }

    let mut sink = TextSink::new(out);
    for _ in 0..frames {
        if stop.load(Ordering::Relaxed) {
            log::info!("Arrêt demandé après {} frame(s)", sink.written());
            break;
        }
        engine.tick_into(&mut sink);
    }
    log::debug!("{} frame(s) écrite(s)", sink.written());
    sink.finish().context("Écriture des frames impossible")
}

/// [`run`] on stdout, with Ctrl-C stopping between ticks.
///
/// # Errors
/// See [`run`]; also fails if the Ctrl-C handler cannot be installed.
pub fn run_stdout(config: &TumbleConfig, frames: u64) -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("Impossible d'installer le handler Ctrl-C")?;

    let stdout = io::stdout().lock();
    run(config, frames, io::BufWriter::new(stdout), &stop)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(width: u16, height: u16) -> TumbleConfig {
        TumbleConfig {
            width,
            height,
            seed: Some(3),
            ..TumbleConfig::default()
        }
    }

    #[test]
    fn writes_requested_frames() {
        let stop = AtomicBool::new(false);
        let out = run(&fixed(20, 6), 3, Vec::new(), &stop).unwrap();
        let text = String::from_utf8(out).unwrap();
        let frames: Vec<&str> = text.split("\n\n").filter(|f| !f.is_empty()).collect();
        assert_eq!(frames.len(), 3);
        for frame in frames {
            let lines: Vec<&str> = frame.lines().collect();
            assert_eq!(lines.len(), 6);
            assert!(lines.iter().all(|l| l.chars().count() == 20));
        }
    }

    #[test]
    fn stop_flag_prevents_ticks() {
        let stop = AtomicBool::new(true);
        let out = run(&fixed(20, 6), 10, Vec::new(), &stop).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn missing_size_is_rejected() {
        let stop = AtomicBool::new(false);
        let err = run(&TumbleConfig::default(), 1, Vec::new(), &stop).unwrap_err();
        assert!(err.downcast_ref::<CoreError>().is_some(), "{err:#}");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "fermé"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_error_is_reported() {
        let stop = AtomicBool::new(false);
        assert!(run(&fixed(10, 4), 2, FailingWriter, &stop).is_err());
    }
}
