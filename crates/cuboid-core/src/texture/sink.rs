use crate::error::TextureLoadError;

/// Progress value delivered in place of a failure to sinks that only take a
/// percentage (plain `FnMut(u8)` closures). Outside `0..=100`, so it can never
/// be mistaken for progress.
pub const LOAD_FAILED: u8 = u8::MAX;

/// Caller-owned receiver of load progress.
///
/// Only the sink of the newest operation is ever invoked. Progress values are
/// in `0..=100` (or [`LOAD_FAILED`], from the default `on_failure`) and never
/// decrease within one operation; 100 is delivered once,
/// after the new image is bound to the mesh.
pub trait ProgressSink {
    fn on_progress(&mut self, percent: u8);

    /// Terminal failure. Delivered at most once; no progress follows it.
    ///
    /// Defaults to reporting [`LOAD_FAILED`] through `on_progress`.
    fn on_failure(&mut self, error: &TextureLoadError) {
        let _ = error;
        self.on_progress(LOAD_FAILED);
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(u8),
{
    fn on_progress(&mut self, percent: u8) {
        self(percent)
    }
}

/// Sink that drops every report.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _percent: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_sinks_see_failure_as_sentinel() {
        let mut seen = Vec::new();
        {
            let mut sink = |p: u8| seen.push(p);
            sink.on_progress(0);
            sink.on_progress(40);
            sink.on_failure(&TextureLoadError::UnsupportedFormat);
        }
        assert_eq!(seen, vec![0, 40, LOAD_FAILED]);
    }

    #[test]
    fn no_progress_ignores_failure() {
        NoProgress.on_failure(&TextureLoadError::WorkerLost);
    }
}
