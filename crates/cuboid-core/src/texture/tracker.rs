//! Texture load tracker.
//!
//! Every `begin` creates a new operation with a fresh, monotonically increasing
//! id. Worker messages carry the id they were spawned with; anything not
//! addressed to the current, still-loading operation is dropped. Superseding is
//! therefore synchronous: once `begin` returns, no older operation can reach a
//! sink again.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::config::LoaderConfig;
use crate::error::TextureLoadError;

use super::decode::{DecodedImage, decode_source};
use super::sink::ProgressSink;
use super::spawn::Spawn;

/// Identifier of one load operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct OperationId(u64);

impl OperationId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State of the newest operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Succeeded,
    Failed,
    /// Replaced by a newer operation (or by disposal) before completing.
    Superseded,
}

impl LoadState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoadState::Succeeded | LoadState::Failed | LoadState::Superseded)
    }
}

enum WorkerEvent {
    Progress(u8),
    Decoded(DecodedImage),
    Failed(TextureLoadError),
}

struct WorkerMessage {
    id: OperationId,
    event: WorkerEvent,
}

/// Worker-side handle. Reports `WorkerLost` if dropped before finishing
/// (e.g. the decoder panicked).
struct Reporter {
    id: OperationId,
    tx: Sender<WorkerMessage>,
    finished: bool,
}

impl Reporter {
    fn send(&self, event: WorkerEvent) {
        // The receiver is gone after disposal; nothing left to notify.
        let _ = self.tx.send(WorkerMessage { id: self.id, event });
    }

    fn progress(&self, percent: u8) {
        self.send(WorkerEvent::Progress(percent));
    }

    fn finish(mut self, event: Option<WorkerEvent>) {
        if let Some(event) = event {
            self.send(event);
        }
        self.finished = true;
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if !self.finished {
            self.send(WorkerEvent::Failed(TextureLoadError::WorkerLost));
        }
    }
}

fn run_worker(reporter: Reporter, source: String, config: LoaderConfig, cancel: Arc<AtomicBool>) {
    let result = decode_source(&source, &config, &cancel, |p| reporter.progress(p));
    let event = match result {
        Ok(Some(image)) => Some(WorkerEvent::Decoded(image)),
        Ok(None) => None,
        Err(e) => Some(WorkerEvent::Failed(e)),
    };
    reporter.finish(event);
}

struct Operation {
    id: OperationId,
    state: LoadState,
    progress: u8,
    cancel: Arc<AtomicBool>,
}

impl Operation {
    fn cancel(&mut self) {
        self.cancel.store(true, Ordering::Release);
        if self.state == LoadState::Loading {
            self.state = LoadState::Superseded;
        }
    }
}

/// Drives decode workers and delivers their progress to the latest sink.
pub struct TextureLoadTracker {
    config: LoaderConfig,
    spawner: Box<dyn Spawn>,
    sink: Box<dyn ProgressSink>,

    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,

    next_id: u64,
    current: Option<Operation>,
}

impl TextureLoadTracker {
    pub fn new(config: LoaderConfig, spawner: Box<dyn Spawn>, sink: Box<dyn ProgressSink>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            config,
            spawner,
            sink,
            tx,
            rx,
            next_id: 0,
            current: None,
        }
    }

    pub fn state(&self) -> LoadState {
        self.current.as_ref().map_or(LoadState::Idle, |op| op.state)
    }

    /// Latest progress delivered for the newest operation.
    pub fn progress(&self) -> Option<u8> {
        self.current.as_ref().map(|op| op.progress)
    }

    pub fn current_id(&self) -> Option<OperationId> {
        self.current.as_ref().map(|op| op.id)
    }

    /// Replaces the sink. The previous sink is dropped and never called again.
    pub fn set_sink(&mut self, sink: Box<dyn ProgressSink>) {
        self.sink = sink;
    }

    /// Starts loading `source`, superseding any operation still in flight.
    ///
    /// Reports 0 to the current sink before returning.
    pub fn begin(&mut self, source: String) -> OperationId {
        if let Some(mut prev) = self.current.take() {
            let was_loading = prev.state == LoadState::Loading;
            prev.cancel();
            if was_loading {
                log::debug!("texture load {} superseded", prev.id);
            }
        }

        self.next_id += 1;
        let id = OperationId(self.next_id);
        let cancel = Arc::new(AtomicBool::new(false));

        self.current = Some(Operation {
            id,
            state: LoadState::Loading,
            progress: 0,
            cancel: Arc::clone(&cancel),
        });
        self.sink.on_progress(0);
        log::debug!("texture load {id} started ({} bytes of source)", source.len());

        let reporter = Reporter { id, tx: self.tx.clone(), finished: false };
        let config = self.config;
        let spawned = self
            .spawner
            .spawn(Box::new(move || run_worker(reporter, source, config, cancel)));

        if let Err(e) = spawned {
            log::error!("failed to spawn decode worker: {e}");
            // The job (and its reporter) was dropped; its WorkerLost message is
            // already queued and will fail the operation on the next pump.
        }

        id
    }

    /// Drains worker messages.
    ///
    /// `bind` receives the decoded image of the current operation and must
    /// apply it to the mesh; 100 is reported only after it returns `Ok`.
    pub fn pump<F>(&mut self, mut bind: F)
    where
        F: FnMut(DecodedImage) -> Result<(), TextureLoadError>,
    {
        // `tx` lives in `self`, so the channel never disconnects here.
        while let Ok(msg) = self.rx.try_recv() {
            self.handle(msg, &mut bind);
        }
    }

    fn handle<F>(&mut self, msg: WorkerMessage, bind: &mut F)
    where
        F: FnMut(DecodedImage) -> Result<(), TextureLoadError>,
    {
        let Some(op) = self.current.as_mut() else { return };
        if op.id != msg.id || op.state != LoadState::Loading {
            log::trace!("dropping message for stale texture load #{}", msg.id.0);
            return;
        }

        match msg.event {
            WorkerEvent::Progress(p) => {
                // 100 is reserved for "bound to the mesh".
                let p = p.min(99);
                if p > op.progress {
                    op.progress = p;
                    self.sink.on_progress(p);
                }
            }
            WorkerEvent::Decoded(image) => {
                let (w, h) = (image.width(), image.height());
                match bind(image) {
                    Ok(()) => {
                        op.state = LoadState::Succeeded;
                        op.progress = 100;
                        log::info!("texture load {} finished ({w}x{h})", op.id);
                        self.sink.on_progress(100);
                    }
                    Err(e) => {
                        op.state = LoadState::Failed;
                        log::warn!("texture load {} failed: {e}", op.id);
                        self.sink.on_failure(&e);
                    }
                }
            }
            WorkerEvent::Failed(e) => {
                op.state = LoadState::Failed;
                log::warn!("texture load {} failed: {e}", op.id);
                self.sink.on_failure(&e);
            }
        }
    }
}

impl Drop for TextureLoadTracker {
    fn drop(&mut self) {
        if let Some(op) = self.current.as_mut() {
            op.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::texture::spawn::ManualSpawner;
    use crate::texture::test_images::{png_data_url, solid_png};

    #[derive(Debug, Clone, PartialEq)]
    enum Report {
        Progress(u8),
        Failed(TextureLoadError),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Report>>>);

    impl Recorder {
        fn reports(&self) -> Vec<Report> {
            self.0.borrow().clone()
        }

        fn progress(&self) -> Vec<u8> {
            self.reports()
                .into_iter()
                .filter_map(|r| match r {
                    Report::Progress(p) => Some(p),
                    Report::Failed(_) => None,
                })
                .collect()
        }

        fn failures(&self) -> usize {
            self.reports().iter().filter(|r| matches!(r, Report::Failed(_))).count()
        }
    }

    impl ProgressSink for Recorder {
        fn on_progress(&mut self, percent: u8) {
            self.0.borrow_mut().push(Report::Progress(percent));
        }

        fn on_failure(&mut self, error: &TextureLoadError) {
            self.0.borrow_mut().push(Report::Failed(error.clone()));
        }
    }

    fn tracker(spawner: &ManualSpawner, sink: &Recorder) -> TextureLoadTracker {
        TextureLoadTracker::new(
            LoaderConfig { chunk_chars: 8, ..Default::default() },
            Box::new(spawner.clone()),
            Box::new(sink.clone()),
        )
    }

    fn image_url() -> String {
        png_data_url(&solid_png(4, 4, [10, 20, 30, 255]))
    }

    #[test]
    fn starts_idle() {
        let t = tracker(&ManualSpawner::default(), &Recorder::default());
        assert_eq!(t.state(), LoadState::Idle);
        assert_eq!(t.progress(), None);
    }

    #[test]
    fn success_reports_monotonic_progress_ending_in_one_hundred() {
        let spawner = ManualSpawner::default();
        let sink = Recorder::default();
        let mut t = tracker(&spawner, &sink);

        t.begin(image_url());
        assert_eq!(sink.progress(), vec![0]);
        assert_eq!(t.state(), LoadState::Loading);

        spawner.run_all();
        let mut bound = 0;
        t.pump(|image| {
            assert_eq!(image.width(), 4);
            bound += 1;
            Ok(())
        });

        let progress = sink.progress();
        assert_eq!(bound, 1);
        assert_eq!(progress.last(), Some(&100));
        assert_eq!(progress.iter().filter(|p| **p == 100).count(), 1);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(t.state(), LoadState::Succeeded);
        assert_eq!(t.progress(), Some(100));
    }

    #[test]
    fn hundred_waits_for_bind() {
        let spawner = ManualSpawner::default();
        let sink = Recorder::default();
        let mut t = tracker(&spawner, &sink);

        t.begin(image_url());
        spawner.run_all();
        t.pump(|_| {
            // Nothing at 100 has been delivered while binding.
            assert!(!sink.progress().contains(&100));
            Ok(())
        });
        assert_eq!(sink.progress().last(), Some(&100));
    }

    #[test]
    fn superseded_operation_never_reports_again() {
        let spawner = ManualSpawner::default();
        let first = Recorder::default();
        let second = Recorder::default();
        let mut t = tracker(&spawner, &first);

        t.begin(image_url());
        t.set_sink(Box::new(second.clone()));
        t.begin(image_url());

        // Older job finishes last.
        spawner.run_last();
        spawner.run_next();
        let mut bound = 0;
        t.pump(|_| {
            bound += 1;
            Ok(())
        });

        assert_eq!(first.progress(), vec![0]);
        assert_eq!(bound, 1);
        assert_eq!(second.progress().first(), Some(&0));
        assert_eq!(second.progress().last(), Some(&100));
        assert_eq!(t.current_id().map(OperationId::get), Some(2));
    }

    #[test]
    fn superseding_with_the_same_sink_drops_stale_progress() {
        let spawner = ManualSpawner::default();
        let sink = Recorder::default();
        let mut t = tracker(&spawner, &sink);

        t.begin(image_url());
        spawner.run_next();
        t.pump(|_| Ok(()));
        assert_eq!(sink.progress().last(), Some(&100));

        t.begin(image_url());
        t.begin(image_url());
        spawner.run_all();
        t.pump(|_| Ok(()));

        // After the second begin, progress restarts at 0 and only one more 100 arrives.
        let progress = sink.progress();
        let tail = &progress[progress.iter().rposition(|p| *p == 0).unwrap()..];
        assert!(tail.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.iter().filter(|p| **p == 100).count(), 2);
    }

    #[test]
    fn decode_failure_is_reported_once() {
        let spawner = ManualSpawner::default();
        let sink = Recorder::default();
        let mut t = tracker(&spawner, &sink);

        t.begin("data:image/png;base64,AAAA".to_string());
        spawner.run_all();
        t.pump(|_| panic!("nothing to bind"));
        t.pump(|_| panic!("nothing to bind"));

        assert_eq!(sink.failures(), 1);
        assert_eq!(sink.reports().last(), Some(&Report::Failed(TextureLoadError::UnsupportedFormat)));
        assert!(!sink.progress().contains(&100));
        assert_eq!(t.state(), LoadState::Failed);
    }

    #[test]
    fn malformed_source_fails_without_progress() {
        let spawner = ManualSpawner::default();
        let sink = Recorder::default();
        let mut t = tracker(&spawner, &sink);

        t.begin("https://tiles.example/capture.png".to_string());
        spawner.run_all();
        t.pump(|_| Ok(()));

        assert_eq!(sink.progress(), vec![0]);
        assert_eq!(sink.failures(), 1);
    }

    #[test]
    fn bind_failure_is_terminal() {
        let spawner = ManualSpawner::default();
        let sink = Recorder::default();
        let mut t = tracker(&spawner, &sink);

        t.begin(image_url());
        spawner.run_all();
        t.pump(|_| Err(TextureLoadError::Upload("device lost".into())));

        assert_eq!(t.state(), LoadState::Failed);
        assert_eq!(sink.failures(), 1);
        assert!(!sink.progress().contains(&100));
    }

    #[test]
    fn dropped_job_surfaces_worker_lost() {
        let spawner = ManualSpawner::default();
        let sink = Recorder::default();
        let mut t = tracker(&spawner, &sink);

        t.begin(image_url());
        // Discard the job without running it; the reporter's drop reports the loss.
        spawner.discard_all();
        t.pump(|_| Ok(()));

        assert_eq!(sink.reports().last(), Some(&Report::Failed(TextureLoadError::WorkerLost)));
    }

    #[test]
    fn jobs_finishing_after_drop_are_ignored() {
        let spawner = ManualSpawner::default();
        let sink = Recorder::default();
        let mut t = tracker(&spawner, &sink);
        t.begin(image_url());
        drop(t);

        assert_eq!(spawner.pending(), 1);
        spawner.run_all();
        assert_eq!(sink.progress(), vec![0]);
    }

    #[test]
    fn progress_from_worker_is_capped_below_hundred() {
        let spawner = ManualSpawner::default();
        let sink = Recorder::default();
        let mut t = tracker(&spawner, &sink);

        let id = t.begin(image_url());
        // Forge a misbehaving worker message.
        t.tx.send(WorkerMessage { id, event: WorkerEvent::Progress(250) }).unwrap();
        t.tx.send(WorkerMessage { id, event: WorkerEvent::Progress(40) }).unwrap();
        t.pump(|_| Ok(()));

        assert_eq!(sink.progress(), vec![0, 99]);
    }
}
