//! Background jobs and the events they report to the UI thread.
//!
//! Every job runs on its own thread and posts exactly one [`WorkerEvent`]
//! unless the worker was cancelled first. The UI drains events at the start
//! of each frame.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::Result;

use crate::image_ops::{self, PreviewImage};
use crate::unsplash::{PhotoRecord, PhotoSource};
use crate::wallpaper;

/// Events emitted by jobs to inform the UI.
#[derive(Debug)]
pub enum WorkerEvent {
    BatchLoaded(Vec<PhotoRecord>),
    BatchFailed(String),
    PreviewReady { ticket: u64, image: PreviewImage },
    PreviewFailed { ticket: u64, error: String },
    WallpaperApplied(PathBuf),
    WallpaperFailed(String),
}

/// Spawns jobs against a [`PhotoSource`] and collects their events.
pub struct Worker {
    source: Arc<dyn PhotoSource>,
    evt_tx: Sender<WorkerEvent>,
    event_rx: Receiver<WorkerEvent>,
    cancelled: Arc<AtomicBool>,
    repaint: egui::Context,
}

impl Worker {
    pub fn new(source: Arc<dyn PhotoSource>, repaint: egui::Context) -> Self {
        let (evt_tx, event_rx) = mpsc::channel();
        Self {
            source,
            evt_tx,
            event_rx,
            cancelled: Arc::new(AtomicBool::new(false)),
            repaint,
        }
    }

    /// Request a batch of `count` photo records.
    pub fn fetch_batch(&self, count: u32) {
        self.spawn("fetch-batch", WorkerEvent::BatchFailed, move |source| {
            log::debug!("requesting {count} photos");
            match source.fetch_batch(count) {
                Ok(photos) => {
                    log::info!("received {} photos", photos.len());
                    WorkerEvent::BatchLoaded(photos)
                }
                Err(err) => {
                    log::error!("photo batch failed: {err:#}");
                    WorkerEvent::BatchFailed(format!("{err:#}"))
                }
            }
        });
    }

    /// Download `url` and decode it to fit `bounds` pixels.
    pub fn load_preview(&self, ticket: u64, url: String, bounds: [u32; 2]) {
        let on_spawn_error = move |error: String| WorkerEvent::PreviewFailed { ticket, error };
        self.spawn("load-preview", on_spawn_error, move |source| {
            log::debug!("preview #{ticket} {url} into {}x{}", bounds[0], bounds[1]);
            let result = source
                .fetch_image_bytes(&url)
                .and_then(|bytes| image_ops::decode_preview(&bytes, bounds));
            match result {
                Ok(image) => WorkerEvent::PreviewReady { ticket, image },
                Err(err) => {
                    log::error!("preview #{ticket} failed: {err:#}");
                    WorkerEvent::PreviewFailed {
                        ticket,
                        error: format!("{err:#}"),
                    }
                }
            }
        });
    }

    /// Download `url`, write it as a bitmap at `target` and make it the
    /// desktop background.
    pub fn apply_wallpaper(&self, url: String, target: PathBuf) {
        self.spawn("apply-wallpaper", WorkerEvent::WallpaperFailed, move |source| {
            match apply_wallpaper(source, &url, &target) {
                Ok(path) => WorkerEvent::WallpaperApplied(path),
                Err(err) => {
                    log::error!("setting wallpaper failed: {err:#}");
                    WorkerEvent::WallpaperFailed(format!("{err:#}"))
                }
            }
        });
    }

    /// Drain any pending events into the provided buffer.
    pub fn drain_events(&self, out: &mut Vec<WorkerEvent>) {
        while let Ok(evt) = self.event_rx.try_recv() {
            out.push(evt);
        }
    }

    /// Drop the results of every job still in flight.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn spawn<E, F>(&self, name: &str, on_spawn_error: E, job: F)
    where
        E: FnOnce(String) -> WorkerEvent,
        F: FnOnce(&dyn PhotoSource) -> WorkerEvent + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        let evt_tx = self.evt_tx.clone();
        let cancelled = Arc::clone(&self.cancelled);
        let repaint = self.repaint.clone();
        let spawned = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let event = job(source.as_ref());
                if cancelled.load(Ordering::SeqCst) {
                    log::debug!("discarding result of cancelled job");
                    return;
                }
                if evt_tx.send(event).is_ok() {
                    repaint.request_repaint();
                }
            });
        if let Err(err) = spawned {
            log::error!("failed to spawn {name} job: {err}");
            let _ = self.evt_tx.send(on_spawn_error(err.to_string()));
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn apply_wallpaper(source: &dyn PhotoSource, url: &str, target: &Path) -> Result<PathBuf> {
    let bytes = source.fetch_image_bytes(url)?;
    let path = image_ops::write_wallpaper_bitmap(&bytes, target)?;
    wallpaper::set_wallpaper(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    use anyhow::bail;
    use image::{ImageBuffer, ImageFormat, Rgb};

    use crate::state::tests::photos;

    struct FakeSource {
        batch: Option<Vec<PhotoRecord>>,
        image: Vec<u8>,
    }

    impl PhotoSource for FakeSource {
        fn fetch_batch(&self, _count: u32) -> Result<Vec<PhotoRecord>> {
            match &self.batch {
                Some(photos) => Ok(photos.clone()),
                None => bail!("photo list request returned 401 Unauthorized"),
            }
        }

        fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>> {
            if url.contains("broken") {
                bail!("failed to download {url}");
            }
            Ok(self.image.clone())
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb([10u8, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn worker(batch: Option<Vec<PhotoRecord>>) -> Worker {
        let source = FakeSource {
            batch,
            image: png(64, 32),
        };
        Worker::new(Arc::new(source), egui::Context::default())
    }

    fn next_event(worker: &Worker) -> WorkerEvent {
        worker
            .event_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("job did not report")
    }

    #[test]
    fn batch_success_reports_all_records() {
        let worker = worker(Some(photos(10)));
        worker.fetch_batch(10);
        match next_event(&worker) {
            WorkerEvent::BatchLoaded(photos) => assert_eq!(photos.len(), 10),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn batch_failure_reports_the_cause() {
        let worker = worker(None);
        worker.fetch_batch(10);
        match next_event(&worker) {
            WorkerEvent::BatchFailed(error) => assert!(error.contains("401")),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn preview_is_scaled_and_tagged_with_its_ticket() {
        let worker = worker(None);
        worker.load_preview(7, "https://images.example/ok".into(), [32, 32]);
        match next_event(&worker) {
            WorkerEvent::PreviewReady { ticket, image } => {
                assert_eq!(ticket, 7);
                assert_eq!((image.width, image.height), (32, 16));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn preview_download_failure_is_reported() {
        let worker = worker(None);
        worker.load_preview(3, "https://images.example/broken".into(), [32, 32]);
        match next_event(&worker) {
            WorkerEvent::PreviewFailed { ticket, error } => {
                assert_eq!(ticket, 3);
                assert!(error.contains("broken"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn wallpaper_bitmap_is_written_before_the_platform_call() {
        let worker = worker(None);
        let target = std::env::temp_dir().join(format!(
            "splashpaper_worker_{}.bmp",
            std::process::id()
        ));
        worker.apply_wallpaper("https://images.example/full".into(), target.clone());
        match next_event(&worker) {
            WorkerEvent::WallpaperFailed(error) => {
                assert!(error.contains("only supported on Windows"));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(target.exists());
        let _ = std::fs::remove_file(&target);
    }

    #[test]
    fn cancelled_jobs_post_nothing() {
        let worker = worker(Some(photos(2)));
        worker.cancel();
        worker.fetch_batch(2);
        assert!(
            worker
                .event_rx
                .recv_timeout(Duration::from_millis(300))
                .is_err()
        );
    }

    #[test]
    fn drain_collects_pending_events() {
        let worker = worker(Some(photos(1)));
        worker.fetch_batch(1);
        worker.fetch_batch(1);
        let mut events = vec![next_event(&worker)];
        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while events.len() < 2 && std::time::Instant::now() < deadline {
            worker.drain_events(&mut events);
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(events.len(), 2);
    }
}
