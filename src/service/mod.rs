//! Periodic re-scan service.
//!
//! A connected client receives a fresh export right away and then once per
//! interval until it disconnects. Each cycle collects the database, writes the
//! CSV export, reads the written files back and sends them as one JSON object
//! mapping file name to file contents:
//!
//! ```json
//! { "plugins.csv": "ps_file_name_0,...\nFruity Limiter,...\n" }
//! ```
//!
//! Cycles for one client run strictly one after another. A failed cycle is
//! logged and retried at the next interval.

mod websocket;

pub use websocket::{serve, WebSocketSink};

use crate::collector::Collector;
use crate::error::{PluginListError, Result};
use crate::output::{export_csv, ExportOptions};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Time between refresh cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// Address the server listens on unless told otherwise.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8765";

/// Exported file name to file contents, in export order.
pub type Payload = IndexMap<String, String>;

/// Destination for refresh payloads.
#[async_trait]
pub trait PayloadSink: Send {
    /// Sends one serialized payload.
    ///
    /// # Errors
    ///
    /// Returns [`PluginListError::Connection`]; a disconnect is flagged so the
    /// caller can stop.
    async fn send(&mut self, payload: String) -> Result<()>;

    /// Resolves once the peer has gone away.
    async fn closed(&mut self);
}

/// Collects and exports on a timer for one client at a time.
#[derive(Debug, Clone)]
pub struct RefreshService {
    collector: Collector,
    output_dir: PathBuf,
    options: ExportOptions,
    interval: Duration,
}

impl RefreshService {
    /// Creates a service exporting combined full-record CSV every
    /// [`DEFAULT_INTERVAL`].
    pub fn new(root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            collector: Collector::new(root),
            output_dir: output_dir.into(),
            options: ExportOptions::default(),
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs one collect and export pass and returns the written files.
    pub fn run_cycle(&self) -> Result<Payload> {
        let list = self.collector.collect()?;
        let written = export_csv(&list, self.options, &self.output_dir)?;

        let mut payload = Payload::new();
        for path in written {
            let content = fs::read_to_string(&path).map_err(|e| PluginListError::io(&path, e))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            payload.insert(name, content);
        }

        Ok(payload)
    }

    /// Runs a cycle on the blocking pool so the runtime stays responsive
    /// while the database is walked.
    async fn next_message(&self) -> Option<String> {
        let service = self.clone();
        let cycle = tokio::task::spawn_blocking(move || -> Result<String> {
            let payload = service.run_cycle()?;
            Ok(serde_json::to_string(&payload)?)
        });

        match cycle.await {
            Ok(Ok(message)) => Some(message),
            Ok(Err(err)) => {
                tracing::error!("refresh cycle failed: {}", err);
                None
            }
            Err(err) => {
                tracing::error!("refresh cycle aborted: {}", err);
                None
            }
        }
    }

    /// Serves one client until it disconnects and returns the number of
    /// payloads delivered.
    pub async fn serve_client<S>(&self, sink: &mut S) -> usize
    where
        S: PayloadSink + ?Sized,
    {
        let mut sent = 0;

        loop {
            if let Some(message) = self.next_message().await {
                match sink.send(message).await {
                    Ok(()) => {
                        sent += 1;
                        tracing::info!("Sent updated plugin data.");
                    }
                    Err(err) if err.is_disconnect() => {
                        tracing::info!("client went away during send: {}", err);
                        return sent;
                    }
                    Err(err) => tracing::error!("failed to send plugin data: {}", err),
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = sink.closed() => return sent,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::VERIFIED_IDS_FILE;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingSink {
        payloads: Arc<Mutex<Vec<String>>>,
        close_after_first: bool,
        fail_sends: bool,
    }

    #[async_trait]
    impl PayloadSink for RecordingSink {
        async fn send(&mut self, payload: String) -> Result<()> {
            if self.fail_sends {
                return Err(PluginListError::Connection {
                    message: "write buffer full".to_string(),
                    disconnected: false,
                });
            }
            self.payloads.lock().unwrap().push(payload);
            Ok(())
        }

        async fn closed(&mut self) {
            if self.close_after_first {
                return;
            }
            std::future::pending::<()>().await
        }
    }

    fn database() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let fruity = dir.path().join("Effects").join("Fruity");
        fs::create_dir_all(&fruity).unwrap();
        fs::write(dir.path().join(VERIFIED_IDS_FILE), "").unwrap();
        fs::write(
            fruity.join("Limiter.nfo"),
            "ps_file_name_0=Fruity Limiter\nps_file_vendorname_0=Image-Line\n",
        )
        .unwrap();
        dir
    }

    fn count(payloads: &Arc<Mutex<Vec<String>>>) -> usize {
        payloads.lock().unwrap().len()
    }

    #[test]
    fn test_run_cycle_reads_back_combined_csv() {
        let root = database();
        let out = tempfile::tempdir().unwrap();
        let service = RefreshService::new(root.path(), out.path());

        let payload = service.run_cycle().unwrap();
        assert_eq!(payload.keys().collect::<Vec<_>>(), vec!["plugins.csv"]);
        assert_eq!(
            payload["plugins.csv"],
            "ps_file_name_0,ps_file_vendorname_0\nFruity Limiter,Image-Line\n"
        );
    }

    #[test]
    fn test_run_cycle_separate_files() {
        let root = database();
        let out = tempfile::tempdir().unwrap();
        let service = RefreshService::new(root.path(), out.path()).with_options(ExportOptions {
            names_only: true,
            separate_files: true,
        });

        let payload = service.run_cycle().unwrap();
        assert_eq!(payload.keys().collect::<Vec<_>>(), vec!["Effects.csv"]);
        assert_eq!(payload["Effects.csv"], "Fruity Limiter\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sends_once_per_interval() {
        let root = database();
        let out = tempfile::tempdir().unwrap();
        let service = RefreshService::new(root.path(), out.path());
        let sink = RecordingSink::default();
        let payloads = sink.payloads.clone();

        let handle = tokio::spawn(async move {
            let mut sink = sink;
            service.serve_client(&mut sink).await
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count(&payloads), 1);

        tokio::time::sleep(Duration::from_secs(298)).await;
        assert_eq!(count(&payloads), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count(&payloads), 2);

        let first: Payload = serde_json::from_str(&payloads.lock().unwrap()[0]).unwrap();
        assert!(first["plugins.csv"].contains("Fruity Limiter"));

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cycle_keeps_running() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let service = RefreshService::new(root.path(), out.path());
        let sink = RecordingSink::default();
        let payloads = sink.payloads.clone();

        let handle = tokio::spawn(async move {
            let mut sink = sink;
            service.serve_client(&mut sink).await
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count(&payloads), 0);

        // Database shows up before the next cycle
        let fresh = database();
        for entry in ["Effects", VERIFIED_IDS_FILE] {
            let from = fresh.path().join(entry);
            let to = root.path().join(entry);
            fs::rename(from, to).unwrap();
        }

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(count(&payloads), 1);
        assert!(!handle.is_finished());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_errors_do_not_stop_loop() {
        let root = database();
        let out = tempfile::tempdir().unwrap();
        let service = RefreshService::new(root.path(), out.path());
        let sink = RecordingSink {
            fail_sends: true,
            ..Default::default()
        };

        let handle = tokio::spawn(async move {
            let mut sink = sink;
            service.serve_client(&mut sink).await
        });

        tokio::time::sleep(Duration::from_secs(601)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_disconnect_ends_loop() {
        let root = database();
        let out = tempfile::tempdir().unwrap();
        let service = RefreshService::new(root.path(), out.path());
        let mut sink = RecordingSink {
            close_after_first: true,
            ..Default::default()
        };

        let sent = service.serve_client(&mut sink).await;
        assert_eq!(sent, 1);
        assert_eq!(count(&sink.payloads), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_cycle_does_not_stall_runtime() {
        use std::sync::mpsc;
        use std::time::Instant;

        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let index = root.path().join(VERIFIED_IDS_FILE);
        let status = std::process::Command::new("mkfifo")
            .arg(&index)
            .status()
            .unwrap();
        assert!(status.success());

        // Reading the index blocks until a writer opens the fifo
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let writer = std::thread::spawn(move || {
            let _ = release_rx.recv_timeout(Duration::from_secs(5));
            drop(fs::OpenOptions::new().write(true).open(&index).unwrap());
        });

        let service = RefreshService::new(root.path(), out.path());
        let mut sink = RecordingSink::default();
        let started = Instant::now();

        tokio::select! {
            _ = service.serve_client(&mut sink) => panic!("serve_client returned"),
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
        }
        let elapsed = started.elapsed();

        let _ = release_tx.send(());
        writer.join().unwrap();
        assert!(elapsed < Duration::from_secs(2), "runtime stalled for {:?}", elapsed);
    }
}
