//! Runs a [`ToastController`] on a tokio task.
//!
//! The task sleeps until the controller's next deadline and applies
//! commands as they arrive. Every change is published as a
//! [`ToastSnapshot`] on a `watch` channel.

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::controller::{ToastController, ToastSnapshot};
use super::options::OpenOptions;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    #[error("toast driver has stopped")]
    Stopped,
}

#[derive(Debug)]
enum Command {
    Open(OpenOptions),
    Close,
    Shutdown,
}

/// Cloneable handle to a running toast.
#[derive(Debug, Clone)]
pub struct ToastHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<ToastSnapshot>,
}

impl ToastHandle {
    pub fn open(&self, options: OpenOptions) -> Result<(), DriverError> {
        self.send(Command::Open(options))
    }

    pub fn close(&self) -> Result<(), DriverError> {
        self.send(Command::Close)
    }

    /// Stop the task. The join handle then yields the controller.
    pub fn shutdown(&self) -> Result<(), DriverError> {
        self.send(Command::Shutdown)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> ToastSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn is_open(&self) -> bool {
        self.snapshots.borrow().surface_open
    }

    pub fn subscribe(&self) -> watch::Receiver<ToastSnapshot> {
        self.snapshots.clone()
    }

    fn send(&self, command: Command) -> Result<(), DriverError> {
        self.commands.send(command).map_err(|_| DriverError::Stopped)
    }
}

/// Spawn `controller` on the current tokio runtime.
pub fn spawn(controller: ToastController) -> (ToastHandle, JoinHandle<ToastController>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot_at(now()));
    let task = tokio::spawn(run(controller, command_rx, snapshot_tx));
    let handle = ToastHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
    };
    (handle, task)
}

async fn run(
    mut controller: ToastController,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<ToastSnapshot>,
) -> ToastController {
    loop {
        let deadline = controller.next_deadline();
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Open(options)) => {
                    controller.open_at(&options, now());
                }
                Some(Command::Close) => {
                    controller.close_at(now());
                }
                Some(Command::Shutdown) | None => break,
            },
            _ = sleep_until(deadline) => {
                let fired = controller.tick(now());
                tracing::trace!(?fired, "driver tick");
            }
        }
        snapshots.send_replace(controller.snapshot_at(now()));
    }
    tracing::debug!("toast driver stopped");
    controller
}

async fn sleep_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

/// Current time from tokio's clock, so paused test time applies.
fn now() -> std::time::Instant {
    Instant::now().into_std()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::controller::DisplayState;
    use std::time::Duration;

    async fn settle() {
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_auto_dismiss_and_finalize() {
        let (handle, task) = spawn(ToastController::new());

        handle
            .open(OpenOptions::new("hello").with_duration(1000))
            .unwrap();
        settle().await;
        assert!(handle.is_open());
        assert_eq!(handle.snapshot().state, DisplayState::Open);

        tokio::time::sleep(Duration::from_millis(999)).await;
        settle().await;
        assert_eq!(handle.snapshot().state, DisplayState::Open);

        tokio::time::sleep(Duration::from_millis(2)).await;
        settle().await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.state, DisplayState::Closed);
        assert!(snapshot.surface_open);
        assert_eq!(snapshot.content, "hello");

        tokio::time::sleep(Duration::from_millis(300)).await;
        settle().await;
        let snapshot = handle.snapshot();
        assert!(!snapshot.surface_open);
        assert!(snapshot.content.is_empty());

        handle.shutdown().unwrap();
        let controller = task.await.unwrap();
        assert!(!controller.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_close_open_keeps_latest_content() {
        let (handle, _task) = spawn(ToastController::new());

        handle.open(OpenOptions::new("a")).unwrap();
        handle.close().unwrap();
        handle.open(OpenOptions::new("b")).unwrap();
        settle().await;

        tokio::time::sleep(Duration::from_millis(1000)).await;
        settle().await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.content, "b");
        assert_eq!(snapshot.state, DisplayState::Open);
        assert!(snapshot.surface_open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_sees_changes() {
        let (handle, _task) = spawn(ToastController::new());
        let mut updates = handle.subscribe();

        handle.open(OpenOptions::new("x")).unwrap();
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().content, "x");
    }

    #[tokio::test]
    async fn test_commands_fail_after_shutdown() {
        let (handle, task) = spawn(ToastController::new());
        handle.shutdown().unwrap();
        task.await.unwrap();

        assert_eq!(handle.close(), Err(DriverError::Stopped));
    }
}
