// OLED Panel - Push Notifications
//
// Notifications are queued to a dedicated thread that performs the (slow,
// TLS-bound) HTTP POST, so the control loop and the web handlers never wait
// on the network.  Failed deliveries are logged and dropped.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use crate::config::{NOTIFY_QUEUE_DEPTH, STACK_NOTIFIER};

/// One ntfy-style message: plain-text body plus title/priority/tags headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub url: String,
    pub title: String,
    pub priority: &'static str,
    pub tags: &'static str,
    pub body: String,
}

impl Notification {
    pub fn boot(url: &str, address: &str) -> Self {
        Self {
            url: url.to_string(),
            title: "Panel online".to_string(),
            priority: "default",
            tags: "white_check_mark",
            body: format!("Online at {}", address),
        }
    }

    pub fn low_battery(url: &str, volts: f32) -> Self {
        Self {
            url: url.to_string(),
            title: "Low battery".to_string(),
            priority: "high",
            tags: "warning,battery",
            body: format!("Battery at {:.2}V", volts),
        }
    }

    /// Extra request headers carried alongside the body.
    pub fn headers(&self) -> [(&str, &str); 3] {
        [
            ("Title", self.title.as_str()),
            ("Priority", self.priority),
            ("Tags", self.tags),
        ]
    }
}

/// Transport that actually delivers a notification.
pub trait NotifySink: Send + 'static {
    fn deliver(&mut self, notification: &Notification) -> anyhow::Result<()>;
}

/// Handle to the background notifier thread.
///
/// Dropping the handle closes the queue and waits for queued sends to finish.
pub struct Notifier {
    tx: Option<SyncSender<Notification>>,
    worker: Option<JoinHandle<()>>,
}

impl Notifier {
    pub fn spawn<S: NotifySink>(sink: S) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::sync_channel(NOTIFY_QUEUE_DEPTH);
        let worker = thread::Builder::new()
            .name("notify".into())
            .stack_size(STACK_NOTIFIER)
            .spawn(move || notifier_task(sink, rx))?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Queue a notification without blocking.  Returns `false` if it was
    /// dropped because the queue is full or the worker is gone.
    pub fn notify(&self, notification: Notification) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        match tx.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(n)) => {
                log::warn!("Notification queue full, dropping '{}'", n.title);
                false
            }
            Err(TrySendError::Disconnected(n)) => {
                log::warn!("Notifier stopped, dropping '{}'", n.title);
                false
            }
        }
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        // Closing the sender ends the worker's receive loop.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn notifier_task<S: NotifySink>(mut sink: S, rx: Receiver<Notification>) {
    log::info!("Notifier task started");

    for notification in rx {
        match sink.deliver(&notification) {
            Ok(()) => log::info!("Sent '{}' to {}", notification.title, notification.url),
            Err(e) => log::warn!("Notification '{}' failed: {:#}", notification.title, e),
        }
    }

    log::info!("Notifier task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        sent: Arc<Mutex<Vec<Notification>>>,
        fail: bool,
    }

    impl NotifySink for Recorder {
        fn deliver(&mut self, notification: &Notification) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(notification.clone());
            if self.fail {
                anyhow::bail!("network unreachable");
            }
            Ok(())
        }
    }

    #[test]
    fn delivers_in_order() {
        let recorder = Recorder::default();
        let notifier = Notifier::spawn(recorder.clone()).unwrap();

        assert!(notifier.notify(Notification::boot("http://n/boot", "10.0.0.7")));
        assert!(notifier.notify(Notification::low_battery("http://n/alert", 3.21)));
        drop(notifier);

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].body, "Online at 10.0.0.7");
        assert_eq!(sent[1].body, "Battery at 3.21V");
    }

    #[test]
    fn failed_delivery_does_not_stop_worker() {
        let recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let notifier = Notifier::spawn(recorder.clone()).unwrap();

        notifier.notify(Notification::low_battery("http://n/alert", 3.1));
        notifier.notify(Notification::low_battery("http://n/alert", 3.0));
        drop(notifier);

        assert_eq!(recorder.sent.lock().unwrap().len(), 2);
    }

    #[test]
    fn alert_headers() {
        let n = Notification::low_battery("http://n/alert", 3.0);
        assert_eq!(
            n.headers(),
            [("Title", "Low battery"), ("Priority", "high"), ("Tags", "warning,battery")]
        );
    }
}
