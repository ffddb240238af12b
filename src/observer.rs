//! Lifecycle hooks for graph execution
//!
//! Observers are notified when a net starts and stops. Failure policy: when
//! a run fails partway through, the stop notification is skipped; only the
//! start notification fires. Callers pairing external resources around a run
//! must account for that.

/// Lifecycle hook attached to a net execution
pub trait NetObserver: Send {
    /// Fired before the first operator of a run executes
    fn on_net_start(&mut self, net_name: &str);

    /// Fired after the last operator of a fully successful run
    fn on_net_stop(&mut self, net_name: &str);
}

/// Observer that logs start/stop at debug level
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl NetObserver for LoggingObserver {
    fn on_net_start(&mut self, net_name: &str) {
        tracing::debug!(net = net_name, "net started");
    }

    fn on_net_stop(&mut self, net_name: &str) {
        tracing::debug!(net = net_name, "net stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingObserver {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl NetObserver for RecordingObserver {
        fn on_net_start(&mut self, net_name: &str) {
            self.events.lock().unwrap().push(format!("start:{net_name}"));
        }

        fn on_net_stop(&mut self, net_name: &str) {
            self.events.lock().unwrap().push(format!("stop:{net_name}"));
        }
    }

    #[test]
    fn test_observer_receives_notifications() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut observer = RecordingObserver {
            events: events.clone(),
        };

        observer.on_net_start("toy");
        observer.on_net_stop("toy");

        assert_eq!(
            *events.lock().unwrap(),
            vec!["start:toy".to_string(), "stop:toy".to_string()]
        );
    }
}
