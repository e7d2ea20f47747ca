//! Progress reporting for long-running regrid operations.
//!
//! The orchestrators accept any sink implementing the two-operation contract
//! below; a console bar or a UI widget are equally valid callers.

/// A capability supplied by the caller to observe regrid progress.
pub trait ProgressSink {
    /// Announce the total number of steps about to run.
    fn start(&mut self, total_steps: usize);

    /// Report completion of one step.
    fn update(&mut self, message: &str);
}

/// Discards all progress reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn start(&mut self, _total_steps: usize) {}

    fn update(&mut self, _message: &str) {}
}

/// Forwards progress reports to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct LogProgress {
    total: usize,
    current: usize,
}

impl ProgressSink for LogProgress {
    fn start(&mut self, total_steps: usize) {
        self.total = total_steps;
        self.current = 0;
        tracing::debug!(total = total_steps, "starting regrid");
    }

    fn update(&mut self, message: &str) {
        self.current += 1;
        tracing::debug!(step = self.current, total = self.total, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recording {
        total: usize,
        updates: Vec<String>,
    }

    impl ProgressSink for Recording {
        fn start(&mut self, total_steps: usize) {
            self.total = total_steps;
        }

        fn update(&mut self, message: &str) {
            self.updates.push(message.to_string());
        }
    }

    #[test]
    fn test_sink_contract() {
        let mut sink = Recording {
            total: 0,
            updates: Vec::new(),
        };
        sink.start(2);
        sink.update("a");
        sink.update("b");
        assert_eq!(sink.total, 2);
        assert_eq!(sink.updates, vec!["a", "b"]);
    }

    #[test]
    fn test_noop_is_callable() {
        let mut sink = NoopProgress;
        sink.start(10);
        sink.update("ignored");
    }
}
