/// Destination for plugin log output
///
/// In a browser this is `console`; the levels map one to one.
pub trait ConsoleSink {
    fn log(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Console that forwards to `tracing`, for hosts without a browser console
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl ConsoleSink for TracingConsole {
    fn log(&self, message: &str) {
        tracing::info!(target: "naclfs::console", "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "naclfs::console", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "naclfs::console", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "naclfs::console", "{message}");
    }
}
