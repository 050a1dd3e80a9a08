use naclfs_bridge::ConsoleSink;

/// `console.*` of the hosting page
pub struct BrowserConsole;

impl ConsoleSink for BrowserConsole {
    fn log(&self, message: &str) {
        web_sys::console::log_1(&message.into());
    }

    fn info(&self, message: &str) {
        web_sys::console::info_1(&message.into());
    }

    fn warn(&self, message: &str) {
        web_sys::console::warn_1(&message.into());
    }

    fn error(&self, message: &str) {
        web_sys::console::error_1(&message.into());
    }
}
