use naclfs_protocol::OutboundMessage;

/// Outbound channel to the native plugin (`postMessage` on the embed element)
pub trait MessagePort {
    fn post_message(&self, message: &str);

    fn send(&self, message: &OutboundMessage) {
        self.post_message(&message.encode());
    }
}
