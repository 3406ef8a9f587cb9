//! Transient on-screen text message

#[derive(Debug, Clone, Default)]
pub struct OnscreenMessage {
    text: String,
    frames_left: u32,
}

impl OnscreenMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current message; it stays up for `frames` rendered frames
    pub fn show(&mut self, text: impl Into<String>, frames: u32) {
        self.text = text.into();
        self.frames_left = frames;
    }

    /// Text to draw this frame, if any
    pub fn text(&self) -> Option<&str> {
        (self.frames_left > 0).then_some(self.text.as_str())
    }

    /// Count down one rendered frame
    pub fn tick(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_expires() {
        let mut message = OnscreenMessage::new();
        assert_eq!(message.text(), None);
        message.show("hello", 2);
        assert_eq!(message.text(), Some("hello"));
        message.tick();
        assert_eq!(message.text(), Some("hello"));
        message.tick();
        assert_eq!(message.text(), None);
    }
}
