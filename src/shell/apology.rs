pub const LONG_MESSAGE: &str = "I've been thinking about what I said, Sonu, and my heart feels so heavy knowing I hurt you. When I'm angry, my words sometimes run wild, and I said things I absolutely didn't mean. Please don't let my thoughtless anger stop us from talking. You mean too much to me.";
pub const SHORT_MESSAGE: &str = "I'm really sorry, Sonu.";
pub const DIALOG_TITLE: &str = "A Message From My Heart";

const FORGIVEN_MEDIA: &str = "/assets/gif1.MP4";
const NOT_FORGIVEN_MEDIA: &str = "/assets/gif1.MP4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLength {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Forgiven,
    NotForgiven,
}

impl Choice {
    pub fn response(self) -> &'static str {
        match self {
            Self::Forgiven => "Thank you so much! It means the world to me.",
            Self::NotForgiven => "I understand. I'll continue to reflect and try harder.",
        }
    }

    pub fn media(self) -> &'static str {
        match self {
            Self::Forgiven => FORGIVEN_MEDIA,
            Self::NotForgiven => NOT_FORGIVEN_MEDIA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Opened(MessageLength),
    Answered(Choice),
}

/// Apology dialog: long message, then short message, then a choice
#[derive(Debug, Clone, Default)]
pub struct ApologyDialog {
    state: DialogState,
}

impl ApologyDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn open(&mut self) {
        self.state = DialogState::Opened(MessageLength::Long);
    }

    /// Only valid while the long message is shown
    pub fn show_short(&mut self) -> bool {
        if self.state == DialogState::Opened(MessageLength::Long) {
            self.state = DialogState::Opened(MessageLength::Short);
            true
        } else {
            false
        }
    }

    /// Only valid while the short message is shown
    pub fn answer(&mut self, choice: Choice) -> bool {
        if self.state == DialogState::Opened(MessageLength::Short) {
            self.state = DialogState::Answered(choice);
            true
        } else {
            false
        }
    }

    pub fn close(&mut self) {
        self.state = DialogState::Closed;
    }

    /// Text currently on screen, if any
    pub fn message(&self) -> Option<&'static str> {
        match self.state {
            DialogState::Closed => None,
            DialogState::Opened(MessageLength::Long) => Some(LONG_MESSAGE),
            DialogState::Opened(MessageLength::Short) => Some(SHORT_MESSAGE),
            DialogState::Answered(choice) => Some(choice.response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_walkthrough() {
        let mut dialog = ApologyDialog::new();
        assert_eq!(dialog.message(), None);

        dialog.open();
        assert_eq!(dialog.message(), Some(LONG_MESSAGE));
        assert!(dialog.show_short());
        assert_eq!(dialog.message(), Some(SHORT_MESSAGE));
        assert!(dialog.answer(Choice::Forgiven));
        assert_eq!(
            dialog.message(),
            Some("Thank you so much! It means the world to me.")
        );

        dialog.close();
        assert_eq!(dialog.state(), DialogState::Closed);
    }

    #[test]
    fn answers_need_the_short_message() {
        let mut dialog = ApologyDialog::new();
        assert!(!dialog.answer(Choice::NotForgiven));

        dialog.open();
        assert!(!dialog.answer(Choice::NotForgiven));
        assert_eq!(dialog.state(), DialogState::Opened(MessageLength::Long));
    }

    #[test]
    fn short_toggle_only_from_long() {
        let mut dialog = ApologyDialog::new();
        assert!(!dialog.show_short());

        dialog.open();
        dialog.show_short();
        assert!(!dialog.show_short());
        dialog.answer(Choice::NotForgiven);
        assert!(!dialog.show_short());
        assert_eq!(Choice::NotForgiven.media(), "/assets/gif1.MP4");
    }

    #[test]
    fn reopening_starts_at_long_message() {
        let mut dialog = ApologyDialog::new();
        dialog.open();
        dialog.show_short();
        dialog.close();
        dialog.open();
        assert_eq!(dialog.state(), DialogState::Opened(MessageLength::Long));
    }
}
