use serde::{Deserialize, Serialize};

/// Origin of a transcript entry. Only two variants exist; everything the
/// application itself wants to say (errors, hints) lives outside the
/// transcript and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// The atomic transcript unit. Position in the transcript is the only
/// ordering key; there are no timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Sender::Bot, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn senders_serialize_as_lowercase_strings() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn unknown_sender_strings_are_rejected() {
        assert!(serde_json::from_str::<Sender>("\"assistant\"").is_err());
    }

    #[test]
    fn message_round_trips_through_json() {
        let msg = Message::user("Hola");
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
