use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A single conversation entry. Created once, never mutated; the
/// serialized form is what the backend receives as history context.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub timestamp: String,
}

/// Local wall-clock time the way the chat log displays it.
pub fn local_timestamp() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_serialize_without_a_provider_field() {
        let message = Message {
            id: 1,
            text: "hi".to_string(),
            sender: Sender::User,
            provider: None,
            timestamp: "12:30".to_string(),
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["sender"], "user");
        assert_eq!(value["text"], "hi");
        assert!(value.get("provider").is_none());
    }

    #[test]
    fn test_ai_messages_carry_the_provider_id() {
        let message = Message {
            id: 2,
            text: "hello".to_string(),
            sender: Sender::Ai,
            provider: Some("chatgpt".to_string()),
            timestamp: "12:31".to_string(),
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["sender"], "ai");
        assert_eq!(value["provider"], "chatgpt");
    }
}
