//! Outbound reply envelope and chat block types.

use serde::Serialize;

/// Text object inside a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

/// Rich-text layout block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Section { text: TextObject },
}

impl Block {
    pub fn header(title: impl Into<String>) -> Self {
        Block::Header {
            text: TextObject::PlainText { text: title.into() },
        }
    }

    pub fn section(markdown: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::Mrkdwn {
                text: markdown.into(),
            },
        }
    }
}

/// JSON body rendered by chat clients
#[derive(Debug, Clone, Serialize)]
pub struct ChatPayload {
    pub response_type: &'static str,
    pub text: String,
    pub blocks: Vec<Block>,
}

/// Result of one command or sweep invocation.
///
/// The status code is informational: handled outcomes are 200 even when the
/// text reports an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub text: String,
}

impl Reply {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            status: 200,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            status: 500,
            text: text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Chat-renderable body posted back to the channel
    pub fn payload(&self) -> ChatPayload {
        ChatPayload {
            response_type: "in_channel",
            text: self.text.clone(),
            blocks: vec![Block::section(self.text.clone())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let reply = Reply::ok("Dev server alice is currently running");
        let value = serde_json::to_value(reply.payload()).unwrap();

        assert_eq!(
            value,
            json!({
                "response_type": "in_channel",
                "text": "Dev server alice is currently running",
                "blocks": [
                    {
                        "type": "section",
                        "text": { "type": "mrkdwn", "text": "Dev server alice is currently running" }
                    }
                ]
            })
        );
    }

    #[test]
    fn test_header_block_uses_plain_text() {
        let value = serde_json::to_value(Block::header("Scheduled Shutdown")).unwrap();
        assert_eq!(
            value,
            json!({ "type": "header", "text": { "type": "plain_text", "text": "Scheduled Shutdown" } })
        );
    }

    #[test]
    fn test_status_codes() {
        assert!(Reply::ok("x").is_success());
        assert!(!Reply::failure("x").is_success());
        assert_eq!(Reply::failure("x").status, 500);
    }
}
