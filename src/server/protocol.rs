use crate::config::DEFAULT_SNIPPET_OFFSET;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub seq: u64,
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(flatten)]
    pub content: MessageContent,
}

// Responses and events are tried first: a response also carries `command`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Response {
        request_seq: u64,
        success: bool,
        command: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<Value>,
    },
    Event {
        event: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<Value>,
    },
    Request {
        command: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        arguments: Option<Value>,
    },
}

#[derive(Debug, Deserialize)]
pub struct FormatArguments {
    pub source: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetArguments {
    pub source: String,
    pub selection_start: usize,
    pub selection_end: usize,
    #[serde(default = "default_offset")]
    pub offset: usize,
}

fn default_offset() -> usize {
    DEFAULT_SNIPPET_OFFSET
}

#[derive(Debug, Deserialize)]
pub struct FileArguments {
    pub path: String,
}
