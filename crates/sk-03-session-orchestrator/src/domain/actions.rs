//! # Domain Actions
//!
//! The application calls a session key may sign, and their fixed mapping to
//! a `call` name and argument map. Names and argument keys are what the
//! backend expects; changing one breaks verification on the server.
//!
//! | Action | `call` | `callArgs` |
//! |--------|--------|------------|
//! | Thread | `thread` | `community`, `title`, `body`, `link`, `topic` |
//! | DeleteThread | `deleteThread` | `thread_id` |
//! | Comment | `comment` | `thread_id`, `body`, `parent_comment_id` |
//! | DeleteComment | `deleteComment` | `comment_id` |
//! | ThreadReaction | `reactThread` | `thread_id`, `value` |
//! | DeleteThreadReaction | `unreactThread` | `thread_id` |
//! | CommentReaction | `reactComment` | `comment_id`, `value` |
//! | DeleteCommentReaction | `unreactComment` | `comment_id` |

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{json, Value};
use shared_types::CallArgs;

/// Characters left unescaped by `encodeURIComponent`: alphanumerics and
/// `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `text` the way browsers encode a URI component.
pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// A signable application action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainAction {
    /// Create a thread. `title` and `body` are URI-component encoded.
    Thread {
        community: String,
        title: String,
        body: String,
        link: String,
        topic: Option<u64>,
    },
    /// Delete a thread.
    DeleteThread { thread_id: u64 },
    /// Create a comment, optionally as a reply.
    Comment {
        thread_id: u64,
        body: String,
        parent_comment_id: Option<u64>,
    },
    /// Delete a comment.
    DeleteComment { comment_id: u64 },
    /// React to a thread.
    ThreadReaction { thread_id: u64, like: bool },
    /// Remove a thread reaction.
    DeleteThreadReaction { thread_id: u64 },
    /// React to a comment.
    CommentReaction { comment_id: u64, like: bool },
    /// Remove a comment reaction.
    DeleteCommentReaction { comment_id: u64 },
}

impl DomainAction {
    /// Call name of the action.
    pub fn call(&self) -> &'static str {
        match self {
            DomainAction::Thread { .. } => "thread",
            DomainAction::DeleteThread { .. } => "deleteThread",
            DomainAction::Comment { .. } => "comment",
            DomainAction::DeleteComment { .. } => "deleteComment",
            DomainAction::ThreadReaction { .. } => "reactThread",
            DomainAction::DeleteThreadReaction { .. } => "unreactThread",
            DomainAction::CommentReaction { .. } => "reactComment",
            DomainAction::DeleteCommentReaction { .. } => "unreactComment",
        }
    }

    /// Argument map of the action.
    pub fn call_args(&self) -> CallArgs {
        let pairs: Vec<(&str, Value)> = match self {
            DomainAction::Thread {
                community,
                title,
                body,
                link,
                topic,
            } => vec![
                ("community", json!(community)),
                ("title", json!(encode_uri_component(title))),
                ("body", json!(encode_uri_component(body))),
                ("link", json!(link)),
                ("topic", topic.map_or_else(|| json!(""), |id| json!(id))),
            ],
            DomainAction::DeleteThread { thread_id }
            | DomainAction::DeleteThreadReaction { thread_id } => {
                vec![("thread_id", json!(thread_id))]
            }
            DomainAction::Comment {
                thread_id,
                body,
                parent_comment_id,
            } => vec![
                ("thread_id", json!(thread_id)),
                ("body", json!(body)),
                ("parent_comment_id", json!(parent_comment_id)),
            ],
            DomainAction::DeleteComment { comment_id }
            | DomainAction::DeleteCommentReaction { comment_id } => {
                vec![("comment_id", json!(comment_id))]
            }
            DomainAction::ThreadReaction { thread_id, like } => vec![
                ("thread_id", json!(thread_id)),
                ("value", json!(reaction(*like))),
            ],
            DomainAction::CommentReaction { comment_id, like } => vec![
                ("comment_id", json!(comment_id)),
                ("value", json!(reaction(*like))),
            ],
        };

        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

fn reaction(like: bool) -> &'static str {
    if like {
        "like"
    } else {
        "dislike"
    }
}
