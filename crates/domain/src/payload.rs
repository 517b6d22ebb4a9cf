//! Request/response payload records for the posts and comments resources.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainResult;
use crate::id::ResourceId;

/// A blog post as exchanged with the `posts` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Owning user.
    pub user_id: i64,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Post {
    /// Creates a post without a server-assigned identifier.
    #[must_use]
    pub fn new(user_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            body: body.into(),
            id: None,
        }
    }
}

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Commenter display name.
    pub name: String,
    /// Commenter email.
    pub email: String,
    /// Comment text.
    pub body: String,
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Comment {
    /// Creates a comment without a server-assigned identifier.
    #[must_use]
    pub fn new(
        post_id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            post_id,
            name: name.into(),
            email: email.into(),
            body: body.into(),
            id: None,
        }
    }
}

/// Any payload a fixture can send.
///
/// Serializes as the inner record, so the wire shape is exactly the
/// resource's JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// A post body.
    Post(Post),
    /// A comment body.
    Comment(Comment),
}

impl Payload {
    /// Checks the identifiers the payload carries.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` for a user, post or
    /// server-assigned id `<= 0`.
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            Self::Post(post) => {
                ResourceId::new(post.user_id)?;
                post.id.map(ResourceId::new).transpose()?;
            }
            Self::Comment(comment) => {
                ResourceId::new(comment.post_id)?;
                comment.id.map(ResourceId::new).transpose()?;
            }
        }
        Ok(())
    }

    /// Returns the client-supplied fields as JSON values, keyed by wire name.
    ///
    /// The server-assigned `id` is excluded: it is never part of what the
    /// remote echoes back from the request.
    #[must_use]
    pub fn echo_fields(&self) -> BTreeMap<String, Value> {
        let mut fields = BTreeMap::new();
        match self {
            Self::Post(post) => {
                fields.insert("userId".to_string(), Value::from(post.user_id));
                fields.insert("title".to_string(), Value::from(post.title.clone()));
                fields.insert("body".to_string(), Value::from(post.body.clone()));
            }
            Self::Comment(comment) => {
                fields.insert("postId".to_string(), Value::from(comment.post_id));
                fields.insert("name".to_string(), Value::from(comment.name.clone()));
                fields.insert("email".to_string(), Value::from(comment.email.clone()));
                fields.insert("body".to_string(), Value::from(comment.body.clone()));
            }
        }
        fields
    }
}

impl From<Post> for Payload {
    fn from(post: Post) -> Self {
        Self::Post(post)
    }
}

impl From<Comment> for Payload {
    fn from(comment: Comment) -> Self {
        Self::Comment(comment)
    }
}
