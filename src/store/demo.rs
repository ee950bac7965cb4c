//! In-memory users and posts for the beginner REST examples.
//!
//! Nothing here touches PostgreSQL. Records live for the life of the process
//! and are reset on restart. All access goes through one `RwLock`, so writes
//! are serialised.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{PlaygroundError, Result};

/// A demo user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A demo blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
}

/// Request body for creating or updating a demo user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Request body for creating or updating a demo post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug)]
struct DemoData {
    users: Vec<DemoUser>,
    posts: Vec<DemoPost>,
    /// Highest id handed out so far, per collection.
    last_user_id: u64,
    last_post_id: u64,
}

/// Process-local store behind the `/api/users` and `/api/posts` routes.
#[derive(Debug)]
pub struct DemoStore {
    data: RwLock<DemoData>,
}

impl Default for DemoStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl DemoStore {
    /// Creates a store holding the two sample users and posts.
    pub fn seeded() -> Self {
        let users = vec![
            DemoUser {
                id: "1".to_string(),
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
            },
            DemoUser {
                id: "2".to_string(),
                name: "Jane Smith".to_string(),
                email: "jane@example.com".to_string(),
            },
        ];
        let posts = vec![
            DemoPost {
                id: "1".to_string(),
                title: "First Post".to_string(),
                content: "Hello world!".to_string(),
                author: "John".to_string(),
            },
            DemoPost {
                id: "2".to_string(),
                title: "Second Post".to_string(),
                content: "Another post".to_string(),
                author: "Jane".to_string(),
            },
        ];

        Self {
            data: RwLock::new(DemoData {
                last_user_id: users.len() as u64,
                last_post_id: posts.len() as u64,
                users,
                posts,
            }),
        }
    }

    /// Lists users in insertion order, optionally truncated.
    pub async fn list_users(&self, limit: Option<usize>) -> Vec<DemoUser> {
        let data = self.data.read().await;
        let take = limit.unwrap_or(data.users.len());
        data.users.iter().take(take).cloned().collect()
    }

    pub async fn get_user(&self, id: &str) -> Option<DemoUser> {
        let data = self.data.read().await;
        data.users.iter().find(|u| u.id == id).cloned()
    }

    /// Adds a user. Name and email are both required.
    pub async fn create_user(&self, input: UserInput) -> Result<DemoUser> {
        let (Some(name), Some(email)) = (non_empty(input.name), non_empty(input.email)) else {
            return Err(PlaygroundError::bad_request("Name and email are required"));
        };

        let mut data = self.data.write().await;
        data.last_user_id += 1;
        let user = DemoUser {
            id: data.last_user_id.to_string(),
            name,
            email,
        };
        data.users.push(user.clone());
        Ok(user)
    }

    /// Overwrites the fields present in `input`; the id never changes.
    pub async fn update_user(&self, id: &str, input: UserInput) -> Option<DemoUser> {
        let mut data = self.data.write().await;
        let user = data.users.iter_mut().find(|u| u.id == id)?;
        if let Some(name) = input.name {
            user.name = name;
        }
        if let Some(email) = input.email {
            user.email = email;
        }
        Some(user.clone())
    }

    pub async fn delete_user(&self, id: &str) -> Option<DemoUser> {
        let mut data = self.data.write().await;
        let index = data.users.iter().position(|u| u.id == id)?;
        Some(data.users.remove(index))
    }

    /// Lists posts in insertion order, optionally truncated.
    pub async fn list_posts(&self, limit: Option<usize>) -> Vec<DemoPost> {
        let data = self.data.read().await;
        let take = limit.unwrap_or(data.posts.len());
        data.posts.iter().take(take).cloned().collect()
    }

    pub async fn get_post(&self, id: &str) -> Option<DemoPost> {
        let data = self.data.read().await;
        data.posts.iter().find(|p| p.id == id).cloned()
    }

    /// Adds a post. Only the title is required.
    pub async fn create_post(&self, input: PostInput) -> Result<DemoPost> {
        let Some(title) = non_empty(input.title) else {
            return Err(PlaygroundError::bad_request("Title is required"));
        };

        let mut data = self.data.write().await;
        data.last_post_id += 1;
        let post = DemoPost {
            id: data.last_post_id.to_string(),
            title,
            content: input.content.unwrap_or_default(),
            author: non_empty(input.author).unwrap_or_else(|| "Anonymous".to_string()),
        };
        data.posts.push(post.clone());
        Ok(post)
    }

    /// Overwrites the fields present in `input`; the id never changes.
    pub async fn update_post(&self, id: &str, input: PostInput) -> Option<DemoPost> {
        let mut data = self.data.write().await;
        let post = data.posts.iter_mut().find(|p| p.id == id)?;
        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(content) = input.content {
            post.content = content;
        }
        if let Some(author) = input.author {
            post.author = author;
        }
        Some(post.clone())
    }

    pub async fn delete_post(&self, id: &str) -> Option<DemoPost> {
        let mut data = self.data.write().await;
        let index = data.posts.iter().position(|p| p.id == id)?;
        Some(data.posts.remove(index))
    }
}
