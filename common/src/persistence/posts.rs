use tokio::sync::RwLock;

use crate::{error::StoreError, models::PostModel};

#[async_trait::async_trait]
pub trait IPostStore: Send + Sync {
    async fn list(&self) -> Vec<PostModel>;
    async fn get(&self, post_id: &str) -> Option<PostModel>;
    async fn insert(&self, post: PostModel) -> Result<PostModel, StoreError>;
    async fn replace(&self, post_id: &str, post: PostModel) -> Result<PostModel, StoreError>;
    async fn delete(&self, post_id: &str) -> Result<(), StoreError>;
}

/// Keeps posts in insertion order. Replacing a post keeps its position.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    posts: RwLock<Vec<(String, PostModel)>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl IPostStore for MemoryPostStore {
    async fn list(&self) -> Vec<PostModel> {
        self.posts.read().await.iter().map(|(_, post)| post.clone()).collect()
    }

    async fn get(&self, post_id: &str) -> Option<PostModel> {
        self.posts.read().await.iter().find(|(id, _)| id == post_id).map(|(_, post)| post.clone())
    }

    async fn insert(&self, post: PostModel) -> Result<PostModel, StoreError> {
        let id = post.id().ok_or(StoreError::InvalidDocument)?.to_string();
        let mut posts = self.posts.write().await;
        if posts.iter().any(|(existing, _)| existing == &id) {
            return Err(StoreError::Conflict);
        }
        posts.push((id, post.clone()));
        Ok(post)
    }

    async fn replace(&self, post_id: &str, post: PostModel) -> Result<PostModel, StoreError> {
        let mut posts = self.posts.write().await;
        let index = posts.iter().position(|(id, _)| id == post_id).ok_or(StoreError::NotFound)?;
        // the stored document may carry a new id, lookups follow it
        let new_id = post.id().unwrap_or(post_id).to_string();
        if new_id != post_id && posts.iter().any(|(id, _)| id == &new_id) {
            return Err(StoreError::Conflict);
        }
        posts[index] = (new_id, post.clone());
        Ok(post)
    }

    async fn delete(&self, post_id: &str) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;
        let index = posts.iter().position(|(id, _)| id == post_id).ok_or(StoreError::NotFound)?;
        posts.remove(index);
        Ok(())
    }
}
