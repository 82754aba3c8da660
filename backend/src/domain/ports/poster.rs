//! Ports for poster rendering and storage.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by poster renderer and storage adapters.
    pub enum PosterError {
        Render { message: String } => "poster rendering failed: {message}",
        Storage { message: String } => "poster storage failed: {message}",
    }
}

/// Photo uploaded by the interviewee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterPhoto {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Everything printed on a poster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterContent {
    pub name: String,
    pub reg_no: String,
    pub company: String,
    pub photo: PosterPhoto,
}

/// Encoded poster ready to be stored or served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPoster {
    pub content_type: String,
    /// File extension without the dot.
    pub extension: String,
    pub bytes: Vec<u8>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PosterRenderer: Send + Sync {
    async fn render(&self, content: &PosterContent) -> Result<RenderedPoster, PosterError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PosterStore: Send + Sync {
    /// Store `poster` under `key` and return the reference to persist.
    async fn save(&self, key: &str, poster: &RenderedPoster) -> Result<String, PosterError>;

    /// Load a poster by the reference returned from [`PosterStore::save`].
    async fn load(&self, reference: &str) -> Result<Option<RenderedPoster>, PosterError>;
}
