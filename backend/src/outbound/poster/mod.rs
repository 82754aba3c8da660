//! Poster adapters: SVG rendering and directory-backed storage.

mod directory_store;
mod svg_renderer;

pub use directory_store::DirectoryPosterStore;
pub use svg_renderer::SvgPosterRenderer;
