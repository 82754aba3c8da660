//! SVG poster composition.
//!
//! The photo is embedded as a base64 data URI so the poster is a single
//! self-contained file.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::domain::ports::{PosterContent, PosterError, PosterRenderer, RenderedPoster};

const WIDTH: u32 = 1080;
const HEIGHT: u32 = 1350;
const PHOTO_SIZE: u32 = 560;

/// Renders posters as SVG documents.
#[derive(Debug, Clone)]
pub struct SvgPosterRenderer {
    headline: String,
}

impl Default for SvgPosterRenderer {
    fn default() -> Self {
        Self::new("Placed at")
    }
}

impl SvgPosterRenderer {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
        }
    }
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn compose(headline: &str, content: &PosterContent) -> Result<String, PosterError> {
    if !content.photo.content_type.starts_with("image/") {
        return Err(PosterError::render(format!(
            "unsupported photo type {}",
            content.photo.content_type
        )));
    }
    if content.photo.bytes.is_empty() {
        return Err(PosterError::render("photo is empty"));
    }
    let photo = STANDARD.encode(&content.photo.bytes);
    let photo_x = (WIDTH - PHOTO_SIZE) / 2;
    let centre = WIDTH / 2;
    Ok(format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">
  <rect width="100%" height="100%" fill="#0b1f3a"/>
  <clipPath id="photo-clip"><circle cx="{centre}" cy="{photo_cy}" r="{radius}"/></clipPath>
  <image x="{photo_x}" y="160" width="{PHOTO_SIZE}" height="{PHOTO_SIZE}" clip-path="url(#photo-clip)" preserveAspectRatio="xMidYMid slice" href="data:{photo_type};base64,{photo}"/>
  <text x="{centre}" y="850" text-anchor="middle" font-family="sans-serif" font-size="64" font-weight="bold" fill="#ffffff">{name}</text>
  <text x="{centre}" y="920" text-anchor="middle" font-family="sans-serif" font-size="36" fill="#9fb3c8">{reg_no}</text>
  <text x="{centre}" y="1060" text-anchor="middle" font-family="sans-serif" font-size="40" fill="#9fb3c8">{headline}</text>
  <text x="{centre}" y="1150" text-anchor="middle" font-family="sans-serif" font-size="80" font-weight="bold" fill="#f5b700">{company}</text>
</svg>
"##,
        photo_cy = 160 + PHOTO_SIZE / 2,
        radius = PHOTO_SIZE / 2,
        photo_type = escape_xml(&content.photo.content_type),
        name = escape_xml(&content.name),
        reg_no = escape_xml(&content.reg_no.to_uppercase()),
        headline = escape_xml(headline),
        company = escape_xml(&content.company),
    ))
}

#[async_trait]
impl PosterRenderer for SvgPosterRenderer {
    async fn render(&self, content: &PosterContent) -> Result<RenderedPoster, PosterError> {
        let svg = compose(&self.headline, content)?;
        Ok(RenderedPoster {
            content_type: "image/svg+xml".to_owned(),
            extension: "svg".to_owned(),
            bytes: svg.into_bytes(),
        })
    }
}
