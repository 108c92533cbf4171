use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use fs_err as fs;
use reqwest::Url;
use std::path::Path;

use crate::prompt::{build_asset_prompt, AssetStyle};
use crate::wire::VisualAsset;

/// `http(s)://` references stay URLs; anything else is read from disk.
pub fn load_asset(reference: &str) -> Result<VisualAsset> {
    let reference = reference.trim();
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Ok(VisualAsset::url(reference));
    }
    let path = Path::new(reference);
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        bail!("{} is not an image ({})", path.display(), mime);
    }
    let data = fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
    Ok(VisualAsset::inline(mime.essence_str(), data))
}

pub fn load_assets(references: &[String]) -> Result<Vec<VisualAsset>> {
    references.iter().map(|r| load_asset(r)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAsset {
    pub image_url: String,
    pub prompt: String,
}

/// Image generation collaborator.
#[async_trait]
pub trait AssetGenerator: Send + Sync {
    async fn generate(&self, subject: &str, style: AssetStyle) -> Result<GeneratedAsset>;
}

/// Stub generator: no image backend is called. It returns a placeholder image
/// URL labelled with the style and subject.
pub struct PlaceholderAssetGenerator {
    base: String,
}

impl Default for PlaceholderAssetGenerator {
    fn default() -> Self {
        Self { base: "https://placehold.co/600x400/png".into() }
    }
}

#[async_trait]
impl AssetGenerator for PlaceholderAssetGenerator {
    async fn generate(&self, subject: &str, style: AssetStyle) -> Result<GeneratedAsset> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(anyhow!("asset subject is empty"));
        }
        let label = format!("{}: {}", style.as_str(), subject);
        let url = Url::parse_with_params(&self.base, &[("text", label.as_str())])
            .context("invalid placeholder base url")?;
        Ok(GeneratedAsset { image_url: url.to_string(), prompt: build_asset_prompt(subject, style) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_passed_through() {
        let a = load_asset("https://cdn.example.com/a.png").unwrap();
        assert_eq!(a, VisualAsset::url("https://cdn.example.com/a.png"));
    }

    #[test]
    fn local_images_are_read_with_their_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.jpg");
        fs::write(&path, [0xffu8, 0xd8, 0xff]).unwrap();
        match load_asset(path.to_str().unwrap()).unwrap() {
            VisualAsset::Inline { mime_type, data } => {
                assert_eq!(mime_type, "image/jpeg");
                assert_eq!(&data[..], &[0xff, 0xd8, 0xff]);
            }
            other => panic!("expected inline asset, got {other:?}"),
        }
    }

    #[test]
    fn non_images_and_missing_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        fs::write(&txt, "hi").unwrap();
        assert!(load_asset(txt.to_str().unwrap()).is_err());
        assert!(load_asset(dir.path().join("gone.png").to_str().unwrap()).is_err());
    }

    #[tokio::test]
    async fn placeholder_url_encodes_style_and_subject() {
        let out = PlaceholderAssetGenerator::default()
            .generate("Rocket ship taking off", AssetStyle::ThreeD)
            .await
            .unwrap();
        assert_eq!(out.image_url, "https://placehold.co/600x400/png?text=3d%3A+Rocket+ship+taking+off");
        assert!(out.prompt.starts_with("Style: 3D Render"));
    }

    #[tokio::test]
    async fn empty_subject_is_rejected() {
        assert!(PlaceholderAssetGenerator::default().generate("  ", AssetStyle::Photo).await.is_err());
    }
}
