use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{DeckError, Result};

/// ========================================
/// Generation inputs
/// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub audience: String,
    pub purpose: String,
    pub tone: String,
    pub page_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            audience: "Target Client / Investors".into(),
            purpose: "Proposal".into(),
            tone: "Professional & Persuasive".into(),
            page_count: 5,
            domain: None,
            sub_domain: None,
            primary_color: None,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_count == 0 {
            return Err(DeckError::InvalidConfig("page count must be at least 1".into()));
        }
        Ok(())
    }
}

/// Auxiliary image context for the backend. Inline bytes are encoded before
/// transport; URLs are passed through and never fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualAsset {
    Inline { mime_type: String, data: Bytes },
    Url(String),
}

impl VisualAsset {
    pub fn inline(mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        VisualAsset::Inline { mime_type: mime_type.into(), data: data.into() }
    }

    pub fn url(url: impl Into<String>) -> Self {
        VisualAsset::Url(url.into())
    }

    /// Transport form of an inline asset; `None` for URLs.
    pub fn to_image_part(&self) -> Option<ImagePart> {
        match self {
            VisualAsset::Inline { mime_type, data } => Some(ImagePart {
                mime_type: mime_type.clone(),
                data: BASE64.encode(data),
            }),
            VisualAsset::Url(_) => None,
        }
    }
}

/// Base64-encoded inline image sent alongside the prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePart {
    pub mime_type: String,
    pub data: String,
}

pub fn image_parts(assets: &[VisualAsset]) -> Vec<ImagePart> {
    assets.iter().filter_map(VisualAsset::to_image_part).collect()
}

/// ========================================
/// Generated document
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    Cover,
    Index,
    Divider,
    Body1,
    Body2,
}

impl SlideType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideType::Cover => "cover",
            SlideType::Index => "index",
            SlideType::Divider => "divider",
            SlideType::Body1 => "body1",
            SlideType::Body2 => "body2",
        }
    }
}

/// Layout hint for a slide. Values outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStyle {
    Centered,
    Split,
    HeroLeft,
    HeroRight,
    #[default]
    ContentFocused,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccentShape {
    #[default]
    CleanBorder,
    Diagonal,
    BottomBar,
    FloatingBlobs,
    #[serde(untagged)]
    Other(String),
}

/// Missing color keys fall back to the default palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub bg: String,
    pub text: String,
    pub accent: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self { bg: "#ffffff".into(), text: "#0f172a".into(), accent: "#0066ff".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDatum {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideRecord {
    #[serde(rename = "type")]
    pub kind: SlideType,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub layout_style: LayoutStyle,
    #[serde(default)]
    pub accent_shape: AccentShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<Vec<ChartDatum>>,
    /// Fields the backend adds on its own (`backgroundImage`, `id`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SlideRecord {
    /// Stand-in slide a UI shows when the backend output could not be used.
    pub fn placeholder(kind: SlideType, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: String::new(),
            theme: Theme::default(),
            layout_style: LayoutStyle::default(),
            accent_shape: AccentShape::default(),
            visual_element: None,
            design_rationale: None,
            chart_data: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationDocument {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_strategy: Option<String>,
    pub slides: Vec<SlideRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PresentationDocument {
    /// Five-slide skeleton used when generation fails on a shape error.
    pub fn placeholder(title: impl Into<String>) -> Self {
        let title = title.into();
        let slides = [
            SlideType::Cover,
            SlideType::Index,
            SlideType::Divider,
            SlideType::Body1,
            SlideType::Body2,
        ]
        .into_iter()
        .map(|kind| SlideRecord::placeholder(kind, title.clone()))
        .collect();
        Self { title, subtitle: None, design_strategy: None, slides, extra: Map::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_page_count_is_rejected() {
        let cfg = GenerationConfig { page_count: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(DeckError::InvalidConfig(_))));
        assert!(GenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn inline_assets_are_base64_encoded_and_urls_skipped() {
        let assets = vec![
            VisualAsset::inline("image/png", vec![0x89u8, b'P', b'N', b'G']),
            VisualAsset::url("https://example.com/a.png"),
        ];
        let parts = image_parts(&assets);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].mime_type, "image/png");
        assert_eq!(parts[0].data, "iVBORw==");
    }

    #[test]
    fn slide_defaults_fill_missing_design_fields() {
        let slide: SlideRecord = serde_json::from_value(json!({
            "type": "body2",
            "title": "Results",
            "content": "Revenue up",
            "chartData": [{ "name": "Q1", "value": 12.5 }]
        }))
        .unwrap();
        assert_eq!(slide.kind, SlideType::Body2);
        assert_eq!(slide.layout_style, LayoutStyle::ContentFocused);
        assert_eq!(slide.chart_data.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn unknown_slide_fields_survive_a_round_trip() {
        let value = json!({
            "title": "Deck",
            "slides": [{
                "type": "cover",
                "title": "Hello",
                "content": "World",
                "theme": { "bg": "#000000", "text": "#ffffff", "accent": "#ff6600" },
                "layoutStyle": "hero-left",
                "accentShape": "floating-blobs",
                "backgroundImage": "https://example.com/bg.png"
            }]
        });
        let doc: PresentationDocument = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(doc.slides[0].extra["backgroundImage"], json!("https://example.com/bg.png"));
        assert_eq!(serde_json::to_value(&doc).unwrap(), value);
    }

    #[test]
    fn unexpected_design_metadata_does_not_reject_the_slide() {
        let value = json!({
            "type": "body1",
            "title": "t",
            "content": "c",
            "theme": { "bg": "#111111" },
            "layoutStyle": "grid",
            "accentShape": "hexagon"
        });
        let slide: SlideRecord = serde_json::from_value(value).unwrap();
        assert_eq!(slide.layout_style, LayoutStyle::Other("grid".into()));
        assert_eq!(slide.accent_shape, AccentShape::Other("hexagon".into()));
        assert_eq!(slide.theme.bg, "#111111");
        assert_eq!(slide.theme.accent, Theme::default().accent);

        let back = serde_json::to_value(&slide).unwrap();
        assert_eq!(back["layoutStyle"], json!("grid"));
        assert_eq!(back["accentShape"], json!("hexagon"));
    }

    #[test]
    fn unknown_slide_type_is_rejected() {
        let res: std::result::Result<SlideRecord, _> = serde_json::from_value(json!({
            "type": "appendix", "title": "t", "content": "c"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn placeholder_document_has_one_slide_per_type() {
        let doc = PresentationDocument::placeholder("Q3");
        let kinds: Vec<_> = doc.slides.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, ["cover", "index", "divider", "body1", "body2"]);
    }
}
