use crate::wire::{GenerationConfig, PresentationDocument, VisualAsset};

fn content_guidelines() -> &'static str {
r#"Guidelines for Content:
- Cover: Create an evocative, high-impact title and a clear subtitle that establishes authority.
- Index: Provide 4-5 logical chapters that tell a coherent story.
- Divider: Create a strong transition message for the first major section.
- Body1 (Editorial): Use professional bullet points. Focus on "Why" and "How", not just "What".
- Body2 (Analysis): Provide a data-driven or visual summary that would fit a chart or matrix. Include "chartData" when numbers are involved."#
}

fn design_guidelines() -> &'static str {
r#"Guidelines for Design:
- Every slide carries a "theme" with hex colors for "bg", "text" and "accent". Keep contrast readable.
- "layoutStyle" is one of: "centered", "split", "hero-left", "hero-right", "content-focused".
- "accentShape" is one of: "clean-border", "diagonal", "bottom-bar", "floating-blobs".
- "visualElement" is a short prompt for an illustration or icon that would suit the slide.
- "designRationale" explains the design choice in one sentence.
- "designStrategy" at the top level summarizes the visual strategy of the whole deck."#
}

fn output_example() -> &'static str {
r##"JSON Format Example:
{
  "title": "Main Project Title",
  "subtitle": "Subtitle explaining the value prop",
  "designStrategy": "...",
  "slides": [
    {
      "type": "cover",
      "title": "...",
      "content": "...",
      "theme": { "bg": "#0f172a", "text": "#ffffff", "accent": "#0066ff" },
      "layoutStyle": "centered",
      "accentShape": "floating-blobs",
      "visualElement": "...",
      "designRationale": "..."
    },
    { "type": "index", "title": "...", "content": "...", "theme": { "bg": "...", "text": "...", "accent": "..." }, "layoutStyle": "split", "accentShape": "clean-border" },
    { "type": "divider", "title": "...", "content": "...", "theme": { "bg": "...", "text": "...", "accent": "..." }, "layoutStyle": "hero-left", "accentShape": "diagonal" },
    { "type": "body1", "title": "...", "content": "...", "theme": { "bg": "...", "text": "...", "accent": "..." }, "layoutStyle": "content-focused", "accentShape": "bottom-bar" },
    {
      "type": "body2",
      "title": "...",
      "content": "...",
      "theme": { "bg": "...", "text": "...", "accent": "..." },
      "layoutStyle": "hero-right",
      "accentShape": "clean-border",
      "chartData": [ { "name": "...", "value": 0 } ]
    }
  ]
}"##
}

const JSON_ONLY: &str =
    "CRITICAL: Return ONLY one JSON object. No markdown, no code fences, no explanations.";

fn domain_line(config: &GenerationConfig) -> String {
    let domain = config.domain.as_deref().unwrap_or("General");
    match config.sub_domain.as_deref() {
        Some(sub) if !sub.is_empty() && sub != "General" => {
            format!("{domain} (Focus Sector: {sub})")
        }
        _ => domain.to_string(),
    }
}

fn color_line(config: &GenerationConfig) -> String {
    match config.primary_color.as_deref() {
        Some(color) => format!("the primary color {color}"),
        None => "a professional color palette".to_string(),
    }
}

pub fn build_generation_prompt(
    topic: &str,
    config: &GenerationConfig,
    guidance: Option<&str>,
    assets: &[VisualAsset],
) -> String {
    let references = if assets.is_empty() {
        String::new()
    } else {
        format!("Reference Images:\n{}\n", describe_assets(assets))
    };
    let guidance = match guidance.map(str::trim) {
        Some(g) if !g.is_empty() => format!("\nAdditional Guidance from the user:\n{g}\n"),
        _ => String::new(),
    };

    format!(
r#"You are a world-class presentation consultant and designer. Your task is to generate a highly professional, persuasive, and structured presentation for the topic: "{topic}".

Target Audience: {audience}
Presentation Purpose: {purpose}
Desired Tone: {tone}
Industry/Domain: {domain}
Visual Identity: Focus on a design language that complements {color}.
Visual Context: Any attached images are references. Use them to infer the desired visual style, content depth, or specific details if relevant.
{references}{guidance}
{content}

{design}

Structural Requirements:
- Provide EXACTLY {count} slides. Not fewer, not more.
- Language: Use the language of the provided topic.
- Format: Return a strict JSON object.

{example}

{json_only}"#,
        topic = topic,
        audience = config.audience,
        purpose = config.purpose,
        tone = config.tone,
        domain = domain_line(config),
        color = color_line(config),
        references = references,
        guidance = guidance,
        content = content_guidelines(),
        design = design_guidelines(),
        count = config.page_count,
        example = output_example(),
        json_only = JSON_ONLY,
    )
}

fn describe_assets(assets: &[VisualAsset]) -> String {
    if assets.is_empty() {
        return "(none)".to_string();
    }
    let mut inline_idx = 0usize;
    assets
        .iter()
        .map(|a| match a {
            VisualAsset::Url(url) => format!("- url: {url}"),
            VisualAsset::Inline { mime_type, .. } => {
                inline_idx += 1;
                format!("- attached image #{inline_idx} ({mime_type})")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Refinement payload. The current document is restated verbatim so the
/// backend edits it instead of starting over.
pub fn build_refinement_prompt(
    current: &PresentationDocument,
    instruction: &str,
    assets: &[VisualAsset],
) -> String {
    let current_json = serde_json::to_string_pretty(current)
        .unwrap_or_else(|_| format!("{current:?}"));

    format!(
r#"You are an AI presentation assistant. Your task is to modify the existing presentation content based on the user's request.

Current Content:
{current_json}

Available Visual Assets (on Canvas):
{assets}

User's Request:
"{instruction}"

Guidelines:
- Only modify the parts requested by the user. Keep everything else exactly as is.
- If the user wants to add a slide, add it to the "slides" array.
- If the user wants to change the tone or detail, update the corresponding text fields.
- Visuals: If the user asks to use an asset from the available visual assets, copy its url to a "backgroundImage" property of the relevant slide.
- Return the FULL updated JSON object in the same structure, including unchanged slides.

{json_only}"#,
        current_json = current_json,
        assets = describe_assets(assets),
        instruction = instruction,
        json_only = JSON_ONLY,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStyle {
    ThreeD,
    TwoD,
    Photo,
}

impl AssetStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStyle::ThreeD => "3d",
            AssetStyle::TwoD => "2d",
            AssetStyle::Photo => "photo",
        }
    }
}

pub fn build_asset_prompt(subject: &str, style: AssetStyle) -> String {
    let prefix = match style {
        AssetStyle::ThreeD => {
            "Style: 3D Render, Cute, Isometric, Glossy, Soft Lighting, 4K, Blender 3D Style."
        }
        AssetStyle::TwoD => "Style: Flat Icon, Vector Art, Minimalist, SVG Style, Clean Lines.",
        AssetStyle::Photo => "Style: High Quality Photograph, Cinematic Lighting.",
    };
    format!("{prefix} Subject: {subject}")
}
