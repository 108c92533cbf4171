use crate::wire::GenerationConfig;

/// Built-in deck starting points. Selecting one seeds the topic, domain and
/// brand color of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub main_color: &'static str,
    pub sub_color: &'static str,
    pub design_mood: &'static str,
    pub category: &'static str,
}

impl TemplateSpec {
    pub fn apply(&self, config: &mut GenerationConfig) {
        config.domain = Some(self.category.to_string());
        config.primary_color = Some(self.main_color.to_string());
    }
}

const fn t(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    main_color: &'static str,
    sub_color: &'static str,
    design_mood: &'static str,
    category: &'static str,
) -> TemplateSpec {
    TemplateSpec { id, name, description, main_color, sub_color, design_mood, category }
}

pub const TEMPLATES: &[TemplateSpec] = &[
    t("marketing-strategy-2025", "Marketing Strategy 2025", "Clean, corporate marketing roadmap.", "#0066ff", "#ffffff", "Professional", "Business"),
    t("customer-relations", "Customer Relations", "Deep blue professional service template.", "#1e3a8a", "#3b82f6", "Corporate", "Success"),
    t("ai-revolution", "AI Revolution", "Minimalist tech and innovation style.", "#111827", "#f3f4f6", "Tech", "Innovation"),
    t("business-growth", "Business Growth", "Global expansion and scale-up theme.", "#0369a1", "#0ea5e9", "Global", "Business"),
    t("digital-transformation", "Digital Transformation", "Dark mode enterprise strategy.", "#020617", "#334155", "Enterprise", "IT"),
    t("healthcare-guide", "Healthcare Guide", "Clean medical and wellness layout.", "#ffffff", "#0d9488", "Wellness", "Medical"),
    t("digital-learning", "Digital Learning", "Green-accented educational tech theme.", "#064e3b", "#10b981", "Academic", "Education"),
    t("pro-development", "Professional Development", "Human-centric corporate training.", "#0f172a", "#f1f5f9", "Personal", "HR"),
    t("excellence-solutions", "Excellence Solutions", "Contrast heavy orange business style.", "#ea580c", "#0f172a", "Bold", "Consulting"),
    t("smartflow-ai", "SmartFlow AI", "Futuristic robot and automation theme.", "#1e40af", "#dbeafe", "Cyber", "AI"),
    t("business-strategy-pro", "Business Strategy Pro", "Classic professional consulting deck.", "#1e3a8a", "#f8fafc", "Classic", "Strategy"),
    t("investment-update", "Financial Update", "Sleek monochrome for investors.", "#18181b", "#71717a", "Finance", "Investment"),
    t("leadership-comm", "Leadership Communication", "Soft beige and green authority theme.", "#4d7c0f", "#fef3c7", "Authority", "Leadership"),
    t("edu-reform", "Edu Reform", "Academic style for education.", "#2563eb", "#ffffff", "Academic", "Education"),
    t("creative-design", "Creative Design Journey", "Playful purple creative portfolio.", "#7c3aed", "#faf5ff", "Playful", "Design"),
    t("tokyo-adventure", "Ultimate Tokyo Adventure", "Vibrant photography travel theme.", "#9f1239", "#fff1f2", "Vibrant", "Travel"),
    t("smart-home", "Smart Home Insights", "Yellow accent IoT analytics.", "#18181b", "#facc15", "Modern", "Tech"),
    t("innovate-tech", "InnovateTech Solutions", "Simple clean circle-based identity.", "#52525b", "#ffffff", "Neutral", "Tech"),
    t("storytelling-portfolio", "Storytelling Portfolio", "High impact typography for creatives.", "#991b1b", "#fef2f2", "Impactful", "Portfolio"),
];

pub fn find(id: &str) -> Option<&'static TemplateSpec> {
    TEMPLATES.iter().find(|t| t.id.eq_ignore_ascii_case(id.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = TEMPLATES.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), TEMPLATES.len());
    }

    #[test]
    fn apply_seeds_domain_and_color() {
        let tpl = find("Investment-Update").unwrap();
        let mut cfg = GenerationConfig::default();
        tpl.apply(&mut cfg);
        assert_eq!(cfg.domain.as_deref(), Some("Investment"));
        assert_eq!(cfg.primary_color.as_deref(), Some("#18181b"));
        assert_eq!(cfg.page_count, 5);
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(find("does-not-exist").is_none());
    }
}
