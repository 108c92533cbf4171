use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::chain::AttemptRecord;
use crate::history::HistoryItem;
use crate::provider::ModelInfo;
use crate::templates::TemplateSpec;
use crate::wire::{PresentationDocument, SlideRecord, SlideType};

fn type_label(kind: SlideType) -> colored::ColoredString {
    let label = format!("[{}]", kind.as_str().to_uppercase());
    match kind {
        SlideType::Cover => label.magenta().bold(),
        SlideType::Index => label.cyan().bold(),
        SlideType::Divider => label.yellow().bold(),
        SlideType::Body1 => label.green().bold(),
        SlideType::Body2 => label.blue().bold(),
    }
}

pub fn show_document(doc: &PresentationDocument) {
    println!("\n=== {} ===", doc.title.bold());
    if let Some(sub) = &doc.subtitle {
        println!("{}", sub.italic());
    }
    if let Some(strategy) = &doc.design_strategy {
        println!("{} {}", "design:".dimmed(), strategy);
    }
    for (i, s) in doc.slides.iter().enumerate() {
        println!("{}. {}  {}", i + 1, type_label(s.kind), s.title);
        for line in s.content.lines().filter(|l| !l.trim().is_empty()).take(4) {
            println!("      {}", line.trim());
        }
        if let Some(chart) = &s.chart_data {
            let pairs: Vec<String> = chart.iter().map(|d| format!("{}={}", d.name, d.value)).collect();
            println!("      {} {}", "chart:".dimmed(), pairs.join(", "));
        }
    }
    println!();
}

pub fn show_attempts(attempts: &[AttemptRecord]) {
    for a in attempts {
        match &a.error {
            None => println!("  {} {} ({} ms)", "ok".green(), a.model, a.elapsed.as_millis()),
            Some(e) => println!("  {} {}: {}", "failed".red(), a.model, e),
        }
    }
}

fn slide_text(s: &SlideRecord) -> Vec<String> {
    serde_json::to_string_pretty(s)
        .unwrap_or_default()
        .lines()
        .map(|l| format!("{l}\n"))
        .collect()
}

/// Per-slide summary of what a refinement changed.
pub fn slide_changes(old: &PresentationDocument, new: &PresentationDocument) -> Vec<String> {
    let mut out = Vec::new();
    if old.title != new.title {
        out.push(format!("title: {:?} -> {:?}", old.title, new.title));
    }
    let longest = old.slides.len().max(new.slides.len());
    for i in 0..longest {
        match (old.slides.get(i), new.slides.get(i)) {
            (Some(a), Some(b)) if a == b => {}
            (Some(a), Some(b)) => {
                let before = slide_text(a);
                let after = slide_text(b);
                let diff = difflib::unified_diff(&before, &after, "before", "after", "", "", 0);
                let changed = diff.iter().filter(|l| l.starts_with('+') && !l.starts_with("+++")).count();
                out.push(format!("slide {} ({}): {} line(s) changed", i + 1, b.kind.as_str(), changed));
            }
            (None, Some(b)) => out.push(format!("slide {} ({}): added", i + 1, b.kind.as_str())),
            (Some(a), None) => out.push(format!("slide {} ({}): removed", i + 1, a.kind.as_str())),
            (None, None) => {}
        }
    }
    out
}

pub fn print_changes(old: &PresentationDocument, new: &PresentationDocument) {
    let changes = slide_changes(old, new);
    println!("\n=== CHANGES ===");
    if changes.is_empty() {
        println!("(no changes)");
    }
    for c in changes {
        println!(" - {}", c.yellow());
    }
    println!();
}

pub fn show_history(items: &[HistoryItem]) {
    if items.is_empty() {
        println!("(no history)");
        return;
    }
    for (i, item) in items.iter().enumerate() {
        println!(
            "{:>3}. {}  {}  {} slide(s)",
            i,
            item.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            item.title.bold(),
            item.document.slides.len()
        );
    }
}

pub fn show_templates(templates: &[TemplateSpec]) {
    for t in templates {
        println!("{:<26} {}  {} ({})", t.id.bold(), t.main_color, t.name, t.category.dimmed());
    }
}

pub fn show_models(models: &[ModelInfo]) {
    for m in models {
        match &m.display_name {
            Some(name) => println!("- {} ({})", m.id, name),
            None => println!("- {}", m.id),
        }
    }
}

pub fn spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_documents_have_no_changes() {
        let doc = PresentationDocument::placeholder("X");
        assert!(slide_changes(&doc, &doc.clone()).is_empty());
    }

    #[test]
    fn edits_additions_and_removals_are_reported() {
        let old = PresentationDocument::placeholder("X");
        let mut new = old.clone();
        new.slides[1].content = "Chapter 1\nChapter 2".into();
        new.slides.pop();
        let changes = slide_changes(&old, &new);
        assert_eq!(changes.len(), 2);
        assert!(changes[0].starts_with("slide 2 (index): 1 line(s) changed"));
        assert_eq!(changes[1], "slide 5 (body2): removed");

        let mut grown = old.clone();
        grown.slides.push(SlideRecord::placeholder(SlideType::Body1, "extra"));
        grown.title = "Y".into();
        let changes = slide_changes(&old, &grown);
        assert_eq!(changes[0], "title: \"X\" -> \"Y\"");
        assert_eq!(changes[1], "slide 6 (body1): added");
    }
}
