use serde_json::json;

use super::model::ContentDocument;

/// Default site copy written on first read when no canonical file exists.
pub fn seed_document() -> ContentDocument {
    let value = json!({
        "metadata": {
            "title": "Studio",
            "description": "Independent design and engineering studio.",
            "locale": "en"
        },
        "nav": {
            "logo": "Studio",
            "links": [
                { "label": "Work", "href": "#projects" },
                { "label": "Writing", "href": "#articles" },
                { "label": "Contact", "href": "#contact" }
            ]
        },
        "hero": {
            "eyebrow": "Design & engineering",
            "title": "We build calm, fast websites.",
            "subtitle": "A small team shipping thoughtful products for ambitious companies.",
            "cta": { "label": "See our work", "href": "#projects" }
        },
        "projects": {
            "title": "Selected work",
            "items": [
                {
                    "title": "Northwind",
                    "summary": "Rebuilt a logistics dashboard used by 4,000 dispatchers.",
                    "tags": ["product", "frontend"]
                },
                {
                    "title": "Fieldnotes",
                    "summary": "Editorial site and publishing workflow for a research lab.",
                    "tags": ["editorial", "cms"]
                }
            ]
        },
        "articles": {
            "title": "Writing",
            "items": [
                {
                    "title": "Shipping small",
                    "excerpt": "Why we prefer many tiny releases over one big launch.",
                    "date": "2026-01-12"
                }
            ]
        },
        "footer": {
            "contact": { "email": "hello@example.com" },
            "copyright": "Studio. All rights reserved."
        }
    });
    match value {
        serde_json::Value::Object(map) => ContentDocument::new(map),
        _ => ContentDocument::default(),
    }
}
