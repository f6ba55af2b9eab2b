use serde::{Deserialize, Serialize};

/// Registry entry for one visitor-site template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMeta {
    pub key: String,
    /// Renders its own header and footer instead of the default shell.
    pub autonomous: bool,
    pub name: String,
    pub description: String,
}

impl TemplateMeta {
    pub fn new(key: &str, autonomous: bool, name: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            autonomous,
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Read-only set of known templates, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<TemplateMeta>,
}

impl TemplateRegistry {
    /// Later entries with a duplicate key are dropped.
    pub fn new(templates: impl IntoIterator<Item = TemplateMeta>) -> Self {
        let mut unique: Vec<TemplateMeta> = Vec::new();
        for meta in templates {
            if unique.iter().any(|t| t.key == meta.key) {
                tracing::warn!(key = %meta.key, "duplicate template key ignored");
                continue;
            }
            unique.push(meta);
        }
        Self { templates: unique }
    }

    /// Templates shipped with the site.
    pub fn builtin() -> Self {
        Self::new([
            TemplateMeta::new(
                "editorial",
                false,
                "Editorial",
                "Long-form typography for studios that write.",
            ),
            TemplateMeta::new(
                "portfolio",
                false,
                "Portfolio",
                "Project grid first, copy second.",
            ),
            TemplateMeta::new(
                "minimal",
                false,
                "Minimal",
                "Single column, no imagery.",
            ),
            TemplateMeta::new(
                "launch",
                true,
                "Launch",
                "Full-bleed product launch page with its own header and footer.",
            ),
            TemplateMeta::new(
                "agency",
                true,
                "Agency",
                "Animated agency landing page with custom navigation.",
            ),
        ])
    }

    pub fn get(&self, key: &str) -> Option<&TemplateMeta> {
        self.templates.iter().find(|t| t.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn list(&self) -> &[TemplateMeta] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        let registry = TemplateRegistry::builtin();
        assert!(registry.contains("editorial"));
        assert!(registry.get("launch").unwrap().autonomous);
        assert!(!registry.get("portfolio").unwrap().autonomous);
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn duplicate_keys_keep_first() {
        let registry = TemplateRegistry::new([
            TemplateMeta::new("a", false, "First", ""),
            TemplateMeta::new("a", true, "Second", ""),
        ]);
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.get("a").unwrap().name, "First");
    }
}
