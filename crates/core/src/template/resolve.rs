use std::collections::HashMap;

use super::registry::{TemplateMeta, TemplateRegistry};

/// Decoded query string of the incoming request.
pub type QueryParams = HashMap<String, String>;

/// Query parameter forcing a template for one request.
pub const TEMPLATE_PARAM: &str = "template";
/// Query parameter marking preview mode.
pub const PREVIEW_PARAM: &str = "preview";

/// Path prefixes that always render with the default shell.
const ADMIN_PREFIXES: [&str; 4] = ["/admin", "/api/admin", "/debug", "/apply-template"];

/// Whether `pathname` belongs to the admin side of the site.
pub fn is_admin_route(pathname: &str) -> bool {
    ADMIN_PREFIXES.iter().any(|prefix| {
        pathname
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Picks the template, if any, that replaces the default page shell.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    registry: TemplateRegistry,
}

impl TemplateResolver {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Resolve for a request path, classifying admin routes from the path.
    pub fn resolve(
        &self,
        pathname: &str,
        query: &QueryParams,
        persisted: Option<&str>,
    ) -> Option<&TemplateMeta> {
        self.resolve_with(is_admin_route(pathname), query, persisted)
    }

    /// Priority, first match wins:
    /// admin route (none), `template` param, `preview` param (none),
    /// persisted `_template`, default (none).
    pub fn resolve_with(
        &self,
        is_admin_route: bool,
        query: &QueryParams,
        persisted: Option<&str>,
    ) -> Option<&TemplateMeta> {
        if is_admin_route {
            return None;
        }
        if let Some(meta) = query
            .get(TEMPLATE_PARAM)
            .and_then(|key| self.registry.get(key))
        {
            return Some(meta);
        }
        if query.contains_key(PREVIEW_PARAM) {
            return None;
        }
        persisted.and_then(|key| self.registry.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> TemplateResolver {
        TemplateResolver::new(TemplateRegistry::builtin())
    }

    fn query(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn key(meta: Option<&TemplateMeta>) -> Option<&str> {
        meta.map(|m| m.key.as_str())
    }

    #[test]
    fn admin_routes_never_resolve() {
        let r = resolver();
        let q = query(&[("template", "launch")]);
        assert_eq!(key(r.resolve_with(true, &q, Some("editorial"))), None);
        assert_eq!(key(r.resolve("/admin/content", &q, Some("editorial"))), None);
        assert_eq!(key(r.resolve("/api/admin/versions", &q, None)), None);
        assert_eq!(key(r.resolve("/debug", &q, None)), None);
    }

    #[test]
    fn admin_prefix_matches_whole_segments() {
        assert!(is_admin_route("/admin"));
        assert!(is_admin_route("/apply-template/launch"));
        assert!(!is_admin_route("/administrators"));
        assert!(!is_admin_route("/"));
    }

    #[test]
    fn explicit_template_wins_even_in_preview() {
        let r = resolver();
        let q = query(&[("template", "launch"), ("preview", "p1")]);
        assert_eq!(key(r.resolve("/", &q, Some("editorial"))), Some("launch"));
    }

    #[test]
    fn preview_without_template_uses_default_shell() {
        let r = resolver();
        let q = query(&[("preview", "p1")]);
        assert_eq!(key(r.resolve("/", &q, Some("editorial"))), None);
    }

    #[test]
    fn persisted_template_applies_when_registered() {
        let r = resolver();
        let q = QueryParams::new();
        assert_eq!(key(r.resolve("/", &q, Some("editorial"))), Some("editorial"));
        assert_eq!(key(r.resolve("/", &q, Some("retired"))), None);
        assert_eq!(key(r.resolve("/", &q, None)), None);
    }

    #[test]
    fn unknown_query_template_falls_through() {
        let r = resolver();
        let q = query(&[("template", "retired")]);
        assert_eq!(key(r.resolve("/", &q, Some("portfolio"))), Some("portfolio"));

        let q = query(&[("template", "retired"), ("preview", "1")]);
        assert_eq!(key(r.resolve("/", &q, Some("portfolio"))), None);
    }
}
