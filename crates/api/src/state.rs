use std::sync::Arc;

use sitecopy_core::{ContentStore, PreviewStore, TemplateRegistry, TemplateResolver};

use crate::config::AppConfig;
use crate::copywriter::Copywriter;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    config: AppConfig,
    content: ContentStore,
    previews: PreviewStore,
    resolver: TemplateResolver,
    copywriter: Copywriter,
}

impl AppState {
    pub fn new(config: AppConfig, registry: TemplateRegistry) -> Self {
        let content = ContentStore::new(&config.content_dir);
        let previews = PreviewStore::new(&config.content_dir);
        let copywriter = Copywriter::new(config.llm.clone());
        Self {
            inner: Arc::new(InnerState {
                content,
                previews,
                resolver: TemplateResolver::new(registry),
                copywriter,
                config,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.inner.previews
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.inner.resolver
    }

    pub fn copywriter(&self) -> &Copywriter {
        &self.inner.copywriter
    }
}
