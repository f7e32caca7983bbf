//! Widget rendering pipeline
//!
//! Orchestrates cache lookup, upstream fetch, image localization,
//! template rendering, and cache store for each widget type, and builds
//! the embeddable holder markup for host pages.

use crate::cache::WidgetCache;
use crate::config::WidgetConfig;
use crate::error::Result;
use crate::fetcher::ApiFetcher;
use crate::localize::localize;
use crate::templates::TemplateRenderer;
use chrono::Utc;
use remote_file_mirror::FileMirror;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

/// The two widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Profile,
    Activity,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Profile => "profile",
            WidgetKind::Activity => "activity",
        }
    }

    /// Fixed cache key; profile and feed are independent entries.
    pub fn cache_key(&self) -> &'static str {
        match self {
            WidgetKind::Profile => "widget_gplus_profile",
            WidgetKind::Activity => "widget_gplus_feed",
        }
    }

    /// Parse a route path segment.
    pub fn from_path(segment: &str) -> Option<WidgetKind> {
        match segment {
            "profile" => Some(WidgetKind::Profile),
            "activity" => Some(WidgetKind::Activity),
            _ => None,
        }
    }
}

/// Renders widgets through the fetch → localize → template → cache
/// pipeline.
pub struct WidgetRenderer {
    config: WidgetConfig,
    fetcher: ApiFetcher,
    cache: WidgetCache,
    mirror: FileMirror,
    templates: Arc<dyn TemplateRenderer>,
}

impl WidgetRenderer {
    pub fn new(
        config: WidgetConfig,
        files_root: PathBuf,
        templates: Arc<dyn TemplateRenderer>,
    ) -> Result<Self> {
        let fetcher = ApiFetcher::new(&config)?;
        let mirror = FileMirror::new(
            files_root,
            config.filedir.clone(),
            config.cache_duration_secs(),
            Utc::now(),
        );
        Ok(Self {
            config,
            fetcher,
            cache: WidgetCache::new(),
            mirror,
            templates,
        })
    }

    pub fn cache(&self) -> &WidgetCache {
        &self.cache
    }

    /// Render a widget to HTML.
    ///
    /// A cache hit returns the stored markup without touching the
    /// upstream. On a miss the payload is fetched, image URLs are
    /// localized when file mirroring is enabled, the template renders
    /// the context, and the result is stored with the effective TTL
    /// (the configured duration when caching is enabled, else 0).
    pub async fn render(&self, kind: WidgetKind) -> Result<String> {
        let key = kind.cache_key();
        if let Some(html) = self.cache.get(key).await {
            return Ok(html);
        }

        let mut result = self.fetcher.fetch(kind).await?;
        if self.config.files {
            localize(&self.mirror, &mut result).await;
        }

        let template = match kind {
            WidgetKind::Profile => self.config.profile.template.as_str(),
            WidgetKind::Activity => self.config.activity.template.as_str(),
        };
        let html = self.templates.render(template, &result.into_context())?;

        let ttl_secs = if self.config.cache {
            self.config.cache_duration_secs()
        } else {
            0
        };
        self.cache.set(key, html.clone(), ttl_secs).await;

        Ok(html)
    }

    /// Embeddable container markup for host pages.
    ///
    /// With `defer` enabled this is an empty placeholder the client-side
    /// loader fills in later; no upstream call happens here. Otherwise
    /// the widget renders inline, degrading to an empty container if
    /// rendering fails.
    pub async fn widget_holder(&self, kind: WidgetKind) -> String {
        let inline = if self.config.defer {
            String::new()
        } else {
            match self.render(kind).await {
                Ok(html) => html,
                Err(e) => {
                    error!(widget = kind.as_str(), error = %e, "Inline widget render failed");
                    String::new()
                }
            }
        };

        format!(
            "<section><div class=\"widget-gplus\" id=\"widget-gplus-{key}\" data-key=\"{key}\"{defer}>{inline}</div></section>",
            key = kind.as_str(),
            defer = if self.config.defer { " data-defer=\"true\"" } else { "" },
            inline = inline,
        )
    }
}
