//! Maps a requested suite name to the page that should be rendered.
//!
//! The dispatcher knows nothing about HTTP or templates: it returns a `View`
//! naming the layout and carrying the context the layout receives, or
//! `SuiteNotFound` when the name is not registered.

use crate::suite::{SuiteRegistry, TemplateId};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// The only dispatch failure: the requested name is not in the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no test suite named '{0}'")]
pub struct SuiteNotFound(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Context for the index layout.
pub struct IndexPage {
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Context for a suite detail layout.
pub struct DetailPage {
    #[serde(skip)]
    pub template: TemplateId,
    pub specs: Vec<String>,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Index(IndexPage),
    Detail(DetailPage),
}

impl View {
    /// Layout this view renders with.
    pub fn template(&self) -> TemplateId {
        match self {
            View::Index(_) => TemplateId::index(),
            View::Detail(page) => page.template.clone(),
        }
    }

    /// Context object handed to the renderer.
    pub fn context(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            View::Index(page) => serde_json::to_value(page),
            View::Detail(page) => serde_json::to_value(page),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<SuiteRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<SuiteRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SuiteRegistry {
        &self.registry
    }

    /// Resolve `requested` to a view.
    ///
    /// An empty name selects the index. Any other name must match a
    /// registered suite exactly.
    pub fn handle(&self, requested: &str) -> Result<View, SuiteNotFound> {
        if requested.is_empty() {
            let classes = self
                .registry
                .list_names()
                .into_iter()
                .map(|name| name.0.clone())
                .collect();
            return Ok(View::Index(IndexPage { classes }));
        }

        let suite = self
            .registry
            .lookup(requested)
            .ok_or_else(|| SuiteNotFound(requested.to_string()))?;
        Ok(View::Detail(DetailPage {
            template: suite.template(),
            specs: suite.specs.clone(),
            sources: suite.sources.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::{SuiteDescriptor, SuiteName};
    use serde_json::json;

    fn dispatcher(suites: Vec<SuiteDescriptor>) -> Dispatcher {
        Dispatcher::new(Arc::new(SuiteRegistry::from_descriptors(suites).unwrap()))
    }

    fn services() -> SuiteDescriptor {
        SuiteDescriptor {
            name: SuiteName("ServicesTests".to_string()),
            template: None,
            sources: vec!["a.js".to_string()],
            specs: vec!["b.js".to_string()],
        }
    }

    #[test]
    fn registered_name_yields_default_detail_layout() {
        let view = dispatcher(vec![services()]).handle("ServicesTests").unwrap();
        assert_eq!(
            view,
            View::Detail(DetailPage {
                template: TemplateId::default_detail(),
                specs: vec!["b.js".to_string()],
                sources: vec!["a.js".to_string()],
            })
        );
        assert_eq!(view.template().as_str(), "specrunner/jasmine.html");
        assert_eq!(
            view.context().unwrap(),
            json!({"specs": ["b.js"], "sources": ["a.js"]})
        );
    }

    #[test]
    fn empty_name_lists_suites_in_registry_order() {
        let mut other = services();
        other.name = SuiteName("AlphaTests".to_string());
        let view = dispatcher(vec![services(), other]).handle("").unwrap();
        assert_eq!(view.template().as_str(), "specrunner/index.html");
        assert_eq!(
            view.context().unwrap(),
            json!({"classes": ["ServicesTests", "AlphaTests"]})
        );
    }

    #[test]
    fn unknown_name_is_not_found() {
        let err = dispatcher(vec![services()]).handle("Nope").unwrap_err();
        assert_eq!(err, SuiteNotFound("Nope".to_string()));
        assert_eq!(err.to_string(), "no test suite named 'Nope'");
    }

    #[test]
    fn custom_template_and_order_pass_through() {
        let suite = SuiteDescriptor {
            name: SuiteName("Widgets".to_string()),
            template: Some(TemplateId("custom/widgets.html".to_string())),
            sources: vec!["z.js".into(), "a.js".into(), "m.js".into()],
            specs: vec!["2.js".into(), "1.js".into()],
        };
        let view = dispatcher(vec![suite]).handle("Widgets").unwrap();
        let View::Detail(page) = view else {
            panic!("expected detail view");
        };
        assert_eq!(page.template.as_str(), "custom/widgets.html");
        assert_eq!(page.sources, vec!["z.js", "a.js", "m.js"]);
        assert_eq!(page.specs, vec!["2.js", "1.js"]);
    }
}
