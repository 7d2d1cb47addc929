// feature.rs
use std::sync::Arc;

use cuke_domain::{Background, Feature};

use crate::constants::COLON_INFIX;
use crate::errors::ReporterError;
use crate::naming::build_name;
use crate::registry::RunRegistry;
use crate::sink::{ItemId, TagSet};

/// Feature en curso: documento, tags y el item que lo representa.
#[derive(Debug, Clone)]
pub struct FeatureContext {
    uri: String,
    feature: Option<Arc<Feature>>,
    tags: TagSet,
    item: Option<ItemId>,
}

impl FeatureContext {
    /// Abre el contexto para `uri` usando el árbol cacheado en `registry`.
    ///
    /// Falla con `MissingSource` si nunca llegó el texto fuente de `uri`.
    /// Un documento sin estructura (vacío o con errores) abre igualmente un
    /// contexto sin feature; la resolución de scenarios fallará después.
    pub fn open(uri: &str, registry: &RunRegistry) -> Result<Self, ReporterError> {
        let feature = registry.feature(uri)?;
        let tags: TagSet = feature.as_deref()
                          .map(|f| f.tag_names().map(str::to_string).collect())
                          .unwrap_or_default();
        Ok(Self { uri: uri.to_string(),
                  feature,
                  tags,
                  item: None })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn feature(&self) -> Option<&Feature> {
        self.feature.as_deref()
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn item(&self) -> Option<ItemId> {
        self.item
    }

    pub fn set_item(&mut self, item: ItemId) {
        self.item = Some(item);
    }

    /// `"Feature: <name>"`; el `uri` si el documento no tiene estructura.
    pub fn display_name(&self) -> String {
        match self.feature() {
            Some(f) => build_name(Some(f.keyword.as_str()), COLON_INFIX, &f.name, None),
            None => self.uri.clone(),
        }
    }

    pub fn background(&self) -> Option<&Background> {
        self.feature().and_then(Feature::background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_collects_feature_tags_and_name() {
        let reg = RunRegistry::new();
        reg.add_source("a.feature", "@web @web @api\nFeature: Shop\n  Background:\n    Given x\n");
        let ctx = FeatureContext::open("a.feature", &reg).unwrap();
        assert_eq!(ctx.display_name(), "Feature: Shop");
        assert_eq!(ctx.tags().iter().collect::<Vec<_>>(), vec!["@web", "@api"]);
        assert_eq!(ctx.background().map(|b| b.steps.len()), Some(1));
        assert_eq!(ctx.item(), None);
    }

    #[test]
    fn test_unstructured_document_falls_back_to_uri() {
        let reg = RunRegistry::new();
        reg.add_source("empty.feature", "# nothing here\n");
        let ctx = FeatureContext::open("empty.feature", &reg).unwrap();
        assert!(ctx.feature().is_none());
        assert_eq!(ctx.display_name(), "empty.feature");
        assert!(ctx.tags().is_empty());
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let reg = RunRegistry::new();
        assert_eq!(FeatureContext::open("nope.feature", &reg).unwrap_err(),
                   ReporterError::MissingSource { uri: "nope.feature".into() });
    }
}
