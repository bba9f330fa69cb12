use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::template::{JobTemplate, TemplateCatalog};

/// Job templates loaded once at startup. Read-only afterwards.
#[derive(Clone, Default)]
pub struct TemplateService {
    templates: Arc<Vec<JobTemplate>>,
}

impl TemplateService {
    /// A missing file yields an empty catalog; an unreadable or malformed one
    /// is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "template catalog not found, starting with no templates");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let service = Self::from_json(&raw)?;
        info!(path = %path.display(), templates = service.templates.len(), "template catalog loaded");
        Ok(service)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let catalog: TemplateCatalog = serde_json::from_str(raw)?;
        Ok(Self {
            templates: Arc::new(catalog.templates),
        })
    }

    pub fn all(&self) -> &[JobTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Result<JobTemplate> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Template '{}' not found", id)))
    }

    pub fn by_category(&self, category: &str) -> Vec<JobTemplate> {
        self.templates
            .iter()
            .filter(|t| t.category == category)
            .cloned()
            .collect()
    }

    pub fn categories(&self) -> Vec<String> {
        self.templates
            .iter()
            .map(|t| t.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "templates": [
            {
                "id": "backend-senior",
                "title": "Senior Backend Engineer",
                "category": "engineering",
                "level": "senior",
                "criteria": ["Technical", "Communication"],
                "questions": [
                    { "criterion": "Technical", "questions": ["Describe a system you scaled."] }
                ]
            },
            {
                "id": "designer-middle",
                "title": "Product Designer",
                "category": "design",
                "level": "middle"
            },
            {
                "id": "frontend-junior",
                "title": "Junior Frontend Engineer",
                "category": "engineering",
                "level": "junior"
            }
        ]
    }"#;

    #[test]
    fn parses_catalog_with_defaults() {
        let service = TemplateService::from_json(CATALOG).unwrap();
        assert_eq!(service.all().len(), 3);

        let designer = service.get("designer-middle").unwrap();
        assert!(designer.criteria.is_empty());
        assert!(designer.questions.is_empty());
        assert_eq!(designer.description, "");
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let service = TemplateService::from_json(CATALOG).unwrap();
        assert!(matches!(service.get("nope"), Err(Error::NotFound(_))));
    }

    #[test]
    fn filters_by_category() {
        let service = TemplateService::from_json(CATALOG).unwrap();
        let ids: Vec<String> = service
            .by_category("engineering")
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["backend-senior", "frontend-junior"]);
        assert!(service.by_category("sales").is_empty());
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        let service = TemplateService::from_json(CATALOG).unwrap();
        assert_eq!(service.categories(), vec!["design", "engineering"]);
    }

    #[test]
    fn missing_file_gives_empty_catalog() {
        let service = TemplateService::load("does/not/exist.json").unwrap();
        assert!(service.all().is_empty());
        assert!(service.categories().is_empty());
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        assert!(matches!(
            TemplateService::from_json("{\"templates\": 3}"),
            Err(Error::Json(_))
        ));
    }
}
