use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTemplate {
    pub id: String,
    pub title: String,
    pub category: String,
    pub level: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub criteria: Vec<String>,
    #[serde(default)]
    pub questions: Vec<TemplateQuestionGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateQuestionGroup {
    pub criterion: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateCatalog {
    pub templates: Vec<JobTemplate>,
}
