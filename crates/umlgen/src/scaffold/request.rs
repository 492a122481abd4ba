//! Export request contract and its validation
//!
//! Validation runs before any file is touched. It rejects what would make
//! the generated code uncompilable (bad identifiers, clashing names); what
//! the generator can work around is left to the analyzer's diagnostics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::naming::{
    dart_package_name, is_valid_identifier, is_valid_package, java_package_segment, lower_first,
};
use crate::core::{Diagram, ExportError, ExportResult, GeneratorConfig, ProjectSettings};

/// Body of an export request, camelCase on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub diagram: Option<Diagram>,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub base_package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ExportRequest {
    pub fn new(
        diagram: Diagram,
        project_name: impl Into<String>,
        base_package: impl Into<String>,
    ) -> Self {
        Self {
            diagram: Some(diagram),
            project_name: project_name.into(),
            base_package: base_package.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Parse a request body
    pub fn from_json(json: &str) -> ExportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the request; returns the diagram on success
    pub fn validate(&self) -> ExportResult<&Diagram> {
        let diagram = self
            .diagram
            .as_ref()
            .ok_or_else(|| ExportError::invalid_request("diagram is required"))?;

        let project = self.project_name.trim();
        if project.is_empty() {
            return Err(ExportError::invalid_request("projectName is required"));
        }
        let segment = java_package_segment(project);
        if !is_valid_identifier(&segment) {
            return Err(ExportError::invalid_request(format!(
                "projectName {:?} does not yield a valid package segment ({:?})",
                project, segment
            )));
        }
        let dart = dart_package_name(project);
        if !dart.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(ExportError::invalid_request(format!(
                "projectName {:?} does not yield a valid Dart package name ({:?})",
                project, dart
            )));
        }

        if self.base_package.trim().is_empty() {
            return Err(ExportError::invalid_request("basePackage is required"));
        }
        if !is_valid_package(&self.base_package) {
            return Err(ExportError::invalid_request(format!(
                "basePackage {:?} is not a dot-separated list of Java identifiers",
                self.base_package
            )));
        }

        if let Some(url) = &self.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ExportError::invalid_request(format!(
                    "baseUrl {:?} must start with http:// or https://",
                    url
                )));
            }
        }

        validate_classes(diagram)?;
        debug!(
            classes = diagram.class_count(),
            relations = diagram.relation_count(),
            "Request validated"
        );
        Ok(diagram)
    }

    /// Validate and split into the diagram and the project settings
    pub fn into_parts(self, config: GeneratorConfig) -> ExportResult<(Diagram, ProjectSettings)> {
        self.validate()?;
        let mut settings = ProjectSettings::new(self.project_name.trim(), self.base_package, config);
        if let Some(url) = self.base_url {
            settings = settings.with_base_url(url);
        }
        let diagram = self
            .diagram
            .ok_or_else(|| ExportError::invalid_request("diagram is required"))?;
        Ok((diagram, settings))
    }
}

fn validate_classes(diagram: &Diagram) -> ExportResult<()> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for class in &diagram.classes {
        if !ids.insert(class.id.as_str()) {
            return Err(ExportError::invalid_request(format!(
                "duplicate class id {:?}",
                class.id
            )));
        }
        // local variables and fields are derived from the lower-cased name
        if !is_valid_identifier(&class.name) || !is_valid_identifier(&lower_first(&class.name)) {
            return Err(ExportError::invalid_request(format!(
                "class name {:?} is not a valid identifier",
                class.name
            )));
        }
        if !names.insert(class.name.as_str()) {
            return Err(ExportError::invalid_request(format!(
                "duplicate class name {:?}",
                class.name
            )));
        }

        let mut attributes = HashSet::new();
        for attribute in &class.attributes {
            if !is_valid_identifier(&attribute.name) {
                return Err(ExportError::invalid_request(format!(
                    "attribute {:?} of {} is not a valid identifier",
                    attribute.name, class.name
                )));
            }
            if !attributes.insert(attribute.name.as_str()) {
                return Err(ExportError::invalid_request(format!(
                    "attribute {:?} is declared twice on {}",
                    attribute.name, class.name
                )));
            }
        }
    }
    Ok(())
}
