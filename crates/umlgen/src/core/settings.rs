//! Per-export project identity shared by all emitters

use super::config::GeneratorConfig;
use super::naming::{capitalize, dart_package_name, java_package_segment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    /// Name as the user typed it; used in titles and documentation
    pub project_name: String,
    pub base_package: String,
    /// Server URL the client talks to
    pub base_url: String,
    pub config: GeneratorConfig,
}

impl ProjectSettings {
    pub fn new(
        project_name: impl Into<String>,
        base_package: impl Into<String>,
        config: GeneratorConfig,
    ) -> Self {
        let base_url = config.default_base_url();
        Self {
            project_name: project_name.into(),
            base_package: base_package.into(),
            base_url,
            config,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Project segment of the Java package, e.g. `myshop`
    pub fn java_segment(&self) -> String {
        java_package_segment(&self.project_name)
    }

    /// `<basePackage>.<segment>`
    pub fn root_package(&self) -> String {
        format!("{}.{}", self.base_package, self.java_segment())
    }

    /// `src/main/java/<basePackage as path>/<segment>`
    pub fn java_source_root(&self) -> String {
        format!(
            "src/main/java/{}/{}",
            self.base_package.replace('.', "/"),
            self.java_segment()
        )
    }

    pub fn application_class(&self) -> String {
        format!("{}Application", capitalize(&self.java_segment()))
    }

    pub fn database_name(&self) -> String {
        format!("{}{}", self.java_segment(), self.config.database_suffix)
    }

    pub fn dart_package(&self) -> String {
        dart_package_name(&self.project_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_names() {
        let settings = ProjectSettings::new("My Shop", "com.example", GeneratorConfig::default());
        assert_eq!(settings.java_segment(), "myshop");
        assert_eq!(settings.root_package(), "com.example.myshop");
        assert_eq!(settings.java_source_root(), "src/main/java/com/example/myshop");
        assert_eq!(settings.application_class(), "MyshopApplication");
        assert_eq!(settings.database_name(), "myshop_db");
        assert_eq!(settings.dart_package(), "my_shop");
        assert_eq!(settings.base_url, "http://localhost:8080");
    }
}
