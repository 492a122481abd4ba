//! Semantic attribute types
//!
//! Diagram attributes carry a loose type name (`string`, `Integer`, `Date`).
//! [`SemanticType`] normalises those names once so the server and client
//! emitters agree on the Java type, the Dart type, the wire encoding and the
//! example value shown in generated documentation.

use std::fmt;

/// Normalised attribute type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    String,
    Integer,
    Long,
    Double,
    Float,
    Boolean,
    Date,
    LocalDate,
    LocalDateTime,
    BigDecimal,
    /// Anything outside the table; passed through verbatim
    Other(String),
}

/// How a client model field travels over JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    Int,
    Double,
    Bool,
    String,
    /// ISO-8601 string on the wire, `DateTime` in the model
    DateTime,
    /// Unknown type, copied without conversion
    Passthrough,
}

impl SemanticType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "string" | "String" => SemanticType::String,
            "int" | "Integer" => SemanticType::Integer,
            "long" | "Long" => SemanticType::Long,
            "double" | "Double" => SemanticType::Double,
            "float" | "Float" => SemanticType::Float,
            "boolean" | "Boolean" => SemanticType::Boolean,
            "Date" => SemanticType::Date,
            "LocalDate" => SemanticType::LocalDate,
            "LocalDateTime" => SemanticType::LocalDateTime,
            "BigDecimal" => SemanticType::BigDecimal,
            other => SemanticType::Other(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SemanticType::Other(_))
    }

    /// Boxed Java type, usable as a generic argument
    pub fn java_type(&self) -> &str {
        match self {
            SemanticType::String => "String",
            SemanticType::Integer => "Integer",
            SemanticType::Long => "Long",
            SemanticType::Double => "Double",
            SemanticType::Float => "Float",
            SemanticType::Boolean => "Boolean",
            SemanticType::Date => "Date",
            SemanticType::LocalDate => "LocalDate",
            SemanticType::LocalDateTime => "LocalDateTime",
            SemanticType::BigDecimal => "BigDecimal",
            SemanticType::Other(raw) => raw,
        }
    }

    /// Import a Java compilation unit needs for this type
    pub fn java_import(&self) -> Option<&'static str> {
        match self {
            SemanticType::Date => Some("java.util.Date"),
            SemanticType::LocalDate => Some("java.time.LocalDate"),
            SemanticType::LocalDateTime => Some("java.time.LocalDateTime"),
            SemanticType::BigDecimal => Some("java.math.BigDecimal"),
            _ => None,
        }
    }

    pub fn dart_type(&self) -> &str {
        match self {
            SemanticType::String => "String",
            SemanticType::Integer | SemanticType::Long => "int",
            SemanticType::Double | SemanticType::Float | SemanticType::BigDecimal => "double",
            SemanticType::Boolean => "bool",
            SemanticType::Date | SemanticType::LocalDate | SemanticType::LocalDateTime => {
                "DateTime"
            }
            SemanticType::Other(raw) => raw,
        }
    }

    pub fn wire_kind(&self) -> WireKind {
        match self {
            SemanticType::String => WireKind::String,
            SemanticType::Integer | SemanticType::Long => WireKind::Int,
            SemanticType::Double | SemanticType::Float | SemanticType::BigDecimal => {
                WireKind::Double
            }
            SemanticType::Boolean => WireKind::Bool,
            SemanticType::Date | SemanticType::LocalDate | SemanticType::LocalDateTime => {
                WireKind::DateTime
            }
            SemanticType::Other(_) => WireKind::Passthrough,
        }
    }

    /// Whether a key of this type can be database-generated
    pub fn is_integral(&self) -> bool {
        matches!(self, SemanticType::Integer | SemanticType::Long)
    }

    /// Literal example used in generated API documentation
    pub fn example_value(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            SemanticType::String => json!("example"),
            SemanticType::Integer => json!(100),
            SemanticType::Long => json!(1000),
            SemanticType::Double | SemanticType::BigDecimal => json!(99.99),
            SemanticType::Float => json!(9.99),
            SemanticType::Boolean => json!(true),
            SemanticType::Date | SemanticType::LocalDate => json!("2024-01-01"),
            SemanticType::LocalDateTime => json!("2024-01-01T10:00:00"),
            SemanticType::Other(_) => json!("value"),
        }
    }

    /// The synthesized primary key type
    pub fn default_key() -> Self {
        SemanticType::Long
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.java_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_mapping() {
        assert_eq!(SemanticType::parse("string").java_type(), "String");
        assert_eq!(SemanticType::parse("int").java_type(), "Integer");
        assert_eq!(SemanticType::parse("boolean").java_type(), "Boolean");
        assert_eq!(SemanticType::parse("Money").java_type(), "Money");
    }

    #[test]
    fn test_dart_mapping() {
        assert_eq!(SemanticType::parse("Long").dart_type(), "int");
        assert_eq!(SemanticType::parse("BigDecimal").dart_type(), "double");
        assert_eq!(SemanticType::parse("LocalDateTime").dart_type(), "DateTime");
        assert_eq!(SemanticType::parse("Money").dart_type(), "Money");
    }

    #[test]
    fn test_imports_only_for_library_types() {
        assert_eq!(SemanticType::Date.java_import(), Some("java.util.Date"));
        assert_eq!(
            SemanticType::BigDecimal.java_import(),
            Some("java.math.BigDecimal")
        );
        assert_eq!(SemanticType::String.java_import(), None);
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let t = SemanticType::parse("GeoPoint");
        assert!(!t.is_known());
        assert_eq!(t.wire_kind(), WireKind::Passthrough);
        assert_eq!(t.example_value(), serde_json::json!("value"));
    }

    #[test]
    fn test_example_values() {
        assert_eq!(SemanticType::parse("string").example_value(), "example");
        assert_eq!(SemanticType::parse("Date").example_value(), "2024-01-01");
        assert_eq!(SemanticType::parse("int").example_value(), 100);
    }
}
