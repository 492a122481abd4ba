//! Dart model class builder
//!
//! A [`DartModel`] mirrors the server DTO field for field: the key, every
//! instance scalar and one id per owning to-one relation. The same field
//! list drives the rendered `fromJson`/`toJson` pair and the reference codec
//! in [`super::codec`], so both encode each field by its [`WireKind`].

use crate::analysis::ClassShape;
use crate::core::{CodeWriter, SemanticType, WireKind};

/// Where a model field comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Key,
    Scalar,
    ForeignKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DartField {
    pub name: String,
    pub semantic: SemanticType,
    pub role: FieldRole,
    /// Declared nullable; only affects form validation
    pub optional: bool,
}

impl DartField {
    pub fn dart_type(&self) -> &str {
        self.semantic.dart_type()
    }

    pub fn wire(&self) -> WireKind {
        self.semantic.wire_kind()
    }

    fn decode_expr(&self) -> String {
        let key = &self.name;
        match self.wire() {
            WireKind::Int => format!("json['{}'] as int?", key),
            WireKind::Double => format!("(json['{}'] as num?)?.toDouble()", key),
            WireKind::Bool => format!("json['{}'] as bool?", key),
            WireKind::String => format!("json['{}'] as String?", key),
            WireKind::DateTime => format!(
                "json['{key}'] != null ? DateTime.parse(json['{key}'] as String) : null"
            ),
            WireKind::Passthrough => format!("json['{}']", key),
        }
    }

    fn encode_expr(&self) -> String {
        match self.wire() {
            WireKind::DateTime => format!("{}?.toIso8601String()", self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DartModel {
    pub class_name: String,
    pub fields: Vec<DartField>,
}

impl DartModel {
    pub fn from_shape(shape: &ClassShape<'_>) -> Self {
        let key = &shape.primary_key;
        let mut fields = vec![DartField {
            name: key.name.clone(),
            semantic: key.semantic.clone(),
            role: FieldRole::Key,
            optional: true,
        }];
        fields.extend(shape.instance_scalars().map(|scalar| DartField {
            name: scalar.name().to_string(),
            semantic: scalar.semantic.clone(),
            role: FieldRole::Scalar,
            optional: scalar.attribute.is_nullable == Some(true),
        }));
        fields.extend(shape.foreign_keys.iter().map(|fk| DartField {
            name: fk.id_field.clone(),
            semantic: fk.key.clone(),
            role: FieldRole::ForeignKey,
            optional: false,
        }));
        Self {
            class_name: shape.name().to_string(),
            fields,
        }
    }

    pub fn key(&self) -> &DartField {
        &self.fields[0]
    }

    pub fn scalars(&self) -> impl Iterator<Item = &DartField> {
        self.fields.iter().filter(|f| f.role == FieldRole::Scalar)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &DartField> {
        self.fields.iter().filter(|f| f.role == FieldRole::ForeignKey)
    }

    pub fn render(&self) -> String {
        let name = &self.class_name;
        let mut w = CodeWriter::dart();

        w.open(format!("class {} {{", name));
        for field in &self.fields {
            w.line(format!("{}? {};", field.dart_type(), field.name));
        }
        w.blank();

        w.open(format!("{}({{", name));
        for field in &self.fields {
            w.line(format!("this.{},", field.name));
        }
        w.close("});");
        w.blank();

        w.open(format!(
            "factory {}.fromJson(Map<String, dynamic> json) {{",
            name
        ));
        w.open(format!("return {}(", name));
        for field in &self.fields {
            w.line(format!("{}: {},", field.name, field.decode_expr()));
        }
        w.close(");");
        w.close("}");
        w.blank();

        w.open("Map<String, dynamic> toJson() {");
        w.open("return {");
        for field in &self.fields {
            w.line(format!("'{}': {},", field.name, field.encode_expr()));
        }
        w.close("};");
        w.close("}");
        w.blank();

        w.line("@override");
        w.open("String toString() {");
        w.line(format!("return '{} #${}';", name, self.key().name));
        w.close("}");
        w.close("}");
        w.finish()
    }
}
