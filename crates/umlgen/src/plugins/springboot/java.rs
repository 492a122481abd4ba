//! Java compilation-unit model
//!
//! Artifact builders assemble a [`JavaFile`] from declarations, fields,
//! annotations and statement blocks; [`JavaFile::render`] is the only place
//! that decides layout. Imports are kept in a sorted set so the output does
//! not depend on the order builders register them.

use std::collections::BTreeSet;

use crate::core::CodeWriter;

/// Annotations longer than this are split one argument per line
const MAX_INLINE_ANNOTATION: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    name: String,
    args: Vec<String>,
}

impl Annotation {
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn inline(&self) -> String {
        if self.args.is_empty() {
            format!("@{}", self.name)
        } else {
            format!("@{}({})", self.name, self.args.join(", "))
        }
    }

    fn render(&self, w: &mut CodeWriter) {
        let inline = self.inline();
        if inline.len() <= MAX_INLINE_ANNOTATION || self.args.len() < 2 {
            w.line(inline);
            return;
        }
        w.open(format!("@{}(", self.name));
        let last = self.args.len() - 1;
        for (i, arg) in self.args.iter().enumerate() {
            if i == last {
                w.line(arg);
            } else {
                w.line(format!("{},", arg));
            }
        }
        w.close(")");
    }
}

/// Statement inside a method body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Line(String),
    Blank,
    /// `header {` ... `footer`
    Block {
        header: String,
        body: Vec<Statement>,
        footer: String,
    },
}

impl Statement {
    pub fn line(text: impl Into<String>) -> Self {
        Statement::Line(text.into())
    }

    /// `if (condition) { body }`
    pub fn when(condition: impl AsRef<str>, body: Vec<Statement>) -> Self {
        Statement::Block {
            header: format!("if ({}) {{", condition.as_ref()),
            body,
            footer: "}".to_string(),
        }
    }

    fn render(&self, w: &mut CodeWriter) {
        match self {
            Statement::Line(text) => {
                w.line(text);
            }
            Statement::Blank => {
                w.blank();
            }
            Statement::Block {
                header,
                body,
                footer,
            } => {
                w.open(header);
                for statement in body {
                    statement.render(w);
                }
                w.close(footer);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub annotations: Vec<Annotation>,
    /// `private`, `private static`, or empty for package-private
    pub modifiers: String,
    pub ty: String,
    pub name: String,
    pub initializer: Option<String>,
}

impl Field {
    pub fn private(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers: "private".to_string(),
            ty: ty.into(),
            name: name.into(),
            initializer: None,
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_modifiers(mut self, modifiers: impl Into<String>) -> Self {
        self.modifiers = modifiers.into();
        self
    }

    pub fn initialized(mut self, value: impl Into<String>) -> Self {
        self.initializer = Some(value.into());
        self
    }

    fn render(&self, w: &mut CodeWriter) {
        for annotation in &self.annotations {
            annotation.render(w);
        }
        let mut decl = String::new();
        if !self.modifiers.is_empty() {
            decl.push_str(&self.modifiers);
            decl.push(' ');
        }
        decl.push_str(&self.ty);
        decl.push(' ');
        decl.push_str(&self.name);
        if let Some(init) = &self.initializer {
            decl.push_str(" = ");
            decl.push_str(init);
        }
        decl.push(';');
        w.line(decl);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub annotations: Vec<Annotation>,
    /// Everything before the body, e.g. `public List<Order> findAll()`
    pub signature: String,
    /// `None` for a bodiless declaration ending in `;`
    pub body: Option<Vec<Statement>>,
}

impl Method {
    pub fn new(signature: impl Into<String>, body: Vec<Statement>) -> Self {
        Self {
            annotations: Vec::new(),
            signature: signature.into(),
            body: Some(body),
        }
    }

    pub fn declaration(signature: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            signature: signature.into(),
            body: None,
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    fn render(&self, w: &mut CodeWriter) {
        for annotation in &self.annotations {
            annotation.render(w);
        }
        match &self.body {
            None => {
                w.line(format!("{};", self.signature));
            }
            Some(body) => {
                w.open(format!("{} {{", self.signature));
                for statement in body {
                    statement.render(w);
                }
                w.close("}");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(Field),
    Method(Method),
}

impl Member {
    fn is_bare_field(&self) -> bool {
        matches!(self, Member::Field(f) if f.annotations.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    AbstractClass,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub annotations: Vec<Annotation>,
    pub kind: TypeKind,
    pub name: String,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub members: Vec<Member>,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            kind,
            name: name.into(),
            extends: Vec::new(),
            implements: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn extending(mut self, name: impl Into<String>) -> Self {
        self.extends.push(name.into());
        self
    }

    pub fn implementing(mut self, name: impl Into<String>) -> Self {
        self.implements.push(name.into());
        self
    }

    pub fn field(&mut self, field: Field) -> &mut Self {
        self.members.push(Member::Field(field));
        self
    }

    pub fn method(&mut self, method: Method) -> &mut Self {
        self.members.push(Member::Method(method));
        self
    }

    fn header(&self) -> String {
        let mut header = match self.kind {
            TypeKind::Class => format!("public class {}", self.name),
            TypeKind::AbstractClass => format!("public abstract class {}", self.name),
            TypeKind::Interface => format!("public interface {}", self.name),
        };
        if !self.extends.is_empty() {
            header.push_str(" extends ");
            header.push_str(&self.extends.join(", "));
        }
        if !self.implements.is_empty() {
            header.push_str(" implements ");
            header.push_str(&self.implements.join(", "));
        }
        header.push_str(" {");
        header
    }

    fn render(&self, w: &mut CodeWriter) {
        for annotation in &self.annotations {
            annotation.render(w);
        }
        w.open(self.header());
        let mut previous: Option<&Member> = None;
        for member in &self.members {
            // consecutive plain fields stay together
            let tight = previous.is_some_and(Member::is_bare_field) && member.is_bare_field();
            if !tight {
                w.blank();
            }
            match member {
                Member::Field(field) => field.render(w),
                Member::Method(method) => method.render(w),
            }
            previous = Some(member);
        }
        w.close("}");
    }
}

/// One `.java` compilation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaFile {
    pub package: String,
    imports: BTreeSet<String>,
    pub decl: TypeDecl,
}

impl JavaFile {
    pub fn new(package: impl Into<String>, decl: TypeDecl) -> Self {
        Self {
            package: package.into(),
            imports: BTreeSet::new(),
            decl,
        }
    }

    pub fn import(&mut self, path: impl Into<String>) -> &mut Self {
        self.imports.insert(path.into());
        self
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn render(&self) -> String {
        let mut w = CodeWriter::java();
        w.line(format!("package {};", self.package));
        w.blank();
        if !self.imports.is_empty() {
            for import in &self.imports {
                w.line(format!("import {};", import));
            }
            w.blank();
        }
        self.decl.render(&mut w);
        w.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_class_with_members() {
        let mut decl = TypeDecl::new(TypeKind::Class, "Order")
            .annotated(Annotation::marker("Entity"))
            .extending("Base");
        decl.field(Field::private("Long", "id").annotated(Annotation::marker("Id")));
        decl.field(Field::private("String", "code"));
        decl.field(Field::private("Double", "total"));
        decl.method(Method::new(
            "public void touch()",
            vec![Statement::when("code == null", vec![Statement::line("code = \"x\";")])],
        ));
        let mut file = JavaFile::new("com.example.shop.entity", decl);
        file.import("lombok.Getter");
        file.import("jakarta.persistence.*");

        let text = file.render();
        let expected = "\
package com.example.shop.entity;

import jakarta.persistence.*;
import lombok.Getter;

@Entity
public class Order extends Base {

    @Id
    private Long id;

    private String code;
    private Double total;

    public void touch() {
        if (code == null) {
            code = \"x\";
        }
    }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_long_annotation_splits_arguments() {
        let annotation = Annotation::marker("JoinTable").args([
            "name = \"students_course_with_a_long_name\"",
            "joinColumns = @JoinColumn(name = \"course_id\")",
            "inverseJoinColumns = @JoinColumn(name = \"student_id\")",
        ]);
        let mut w = CodeWriter::java();
        annotation.render(&mut w);
        let text = w.finish();
        assert!(text.starts_with("@JoinTable(\n    name = "));
        assert!(text.ends_with("\"student_id\")\n)\n"));
    }

    #[test]
    fn test_empty_interface() {
        let file = JavaFile::new(
            "com.example.shop.entity",
            TypeDecl::new(TypeKind::Interface, "Named"),
        );
        assert_eq!(
            file.render(),
            "package com.example.shop.entity;\n\npublic interface Named {\n}\n"
        );
    }
}
