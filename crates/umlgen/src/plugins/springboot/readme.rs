//! Server README with the endpoint catalogue

use std::fmt::Write as _;

use serde_json::{Map, Value};

use super::controller::api_route;
use crate::analysis::{ClassShape, PrimaryKey, ProjectModel};

/// Example key value; generated keys count up from `n`
fn example_key(key: &PrimaryKey<'_>, n: u64) -> Value {
    if key.is_generated() {
        Value::from(n)
    } else {
        key.semantic.example_value()
    }
}

/// Request body example: instance scalars then foreign-key ids
pub fn example_request(shape: &ClassShape<'_>) -> Map<String, Value> {
    let mut body = Map::new();
    for scalar in shape.instance_scalars() {
        body.insert(scalar.name().to_string(), scalar.semantic.example_value());
    }
    for fk in &shape.foreign_keys {
        let value = if fk.key.is_integral() {
            Value::from(1)
        } else {
            fk.key.example_value()
        };
        body.insert(fk.id_field.clone(), value);
    }
    body
}

/// Response body example: the key first, then the request fields
pub fn example_response(shape: &ClassShape<'_>, n: u64) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert(shape.primary_key.name.clone(), example_key(&shape.primary_key, n));
    body.extend(example_request(shape));
    body
}

fn json_block(out: &mut String, value: &Value) {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    let _ = writeln!(out, "```json\n{}\n```\n", text);
}

fn http_block(out: &mut String, request_line: &str, body: Option<&Value>) {
    out.push_str("```http\n");
    out.push_str(request_line);
    out.push('\n');
    if let Some(body) = body {
        out.push_str("Content-Type: application/json\n\n");
        out.push_str(&serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string()));
        out.push('\n');
    }
    out.push_str("```\n\n");
}

fn resource_section(out: &mut String, shape: &ClassShape<'_>, base_url: &str) {
    let name = shape.name();
    let url = format!("{}{}", base_url, api_route(shape));
    let key_example = match example_key(&shape.primary_key, 1) {
        Value::String(s) => s,
        other => other.to_string(),
    };
    let item_url = format!("{}/{}", url, key_example);
    let request = Value::Object(example_request(shape));
    let response = Value::Object(example_response(shape, 1));

    let _ = writeln!(out, "### {}\n", name);
    if !shape.mode.can_write() {
        let _ = writeln!(out, "_Abstract type: read and delete only._\n");
    }

    let _ = writeln!(out, "#### List all");
    http_block(out, &format!("GET {}", url), None);
    out.push_str("**200 OK**\n");
    json_block(out, &Value::Array(vec![response.clone()]));

    let _ = writeln!(out, "#### Get by id");
    http_block(out, &format!("GET {}", item_url), None);
    out.push_str("**200 OK**\n");
    json_block(out, &response);
    out.push_str("**404 Not Found** when the id does not exist.\n\n");

    if shape.mode.can_write() {
        let _ = writeln!(out, "#### Create");
        http_block(out, &format!("POST {}", url), Some(&request));
        out.push_str("**201 Created**\n");
        json_block(out, &Value::Object(example_response(shape, 2)));

        let _ = writeln!(out, "#### Update");
        http_block(out, &format!("PUT {}", item_url), Some(&request));
        out.push_str("**200 OK**\n");
        json_block(out, &response);
        out.push_str("**404 Not Found** when the id does not exist.\n\n");
    }

    let _ = writeln!(out, "#### Delete");
    http_block(out, &format!("DELETE {}", item_url), None);
    out.push_str("**204 No Content**, or **404 Not Found** when the id does not exist.\n\n");
    out.push_str("---\n\n");
}

pub fn readme(model: &ProjectModel<'_>, version: &str) -> String {
    let settings = &model.settings;
    let config = &settings.config;
    let base_url = format!("http://localhost:{}", config.server_port);
    let mut out = String::new();

    let _ = writeln!(out, "# {} API\n", settings.project_name);
    let _ = writeln!(
        out,
        "Spring Boot project generated from a UML class diagram by umlgen {}.\n",
        version
    );
    let _ = writeln!(out, "**Base package:** `{}`\n", settings.root_package());

    out.push_str("## Requirements\n\n");
    let _ = writeln!(out, "- Java {} or newer", config.java_version);
    out.push_str("- Maven 3.6+\n- PostgreSQL 15 (or `docker compose up`)\n\n");

    out.push_str("## Running\n\n```bash\nmvn clean install\nmvn spring-boot:run\n```\n\n");
    let _ = writeln!(out, "The API listens on **{}**.", base_url);
    let _ = writeln!(out, "Swagger UI: {}/swagger-ui.html\n", base_url);
    out.push_str("With Docker:\n\n```bash\nmvn clean package\ndocker compose up --build\n```\n\n");

    out.push_str("---\n\n## Endpoints\n\n");
    let _ = writeln!(out, "Base URL: `{}`\n", base_url);
    out.push_str("Request and response bodies are DTOs; relations travel as flat `<field>Id` values.\n\n");
    for shape in model.api_shapes() {
        resource_section(&mut out, shape, &base_url);
    }

    out.push_str("## Notes\n\n");
    out.push_str("- All endpoints consume and produce JSON.\n");
    out.push_str("- Numeric ids are generated by the database; ids sent on create are ignored.\n");
    match config.foreign_key_policy {
        crate::core::ForeignKeyPolicy::Ignore => {
            out.push_str("- A relation id that does not exist is ignored and the relation is left empty.\n")
        }
        crate::core::ForeignKeyPolicy::Reject => {
            out.push_str("- A relation id that does not exist is rejected with 404 Not Found.\n")
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Diagnostics, Diagram, GeneratorConfig, ProjectSettings, RelationKind, UmlAttribute,
        UmlClass, UmlRelation,
    };

    fn diagram() -> Diagram {
        Diagram::new()
            .with_class(UmlClass::new("c", "Customer").with_attribute(UmlAttribute::new("name", "string")))
            .with_class(
                UmlClass::new("o", "Order")
                    .with_attribute(UmlAttribute::new("id", "Long"))
                    .with_attribute(UmlAttribute::new("placed", "Date"))
                    .with_attribute(UmlAttribute::new("paid", "boolean")),
            )
            .with_class(UmlClass::new("n", "Named").interface())
            .with_relation(
                UmlRelation::new("r", "c", "o", RelationKind::Association).with_multiplicity("1", "*"),
            )
    }

    #[test]
    fn test_example_bodies_follow_types_and_order() {
        let d = diagram();
        let settings = ProjectSettings::new("shop", "com.example", GeneratorConfig::default());
        let mut diagnostics = Diagnostics::new();
        let model = ProjectModel::build(&d, settings, &mut diagnostics);
        let order = model.shape("o").unwrap();

        let request = example_request(order);
        let keys: Vec<_> = request.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["placed", "paid", "customerId"]);
        assert_eq!(request["placed"], "2024-01-01");
        assert_eq!(request["paid"], true);

        let response = example_response(order, 1);
        assert_eq!(response.keys().next().map(String::as_str), Some("id"));
        assert_eq!(response["id"], 1);
    }

    #[test]
    fn test_catalogue_lists_api_classes_only() {
        let d = diagram();
        let settings = ProjectSettings::new("shop", "com.example", GeneratorConfig::default());
        let mut diagnostics = Diagnostics::new();
        let model = ProjectModel::build(&d, settings, &mut diagnostics);
        let text = readme(&model, "0.1.0");
        assert!(text.contains("GET http://localhost:8080/api/orders\n"));
        assert!(text.contains("DELETE http://localhost:8080/api/customers/1\n"));
        assert!(text.contains("**201 Created**"));
        assert!(!text.contains("### Named"));
        assert_eq!(text.matches("#### Create").count(), 2);
    }
}
