//! HTTP service per model, one method per REST operation

use crate::analysis::ClassShape;
use crate::core::CodeWriter;

/// `OrderService`
pub fn client_service_name(shape: &ClassShape<'_>) -> String {
    format!("{}Service", shape.name())
}

/// Dart expression for the collection URL
fn collection_url(shape: &ClassShape<'_>) -> String {
    format!("Uri.parse('${{ApiConfig.baseUrl}}/api/{}')", shape.route())
}

/// Dart expression for the item URL of `id`
fn item_url(shape: &ClassShape<'_>) -> String {
    format!(
        "Uri.parse('${{ApiConfig.baseUrl}}/api/{}/${{Uri.encodeComponent(id.toString())}}')",
        shape.route()
    )
}

fn request(w: &mut CodeWriter, verb: &str, url: &str, body: Option<&str>) {
    w.open(format!("final response = await http.{}(", verb));
    w.line(format!("{},", url));
    w.line("headers: ApiConfig.headers,");
    if let Some(body) = body {
        w.line(format!("body: jsonEncode({}.toJson()),", body));
    }
    w.close(").timeout(const Duration(seconds: ApiConfig.timeoutSeconds));");
    w.blank();
}

fn check(w: &mut CodeWriter, condition: &str, success: &str, failure: &str) {
    w.open(format!("if ({}) {{", condition));
    w.line(success);
    w.close("} else {");
    w.indent();
    w.line(format!("throw Exception('{} (${{response.statusCode}})');", failure));
    w.close("}");
}

pub fn client_service(shape: &ClassShape<'_>) -> String {
    let name = shape.name();
    let var = shape.var_name();
    let key = shape.primary_key.dart_type();
    let snake = shape.snake_name();
    let mut w = CodeWriter::dart();

    w.line("import 'dart:convert';");
    w.blank();
    w.line("import 'package:http/http.dart' as http;");
    w.blank();
    w.line("import '../config/api_config.dart';");
    w.line(format!("import '../models/{}.dart';", snake));
    w.blank();

    w.open(format!("class {} {{", client_service_name(shape)));

    w.open(format!("Future<List<{}>> getAll() async {{", name));
    request(&mut w, "get", &collection_url(shape), None);
    w.open("if (response.statusCode == 200) {");
    w.line("final List<dynamic> body = jsonDecode(response.body);");
    w.line(format!(
        "return body.map((e) => {}.fromJson(e as Map<String, dynamic>)).toList();",
        name
    ));
    w.close("}");
    w.line(format!(
        "throw Exception('Failed to load {} (${{response.statusCode}})');",
        shape.route()
    ));
    w.close("}");
    w.blank();

    w.open(format!("Future<{}> getById({} id) async {{", name, key));
    request(&mut w, "get", &item_url(shape), None);
    check(
        &mut w,
        "response.statusCode == 200",
        &format!("return {}.fromJson(jsonDecode(response.body));", name),
        &format!("Failed to load {}", var),
    );
    w.close("}");
    w.blank();

    if shape.mode.can_write() {
        w.open(format!("Future<{}> create({} {}) async {{", name, name, var));
        request(&mut w, "post", &collection_url(shape), Some(&var));
        check(
            &mut w,
            "response.statusCode == 200 || response.statusCode == 201",
            &format!("return {}.fromJson(jsonDecode(response.body));", name),
            &format!("Failed to create {}", var),
        );
        w.close("}");
        w.blank();

        w.open(format!(
            "Future<{}> update({} id, {} {}) async {{",
            name, key, name, var
        ));
        request(&mut w, "put", &item_url(shape), Some(&var));
        check(
            &mut w,
            "response.statusCode == 200",
            &format!("return {}.fromJson(jsonDecode(response.body));", name),
            &format!("Failed to update {}", var),
        );
        w.close("}");
        w.blank();
    }

    w.open(format!("Future<void> delete({} id) async {{", key));
    request(&mut w, "delete", &item_url(shape), None);
    w.open("if (response.statusCode != 204 && response.statusCode != 200) {");
    w.line(format!(
        "throw Exception('Failed to delete {} (${{response.statusCode}})');",
        var
    ));
    w.close("}");
    w.close("}");

    w.close("}");
    w.finish()
}
