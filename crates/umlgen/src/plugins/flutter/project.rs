//! Package manifest, API configuration, entry point and README of the client

use std::fmt::Write as _;

use super::screens::list_screen_name;
use crate::analysis::{ClassShape, ProjectModel};
use crate::core::naming::{escape_dart, pluralize};
use crate::core::{ClassKind, CodeWriter, ProjectSettings};

pub const TIMEOUT_SECONDS: u32 = 30;

pub fn pubspec(settings: &ProjectSettings) -> String {
    format!(
        r#"name: {name}
description: Flutter app generated from a UML class diagram
publish_to: 'none'
version: 1.0.0+1

environment:
  sdk: '>=3.0.0 <4.0.0'

dependencies:
  flutter:
    sdk: flutter
  http: ^1.1.0

dev_dependencies:
  flutter_test:
    sdk: flutter
  flutter_lints: ^3.0.0

flutter:
  uses-material-design: true
"#,
        name = settings.dart_package()
    )
}

pub fn api_config(settings: &ProjectSettings) -> String {
    let mut w = CodeWriter::dart();
    w.open("class ApiConfig {");
    w.line(format!(
        "static const String baseUrl = '{}';",
        escape_dart(settings.base_url.trim_end_matches('/'))
    ));
    w.line(format!("static const int timeoutSeconds = {};", TIMEOUT_SECONDS));
    w.blank();
    w.open("static const Map<String, String> headers = {");
    w.line("'Content-Type': 'application/json',");
    w.line("'Accept': 'application/json',");
    w.close("};");
    w.close("}");
    w.finish()
}

/// Classes listed on the home menu; association classes are reached
/// through their endpoints
pub fn menu_shapes<'a, 'd>(model: &'a ProjectModel<'d>) -> impl Iterator<Item = &'a ClassShape<'d>> {
    model
        .api_shapes()
        .filter(|s| s.kind != ClassKind::AssociationClass)
}

pub fn main_dart(model: &ProjectModel<'_>) -> String {
    let title = escape_dart(&model.settings.project_name);
    let mut w = CodeWriter::dart();

    w.line("import 'package:flutter/material.dart';");
    w.blank();
    for shape in menu_shapes(model) {
        w.line(format!("import 'screens/{}_list_screen.dart';", shape.snake_name()));
    }
    w.blank();

    w.open("void main() {");
    w.line("runApp(const App());");
    w.close("}");
    w.blank();

    w.open("class App extends StatelessWidget {");
    w.line("const App({super.key});");
    w.blank();
    w.line("@override");
    w.open("Widget build(BuildContext context) {");
    w.open("return MaterialApp(");
    w.line(format!("title: '{}',", title));
    w.open("theme: ThemeData(");
    w.line("colorScheme: ColorScheme.fromSeed(seedColor: Colors.deepPurple),");
    w.line("useMaterial3: true,");
    w.close("),");
    w.line(format!("home: const HomePage(title: '{}'),", title));
    w.close(");");
    w.close("}");
    w.close("}");
    w.blank();

    w.open("class _MenuItem {");
    w.line("final String name;");
    w.line("final WidgetBuilder builder;");
    w.blank();
    w.line("const _MenuItem(this.name, this.builder);");
    w.close("}");
    w.blank();

    w.open("class HomePage extends StatelessWidget {");
    w.line("const HomePage({super.key, required this.title});");
    w.blank();
    w.line("final String title;");
    w.blank();
    w.open("static final List<_MenuItem> menuItems = [");
    for shape in menu_shapes(model) {
        w.line(format!(
            "_MenuItem('{}', (context) => const {}()),",
            pluralize(shape.name()),
            list_screen_name(shape)
        ));
    }
    w.close("];");
    w.blank();
    w.line("@override");
    w.open("Widget build(BuildContext context) {");
    w.open("return Scaffold(");
    w.open("appBar: AppBar(");
    w.line("backgroundColor: Theme.of(context).colorScheme.inversePrimary,");
    w.line("title: Text(title),");
    w.close("),");
    w.open("body: menuItems.isEmpty");
    w.line("? const Center(child: Text('No entities to display'))");
    w.open(": ListView.builder(");
    w.line("itemCount: menuItems.length,");
    w.open("itemBuilder: (context, index) {");
    w.line("final item = menuItems[index];");
    w.open("return Card(");
    w.line("margin: const EdgeInsets.all(8),");
    w.open("child: ListTile(");
    w.line("title: Text(item.name),");
    w.line("subtitle: const Text('Tap to view'),");
    w.line("trailing: const Icon(Icons.arrow_forward),");
    w.line("onTap: () => Navigator.push(context, MaterialPageRoute(builder: item.builder)),");
    w.close("),");
    w.close(");");
    w.close("},");
    w.close("),");
    w.dedent();
    w.close(");");
    w.close("}");
    w.close("}");
    w.finish()
}

pub fn readme(model: &ProjectModel<'_>, version: &str) -> String {
    let settings = &model.settings;
    let mut out = String::new();
    let _ = writeln!(out, "# {} (Flutter client)\n", settings.project_name);
    let _ = writeln!(
        out,
        "Flutter client generated from a UML class diagram by umlgen {}.\n",
        version
    );
    out.push_str("## Running\n\n```bash\nflutter pub get\nflutter run\n```\n\n");
    let _ = writeln!(
        out,
        "The app talks to `{}`; change `lib/config/api_config.dart` to point it elsewhere.",
        settings.base_url
    );
    let _ = writeln!(
        out,
        "Requests time out after {} seconds.\n",
        TIMEOUT_SECONDS
    );

    out.push_str("## Layout\n\n");
    out.push_str("- `lib/models/`: one model per class, mirroring the server DTOs\n");
    out.push_str("- `lib/services/`: one HTTP service per class\n");
    out.push_str("- `lib/screens/`: list, detail and form screens\n\n");

    out.push_str("## Resources\n\n");
    for shape in model.api_shapes() {
        let access = if shape.mode.can_write() {
            "read and write"
        } else {
            "read and delete"
        };
        let _ = writeln!(
            out,
            "- **{}**: `/api/{}` ({})",
            shape.name(),
            shape.route(),
            access
        );
    }
    out
}
