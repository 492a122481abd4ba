//! List, detail and form screens
//!
//! Screens only call the model's own service, plus the `getAll` of each
//! foreign-key target to fill the form's selectors. Read-only classes get no
//! form and no create or edit entry points.

use super::model::{DartField, DartModel};
use super::service::client_service_name;
use crate::analysis::{ClassShape, ForeignKey};
use crate::core::naming::{capitalize, to_snake_case};
use crate::core::{CodeWriter, WireKind};

pub fn list_screen_name(shape: &ClassShape<'_>) -> String {
    format!("{}ListScreen", shape.name())
}

pub fn detail_screen_name(shape: &ClassShape<'_>) -> String {
    format!("{}DetailScreen", shape.name())
}

pub fn form_screen_name(shape: &ClassShape<'_>) -> String {
    format!("{}FormScreen", shape.name())
}

fn header(w: &mut CodeWriter, shape: &ClassShape<'_>, siblings: &[&str]) {
    let snake = shape.snake_name();
    w.line("import 'package:flutter/material.dart';");
    w.blank();
    w.line(format!("import '../models/{}.dart';", snake));
    w.line(format!("import '../services/{}_service.dart';", snake));
    for sibling in siblings {
        w.line(format!("import '{}_{}_screen.dart';", snake, sibling));
    }
    w.blank();
}

fn stateful_widget(w: &mut CodeWriter, widget: &str, fields: &[String], constructor: &str) {
    w.open(format!("class {} extends StatefulWidget {{", widget));
    for field in fields {
        w.line(field);
    }
    if !fields.is_empty() {
        w.blank();
    }
    w.line(format!("const {}({});", widget, constructor));
    w.blank();
    w.line("@override");
    w.line(format!(
        "State<{widget}> createState() => _{widget}State();"
    ));
    w.close("}");
    w.blank();
}

/// Loading, error and empty branches shared by the list and detail bodies
fn snapshot_guards(w: &mut CodeWriter, empty_check: &str, empty_message: &str) {
    w.open("if (snapshot.connectionState == ConnectionState.waiting) {");
    w.line("return const Center(child: CircularProgressIndicator());");
    w.close("} else if (snapshot.hasError) {");
    w.indent();
    w.line("return Center(child: Text('Error: ${snapshot.error}'));");
    w.close(format!("}} else if ({}) {{", empty_check));
    w.indent();
    w.line(format!("return const Center(child: Text('{}'));", empty_message));
    w.close("}");
    w.blank();
}

fn push_route(w: &mut CodeWriter, target: &str, then_refresh: &str) {
    w.open("final changed = await Navigator.push<bool>(");
    w.line("context,");
    w.line(format!("MaterialPageRoute(builder: (context) => {}),", target));
    w.close(");");
    w.open("if (changed == true) {");
    w.line(then_refresh);
    w.close("}");
}

pub fn list_screen(shape: &ClassShape<'_>) -> String {
    let name = shape.name();
    let key = shape.primary_key.dart_type();
    let key_name = &shape.primary_key.name;
    let widget = list_screen_name(shape);
    let writable = shape.mode.can_write();
    let mut w = CodeWriter::dart();

    let siblings: &[&str] = if writable { &["detail", "form"] } else { &["detail"] };
    header(&mut w, shape, siblings);
    stateful_widget(&mut w, &widget, &[], "{super.key}");

    w.open(format!("class _{}State extends State<{}> {{", widget, widget));
    w.line(format!(
        "final {} _service = {}();",
        client_service_name(shape),
        client_service_name(shape)
    ));
    w.line(format!("late Future<List<{}>> _future;", name));
    w.blank();
    w.line("@override");
    w.open("void initState() {");
    w.line("super.initState();");
    w.line("_future = _service.getAll();");
    w.close("}");
    w.blank();
    w.open("void _refresh() {");
    w.open("setState(() {");
    w.line("_future = _service.getAll();");
    w.close("});");
    w.close("}");
    w.blank();

    w.open(format!("Future<void> _goToDetail({} id) async {{", key));
    push_route(&mut w, &format!("{}(id: id)", detail_screen_name(shape)), "_refresh();");
    w.close("}");
    w.blank();
    if writable {
        w.open("Future<void> _goToForm() async {");
        push_route(&mut w, &format!("const {}()", form_screen_name(shape)), "_refresh();");
        w.close("}");
        w.blank();
    }

    w.line("@override");
    w.open("Widget build(BuildContext context) {");
    w.open("return Scaffold(");
    w.line(format!("appBar: AppBar(title: const Text('{} List')),", name));
    w.open(format!("body: FutureBuilder<List<{}>>(", name));
    w.line("future: _future,");
    w.open("builder: (context, snapshot) {");
    snapshot_guards(
        &mut w,
        "!snapshot.hasData || snapshot.data!.isEmpty",
        &format!("No {} found", shape.route()),
    );
    w.open("return ListView.builder(");
    w.line("itemCount: snapshot.data!.length,");
    w.open("itemBuilder: (context, index) {");
    w.line("final item = snapshot.data![index];");
    w.open("return ListTile(");
    w.line("title: Text(item.toString()),");
    w.line(format!("onTap: () => _goToDetail(item.{}!),", key_name));
    w.close(");");
    w.close("},");
    w.close(");");
    w.close("},");
    w.close("),");
    if writable {
        w.open("floatingActionButton: FloatingActionButton(");
        w.line("onPressed: _goToForm,");
        w.line(format!("tooltip: 'Add {}',", name));
        w.line("child: const Icon(Icons.add),");
        w.close("),");
    }
    w.close(");");
    w.close("}");
    w.close("}");
    w.finish()
}

pub fn detail_screen(shape: &ClassShape<'_>) -> String {
    let name = shape.name();
    let model = DartModel::from_shape(shape);
    let widget = detail_screen_name(shape);
    let writable = shape.mode.can_write();
    let mut w = CodeWriter::dart();

    let siblings: &[&str] = if writable { &["form"] } else { &[] };
    header(&mut w, shape, siblings);
    stateful_widget(
        &mut w,
        &widget,
        &[format!("final {} id;", shape.primary_key.dart_type())],
        "{required this.id, super.key}",
    );

    w.open(format!("class _{}State extends State<{}> {{", widget, widget));
    w.line(format!(
        "final {} _service = {}();",
        client_service_name(shape),
        client_service_name(shape)
    ));
    w.line(format!("late Future<{}> _future;", name));
    w.blank();
    w.line("@override");
    w.open("void initState() {");
    w.line("super.initState();");
    w.line("_future = _service.getById(widget.id);");
    w.close("}");
    w.blank();

    if writable {
        w.open("Future<void> _edit() async {");
        w.line("final item = await _future;");
        w.line("if (!mounted) return;");
        push_route(
            &mut w,
            &format!("{}(item: item)", form_screen_name(shape)),
            "setState(() => _future = _service.getById(widget.id));",
        );
        w.close("}");
        w.blank();
    }

    w.open("Future<void> _delete() async {");
    w.open("final confirmed = await showDialog<bool>(");
    w.line("context: context,");
    w.open("builder: (context) => AlertDialog(");
    w.line("title: const Text('Confirm Delete'),");
    w.line(format!("content: const Text('Delete this {}?'),", shape.var_name()));
    w.open("actions: [");
    w.open("TextButton(");
    w.line("onPressed: () => Navigator.pop(context, false),");
    w.line("child: const Text('Cancel'),");
    w.close("),");
    w.open("TextButton(");
    w.line("onPressed: () => Navigator.pop(context, true),");
    w.line("child: const Text('Delete'),");
    w.close("),");
    w.close("],");
    w.close("),");
    w.close(");");
    w.line("if (confirmed != true) return;");
    w.line("await _service.delete(widget.id);");
    w.line("if (!mounted) return;");
    w.line("Navigator.pop(context, true);");
    w.close("}");
    w.blank();

    w.line("@override");
    w.open("Widget build(BuildContext context) {");
    w.open("return Scaffold(");
    w.open("appBar: AppBar(");
    w.line(format!("title: const Text('{} Detail'),", name));
    w.open("actions: [");
    if writable {
        w.line("IconButton(icon: const Icon(Icons.edit), onPressed: _edit),");
    }
    w.line("IconButton(icon: const Icon(Icons.delete), onPressed: _delete),");
    w.close("],");
    w.close("),");
    w.open(format!("body: FutureBuilder<{}>(", name));
    w.line("future: _future,");
    w.open("builder: (context, snapshot) {");
    snapshot_guards(&mut w, "!snapshot.hasData", &format!("{} not found", name));
    w.line("final item = snapshot.data!;");
    w.open("return ListView(");
    w.line("padding: const EdgeInsets.all(16),");
    w.open("children: [");
    for field in &model.fields {
        w.line(format!("_row('{}', item.{}),", field.name, field.name));
    }
    w.close("],");
    w.close(");");
    w.close("},");
    w.close("),");
    w.close(");");
    w.close("}");
    w.blank();

    w.open("Widget _row(String label, Object? value) {");
    w.open("return Card(");
    w.open("child: ListTile(");
    w.line("title: Text(label, style: const TextStyle(fontWeight: FontWeight.bold)),");
    w.line("subtitle: Text(value?.toString() ?? '-'),");
    w.close("),");
    w.close(");");
    w.close("}");
    w.close("}");
    w.finish()
}

/// How a form captures one model field
enum Input {
    Text,
    Switch,
    /// Not editable; the form carries the existing value over
    Keep,
}

fn input_of(field: &DartField) -> Input {
    match field.wire() {
        WireKind::Bool => Input::Switch,
        WireKind::Passthrough => Input::Keep,
        _ => Input::Text,
    }
}

fn controller(field: &DartField) -> String {
    format!("_{}Controller", field.name)
}

fn switch_state(field: &DartField) -> String {
    format!("_{}", field.name)
}

fn selected(fk: &ForeignKey) -> String {
    format!("_selected{}", capitalize(&fk.id_field))
}

fn options(fk: &ForeignKey) -> String {
    format!("_{}Options", fk.relation_field)
}

/// Text shown in the controller of an existing value
fn initial_text(field: &DartField) -> String {
    match field.wire() {
        WireKind::DateTime => format!(
            "widget.item?.{}?.toIso8601String() ?? ''",
            field.name
        ),
        _ => format!("widget.item?.{}?.toString() ?? ''", field.name),
    }
}

/// Dart expression turning the field's input back into a model value
fn parsed_value(field: &DartField) -> String {
    let text = format!("{}.text", controller(field));
    match field.wire() {
        WireKind::Int => format!("int.tryParse({})", text),
        WireKind::Double => format!("double.tryParse({})", text),
        WireKind::DateTime => format!("DateTime.tryParse({})", text),
        WireKind::String if field.optional => format!("{t}.isEmpty ? null : {t}", t = text),
        WireKind::String => text,
        WireKind::Bool => switch_state(field),
        WireKind::Passthrough => format!("widget.item?.{}", field.name),
    }
}

/// Format check for text inputs that must parse
fn format_check(field: &DartField) -> Option<(&'static str, &'static str)> {
    match field.wire() {
        WireKind::Int => Some(("int.tryParse(value)", "a whole number")),
        WireKind::Double => Some(("double.tryParse(value)", "a number")),
        WireKind::DateTime => Some(("DateTime.tryParse(value)", "a date (YYYY-MM-DD)")),
        _ => None,
    }
}

fn text_field(w: &mut CodeWriter, field: &DartField, enabled: Option<&str>) {
    w.open("TextFormField(");
    w.line(format!("controller: {},", controller(field)));
    if let Some(enabled) = enabled {
        w.line(format!("enabled: {},", enabled));
    }
    w.open("decoration: InputDecoration(");
    w.line(format!("labelText: '{}',", field.name));
    if field.wire() == WireKind::DateTime {
        w.line("hintText: 'YYYY-MM-DD',");
    }
    w.line("border: const OutlineInputBorder(),");
    w.close("),");
    match field.wire() {
        WireKind::Int | WireKind::Double => {
            w.line("keyboardType: TextInputType.number,");
        }
        WireKind::DateTime => {
            w.line("keyboardType: TextInputType.datetime,");
        }
        _ => {}
    }
    w.open("validator: (value) {");
    if field.optional {
        w.line("if (value == null || value.isEmpty) return null;");
    } else {
        w.line(format!(
            "if (value == null || value.isEmpty) return '{} is required';",
            field.name
        ));
    }
    if let Some((parse, expected)) = format_check(field) {
        w.line(format!(
            "if ({} == null) return '{} must be {}';",
            parse, field.name, expected
        ));
    }
    w.line("return null;");
    w.close("},");
    w.close("),");
    w.line("const SizedBox(height: 16),");
}

fn fk_selector(w: &mut CodeWriter, fk: &ForeignKey, key_type: &str) {
    w.open(format!("FutureBuilder<List<{}>>(", fk.target_class_name));
    w.line(format!("future: {},", options(fk)));
    w.open("builder: (context, snapshot) {");
    w.open("if (snapshot.connectionState == ConnectionState.waiting) {");
    w.line("return const LinearProgressIndicator();");
    w.close("}");
    w.open("if (snapshot.hasError) {");
    w.line("return Text('Error: ${snapshot.error}');");
    w.close("}");
    w.line("final items = snapshot.data ?? [];");
    w.open(format!("return DropdownButtonFormField<{}>(", key_type));
    w.line(format!("value: {},", selected(fk)));
    w.open("decoration: InputDecoration(");
    w.line(format!("labelText: '{}',", fk.relation_field));
    w.line("border: const OutlineInputBorder(),");
    w.close("),");
    w.open("items: items.map((item) {");
    w.open(format!("return DropdownMenuItem<{}>(", key_type));
    w.line(format!("value: item.{},", fk.key_name));
    w.line("child: Text(item.toString()),");
    w.close(");");
    w.close("}).toList(),");
    w.line(format!(
        "onChanged: (value) => setState(() => {} = value),",
        selected(fk)
    ));
    w.line(format!(
        "validator: (value) => value == null ? '{} is required' : null,",
        fk.relation_field
    ));
    w.close(");");
    w.close("},");
    w.close("),");
    w.line("const SizedBox(height: 16),");
}

/// `None` for classes without write operations
pub fn form_screen(shape: &ClassShape<'_>) -> Option<String> {
    if !shape.mode.can_write() {
        return None;
    }
    let name = shape.name();
    let model = DartModel::from_shape(shape);
    let key = model.key();
    let key_is_input = !shape.primary_key.is_generated();
    let widget = form_screen_name(shape);
    let mut w = CodeWriter::dart();

    let snake = shape.snake_name();
    w.line("import 'package:flutter/material.dart';");
    w.blank();
    w.line(format!("import '../models/{}.dart';", snake));
    w.line(format!("import '../services/{}_service.dart';", snake));
    let mut imported = vec![snake];
    for fk in &shape.foreign_keys {
        let target = to_snake_case(&fk.target_class_name);
        if imported.contains(&target) {
            continue;
        }
        w.line(format!("import '../models/{}.dart';", target));
        w.line(format!("import '../services/{}_service.dart';", target));
        imported.push(target);
    }
    w.blank();

    stateful_widget(
        &mut w,
        &widget,
        &[format!("final {}? item;", name)],
        "{this.item, super.key}",
    );

    let text_fields: Vec<&DartField> = key_is_input
        .then_some(key)
        .into_iter()
        .chain(model.scalars().filter(|f| matches!(input_of(f), Input::Text)))
        .collect();
    let switches: Vec<&DartField> = model
        .scalars()
        .filter(|f| matches!(input_of(f), Input::Switch))
        .collect();

    w.open(format!("class _{}State extends State<{}> {{", widget, widget));
    w.line(format!(
        "final {} _service = {}();",
        client_service_name(shape),
        client_service_name(shape)
    ));
    w.line("final _formKey = GlobalKey<FormState>();");
    w.line("bool _isLoading = false;");
    for field in &text_fields {
        w.line(format!("late final TextEditingController {};", controller(field)));
    }
    for field in &switches {
        w.line(format!("bool {} = false;", switch_state(field)));
    }
    for fk in &shape.foreign_keys {
        w.line(format!("{}? {};", fk.key.dart_type(), selected(fk)));
        w.line(format!(
            "late final Future<List<{}>> {};",
            fk.target_class_name,
            options(fk)
        ));
    }
    w.blank();

    w.line("@override");
    w.open("void initState() {");
    w.line("super.initState();");
    for field in &text_fields {
        w.line(format!(
            "{} = TextEditingController(text: {});",
            controller(field),
            initial_text(field)
        ));
    }
    for field in &switches {
        w.line(format!(
            "{} = widget.item?.{} ?? false;",
            switch_state(field),
            field.name
        ));
    }
    for fk in &shape.foreign_keys {
        w.line(format!("{} = widget.item?.{};", selected(fk), fk.id_field));
        w.line(format!(
            "{} = {}Service().getAll();",
            options(fk),
            fk.target_class_name
        ));
    }
    w.close("}");
    w.blank();

    w.line("@override");
    w.open("void dispose() {");
    for field in &text_fields {
        w.line(format!("{}.dispose();", controller(field)));
    }
    w.line("super.dispose();");
    w.close("}");
    w.blank();

    w.open("Future<void> _submit() async {");
    w.line("if (!_formKey.currentState!.validate()) return;");
    w.blank();
    w.line("setState(() => _isLoading = true);");
    w.open("try {");
    w.open(format!("final item = {}(", name));
    if key_is_input {
        w.line(format!("{}: {},", key.name, parsed_value(key)));
    } else {
        w.line(format!("{}: widget.item?.{},", key.name, key.name));
    }
    for field in model.scalars() {
        w.line(format!("{}: {},", field.name, parsed_value(field)));
    }
    for fk in &shape.foreign_keys {
        w.line(format!("{}: {},", fk.id_field, selected(fk)));
    }
    w.close(");");
    w.blank();
    w.open("if (widget.item == null) {");
    w.line("await _service.create(item);");
    w.close("} else {");
    w.indent();
    w.line(format!("await _service.update(widget.item!.{}!, item);", key.name));
    w.close("}");
    w.line("if (!mounted) return;");
    w.line("Navigator.pop(context, true);");
    w.close("} catch (e) {");
    w.indent();
    w.line("if (!mounted) return;");
    w.open("ScaffoldMessenger.of(context).showSnackBar(");
    w.line("SnackBar(content: Text('Error: $e')),");
    w.close(");");
    w.close("} finally {");
    w.indent();
    w.line("if (mounted) setState(() => _isLoading = false);");
    w.close("}");
    w.close("}");
    w.blank();

    w.line("@override");
    w.open("Widget build(BuildContext context) {");
    w.open("return Scaffold(");
    w.open("appBar: AppBar(");
    w.line(format!(
        "title: Text(widget.item == null ? 'New {}' : 'Edit {}'),",
        name, name
    ));
    w.close("),");
    w.open("body: SingleChildScrollView(");
    w.line("padding: const EdgeInsets.all(16),");
    w.open("child: Form(");
    w.line("key: _formKey,");
    w.open("child: Column(");
    w.open("children: [");
    for field in &text_fields {
        let enabled = (key_is_input && field.name == key.name).then_some("widget.item == null");
        text_field(&mut w, field, enabled);
    }
    for field in &switches {
        w.open("SwitchListTile(");
        w.line(format!("title: const Text('{}'),", field.name));
        w.line(format!("value: {},", switch_state(field)));
        w.line(format!(
            "onChanged: (value) => setState(() => {} = value),",
            switch_state(field)
        ));
        w.close("),");
    }
    for fk in &shape.foreign_keys {
        fk_selector(&mut w, fk, fk.key.dart_type());
    }
    w.open("ElevatedButton(");
    w.line("onPressed: _isLoading ? null : _submit,");
    w.line("child: _isLoading");
    w.line("    ? const SizedBox(height: 20, width: 20, child: CircularProgressIndicator())");
    w.line("    : const Text('Save'),");
    w.close("),");
    w.close("],");
    w.close("),");
    w.close("),");
    w.close("),");
    w.close(");");
    w.close("}");
    w.close("}");
    Some(w.finish())
}
