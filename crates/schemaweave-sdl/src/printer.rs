//! SDL printing
//!
//! Renders documents back to schema-definition text. Printing and then
//! re-parsing yields a structurally equal document.

use crate::parser::quote_string;
use schemaweave_core::{Definition, Directive, FieldDefinition, InputValueDefinition};

const INDENT: &str = "  ";

/// Print definitions separated by blank lines
pub fn print_definitions(definitions: &[Definition]) -> String {
    let blocks: Vec<String> = definitions.iter().map(print_definition).collect();
    let mut out = blocks.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Print a single definition
pub fn print_definition(definition: &Definition) -> String {
    let mut out = String::new();
    push_description(&mut out, definition.description(), "");
    out.push_str(definition.keyword());
    out.push(' ');
    out.push_str(definition.name());

    match definition {
        Definition::Scalar(def) => {
            push_directives(&mut out, &def.directives);
        }
        Definition::Object(def) => {
            push_implements(&mut out, &def.interfaces);
            push_directives(&mut out, &def.directives);
            push_block(&mut out, def.fields.iter().map(print_field));
        }
        Definition::Interface(def) => {
            push_implements(&mut out, &def.interfaces);
            push_directives(&mut out, &def.directives);
            push_block(&mut out, def.fields.iter().map(print_field));
        }
        Definition::Union(def) => {
            push_directives(&mut out, &def.directives);
            if !def.members.is_empty() {
                out.push_str(" = ");
                out.push_str(&def.members.join(" | "));
            }
        }
        Definition::Enum(def) => {
            push_directives(&mut out, &def.directives);
            push_block(
                &mut out,
                def.values.iter().map(|value| {
                    let mut line = String::new();
                    push_description(&mut line, value.description.as_deref(), INDENT);
                    line.push_str(INDENT);
                    line.push_str(&value.name);
                    push_directives(&mut line, &value.directives);
                    line
                }),
            );
        }
        Definition::InputObject(def) => {
            push_directives(&mut out, &def.directives);
            push_block(
                &mut out,
                def.fields.iter().map(|field| {
                    let mut line = String::new();
                    push_description(&mut line, field.description.as_deref(), INDENT);
                    line.push_str(INDENT);
                    line.push_str(&print_input_value(field));
                    line
                }),
            );
        }
    }

    out
}

fn print_field(field: &FieldDefinition) -> String {
    let mut out = String::new();
    push_description(&mut out, field.description.as_deref(), INDENT);
    out.push_str(INDENT);
    out.push_str(&field.name);

    if !field.arguments.is_empty() {
        let arguments: Vec<String> = field
            .arguments
            .iter()
            .map(|arg| match &arg.description {
                Some(description) => format!("{} {}", quote_string(description), print_input_value(arg)),
                None => print_input_value(arg),
            })
            .collect();
        out.push('(');
        out.push_str(&arguments.join(", "));
        out.push(')');
    }

    out.push_str(": ");
    out.push_str(&field.ty.to_string());
    push_directives(&mut out, &field.directives);
    out
}

fn print_input_value(value: &InputValueDefinition) -> String {
    let mut out = format!("{}: {}", value.name, value.ty);
    if let Some(default) = &value.default_value {
        out.push_str(" = ");
        out.push_str(default);
    }
    push_directives(&mut out, &value.directives);
    out
}

fn push_description(out: &mut String, description: Option<&str>, indent: &str) {
    if let Some(description) = description {
        out.push_str(indent);
        out.push_str(&quote_string(description));
        out.push('\n');
    }
}

fn push_implements(out: &mut String, interfaces: &[String]) {
    if !interfaces.is_empty() {
        out.push_str(" implements ");
        out.push_str(&interfaces.join(" & "));
    }
}

fn push_directives(out: &mut String, directives: &[Directive]) {
    for directive in directives {
        out.push_str(" @");
        out.push_str(&directive.name);
        if !directive.arguments.is_empty() {
            let arguments: Vec<String> = directive
                .arguments
                .iter()
                .map(|arg| format!("{}: {}", arg.name, arg.value))
                .collect();
            out.push('(');
            out.push_str(&arguments.join(", "));
            out.push(')');
        }
    }
}

/// Append `{ ... }` with one entry per line; nothing for an empty body
fn push_block(out: &mut String, lines: impl Iterator<Item = String>) {
    let lines: Vec<String> = lines.collect();
    if lines.is_empty() {
        return;
    }
    out.push_str(" {\n");
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('}');
}
