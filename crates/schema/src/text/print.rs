//! Single-line text-format printer.

use std::fmt::Write;

use crate::pool::TypePool;
use crate::types::FieldType;
use crate::value::{DynamicMessage, Value};

/// Prints the fields of `message` as `name: value` pairs separated by
/// spaces, followed by its extensions.
///
/// Fields missing from the pool's definition of `type_name` are printed by
/// number.
pub fn print_message(pool: &TypePool, type_name: &str, message: &DynamicMessage) -> String {
	let mut out = String::new();
	write_message(&mut out, pool, type_name, message);
	out
}

/// Prints a single value of type `ty`.
pub fn print_value(pool: &TypePool, ty: &FieldType, value: &Value) -> String {
	let mut out = String::new();
	write_value(&mut out, pool, ty, value);
	out
}

fn separate(out: &mut String) {
	if !out.is_empty() && !out.ends_with(' ') {
		out.push(' ');
	}
}

fn write_message(out: &mut String, pool: &TypePool, type_name: &str, message: &DynamicMessage) {
	let def = pool.message(type_name);
	for (number, value) in &message.fields {
		let field = def.and_then(|d| d.field_by_number(*number));
		separate(out);
		match field {
			Some(field) => out.push_str(&field.name),
			None => {
				let _ = write!(out, "{number}");
			}
		}
		let ty = field.map(|f| f.ty.clone());
		write_field_value(out, pool, ty.as_ref(), value);
	}
	for (name, ext) in &message.extensions {
		separate(out);
		let _ = write!(out, "[{name}]");
		let ty = pool.extension(name).map(|e| e.ty.clone());
		write_field_value(out, pool, ty.as_ref(), &Value::Message(ext.clone()));
	}
}

fn write_field_value(out: &mut String, pool: &TypePool, ty: Option<&FieldType>, value: &Value) {
	match (value, ty) {
		(Value::Message(inner), ty) => {
			let type_name = match ty {
				Some(FieldType::Message(name)) => name.as_str(),
				_ => "",
			};
			let body = print_message(pool, type_name, inner);
			if body.is_empty() {
				out.push_str(" { }");
			} else {
				let _ = write!(out, " {{ {body} }}");
			}
		}
		(value, Some(ty)) => {
			out.push_str(": ");
			write_value(out, pool, ty, value);
		}
		(value, None) => {
			out.push_str(": ");
			write_untyped(out, value);
		}
	}
}

fn write_value(out: &mut String, pool: &TypePool, ty: &FieldType, value: &Value) {
	match (value, ty) {
		(Value::Enum(number), FieldType::Enum(name)) => {
			match pool.enumeration(name).and_then(|e| e.by_number(*number)) {
				Some(v) => out.push_str(&v.name),
				None => {
					let _ = write!(out, "{number}");
				}
			}
		}
		(Value::Message(inner), FieldType::Message(name)) => write_message(out, pool, name, inner),
		_ => write_untyped(out, value),
	}
}

fn write_untyped(out: &mut String, value: &Value) {
	let _ = match value {
		Value::Bool(v) => write!(out, "{v}"),
		Value::I32(v) => write!(out, "{v}"),
		Value::I64(v) => write!(out, "{v}"),
		Value::U32(v) => write!(out, "{v}"),
		Value::U64(v) => write!(out, "{v}"),
		Value::F32(v) => write_float(out, f64::from(*v)),
		Value::F64(v) => write_float(out, *v),
		Value::String(v) => write_quoted(out, v.as_bytes()),
		Value::Bytes(v) => write_quoted(out, v),
		Value::Enum(v) => write!(out, "{v}"),
		Value::Message(inner) => {
			let body = print_message(&TypePool::new(), "", inner);
			write!(out, "{{ {body} }}")
		}
	};
}

fn write_float(out: &mut String, v: f64) -> std::fmt::Result {
	if v.is_nan() {
		out.push_str("nan");
	} else if v.is_infinite() {
		out.push_str(if v > 0.0 { "inf" } else { "-inf" });
	} else {
		write!(out, "{v}")?;
	}
	Ok(())
}

fn write_quoted(out: &mut String, bytes: &[u8]) -> std::fmt::Result {
	out.push('"');
	match std::str::from_utf8(bytes) {
		Ok(text) => {
			for ch in text.chars() {
				match ch {
					'"' => out.push_str("\\\""),
					'\\' => out.push_str("\\\\"),
					'\n' => out.push_str("\\n"),
					'\r' => out.push_str("\\r"),
					'\t' => out.push_str("\\t"),
					ch if ch.is_control() => write!(out, "\\{:03o}", ch as u32)?,
					ch => out.push(ch),
				}
			}
		}
		Err(_) => {
			for &byte in bytes {
				match byte {
					b'"' => out.push_str("\\\""),
					b'\\' => out.push_str("\\\\"),
					0x20..=0x7e => out.push(byte as char),
					_ => write!(out, "\\{byte:03o}")?,
				}
			}
		}
	}
	out.push('"');
	Ok(())
}
