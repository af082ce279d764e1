//! # Text format
//!
//! Parses the text-format representation of feature values. Edition defaults
//! are declared as text (`"EXPLICIT"`, `"true"`, `"int_field: 1"`) and are
//! parsed against the field's declared type when defaults are compiled.
//!
//! ## Supported Syntax
//!
//! ```text
//! message   = field*
//! field     = name (":" scalar | ":"? block) (";" | ",")?
//! name      = ident | "[" ident ("." ident)* "]"
//! block     = "{" message "}" | "<" message ">"
//! scalar    = bool | integer | float | string+ | enum
//! integer   = "-"? (decimal | "0x" hex | "0" octal)
//! string    = '"' char* '"' | "'" char* "'"
//! enum      = ident | integer
//! ```
//!
//! Whitespace separates tokens and `#` starts a comment running to the end
//! of the line. A message value given at the top level may omit its braces.

use crate::pool::TypePool;
use crate::types::{FieldType, Label, MessageDef, ScalarType};
use crate::value::{DynamicMessage, Value};

mod print;

pub use print::{print_message, print_value};

#[cfg(test)]
mod tests;

/// Represents an error that occurred while parsing text-format input.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TextError {
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

impl std::fmt::Display for TextError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Parse error at position {}: {}", self.position, self.message)
	}
}

impl std::error::Error for TextError {}

/// Maintains the parser's state for recursive descent parsing.
struct Parser<'a> {
	/// Remaining input.
	input: &'a str,
	/// Current byte position in the original input.
	position: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, position: 0 }
	}

	fn peek(&self) -> Option<char> {
		self.input.chars().next()
	}

	fn next(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.position += ch.len_utf8();
		self.input = &self.input[ch.len_utf8()..];
		Some(ch)
	}

	/// Consumes the next character if it matches `expected`.
	fn eat(&mut self, expected: char) -> bool {
		if self.peek() == Some(expected) {
			self.next();
			true
		} else {
			false
		}
	}

	fn take(&mut self, expected: char) -> Result<(), TextError> {
		match self.next() {
			Some(ch) if ch == expected => Ok(()),
			Some(ch) => Err(TextError {
				message: format!("expected '{expected}', found '{ch}'"),
				position: self.position - ch.len_utf8(),
			}),
			None => Err(self.error(format!("expected '{expected}', found end of input"))),
		}
	}

	fn take_while<F>(&mut self, predicate: F) -> &'a str
	where
		F: Fn(char) -> bool,
	{
		let len = self
			.input
			.char_indices()
			.find(|(_, ch)| !predicate(*ch))
			.map_or(self.input.len(), |(idx, _)| idx);
		let (taken, rest) = self.input.split_at(len);
		self.input = rest;
		self.position += len;
		taken
	}

	/// Skips whitespace and `#` comments.
	fn skip_ws(&mut self) {
		loop {
			match self.peek() {
				Some(ch) if ch.is_whitespace() => {
					self.next();
				}
				Some('#') => {
					self.take_while(|ch| ch != '\n');
				}
				_ => break,
			}
		}
	}

	fn ident(&mut self) -> &'a str {
		self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_')
	}

	/// A bare scalar token: identifier, number or signed float.
	fn word(&mut self) -> &'a str {
		self.take_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '+' | '.'))
	}

	fn error(&self, message: impl Into<String>) -> TextError {
		TextError {
			message: message.into(),
			position: self.position,
		}
	}

	fn describe_next(&self) -> String {
		match self.peek() {
			Some(ch) => format!("'{ch}'"),
			None => "end of input".to_string(),
		}
	}

	/// One or more adjacent quoted strings, concatenated.
	fn string(&mut self) -> Result<Vec<u8>, TextError> {
		let mut out = Vec::new();
		let mut any = false;
		loop {
			self.skip_ws();
			let quote = match self.peek() {
				Some(q @ ('"' | '\'')) => q,
				_ => break,
			};
			self.next();
			any = true;
			loop {
				match self.next() {
					None | Some('\n') => return Err(self.error("unterminated string")),
					Some(ch) if ch == quote => break,
					Some('\\') => self.escape(&mut out)?,
					Some(ch) => {
						let mut buf = [0u8; 4];
						out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
					}
				}
			}
		}
		if !any {
			return Err(self.error(format!("expected string, found {}", self.describe_next())));
		}
		Ok(out)
	}

	fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), TextError> {
		let byte = match self.next() {
			Some('n') => b'\n',
			Some('t') => b'\t',
			Some('r') => b'\r',
			Some('a') => 0x07,
			Some('b') => 0x08,
			Some('f') => 0x0c,
			Some('v') => 0x0b,
			Some(ch @ ('\\' | '\'' | '"' | '?')) => ch as u8,
			Some('x') => {
				let digits = self.digits(2, 16);
				if digits.is_empty() {
					return Err(self.error("expected hex digits after '\\x'"));
				}
				u8::from_str_radix(digits, 16).map_err(|_| self.error("invalid hex escape"))?
			}
			Some(ch @ '0'..='7') => {
				let mut value = ch.to_digit(8).unwrap_or(0);
				for digit in self.digits(2, 8).chars() {
					value = value * 8 + digit.to_digit(8).unwrap_or(0);
				}
				u8::try_from(value).map_err(|_| self.error("octal escape out of range"))?
			}
			Some(ch) => return Err(self.error(format!("invalid escape sequence '\\{ch}'"))),
			None => return Err(self.error("unterminated string")),
		};
		out.push(byte);
		Ok(())
	}

	/// Takes at most `max` digits of `radix`.
	fn digits(&mut self, max: usize, radix: u32) -> &'a str {
		let len = self
			.input
			.char_indices()
			.take(max)
			.find(|(_, ch)| !ch.is_digit(radix))
			.map_or_else(
				|| self.input.chars().take(max).map(char::len_utf8).sum(),
				|(idx, _)| idx,
			);
		let (taken, rest) = self.input.split_at(len);
		self.input = rest;
		self.position += len;
		taken
	}
}

/// Returns the candidate closest to `name`, if it is within a small edit
/// distance.
pub fn closest<'a>(name: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
	candidates
		.map(|c| (strsim::levenshtein(name, c), c))
		.min()
		.filter(|(distance, _)| *distance <= 3)
		.map(|(_, c)| c)
}

/// Parses a single value of type `ty`.
///
/// Message values may be written with or without enclosing braces.
///
/// # Errors
///
/// Returns a [`TextError`] if the input does not match the grammar or names
/// fields, extensions or enum values that do not exist.
pub fn parse_value(pool: &TypePool, ty: &FieldType, text: &str) -> Result<Value, TextError> {
	let mut parser = Parser::new(text);
	parser.skip_ws();
	let value = match ty {
		FieldType::Message(name) => {
			let def = lookup_message(&parser, pool, name)?;
			let close = match parser.peek() {
				Some('{') => Some('}'),
				Some('<') => Some('>'),
				_ => None,
			};
			if close.is_some() {
				parser.next();
			}
			Value::Message(parse_fields(&mut parser, pool, def, close)?)
		}
		_ => parse_scalar(&mut parser, pool, ty)?,
	};
	parser.skip_ws();
	if !parser.input.is_empty() {
		return Err(parser.error(format!("expected end of input, found {}", parser.describe_next())));
	}
	Ok(value)
}

/// Parses the body of a message of type `type_name`.
pub fn parse_message(pool: &TypePool, type_name: &str, text: &str) -> Result<DynamicMessage, TextError> {
	match parse_value(pool, &FieldType::Message(type_name.to_string()), text)? {
		Value::Message(message) => Ok(message),
		other => Err(TextError {
			message: format!("expected message, found {}", other.type_name()),
			position: 0,
		}),
	}
}

fn lookup_message<'p>(parser: &Parser, pool: &'p TypePool, name: &str) -> Result<&'p MessageDef, TextError> {
	pool.require_message(name).map_err(|e| parser.error(e.to_string()))
}

/// Parses fields until `close` (or end of input when `close` is `None`).
fn parse_fields(
	parser: &mut Parser,
	pool: &TypePool,
	def: &MessageDef,
	close: Option<char>,
) -> Result<DynamicMessage, TextError> {
	let mut message = DynamicMessage::new();
	loop {
		parser.skip_ws();
		match (parser.peek(), close) {
			(None, None) => break,
			(None, Some(c)) => return Err(parser.error(format!("expected '{c}', found end of input"))),
			(Some(ch), Some(c)) if ch == c => {
				parser.next();
				break;
			}
			_ => {}
		}
		if parser.peek() == Some('[') {
			parse_extension_field(parser, pool, def, &mut message)?;
		} else {
			parse_field(parser, pool, def, &mut message)?;
		}
		parser.skip_ws();
		if matches!(parser.peek(), Some(',' | ';')) {
			parser.next();
		}
	}
	Ok(message)
}

fn parse_field(
	parser: &mut Parser,
	pool: &TypePool,
	def: &MessageDef,
	message: &mut DynamicMessage,
) -> Result<(), TextError> {
	let start = parser.position;
	let name = parser.ident();
	if name.is_empty() {
		return Err(parser.error(format!("expected field name, found {}", parser.describe_next())));
	}
	let Some(field) = def.field_by_name(name) else {
		let mut message = format!("Message type \"{}\" has no field named \"{name}\".", def.full_name);
		if let Some(hint) = closest(name, def.fields.iter().map(|f| f.name.as_str())) {
			message.push_str(&format!(" Did you mean \"{hint}\"?"));
		}
		return Err(TextError { message, position: start });
	};
	if field.label == Label::Repeated {
		return Err(TextError {
			message: format!("Repeated field \"{name}\" is not supported in feature values."),
			position: start,
		});
	}
	if message.has(field.number) {
		return Err(TextError {
			message: format!("Non-repeated field \"{name}\" is specified multiple times."),
			position: start,
		});
	}
	let value = parse_field_value(parser, pool, &field.ty)?;
	message.set(field.number, value);
	Ok(())
}

fn parse_extension_field(
	parser: &mut Parser,
	pool: &TypePool,
	def: &MessageDef,
	message: &mut DynamicMessage,
) -> Result<(), TextError> {
	let start = parser.position;
	parser.take('[')?;
	parser.skip_ws();
	let name = parser.take_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.'));
	parser.skip_ws();
	parser.take(']')?;

	let Some(ext) = pool.extension(name).filter(|ext| ext.extendee == def.full_name) else {
		let mut message = format!(
			"Extension \"{name}\" is not defined or is not an extension of \"{}\".",
			def.full_name
		);
		let known = pool.extensions_of(&def.full_name);
		if let Some(hint) = closest(name, known.iter().map(|e| e.full_name.as_str())) {
			message.push_str(&format!(" Did you mean \"{hint}\"?"));
		}
		return Err(TextError { message, position: start });
	};
	if !ext.ty.is_message() {
		return Err(TextError {
			message: format!("Extension \"{name}\" is not of message type."),
			position: start,
		});
	}
	if message.extensions.contains_key(name) {
		return Err(TextError {
			message: format!("Non-repeated field \"{name}\" is specified multiple times."),
			position: start,
		});
	}
	if let Value::Message(value) = parse_field_value(parser, pool, &ext.ty)? {
		message.extensions.insert(name.to_string(), value);
	}
	Ok(())
}

fn parse_field_value(parser: &mut Parser, pool: &TypePool, ty: &FieldType) -> Result<Value, TextError> {
	parser.skip_ws();
	let colon = parser.eat(':');
	parser.skip_ws();
	match ty {
		FieldType::Message(name) => {
			let def = lookup_message(parser, pool, name)?;
			let close = match parser.peek() {
				Some('{') => '}',
				Some('<') => '>',
				_ => {
					return Err(parser.error(format!("expected '{{', found {}", parser.describe_next())));
				}
			};
			parser.next();
			Ok(Value::Message(parse_fields(parser, pool, def, Some(close))?))
		}
		_ if !colon => Err(parser.error(format!("expected ':', found {}", parser.describe_next()))),
		_ => parse_scalar(parser, pool, ty),
	}
}

fn parse_scalar(parser: &mut Parser, pool: &TypePool, ty: &FieldType) -> Result<Value, TextError> {
	let start = parser.position;
	let at_start = |message: String| TextError { message, position: start };
	match ty {
		FieldType::Scalar(ScalarType::String) => {
			let bytes = parser.string()?;
			String::from_utf8(bytes)
				.map(Value::String)
				.map_err(|_| at_start("string value is not valid UTF-8".to_string()))
		}
		FieldType::Scalar(ScalarType::Bytes) => parser.string().map(Value::Bytes),
		FieldType::Scalar(ScalarType::Bool) => match parser.word() {
			"true" | "True" | "t" | "1" => Ok(Value::Bool(true)),
			"false" | "False" | "f" | "0" => Ok(Value::Bool(false)),
			word => Err(at_start(format!("invalid boolean: '{word}'"))),
		},
		FieldType::Scalar(scalar @ (ScalarType::Float | ScalarType::Double)) => {
			let word = parser.word();
			let value = parse_float(word).ok_or_else(|| at_start(format!("invalid float: '{word}'")))?;
			Ok(if *scalar == ScalarType::Float {
				Value::F32(value as f32)
			} else {
				Value::F64(value)
			})
		}
		FieldType::Scalar(scalar) => {
			let word = parser.word();
			let value = parse_integer(word).ok_or_else(|| at_start(format!("invalid integer: '{word}'")))?;
			let out_of_range = || at_start(format!("integer out of range for {}: {word}", scalar.name()));
			match scalar {
				ScalarType::Int32 => i32::try_from(value).map(Value::I32).map_err(|_| out_of_range()),
				ScalarType::Int64 => i64::try_from(value).map(Value::I64).map_err(|_| out_of_range()),
				ScalarType::Uint32 => u32::try_from(value).map(Value::U32).map_err(|_| out_of_range()),
				_ => u64::try_from(value).map(Value::U64).map_err(|_| out_of_range()),
			}
		}
		FieldType::Enum(name) => {
			let def = pool.require_enum(name).map_err(|e| at_start(e.to_string()))?;
			let word = parser.word();
			if word.starts_with(|ch: char| ch == '-' || ch.is_ascii_digit()) {
				return parse_integer(word)
					.and_then(|n| i32::try_from(n).ok())
					.map(Value::Enum)
					.ok_or_else(|| at_start(format!("invalid enum number: '{word}'")));
			}
			match def.by_name(word) {
				Some(value) => Ok(Value::Enum(value.number)),
				None => {
					let mut message = format!(
						"Unknown enumeration value of \"{word}\" for field of type \"{}\".",
						def.full_name
					);
					if let Some(hint) = closest(word, def.values.iter().map(|v| v.name.as_str())) {
						message.push_str(&format!(" Did you mean \"{hint}\"?"));
					}
					Err(at_start(message))
				}
			}
		}
		FieldType::Message(name) => Err(at_start(format!("expected '{{' to open a {name} value"))),
	}
}

fn parse_integer(word: &str) -> Option<i128> {
	let (negative, digits) = match word.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, word),
	};
	if digits.is_empty() || digits.starts_with(['+', '-']) {
		return None;
	}
	let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
		i128::from_str_radix(hex, 16).ok()?
	} else if digits.len() > 1 && digits.starts_with('0') {
		i128::from_str_radix(&digits[1..], 8).ok()?
	} else {
		digits.parse::<i128>().ok()?
	};
	Some(if negative { -magnitude } else { magnitude })
}

fn parse_float(word: &str) -> Option<f64> {
	let lower = word.to_ascii_lowercase();
	match lower.as_str() {
		"inf" | "infinity" => return Some(f64::INFINITY),
		"-inf" | "-infinity" => return Some(f64::NEG_INFINITY),
		"nan" | "-nan" => return Some(f64::NAN),
		_ => {}
	}
	let body = lower.strip_suffix('f').unwrap_or(&lower);
	if body.is_empty() || body.contains("0x") {
		return None;
	}
	body.parse::<f64>().ok()
}
