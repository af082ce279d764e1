use pretty_assertions::assert_eq;

use super::*;
use crate::feature_set::{self, FEATURE_SET, FieldPresence};
use crate::fixtures;

fn pool() -> TypePool {
	fixtures::pool().unwrap()
}

fn message_feature() -> FieldType {
	FieldType::Message(fixtures::MESSAGE_FEATURE.to_string())
}

#[test]
fn parses_scalars() {
	let pool = pool();
	let bool_ty = FieldType::Scalar(ScalarType::Bool);
	assert_eq!(parse_value(&pool, &bool_ty, "true"), Ok(Value::Bool(true)));
	assert_eq!(parse_value(&pool, &bool_ty, " False "), Ok(Value::Bool(false)));
	assert_eq!(
		parse_value(&pool, &FieldType::Scalar(ScalarType::Int32), "-0x10"),
		Ok(Value::I32(-16))
	);
	assert_eq!(
		parse_value(&pool, &FieldType::Scalar(ScalarType::Double), "1.5e2"),
		Ok(Value::F64(150.0))
	);
	assert_eq!(
		parse_value(&pool, &FieldType::Scalar(ScalarType::Float), "2.5f"),
		Ok(Value::F32(2.5))
	);
}

#[test]
fn integer_range_is_checked_per_type() {
	let pool = pool();
	let err = parse_value(&pool, &FieldType::Scalar(ScalarType::Uint32), "-1").unwrap_err();
	assert!(err.message.contains("out of range for uint32"), "{err}");
	assert!(parse_value(&pool, &FieldType::Scalar(ScalarType::Int32), "2147483648").is_err());
}

#[test]
fn parses_adjacent_strings_and_escapes() {
	let pool = pool();
	let value = parse_value(&pool, &FieldType::Scalar(ScalarType::String), r#""a\n" 'b\"' "\x41\101""#);
	assert_eq!(value, Ok(Value::String("a\nb\"AA".to_string())));
	let err = parse_value(&pool, &FieldType::Scalar(ScalarType::String), "\"open").unwrap_err();
	assert_eq!(err.message, "unterminated string");
}

#[test]
fn parses_enum_by_name_or_number() {
	let pool = pool();
	let ty = FieldType::Enum(FieldPresence::TYPE_NAME.to_string());
	assert_eq!(parse_value(&pool, &ty, "IMPLICIT"), Ok(Value::Enum(2)));
	assert_eq!(parse_value(&pool, &ty, "3"), Ok(Value::Enum(3)));
}

#[test]
fn unknown_enum_value_suggests_close_name() {
	let pool = pool();
	let ty = FieldType::Enum(FieldPresence::TYPE_NAME.to_string());
	let err = parse_value(&pool, &ty, "EXPLCIT").unwrap_err();
	assert!(err.message.contains("Unknown enumeration value of \"EXPLCIT\""), "{err}");
	assert!(err.message.contains("Did you mean \"EXPLICIT\"?"), "{err}");
	assert_eq!(err.position, 0);
}

#[test]
fn parses_bare_message_body() {
	let pool = pool();
	let value = parse_value(&pool, &message_feature(), "bool_field: true int_field: 1 string_field: \"2023\"");
	let expected = DynamicMessage::new().with(1, true).with(2, Value::I32(1)).with(4, "2023");
	assert_eq!(value, Ok(Value::Message(expected)));
	assert_eq!(parse_value(&pool, &message_feature(), ""), Ok(Value::Message(DynamicMessage::new())));
}

#[test]
fn parses_braced_message_with_separators_and_comments() {
	let pool = pool();
	let text = "{ bool_field: true, # trailing comment\n int_field: 2; }";
	let expected = DynamicMessage::new().with(1, true).with(2, Value::I32(2));
	assert_eq!(parse_value(&pool, &message_feature(), text), Ok(Value::Message(expected)));
}

#[test]
fn parses_extensions_in_either_bracket_style() {
	let pool = pool();
	let parsed = parse_message(
		&pool,
		FEATURE_SET,
		"field_presence: IMPLICIT [pb.test] { file_feature: VALUE3 message_field_feature < int_field: 4 > }",
	)
	.unwrap();
	let expected = DynamicMessage::new()
		.with(feature_set::FIELD_PRESENCE, FieldPresence::Implicit)
		.with_extension(
			fixtures::EXTENSION,
			DynamicMessage::new()
				.with(fixtures::FILE_FEATURE, Value::Enum(3))
				.with(fixtures::MESSAGE_FIELD_FEATURE, DynamicMessage::new().with(2, Value::I32(4))),
		);
	assert_eq!(parsed, expected);
}

#[test]
fn unknown_field_reports_position_and_suggestion() {
	let pool = pool();
	let err = parse_message(&pool, fixtures::MESSAGE_FEATURE, "bool_field: true int_feild: 3").unwrap_err();
	assert_eq!(err.position, 17);
	assert!(err.message.contains("has no field named \"int_feild\""), "{err}");
	assert!(err.message.contains("Did you mean \"int_field\"?"), "{err}");
}

#[test]
fn unknown_extension_is_rejected() {
	let pool = pool();
	let err = parse_message(&pool, FEATURE_SET, "[pb.tset] { }").unwrap_err();
	assert!(err.message.contains("Extension \"pb.tset\" is not defined"), "{err}");
	assert!(err.message.contains("Did you mean \"pb.test\"?"), "{err}");
}

#[test]
fn duplicate_fields_are_rejected() {
	let pool = pool();
	let err = parse_message(&pool, fixtures::MESSAGE_FEATURE, "int_field: 1 int_field: 2").unwrap_err();
	assert!(err.message.contains("specified multiple times"), "{err}");
}

#[test]
fn trailing_garbage_is_an_error() {
	let pool = pool();
	let err = parse_value(&pool, &FieldType::Scalar(ScalarType::Bool), "true }").unwrap_err();
	assert_eq!(err.to_string(), "Parse error at position 5: expected end of input, found '}'");
}

#[test]
fn printer_output_parses_back() {
	let pool = pool();
	let text = "field_presence: IMPLICIT [pb.test] { file_feature: VALUE3 message_field_feature { bool_field: true string_field: \"a\\\"b\" } }";
	let parsed = parse_message(&pool, FEATURE_SET, text).unwrap();
	let printed = print_message(&pool, FEATURE_SET, &parsed);
	assert_eq!(printed, text);
	assert_eq!(parse_message(&pool, FEATURE_SET, &printed), Ok(parsed));
}

#[test]
fn printer_falls_back_to_numbers() {
	let pool = pool();
	let message = DynamicMessage::new()
		.with(feature_set::FIELD_PRESENCE, Value::Enum(42))
		.with(77, Value::I32(5));
	assert_eq!(print_message(&pool, FEATURE_SET, &message), "field_presence: 42 77: 5");
}
