use pretty_assertions::assert_eq;
use protofeat_resolver::{OverridePolicy, ResolveError};
use protofeat_schema::fixtures::{self, EXTENSION};
use protofeat_schema::{EnumType, FieldPresence, MessageEncoding, RepeatedFieldEncoding, Value};

use super::*;
use crate::proto::{EnumValueProto, FieldKind, OneofProto};

fn pool() -> DescriptorPool {
	let types = Arc::new(fixtures::pool().expect("fixture pool"));
	let defaults = compile_defaults(
		&types,
		FEATURE_SET,
		&[EXTENSION.to_string()],
		&Edition::Proto2,
		&Edition::from_number(2024),
	)
	.expect("defaults compile");
	DescriptorPool::new(types, defaults)
}

fn editions_file(name: &str) -> FileProto {
	FileProto {
		name: name.into(),
		package: "pkg".into(),
		syntax: Syntax::Editions,
		edition: Some(Edition::from_number(2023)),
		..FileProto::default()
	}
}

fn message(name: &str, features: Option<&str>) -> MessageProto {
	MessageProto {
		name: name.into(),
		features: features.map(str::to_string),
		..MessageProto::default()
	}
}

fn field_with(name: &str, number: u32, features: &str) -> FieldProto {
	FieldProto {
		features: Some(features.into()),
		..FieldProto::new(name, number, FieldKind::Int32)
	}
}

fn multiple(file: &FileDescriptor, name: &str) -> Option<Value> {
	file.features(name)
		.and_then(|f| f.extension(EXTENSION))
		.and_then(|m| m.get(fixtures::MULTIPLE_FEATURE))
		.cloned()
}

#[test]
fn features_flow_down_the_tree() {
	let mut proto = editions_file("inherit.proto");
	proto.features = Some("[pb.test] { multiple_feature: VALUE2 }".into());
	let mut foo = message("Foo", Some("[pb.test] { multiple_feature: VALUE3 }"));
	foo.fields.push(FieldProto::new("bar", 1, FieldKind::Int32));
	foo.fields.push(field_with("baz", 2, "[pb.test] { multiple_feature: VALUE4 }"));
	foo.nested_types.push(message("Inner", None));
	proto.message_types.push(foo);
	proto.enum_types.push(EnumProto {
		name: "Color".into(),
		features: None,
		values: vec![EnumValueProto {
			name: "RED".into(),
			number: 0,
			features: Some("[pb.test] { multiple_feature: VALUE5 }".into()),
		}],
	});

	let mut pool = pool();
	let file = pool.build_file(&proto).expect("file builds");
	assert_eq!(multiple(file, "inherit.proto"), Some(Value::Enum(2)));
	assert_eq!(multiple(file, "pkg.Foo"), Some(Value::Enum(3)));
	assert_eq!(multiple(file, "pkg.Foo.bar"), Some(Value::Enum(3)));
	assert_eq!(multiple(file, "pkg.Foo.baz"), Some(Value::Enum(4)));
	assert_eq!(multiple(file, "pkg.Foo.Inner"), Some(Value::Enum(3)));
	assert_eq!(multiple(file, "pkg.Color"), Some(Value::Enum(2)));
	assert_eq!(multiple(file, "pkg.RED"), Some(Value::Enum(5)));
	assert!(file.warnings().is_empty());
	assert!(pool.file("inherit.proto").is_some());
}

#[test]
fn oneof_fields_inherit_from_their_oneof() {
	let mut proto = editions_file("oneof.proto");
	let mut msg = message("Choice", None);
	msg.oneofs.push(OneofProto {
		name: "kind".into(),
		features: Some("[pb.test] { multiple_feature: VALUE6 }".into()),
	});
	msg.fields.push(FieldProto {
		oneof_index: Some(0),
		..FieldProto::new("a", 1, FieldKind::String)
	});
	msg.fields.push(FieldProto::new("b", 2, FieldKind::String));
	proto.message_types.push(msg);

	let mut pool = pool();
	let file = pool.build_file(&proto).expect("file builds");
	assert_eq!(multiple(file, "pkg.Choice.a"), Some(Value::Enum(6)));
	assert_eq!(multiple(file, "pkg.Choice.b"), Some(Value::Enum(1)));
	let a = file.find("pkg.Choice.a").expect("field a");
	let parent = a.parent.and_then(|id| file.node(id)).expect("parent");
	assert_eq!(parent.target, Target::Oneof);
}

#[test]
fn proto2_infers_legacy_features() {
	let mut msg = message("Legacy", None);
	msg.fields.push(FieldProto {
		label: protofeat_schema::Label::Required,
		..FieldProto::new("id", 1, FieldKind::Int64)
	});
	msg.fields.push(FieldProto::new("grp", 2, FieldKind::Group));
	msg.fields.push(FieldProto {
		label: protofeat_schema::Label::Repeated,
		packed: Some(true),
		..FieldProto::new("nums", 3, FieldKind::Int32)
	});
	let proto = FileProto {
		name: "legacy.proto".into(),
		package: "pkg".into(),
		syntax: Syntax::Proto2,
		message_types: vec![msg],
		..FileProto::default()
	};

	let mut pool = pool();
	let file = pool.build_file(&proto).expect("file builds");
	assert_eq!(file.edition(), &Edition::Proto2);
	let id = file.features("pkg.Legacy.id").expect("id features");
	assert_eq!(id.field_presence(), Some(FieldPresence::LegacyRequired));
	assert_eq!(id.enum_type(), Some(EnumType::Closed));
	let grp = file.features("pkg.Legacy.grp").expect("grp features");
	assert_eq!(grp.message_encoding(), Some(MessageEncoding::Delimited));
	let nums = file.features("pkg.Legacy.nums").expect("nums features");
	assert_eq!(nums.repeated_field_encoding(), Some(RepeatedFieldEncoding::Packed));
}

#[test]
fn proto3_unpacked_fields_expand() {
	let mut msg = message("Numbers", None);
	msg.fields.push(FieldProto {
		label: protofeat_schema::Label::Repeated,
		packed: Some(false),
		..FieldProto::new("plain", 1, FieldKind::Int32)
	});
	msg.fields.push(FieldProto {
		label: protofeat_schema::Label::Repeated,
		..FieldProto::new("packed", 2, FieldKind::Int32)
	});
	let proto = FileProto {
		name: "numbers.proto".into(),
		syntax: Syntax::Proto3,
		message_types: vec![msg],
		..FileProto::default()
	};

	let mut pool = pool();
	let file = pool.build_file(&proto).expect("file builds");
	assert_eq!(
		file.features("Numbers.plain").and_then(|f| f.repeated_field_encoding()),
		Some(RepeatedFieldEncoding::Expanded)
	);
	assert_eq!(
		file.features("Numbers.packed").and_then(|f| f.repeated_field_encoding()),
		Some(RepeatedFieldEncoding::Packed)
	);
	assert_eq!(
		file.features("Numbers.packed").and_then(|f| f.field_presence()),
		Some(FieldPresence::Implicit)
	);
}

#[test]
fn features_outside_editions() {
	let proto = FileProto {
		name: "p2.proto".into(),
		syntax: Syntax::Proto2,
		message_types: vec![message("M", Some("field_presence: IMPLICIT"))],
		..FileProto::default()
	};
	let mut pool = pool();
	let failure = pool.build_file(&proto).expect_err("features in proto2");
	assert_eq!(
		failure.errors,
		vec![BuildError::FeaturesOutsideEditions { name: "M".into() }]
	);
	assert!(pool.file("p2.proto").is_none());
}

#[test]
fn editions_reject_legacy_syntax() {
	let mut proto = editions_file("bad.proto");
	let mut msg = message("M", None);
	msg.fields.push(FieldProto::new("g", 1, FieldKind::Group));
	proto.message_types.push(msg);
	let mut pool = pool();
	let failure = pool.build_file(&proto).expect_err("group in editions");
	assert!(matches!(
		&failure.errors[..],
		[BuildError::NotAllowedInEditions { name, .. }] if name == "pkg.M.g"
	));
}

#[test]
fn failures_are_aggregated_and_descendants_skipped() {
	let zero = "[pb.test] { file_feature: TEST_ENUM_FEATURE_UNKNOWN }";
	let mut proto = editions_file("errors.proto");
	let mut a = message("A", Some(zero));
	a.fields.push(FieldProto::new("x", 1, FieldKind::Int32));
	a.nested_types.push(message("Deep", None));
	proto.message_types.push(a);
	proto.message_types.push(message("B", Some(zero)));
	proto.message_types.push(message("C", None));

	let mut pool = pool();
	let failure = pool.build_file(&proto).expect_err("zero enums");
	assert_eq!(failure.file, "errors.proto");
	let names: Vec<_> = failure
		.errors
		.iter()
		.map(|e| match e {
			BuildError::Resolve { name, edition, source } => {
				assert_eq!(edition, &Edition::from_number(2023));
				assert!(matches!(source, ResolveError::UnknownValue { feature, .. } if feature == "pb.TestFeatures.file_feature"));
				name.as_str()
			}
			other => panic!("unexpected error {other:?}"),
		})
		.collect();
	assert_eq!(names, ["pkg.A", "pkg.B"]);
	assert_eq!(
		failure.errors[0].to_string(),
		"pkg.A (edition 2023): Feature field pb.TestFeatures.file_feature must resolve to a known value, found TEST_ENUM_FEATURE_UNKNOWN"
	);
}

#[test]
fn lifetimes_are_checked_per_node() {
	let mut proto = editions_file("lifetimes.proto");
	let mut msg = message("M", None);
	msg.fields.push(field_with("old", 1, "[pb.test] { removed_feature: VALUE1 }"));
	proto.message_types.push(msg);

	let mut pool = pool();
	let file = pool.build_file(&proto).expect("deprecation only warns");
	assert_eq!(file.warnings().len(), 1);
	assert!(file.warnings()[0].starts_with("pkg.M.old: pb.TestFeatures.removed_feature has been deprecated"));

	let mut proto = editions_file("future.proto");
	let mut msg = message("M", None);
	msg.fields.push(field_with("new", 1, "[pb.test] { future_feature: VALUE2 }"));
	proto.message_types.push(msg);
	let failure = pool.build_file(&proto).expect_err("not yet introduced");
	assert!(matches!(
		&failure.errors[..],
		[BuildError::Lifetime { name, message, .. }]
			if name == "pkg.M.new" && message.contains("introduced until edition 2024")
	));
}

#[test]
fn strict_policy_rejects_misplaced_features() {
	let mut proto = editions_file("strict.proto");
	proto
		.message_types
		.push(message("M", Some("[pb.test] { field_feature: VALUE2 }")));
	let mut pool = pool().with_policy(OverridePolicy::strict());
	let failure = pool.build_file(&proto).expect_err("field feature on a message");
	assert!(matches!(
		&failure.errors[..],
		[BuildError::Resolve { source: ResolveError::WrongTarget { target: Target::Message, .. }, .. }]
	));
}

#[test]
fn strict_policy_accepts_legacy_syntax() {
	let mut msg = message("Legacy", None);
	msg.fields.push(FieldProto {
		label: protofeat_schema::Label::Required,
		..FieldProto::new("id", 1, FieldKind::Int64)
	});
	msg.fields.push(FieldProto::new("grp", 2, FieldKind::Group));
	msg.fields.push(FieldProto {
		label: protofeat_schema::Label::Repeated,
		packed: Some(true),
		..FieldProto::new("nums", 3, FieldKind::Int32)
	});
	let proto2 = FileProto {
		name: "legacy.proto".into(),
		package: "pkg".into(),
		syntax: Syntax::Proto2,
		message_types: vec![msg],
		..FileProto::default()
	};
	let mut numbers = message("Numbers", None);
	numbers.fields.push(FieldProto {
		label: protofeat_schema::Label::Repeated,
		packed: Some(false),
		..FieldProto::new("plain", 1, FieldKind::Int32)
	});
	let proto3 = FileProto {
		name: "numbers.proto".into(),
		syntax: Syntax::Proto3,
		message_types: vec![numbers],
		..FileProto::default()
	};

	let mut pool = pool().with_policy(OverridePolicy::strict());
	let file = pool.build_file(&proto2).expect("proto2 file builds under the strict policy");
	assert!(file.warnings().is_empty(), "{:?}", file.warnings());
	let id = file.find("pkg.Legacy.id").expect("id node");
	assert!(id.raw_features.is_empty());
	assert_eq!(id.inferred_features.field_presence(), Some(FieldPresence::LegacyRequired));
	assert_eq!(
		id.features.as_ref().and_then(|f| f.field_presence()),
		Some(FieldPresence::LegacyRequired)
	);
	assert_eq!(
		file.features("pkg.Legacy.grp").and_then(|f| f.message_encoding()),
		Some(MessageEncoding::Delimited)
	);
	assert_eq!(
		file.features("pkg.Legacy.nums").and_then(|f| f.repeated_field_encoding()),
		Some(RepeatedFieldEncoding::Packed)
	);

	let file = pool.build_file(&proto3).expect("proto3 file builds under the strict policy");
	assert_eq!(
		file.features("Numbers.plain").and_then(|f| f.repeated_field_encoding()),
		Some(RepeatedFieldEncoding::Expanded)
	);
}

#[test]
fn packed_on_strings_is_rejected() {
	let mut msg = message("Names", None);
	msg.fields.push(FieldProto {
		label: protofeat_schema::Label::Repeated,
		packed: Some(true),
		..FieldProto::new("names", 1, FieldKind::String)
	});
	let proto = FileProto {
		name: "names.proto".into(),
		syntax: Syntax::Proto2,
		message_types: vec![msg],
		..FileProto::default()
	};
	let failure = pool().build_file(&proto).expect_err("strings cannot pack");
	assert_eq!(
		failure.errors,
		vec![BuildError::NotPackable {
			name: "Names.names".into()
		}]
	);
}

#[test]
fn resolvers_are_shared_across_files() {
	let mut pool = pool();
	pool.build_file(&editions_file("one.proto")).expect("one");
	pool.build_file(&editions_file("two.proto")).expect("two");
	assert_eq!(pool.resolvers.len(), 1);
	let failure = pool.build_file(&editions_file("one.proto")).expect_err("duplicate");
	assert_eq!(
		failure.errors,
		vec![BuildError::DuplicateFile {
			file: "one.proto".into()
		}]
	);
}

#[test]
fn edition_outside_defaults() {
	let mut proto = editions_file("late.proto");
	proto.edition = Some(Edition::from_number(2025));
	let mut pool = pool();
	let failure = pool.build_file(&proto).expect_err("2025 is past the maximum");
	assert!(matches!(
		&failure.errors[..],
		[BuildError::Resolver { source: ResolveError::EditionTooLate { .. }, .. }]
	));

	let mut proto = editions_file("missing.proto");
	proto.edition = None;
	let failure = pool.build_file(&proto).expect_err("no edition");
	assert_eq!(
		failure.errors,
		vec![BuildError::MissingEdition {
			file: "missing.proto".into()
		}]
	);
}

#[test]
fn unparseable_features() {
	let mut proto = editions_file("typo.proto");
	proto.features = Some("field_presense: IMPLICIT".into());
	let mut pool = pool();
	let failure = pool.build_file(&proto).expect_err("typo");
	let message = failure.errors[0].to_string();
	assert!(message.starts_with("typo.proto: invalid features:"), "{message}");
	assert!(message.contains("Did you mean \"field_presence\"?"), "{message}");
}
