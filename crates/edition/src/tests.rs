use std::cmp::Ordering;

use proptest::prelude::*;

use super::*;

fn ed(s: &str) -> Edition {
	s.parse().unwrap()
}

#[test]
fn dotted_chain_is_ascending() {
	let chain = ["LEGACY", "2023", "2023.1", "2023.90", "2024", "99997", "99998"];
	for pair in chain.windows(2) {
		assert!(ed(pair[0]) < ed(pair[1]), "{} < {}", pair[0], pair[1]);
	}
}

#[test]
fn segment_length_decides_before_lexicographic() {
	assert!(ed("9") < ed("10"));
	assert!(ed("10") < ed("99"));
	assert!(ed("99") < ed("100"));
	assert!(ed("2023.9") < ed("2023.10"));
}

#[test]
fn named_dialects_precede_numbered() {
	assert!(Edition::Legacy < Edition::Proto2);
	assert!(Edition::Proto2 < Edition::Proto3);
	assert!(Edition::Proto3 < ed("1"));
	assert!(Edition::Legacy < ed("1_TEST_ONLY"));
}

#[test]
fn test_only_marker_breaks_ties() {
	assert!(ed("99997") < ed("99997_TEST_ONLY"));
	assert!(ed("99997_TEST_ONLY") < ed("99998"));
	assert_eq!(ed("99997_TEST_ONLY"), Edition::test_only(99997));
}

#[test]
fn proto_enum_spellings_are_accepted() {
	assert_eq!(ed("EDITION_2023"), Edition::from_number(2023));
	assert_eq!(ed("EDITION_LEGACY"), Edition::Legacy);
	assert_eq!(ed("EDITION_99999_TEST_ONLY"), Edition::test_only(99999));
	assert_eq!(ed("2023.1"), Edition::from_segments(&[2023, 1]));
}

#[test]
fn display_round_trips() {
	for s in ["LEGACY", "PROTO2", "PROTO3", "2023", "2023.1", "99998_TEST_ONLY"] {
		assert_eq!(ed(s).to_string(), s);
	}
}

#[test]
fn rejects_unknown_and_malformed_input() {
	for bad in ["", "UNKNOWN", "EDITION_UNKNOWN", "20x3", "2023.", ".1", "2023..1", "023", "-1"] {
		let err = bad.parse::<Edition>().unwrap_err();
		assert!(err.to_string().starts_with("Invalid edition"), "{bad}: {err}");
	}
	let err = "UNKNOWN".parse::<Edition>().unwrap_err();
	assert!(err.to_string().contains("Invalid edition UNKNOWN"));
}

#[test]
fn compare_str_propagates_invalid_input() {
	assert_eq!(Edition::compare_str("2023", "2024"), Ok(Ordering::Less));
	assert!(Edition::compare_str("UNKNOWN", "2024").is_err());
}

#[test]
fn floor_index_finds_greatest_le() {
	fn key(e: &Edition) -> &Edition {
		e
	}
	let table = [Edition::Legacy, ed("2023"), ed("2024"), ed("2025")];
	assert_eq!(ed("2024.1").floor_index(&table, key), Some(2));
	assert_eq!(ed("3456").floor_index(&table, key), Some(3));
	assert_eq!(ed("2023").floor_index(&table, key), Some(1));
	assert_eq!(Edition::Proto3.floor_index(&table, key), Some(0));
	assert_eq!(Edition::Legacy.floor_index(&table[1..], key), None);
}

#[test]
fn serde_uses_display_strings() {
	let json = serde_json::to_string(&ed("2023.1")).unwrap();
	assert_eq!(json, "\"2023.1\"");
	let back: Edition = serde_json::from_str("\"99997_TEST_ONLY\"").unwrap();
	assert_eq!(back, Edition::test_only(99997));
	let err = serde_json::from_str::<Edition>("\"UNKNOWN\"").unwrap_err();
	assert!(err.to_string().contains("Invalid edition UNKNOWN"));
}

fn dotted() -> impl Strategy<Value = String> {
	prop::collection::vec(0u32..100_000, 1..4)
		.prop_map(|segs| segs.iter().map(u32::to_string).collect::<Vec<_>>().join("."))
}

proptest! {
	#[test]
	fn numeric_agreement(m in 0u64..u64::MAX, n in 0u64..u64::MAX) {
		prop_assert_eq!(Edition::from_number(m).cmp(&Edition::from_number(n)), m.cmp(&n));
	}

	#[test]
	fn order_is_total_and_antisymmetric(a in dotted(), b in dotted()) {
		let (a, b) = (ed(&a), ed(&b));
		let forward = a.cmp(&b);
		prop_assert_eq!(forward.reverse(), b.cmp(&a));
		prop_assert_eq!(forward == Ordering::Equal, a == b);
	}

	#[test]
	fn dotted_order_matches_numeric_tuples(a in prop::collection::vec(0u64..10_000, 1..4), b in prop::collection::vec(0u64..10_000, 1..4)) {
		let render = |v: &[u64]| v.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
		prop_assert_eq!(ed(&render(&a)).cmp(&ed(&render(&b))), a.cmp(&b));
	}
}
