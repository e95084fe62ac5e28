use thyrisk_classifiers::encoding::{EncodeOutcome, EncodingTable, FieldEncoding};
use thyrisk_classifiers::schema::{Variant, FEATURE_NAMES};

const VARIANTS: [Variant; 2] = [Variant::Lowercase, Variant::Dataset];

#[test]
fn every_listed_label_is_matched() {
    for variant in VARIANTS {
        let table = EncodingTable::for_variant(variant);
        for field in FEATURE_NAMES {
            if let FieldEncoding::Categorical(labels) = table.field(field) {
                for (label, code) in labels {
                    let encoded = table.encode(field, Some(*label));
                    assert_eq!(encoded.outcome, EncodeOutcome::Matched, "{}={}", field, label);
                    assert_eq!(encoded.value, *code as f32, "{}={}", field, label);
                }
            }
        }
    }
}

#[test]
fn unknown_and_missing_values_default_to_zero_everywhere() {
    for variant in VARIANTS {
        let table = EncodingTable::for_variant(variant);
        for field in FEATURE_NAMES {
            let missing = table.encode(field, None);
            assert_eq!(missing.value, 0.0);
            assert_eq!(missing.outcome, EncodeOutcome::Missing);

            let junk = table.encode(field, Some("definitely-not-a-label"));
            assert_eq!(junk.value, 0.0, "{}", field);
            assert!(junk.outcome.is_default());
        }
    }
}

#[test]
fn only_age_is_numeric() {
    for variant in VARIANTS {
        let table = EncodingTable::for_variant(variant);
        let numeric: Vec<&str> = FEATURE_NAMES
            .iter()
            .copied()
            .filter(|f| table.field(f) == FieldEncoding::Numeric)
            .collect();
        assert_eq!(numeric, vec!["Age"]);

        let age = table.encode("Age", Some("1e2"));
        assert_eq!(age.value, 100.0);
    }
}

#[test]
fn variants_disagree_on_case() {
    let lowercase = EncodingTable::for_variant(Variant::Lowercase);
    let dataset = EncodingTable::for_variant(Variant::Dataset);

    assert_eq!(lowercase.encode("Smoking", Some("YES")).value, 1.0);
    assert_eq!(dataset.encode("Smoking", Some("Yes")).value, 1.0);
    assert_eq!(
        dataset.encode("Smoking", Some("yes")).outcome,
        EncodeOutcome::Unrecognized
    );
}
