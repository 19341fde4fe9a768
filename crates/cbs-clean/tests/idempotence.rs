//! Cleaning is idempotent: for every field kind and every input,
//! `clean(clean(v)) == clean(v)`.

use cbs_clean::clean_field;
use cbs_model::{FieldType, fields};
use proptest::prelude::*;

const FIELD_KINDS: &[(&str, FieldType)] = &[
    (fields::AGE_NUMBER, FieldType::Number),
    (fields::AGE_UNIT, FieldType::Text),
    (fields::GENDER, FieldType::Dropdown),
    (fields::OCCUPATION, FieldType::Dropdown),
    (fields::EDUCATION, FieldType::Dropdown),
    (fields::SPECIALTY, FieldType::Dropdown),
    (fields::OUTCOME, FieldType::Dropdown),
    (fields::ADMISSION_DATE, FieldType::Date),
    (fields::PATIENT_NUMBER, FieldType::Text),
    ("amount_paid", FieldType::Number),
    ("insured", FieldType::Boolean),
];

proptest! {
    #[test]
    fn clean_twice_equals_clean_once(value in ".{0,40}", kind in 0..FIELD_KINDS.len()) {
        let (name, field_type) = FIELD_KINDS[kind];
        let once = clean_field(name, field_type, &value);
        let twice = clean_field(name, field_type, &once);
        prop_assert_eq!(&once, &twice, "field {} not idempotent for {:?}", name, value);
    }

    #[test]
    fn realistic_inputs_are_idempotent(
        number in 0u32..150,
        unit in prop::sample::select(vec!["Year(s)", "Month(s)", "Day(s)", "years", "yrs"]),
    ) {
        let value = format!("{number} {unit}");
        let once = clean_field(fields::AGE_UNIT, FieldType::Text, &value);
        let twice = clean_field(fields::AGE_UNIT, FieldType::Text, &once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(["years", "months", "days"].contains(&once.as_str()));

        let quantity = clean_field(fields::AGE_NUMBER, FieldType::Number, &value);
        prop_assert_eq!(quantity, number.to_string());
    }
}
