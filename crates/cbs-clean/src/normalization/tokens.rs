//! Fixed case-insensitive synonym tables and boolean tokens.
//!
//! Every table target is a fixed point of its own table (or absent from
//! it), so re-normalizing normalized output is always a no-op.

use cbs_model::fields;

const GENDER: &[(&str, &str)] = &[
    ("m", "Male"),
    ("male", "Male"),
    ("man", "Male"),
    ("f", "Female"),
    ("female", "Female"),
    ("woman", "Female"),
];

const OCCUPATION: &[(&str, &str)] = &[
    ("farmer", "Farmer"),
    ("farming", "Farmer"),
    ("trader", "Trader"),
    ("trading", "Trader"),
    ("student", "Student"),
    ("pupil", "Student"),
    ("teacher", "Teacher"),
    ("civil servant", "Civil Servant"),
    ("public servant", "Civil Servant"),
    ("unemployed", "Unemployed"),
];

const EDUCATION: &[(&str, &str)] = &[
    ("none", "None"),
    ("no formal education", "None"),
    ("basic", "Primary"),
    ("primary", "Primary"),
    ("jhs", "Primary"),
    ("secondary", "Secondary"),
    ("shs", "Secondary"),
    ("vocational", "Vocational"),
    ("tertiary", "Tertiary"),
];

const SPECIALTY: &[(&str, &str)] = &[
    ("medicine", "Medicine"),
    ("medical", "Medicine"),
    ("surgery", "Surgery"),
    ("surgical", "Surgery"),
    ("paediatrics", "Paediatrics"),
    ("pediatrics", "Paediatrics"),
    ("paeds", "Paediatrics"),
    ("obstetrics", "Obstetrics and Gynaecology"),
    ("gynaecology", "Obstetrics and Gynaecology"),
    ("obs & gyn", "Obstetrics and Gynaecology"),
    ("o&g", "Obstetrics and Gynaecology"),
    ("obstetrics and gynaecology", "Obstetrics and Gynaecology"),
];

const OUTCOME: &[(&str, &str)] = &[
    ("discharged", "Discharged"),
    ("discharge", "Discharged"),
    ("referred", "Transferred"),
    ("transferred", "Transferred"),
    ("transfer out", "Transferred"),
    ("died", "Died"),
    ("death", "Died"),
    ("dead", "Died"),
    ("absconded", "Absconded"),
];

const TRUTHY: &[&str] = &["yes", "y", "true", "1"];
const FALSY: &[&str] = &["no", "n", "false", "0"];

/// The synonym table for a canonical field, if it has one.
pub fn synonym_table(field: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match field {
        fields::GENDER => Some(GENDER),
        fields::OCCUPATION => Some(OCCUPATION),
        fields::EDUCATION => Some(EDUCATION),
        fields::SPECIALTY => Some(SPECIALTY),
        fields::OUTCOME => Some(OUTCOME),
        _ => None,
    }
}

/// Look a value up in a table, case-insensitively.
pub fn table_lookup(table: &[(&'static str, &'static str)], value: &str) -> Option<&'static str> {
    let needle = value.trim().to_lowercase();
    table
        .iter()
        .find(|(key, _)| *key == needle)
        .map(|&(_, target)| target)
}

/// Map a boolean-like token to canonical `true`/`false`; anything outside
/// the fixed token set is null.
pub fn normalize_boolean(value: &str) -> Option<&'static str> {
    let token = value.trim().to_lowercase();
    if TRUTHY.contains(&token.as_str()) {
        Some("true")
    } else if FALSY.contains(&token.as_str()) {
        Some("false")
    } else {
        None
    }
}

/// True when a value belongs to the boolean token set (either polarity).
pub fn is_boolean_token(value: &str) -> bool {
    normalize_boolean(value).is_some()
}
