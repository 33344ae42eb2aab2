//! Declarative field schemas and the sample-value synthesizer used for previews.
//!
//! A [`FieldSchema`] arrives from the analysis service or a schema file as a
//! loosely typed `{type, constraints, examples}` object and is resolved into a
//! closed [`FieldKind`] up front. The [`Synthesizer`] then produces one value
//! per field per row index. Randomness and the reference clock are injected so
//! previews can be reproduced in tests.

use std::fmt;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, SeqAccess, Visitor},
    ser::SerializeMap,
};
use serde_json::Value as JsonValue;

use crate::data::{Row, Value};

pub const DEFAULT_NUMBER_MIN: f64 = 1.0;
pub const DEFAULT_NUMBER_MAX: f64 = 100.0;
const DATE_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String { examples: Vec<Value> },
    Number { min: i64, max: i64 },
    Boolean,
    Date,
    DateTime,
    Email,
    Phone,
    Uuid,
    Other(String),
}

impl FieldKind {
    fn resolve(type_name: &str, constraints: &Constraints, examples: Vec<Value>) -> FieldKind {
        match type_name.trim().to_ascii_lowercase().as_str() {
            "string" => FieldKind::String { examples },
            "number" | "integer" => {
                let (min, max) = integer_bounds(constraints);
                FieldKind::Number { min, max }
            }
            "boolean" => FieldKind::Boolean,
            "date" => FieldKind::Date,
            "datetime" => FieldKind::DateTime,
            "email" => FieldKind::Email,
            "phone" => FieldKind::Phone,
            "id" | "uuid" => FieldKind::Uuid,
            _ => FieldKind::Other(type_name.to_string()),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::String { .. } => "string",
            FieldKind::Number { .. } => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Email => "email",
            FieldKind::Phone => "phone",
            FieldKind::Uuid => "uuid",
            FieldKind::Other(name) => name,
        }
    }
}

/// Whole-number bounds inside the declared range. A range holding no integer
/// collapses to the integer nearest its midpoint.
fn integer_bounds(constraints: &Constraints) -> (i64, i64) {
    let min = constraints.min.unwrap_or(DEFAULT_NUMBER_MIN);
    let max = constraints.max.unwrap_or(DEFAULT_NUMBER_MAX);
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let (low, high) = (min.ceil(), max.floor());
    if low <= high {
        (low as i64, high as i64)
    } else {
        let nearest = ((min + max) / 2.0).round() as i64;
        (nearest, nearest)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    pub constraints: Constraints,
    pub description: Option<String>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, type_name: &str) -> Self {
        Self::build(name.into(), type_name, Constraints::default(), Vec::new(), None)
    }

    pub fn with_constraints(
        name: impl Into<String>,
        type_name: &str,
        constraints: Constraints,
    ) -> Self {
        Self::build(name.into(), type_name, constraints, Vec::new(), None)
    }

    pub fn with_examples(name: impl Into<String>, type_name: &str, examples: Vec<Value>) -> Self {
        Self::build(name.into(), type_name, Constraints::default(), examples, None)
    }

    fn build(
        name: String,
        type_name: &str,
        constraints: Constraints,
        examples: Vec<Value>,
        description: Option<String>,
    ) -> Self {
        let kind = FieldKind::resolve(type_name, &constraints, examples);
        Self {
            name,
            kind,
            constraints,
            description,
        }
    }

    fn from_entry(key: Option<String>, entry: RawFieldEntry) -> Self {
        match entry {
            RawFieldEntry::Type(type_name) => Self::build(
                key.unwrap_or_default(),
                &type_name,
                Constraints::default(),
                Vec::new(),
                None,
            ),
            RawFieldEntry::Full(raw) => {
                let name = key.or(raw.name).unwrap_or_default();
                let examples = raw.examples.into_iter().map(Value::from_json).collect();
                Self::build(
                    name,
                    raw.field_type.as_deref().unwrap_or_default(),
                    raw.constraints.unwrap_or_default(),
                    examples,
                    raw.description,
                )
            }
        }
    }

    fn to_raw(&self) -> RawFieldSchema {
        let examples = match &self.kind {
            FieldKind::String { examples } => examples.iter().map(Value::to_json).collect(),
            _ => Vec::new(),
        };
        RawFieldSchema {
            name: None,
            field_type: Some(self.kind.type_name().to_string()),
            constraints: (self.constraints != Constraints::default())
                .then(|| self.constraints.clone()),
            examples,
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawFieldSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    constraints: Option<Constraints>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    examples: Vec<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFieldEntry {
    Type(String),
    Full(RawFieldSchema),
}

/// Ordered field definitions. Deserializes from either a `name -> definition`
/// map or a list of definitions carrying a `name` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<FieldSchema>,
}

impl FieldSet {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSchema> {
        self.fields.iter()
    }

    pub fn render_rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|field| {
                vec![
                    field.name.clone(),
                    field.kind.type_name().to_string(),
                    field.description.clone().unwrap_or_default(),
                ]
            })
            .collect()
    }
}

impl FromIterator<FieldSchema> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldSchema>>(iter: I) -> Self {
        FieldSet::new(iter.into_iter().collect())
    }
}

impl Serialize for FieldSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.to_raw())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldSetVisitor;

        impl<'de> Visitor<'de> for FieldSetVisitor {
            type Value = FieldSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field definitions or a list of named fields")
            }

            fn visit_map<A>(self, mut map: A) -> Result<FieldSet, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Vec::new();
                while let Some((name, entry)) = map.next_entry::<String, RawFieldEntry>()? {
                    fields.push(FieldSchema::from_entry(Some(name), entry));
                }
                Ok(FieldSet { fields })
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<FieldSet, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut fields = Vec::new();
                while let Some(entry) = seq.next_element::<RawFieldEntry>()? {
                    fields.push(FieldSchema::from_entry(None, entry));
                }
                Ok(FieldSet { fields })
            }
        }

        deserializer.deserialize_any(FieldSetVisitor)
    }
}

pub struct Synthesizer<R = StdRng> {
    rng: R,
    now: DateTime<Utc>,
}

impl Synthesizer<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Seeded when a seed is given, entropy-backed otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }
}

impl Default for Synthesizer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Synthesizer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            now: Utc::now(),
        }
    }

    /// Pins the clock that date and datetime fields count back from.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn synthesize(&mut self, field: &FieldSchema, row_index: usize) -> Value {
        let ordinal = row_index + 1;
        match &field.kind {
            FieldKind::String { examples } if !examples.is_empty() => {
                examples[row_index % examples.len()].clone()
            }
            FieldKind::String { .. } => {
                let label = if field.name.is_empty() {
                    "value"
                } else {
                    field.name.as_str()
                };
                Value::String(format!("sample_{label}_{ordinal}"))
            }
            FieldKind::Number { min, max } => Value::Number(self.rng.gen_range(*min..=*max) as f64),
            FieldKind::Boolean => Value::Boolean(self.rng.gen_bool(0.5)),
            FieldKind::Date => {
                Value::String(self.recent_instant().format("%Y-%m-%d").to_string())
            }
            FieldKind::DateTime => Value::String(
                self.recent_instant()
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            FieldKind::Email => Value::String(format!("user{ordinal}@example.com")),
            FieldKind::Phone => {
                Value::String(format!("+1-555-{:04}", self.rng.gen_range(0..10_000)))
            }
            FieldKind::Uuid => {
                let bytes: [u8; 16] = self.rng.r#gen();
                Value::String(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
            }
            FieldKind::Other(_) => Value::String(format!("sample_value_{ordinal}")),
        }
    }

    pub fn synthesize_row(&mut self, fields: &FieldSet, row_index: usize) -> Row {
        let mut row = Row::with_capacity(fields.len());
        for field in fields.iter() {
            let value = self.synthesize(field, row_index);
            row.insert(field.name.as_str(), value);
        }
        row
    }

    pub fn preview_rows(&mut self, fields: &FieldSet, count: usize) -> Vec<Row> {
        (0..count)
            .map(|row_index| self.synthesize_row(fields, row_index))
            .collect()
    }

    fn recent_instant(&mut self) -> DateTime<Utc> {
        let offset = self.rng.gen_range(0..DATE_WINDOW_DAYS);
        self.now - Duration::days(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn string_without_examples_uses_field_name() {
        let mut synth = Synthesizer::seeded(1);
        let field = FieldSchema::new("city", "string");
        assert_eq!(synth.synthesize(&field, 0), Value::from("sample_city_1"));
        let unnamed = FieldSchema::new("", "string");
        assert_eq!(synth.synthesize(&unnamed, 4), Value::from("sample_value_5"));
    }

    #[test]
    fn unknown_types_fall_back_to_default_value() {
        let mut synth = Synthesizer::seeded(1);
        let field = FieldSchema::new("notes", "text");
        assert_eq!(field.kind, FieldKind::Other("text".to_string()));
        assert_eq!(synth.synthesize(&field, 2), Value::from("sample_value_3"));
    }

    #[test]
    fn email_is_derived_from_row_index() {
        let mut synth = Synthesizer::seeded(1);
        let field = FieldSchema::new("contact", "email");
        assert_eq!(synth.synthesize(&field, 6), Value::from("user7@example.com"));
    }

    #[test]
    fn number_defaults_to_one_through_hundred() {
        let mut synth = Synthesizer::seeded(9);
        let field = FieldSchema::new("qty", "integer");
        assert_eq!(field.kind, FieldKind::Number { min: 1, max: 100 });
        for idx in 0..200 {
            let value = synth.synthesize(&field, idx).to_number().unwrap();
            assert!((1.0..=100.0).contains(&value));
            assert_eq!(value.fract(), 0.0);
        }
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let constraints = Constraints {
            min: Some(10.0),
            max: Some(2.0),
            ..Constraints::default()
        };
        let field = FieldSchema::with_constraints("n", "number", constraints);
        assert_eq!(field.kind, FieldKind::Number { min: 2, max: 10 });
    }

    #[test]
    fn fractional_bounds_stay_inside_the_range() {
        let bounds = |min, max| {
            let constraints = Constraints {
                min: Some(min),
                max: Some(max),
                ..Constraints::default()
            };
            FieldSchema::with_constraints("n", "number", constraints).kind
        };
        assert_eq!(bounds(0.5, 3.5), FieldKind::Number { min: 1, max: 3 });
        assert_eq!(bounds(3.5, 0.5), FieldKind::Number { min: 1, max: 3 });
        assert_eq!(bounds(1.5, 1.7), FieldKind::Number { min: 2, max: 2 });
        assert_eq!(bounds(1.1, 1.3), FieldKind::Number { min: 1, max: 1 });
    }

    #[test]
    fn dates_fall_within_the_last_year() {
        let now = fixed_clock();
        let mut synth = Synthesizer::seeded(3).at(now);
        let date_field = FieldSchema::new("joined", "date");
        let stamp_field = FieldSchema::new("seen_at", "datetime");
        for idx in 0..50 {
            let Value::String(date) = synth.synthesize(&date_field, idx) else {
                panic!("date should be a string");
            };
            let parsed = chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap();
            let days_back = (now.date_naive() - parsed).num_days();
            assert!((0..DATE_WINDOW_DAYS).contains(&days_back));

            let Value::String(stamp) = synth.synthesize(&stamp_field, idx) else {
                panic!("datetime should be a string");
            };
            let parsed = DateTime::parse_from_rfc3339(&stamp).unwrap();
            assert!(parsed <= now);
            assert!(stamp.ends_with('Z'));
        }
    }

    #[test]
    fn phone_and_uuid_have_expected_shapes() {
        let mut synth = Synthesizer::seeded(5);
        let Value::String(phone) = synth.synthesize(&FieldSchema::new("p", "phone"), 0) else {
            panic!("phone should be a string");
        };
        assert!(phone.starts_with("+1-555-"));
        assert_eq!(phone.len(), "+1-555-0000".len());

        let Value::String(id) = synth.synthesize(&FieldSchema::new("id", "id"), 0) else {
            panic!("uuid should be a string");
        };
        let parsed = uuid::Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn same_seed_reproduces_rows() {
        let fields: FieldSet = vec![
            FieldSchema::new("id", "uuid"),
            FieldSchema::new("score", "number"),
            FieldSchema::new("active", "boolean"),
        ]
        .into_iter()
        .collect();
        let now = fixed_clock();
        let first = Synthesizer::seeded(42).at(now).preview_rows(&fields, 5);
        let second = Synthesizer::seeded(42).at(now).preview_rows(&fields, 5);
        assert_eq!(first, second);
    }

    #[test]
    fn field_set_reads_map_and_list_forms() {
        let from_map: FieldSet = serde_json::from_str(
            r#"{"age": {"type": "number", "constraints": {"min": 18, "max": 65}},
                "tier": "string"}"#,
        )
        .unwrap();
        assert_eq!(from_map.len(), 2);
        assert_eq!(from_map.fields()[0].name, "age");
        assert_eq!(from_map.fields()[0].kind, FieldKind::Number { min: 18, max: 65 });
        assert_eq!(from_map.fields()[1].kind, FieldKind::String { examples: vec![] });

        let from_list: FieldSet =
            serde_json::from_str(r#"[{"name": "email", "type": "email"}]"#).unwrap();
        assert_eq!(from_list.fields()[0].name, "email");
        assert_eq!(from_list.fields()[0].kind, FieldKind::Email);
    }

    #[test]
    fn field_set_serializes_back_to_map_form() {
        let fields: FieldSet = serde_json::from_str(
            r#"{"tier": {"type": "string", "examples": ["gold", "silver"],
                "description": "plan"}}"#,
        )
        .unwrap();
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tier": {"type": "string", "examples": ["gold", "silver"], "description": "plan"}
            })
        );
    }
}
