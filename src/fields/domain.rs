//! Domain field: values restricted to a set of choices

use std::collections::HashMap;
use std::sync::PoisonError;

use crate::errors::ValidationError;
use crate::field::{FieldType, SharedValues};
use crate::fields::Float;
use crate::value::Value;

const MAX_CHOICES_CHARS: usize = 200;

/// A field which only accepts a specific set of values.
///
/// The parsed output is the representation listed in the choices: with
/// choices `[1]`, the inputs `1.0` and `" 1.0e0 "` both come out as `Int(1)`,
/// and with case-insensitive matching the output takes the choice's casing.
#[derive(Debug, Clone)]
pub struct Domain {
    choices: Choices,
    case_sensitive: bool,
}

#[derive(Debug, Clone)]
enum Choices {
    Fixed {
        originals: Vec<Value>,
        // choice key -> canonical representation
        map: HashMap<Value, Value>,
        has_numeric: bool,
    },
    // Live handle, typically another field's seen values; re-examined on
    // every parse
    Shared(SharedValues),
}

impl Domain {
    /// Domain over a fixed list of choices
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let originals: Vec<Value> = choices.into_iter().map(Into::into).collect();
        let mut domain = Self {
            choices: Choices::Fixed {
                originals,
                map: HashMap::new(),
                has_numeric: false,
            },
            case_sensitive: true,
        };
        domain.rebuild();
        domain
    }

    /// Domain over a live, shared value set.
    ///
    /// The set is read on every parse, so values accepted by a unique field
    /// earlier in the same file are immediately valid here:
    ///
    /// ```
    /// use fuzzyfields::{Domain, Field, StringField};
    ///
    /// let id = Field::new(StringField::new()).named("id").unique(true);
    /// let crossref = Field::new(Domain::shared(id.seen_values().unwrap())).named("crossref");
    ///
    /// id.parse("a01").unwrap();
    /// assert!(crossref.parse("a01").is_ok());
    /// assert!(crossref.parse("a02").is_err());
    /// ```
    #[must_use]
    pub const fn shared(values: SharedValues) -> Self {
        Self {
            choices: Choices::Shared(values),
            case_sensitive: true,
        }
    }

    /// Match strings ignoring case; output takes the casing of the choice
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self.rebuild();
        self
    }

    fn rebuild(&mut self) {
        if let Choices::Fixed {
            originals,
            map,
            has_numeric,
        } = &mut self.choices
        {
            map.clear();
            *has_numeric = false;
            for choice in originals.iter() {
                let key = match choice {
                    Value::Str(s) if !self.case_sensitive => Value::Str(s.to_lowercase()),
                    v => {
                        if v.is_numeric() {
                            *has_numeric = true;
                        }
                        v.clone()
                    },
                };
                map.insert(key, choice.clone());
            }
        }
    }

    fn fold_case(&self, value: &Value) -> Value {
        match value {
            Value::Str(s) if !self.case_sensitive => Value::Str(s.to_lowercase()),
            v => v.clone(),
        }
    }

    /// Comma-joined, sorted, truncated list of choices for error messages
    fn summarize(choices: &[Value]) -> String {
        let mut rendered: Vec<String>;
        if !choices.is_empty() && choices.iter().all(Value::is_numeric) {
            let mut nums: Vec<&Value> = choices.iter().collect();
            nums.sort_by(|a, b| {
                let (a, b) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
            });
            rendered = nums.iter().map(ToString::to_string).collect();
        } else {
            rendered = choices.iter().map(ToString::to_string).collect();
            rendered.sort();
        }
        let joined = rendered.join(",");
        if joined.chars().count() > MAX_CHOICES_CHARS {
            let mut truncated: String = joined.chars().take(MAX_CHOICES_CHARS).collect();
            truncated.push_str("...");
            truncated
        } else {
            joined
        }
    }

    fn lookup_fixed(
        &self,
        map: &HashMap<Value, Value>,
        has_numeric: bool,
        value: &Value,
    ) -> Option<Value> {
        let key = self.fold_case(value);
        if let Some(canonical) = map.get(&key) {
            return Some(canonical.clone());
        }
        // String spellings of numeric choices: "1.0e0" matches choice 1
        if has_numeric {
            if let Value::Str(_) = value {
                if let Ok(num) = Float::new().validate(value.clone(), None) {
                    return map.get(&num).cloned();
                }
            }
        }
        None
    }

    fn lookup_shared(&self, values: &SharedValues, value: &Value) -> Option<Value> {
        let seen = values.read().unwrap_or_else(PoisonError::into_inner);
        if self.case_sensitive {
            if let Some(found) = seen.get(value) {
                return Some(found.clone());
            }
        } else {
            let key = self.fold_case(value);
            for candidate in seen.iter() {
                if self.fold_case(candidate) == key {
                    return Some(candidate.clone());
                }
            }
        }
        if let Value::Str(_) = value {
            if seen.iter().any(Value::is_numeric) {
                if let Ok(num) = Float::new().validate(value.clone(), None) {
                    return seen.get(&num).cloned();
                }
            }
        }
        None
    }
}

impl FieldType for Domain {
    fn name(&self) -> &str {
        "domain"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        let found = match &self.choices {
            Choices::Fixed {
                map, has_numeric, ..
            } => self.lookup_fixed(map, *has_numeric, &value),
            Choices::Shared(values) => self.lookup_shared(values, &value),
        };
        found.ok_or_else(|| {
            let summary = match &self.choices {
                Choices::Fixed { originals, .. } => Self::summarize(originals),
                Choices::Shared(values) => {
                    let seen = values.read().unwrap_or_else(PoisonError::into_inner);
                    let snapshot: Vec<Value> = seen.iter().cloned().collect();
                    Self::summarize(&snapshot)
                },
            };
            ValidationError::out_of_domain(field, value, summary)
        })
    }

    fn describe(&self) -> String {
        match &self.choices {
            Choices::Fixed { originals, .. } => {
                format!("Any of: {}", Self::summarize(originals))
            },
            Choices::Shared(values) => {
                let seen = values.read().unwrap_or_else(PoisonError::into_inner);
                if seen.is_empty() {
                    "Choice from a domain (dynamically defined at runtime)".to_string()
                } else {
                    let snapshot: Vec<Value> = seen.iter().cloned().collect();
                    format!("Any of: {}", Self::summarize(&snapshot))
                }
            },
        }
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(self.clone())
    }
}
