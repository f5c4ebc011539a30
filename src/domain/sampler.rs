//! Random leaf values, expression snippets and property assignments.

use rand::{seq::index, seq::IndexedRandom, Rng};
use serde_json::Value;

use crate::domain::catalog::Component;
use crate::domain::entities::{DataType, PropertyAssignment, ValueExpression};

/// Probability that a generic expression comes from the snippet pool.
const SNIPPET_PROBABILITY: f64 = 0.5;

const NUMBER_RANGE: std::ops::Range<f64> = -1000.0..1000.0;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Claude", "Donald", "Edsger", "Frances", "Grace", "Hedy", "John",
    "Katherine", "Ken", "Linus", "Margaret", "Niklaus", "Radia", "Shafi", "Tim", "Whitfield",
    "Yukihiro",
];

const LAST_NAMES: &[&str] = &[
    "Allen", "Backus", "Berners", "Dijkstra", "Diffie", "Goldwasser", "Hamilton", "Hopper",
    "Johnson", "Kay", "Knuth", "Lamarr", "Liskov", "Lovelace", "Matsumoto", "McCarthy",
    "Perlman", "Ritchie", "Shannon", "Thompson", "Torvalds", "Turing", "Wirth",
];

const COLORS: &[&str] = &[
    "black", "blue", "cyan", "fuchsia", "gold", "green", "indigo", "ivory", "lavender", "lime",
    "magenta", "maroon", "navy", "olive", "orange", "orchid", "pink", "plum", "purple", "red",
    "salmon", "silver", "tan", "teal", "turquoise", "violet", "white", "yellow",
];

const SNIPPETS: &[&str] = &[
    "Math.random() > 0.5",
    "new Date().getFullYear()",
    "user.firstName + \" \" + user.lastName",
    "items.filter((item) => item.selected).length",
    "theme.palette.primary.main",
    "props.disabled ?? false",
    "`${count} items remaining`",
    "[1, 2, 3].map((n) => n * 2)",
    "window.innerWidth < 600 ? \"small\" : \"large\"",
    "JSON.parse(localStorage.getItem(\"settings\") ?? \"{}\")",
];

/// Draws typed values and property assignments for one generator session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSampler {
    /// Probability that a non-forced value is expression-form.
    epsilon: f64,
}

impl ValueSampler {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Sample a value of `data_type` for a field state default.
    ///
    /// Arrays are JSON-encoded and always expression-form. Non-string scalars
    /// are always expression-form; a string is expression-form (and quoted)
    /// only when `force_expression` is set.
    pub fn sample_field_value<R: Rng + ?Sized>(
        &self,
        random: &mut R,
        data_type: DataType,
        is_array: bool,
        force_expression: bool,
        array_length: usize,
    ) -> ValueExpression {
        if is_array {
            let elements: Vec<Value> = (0..array_length)
                .map(|_| sample_json(random, data_type))
                .collect();
            return ValueExpression::expression(Value::Array(elements).to_string());
        }

        match data_type {
            DataType::Boolean => ValueExpression::expression(random.random_bool(0.5).to_string()),
            DataType::Number => ValueExpression::expression(sample_number(random).to_string()),
            DataType::String => {
                let name = sample_full_name(random);
                if force_expression {
                    let quote = if random.random_bool(0.5) { '\'' } else { '"' };
                    ValueExpression::expression(format!("{quote}{name}{quote}"))
                } else {
                    ValueExpression::literal(name)
                }
            }
        }
    }

    /// A snippet from the curated pool or an immediately invoked arrow function.
    pub fn sample_generic_expression<R: Rng + ?Sized>(&self, random: &mut R) -> String {
        if random.random_bool(SNIPPET_PROBABILITY) {
            if let Some(snippet) = SNIPPETS.choose(random) {
                return (*snippet).to_string();
            }
        }
        format!("(() => {})()", sample_number(random))
    }

    /// Value for an untyped component property.
    pub fn sample_generic_value<R: Rng + ?Sized>(&self, random: &mut R) -> ValueExpression {
        if random.random_bool(self.epsilon) {
            ValueExpression::expression(self.sample_generic_expression(random))
        } else {
            ValueExpression::literal(pick(random, COLORS))
        }
    }

    /// Assign a random subset of `component`'s properties, in declaration order.
    pub fn sample_property_assignments<R: Rng + ?Sized>(
        &self,
        random: &mut R,
        component: &Component,
    ) -> Vec<PropertyAssignment> {
        let total = component.properties.len();
        let size = random.random_range(0..=total);
        let mut chosen = index::sample(random, total, size).into_vec();
        chosen.sort_unstable();

        chosen
            .into_iter()
            .map(|i| PropertyAssignment {
                key: component.properties[i].key.clone(),
                value: self.sample_generic_value(random),
            })
            .collect()
    }
}

fn pick<R: Rng + ?Sized>(random: &mut R, pool: &[&'static str]) -> &'static str {
    pool.choose(random).copied().unwrap_or_default()
}

fn sample_full_name<R: Rng + ?Sized>(random: &mut R) -> String {
    format!("{} {}", pick(random, FIRST_NAMES), pick(random, LAST_NAMES))
}

fn sample_number<R: Rng + ?Sized>(random: &mut R) -> f64 {
    let value: f64 = random.random_range(NUMBER_RANGE);
    (value * 100.0).round() / 100.0
}

fn sample_json<R: Rng + ?Sized>(random: &mut R, data_type: DataType) -> Value {
    match data_type {
        DataType::Boolean => Value::Bool(random.random_bool(0.5)),
        DataType::Number => Value::from(sample_number(random)),
        DataType::String => Value::String(sample_full_name(random)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[rstest]
    #[case(DataType::Boolean)]
    #[case(DataType::Number)]
    #[case(DataType::String)]
    fn given_array_when_sampling_field_value_then_json_expression(#[case] data_type: DataType) {
        let mut rng = StdRng::seed_from_u64(21);
        let sampler = ValueSampler::new(0.0);

        let value = sampler.sample_field_value(&mut rng, data_type, true, false, 3);

        assert!(value.is_expression);
        let parsed: Vec<Value> = serde_json::from_str(&value.text).unwrap();
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn given_empty_array_when_sampling_then_renders_brackets() {
        let mut rng = StdRng::seed_from_u64(2);
        let value = ValueSampler::new(0.0).sample_field_value(&mut rng, DataType::Number, true, false, 0);
        assert_eq!(value, ValueExpression::expression("[]"));
    }

    #[test]
    fn given_number_when_sampling_then_expression_with_two_decimals() {
        let mut rng = StdRng::seed_from_u64(8);
        let sampler = ValueSampler::new(0.0);
        for _ in 0..50 {
            let value = sampler.sample_field_value(&mut rng, DataType::Number, false, false, 0);
            assert!(value.is_expression);
            let number: f64 = value.text.parse().unwrap();
            assert!((-1000.0..=1000.0).contains(&number));
            assert!(value.text.split('.').nth(1).map_or(true, |d| d.len() <= 2));
        }
    }

    #[test]
    fn given_string_when_forcing_expression_then_quoted() {
        let mut rng = StdRng::seed_from_u64(13);
        let sampler = ValueSampler::new(0.0);

        let expression = sampler.sample_field_value(&mut rng, DataType::String, false, true, 0);
        let literal = sampler.sample_field_value(&mut rng, DataType::String, false, false, 0);

        assert!(expression.is_expression);
        let quote = expression.text.chars().next().unwrap();
        assert!(quote == '\'' || quote == '"');
        assert!(expression.text.ends_with(quote));
        assert!(!literal.is_expression);
        assert_eq!(literal.text.split(' ').count(), 2);
    }

    #[test]
    fn given_many_draws_when_sampling_generic_expression_then_both_forms_occur() {
        let mut rng = StdRng::seed_from_u64(4);
        let sampler = ValueSampler::new(0.5);
        let samples: Vec<String> = (0..200)
            .map(|_| sampler.sample_generic_expression(&mut rng))
            .collect();

        assert!(samples.iter().any(|s| s.starts_with("(() => ")));
        assert!(samples.iter().any(|s| SNIPPETS.contains(&s.as_str())));
    }

    #[test]
    fn given_zero_epsilon_when_sampling_generic_value_then_color_literal() {
        let mut rng = StdRng::seed_from_u64(6);
        let value = ValueSampler::new(0.0).sample_generic_value(&mut rng);
        assert!(!value.is_expression);
        assert!(COLORS.contains(&value.text.as_str()));
    }

    #[test]
    fn given_component_when_sampling_assignments_then_ordered_unique_subset() {
        let mut rng = StdRng::seed_from_u64(17);
        let sampler = ValueSampler::new(0.5);
        let component = Component::new("myTextBox", &["textColor", "textSize", "textWeight", "borderColor"]);
        let mut sizes = std::collections::HashSet::new();

        for _ in 0..200 {
            let assignments = sampler.sample_property_assignments(&mut rng, &component);
            let positions: Vec<usize> = assignments
                .iter()
                .map(|a| {
                    component
                        .properties
                        .iter()
                        .position(|p| p.key == a.key)
                        .unwrap()
                })
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
            sizes.insert(assignments.len());
        }

        assert_eq!(sizes.len(), 5);
    }

    #[test]
    fn given_component_without_properties_when_sampling_then_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let assignments =
            ValueSampler::new(0.5).sample_property_assignments(&mut rng, &Component::new("counter", &[]));
        assert!(assignments.is_empty());
    }
}
