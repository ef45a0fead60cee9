use graphql_parser::query::{
    Definition, Directive, Document, OperationDefinition, Selection, SelectionSet, Value,
    VariableDefinition,
};

use crate::error::PrettifyError;

/// Reformat a GraphQL document into canonical two-space indented text.
///
/// The output carries no trailing newline and prettifying it again yields
/// the same text. Float literals keep the text they were written with.
pub fn prettify(text: &str) -> Result<String, PrettifyError> {
    let mut document = graphql_parser::parse_query::<String>(text).map_err(|e| PrettifyError {
        text: text.to_string(),
        message: e.to_string(),
    })?;

    let floats = FloatLiterals::scan(text);
    for definition in &mut document.definitions {
        floats.restore_definition(definition);
    }

    Ok(document.to_string().trim_end().to_string())
}

/// Prettify for display, falling back to the raw text when it does not parse
pub fn prettify_lenient(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    prettify(text).unwrap_or_else(|_| text.to_string())
}

/// Float tokens as written in the source, with their parsed values.
///
/// The parser keeps floats as `f64` and prints them back without a fraction
/// when they are whole (`1.0` becomes `1`), which turns them into Int
/// literals. Printed floats are swapped for their source text instead.
struct FloatLiterals(Vec<(f64, String)>);

impl FloatLiterals {
    fn scan(text: &str) -> Self {
        let bytes = text.as_bytes();
        let len = bytes.len();
        let digits_from = |mut i: usize| {
            while i < len && bytes[i].is_ascii_digit() {
                i += 1;
            }
            i
        };

        let mut found = Vec::new();
        let mut i = 0;
        while i < len {
            match bytes[i] {
                b'#' => {
                    while i < len && bytes[i] != b'\n' {
                        i += 1;
                    }
                }
                b'"' if bytes[i..].starts_with(b"\"\"\"") => {
                    i += 3;
                    while i < len && !bytes[i..].starts_with(b"\"\"\"") {
                        i += if bytes[i..].starts_with(b"\\\"\"\"") { 4 } else { 1 };
                    }
                    i += 3;
                }
                b'"' => {
                    i += 1;
                    while i < len && bytes[i] != b'"' {
                        i += if bytes[i] == b'\\' { 2 } else { 1 };
                    }
                    i += 1;
                }
                b if b == b'_' || b.is_ascii_alphabetic() => {
                    while i < len && (bytes[i] == b'_' || bytes[i].is_ascii_alphanumeric()) {
                        i += 1;
                    }
                }
                b if b == b'-' || b.is_ascii_digit() => {
                    let start = i;
                    i = digits_from(i + 1);
                    let mut is_float = false;
                    if i < len && bytes[i] == b'.' {
                        is_float = true;
                        i = digits_from(i + 1);
                    }
                    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
                        is_float = true;
                        i += 1;
                        if i < len && (bytes[i] == b'+' || bytes[i] == b'-') {
                            i += 1;
                        }
                        i = digits_from(i);
                    }
                    if is_float {
                        let raw = &text[start..i];
                        if let Ok(value) = raw.parse::<f64>() {
                            found.push((value, raw.to_string()));
                        }
                    }
                }
                _ => i += 1,
            }
        }
        Self(found)
    }

    fn text_for(&self, value: f64) -> String {
        self.0
            .iter()
            .find(|(parsed, _)| *parsed == value)
            .map(|(_, raw)| raw.clone())
            // Debug always prints a fraction or an exponent
            .unwrap_or_else(|| format!("{:?}", value))
    }

    fn restore_definition(&self, definition: &mut Definition<'_, String>) {
        match definition {
            Definition::Operation(operation) => match operation {
                OperationDefinition::SelectionSet(set) => self.restore_selection_set(set),
                OperationDefinition::Query(query) => {
                    self.restore_variables(&mut query.variable_definitions);
                    self.restore_directives(&mut query.directives);
                    self.restore_selection_set(&mut query.selection_set);
                }
                OperationDefinition::Mutation(mutation) => {
                    self.restore_variables(&mut mutation.variable_definitions);
                    self.restore_directives(&mut mutation.directives);
                    self.restore_selection_set(&mut mutation.selection_set);
                }
                OperationDefinition::Subscription(subscription) => {
                    self.restore_variables(&mut subscription.variable_definitions);
                    self.restore_directives(&mut subscription.directives);
                    self.restore_selection_set(&mut subscription.selection_set);
                }
            },
            Definition::Fragment(fragment) => {
                self.restore_directives(&mut fragment.directives);
                self.restore_selection_set(&mut fragment.selection_set);
            }
        }
    }

    fn restore_variables(&self, variables: &mut [VariableDefinition<'_, String>]) {
        for variable in variables {
            if let Some(value) = &mut variable.default_value {
                self.restore_value(value);
            }
        }
    }

    fn restore_directives(&self, directives: &mut [Directive<'_, String>]) {
        for directive in directives {
            for (_, value) in &mut directive.arguments {
                self.restore_value(value);
            }
        }
    }

    fn restore_selection_set(&self, set: &mut SelectionSet<'_, String>) {
        for selection in &mut set.items {
            match selection {
                Selection::Field(field) => {
                    for (_, value) in &mut field.arguments {
                        self.restore_value(value);
                    }
                    self.restore_directives(&mut field.directives);
                    self.restore_selection_set(&mut field.selection_set);
                }
                Selection::FragmentSpread(spread) => self.restore_directives(&mut spread.directives),
                Selection::InlineFragment(inline) => {
                    self.restore_directives(&mut inline.directives);
                    self.restore_selection_set(&mut inline.selection_set);
                }
            }
        }
    }

    fn restore_value(&self, value: &mut Value<'_, String>) {
        match value {
            // Enum values print their name verbatim
            Value::Float(float) => {
                let text = self.text_for(*float);
                *value = Value::Enum(text);
            }
            Value::List(items) => {
                for item in items {
                    self.restore_value(item);
                }
            }
            Value::Object(fields) => {
                for field in fields.values_mut() {
                    self.restore_value(field);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_shorthand_query() {
        let pretty = prettify("{ viewer { id } }").unwrap();
        assert_eq!(pretty, "{\n  viewer {\n    id\n  }\n}");
    }

    #[test]
    fn prettify_is_idempotent() {
        let inputs = [
            "{ viewer { id } }",
            "query Users($first: Int = 10) { users(first: $first) { id ...UserFields } }\nfragment UserFields on User { firstName @include(if: true) }",
            "mutation{createUser(input:{name:\"a\",tags:[\"x\",\"y\"]}){id}}",
            "query($ratio: Float = 0.50) { a(x: 1.0, y: [2.5e3, -3E-2]) }",
        ];

        for input in inputs {
            let once = prettify(input).unwrap();
            let twice = prettify(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    #[test]
    fn float_literals_stay_floats() {
        assert_eq!(
            prettify("{ a(x: 1.0, y: 2.5e3) }").unwrap(),
            "{\n  a(x: 1.0, y: 2.5e3)\n}"
        );

        let pretty = prettify("query($r: Float = 2.0) { a(n: 3, o: {w: 4.0}, l: [1E2]) @skip(if: false) }").unwrap();
        assert!(pretty.contains("$r: Float = 2.0"), "{pretty}");
        assert!(pretty.contains("n: 3"), "{pretty}");
        assert!(pretty.contains("w: 4.0"), "{pretty}");
        assert!(pretty.contains("[1E2]"), "{pretty}");
    }

    #[test]
    fn reprinted_floats_parse_as_floats() {
        let pretty = prettify("{ a(x: 1.0, y: 2.5e3, z: 7) }").unwrap();
        let document = graphql_parser::parse_query::<String>(&pretty).unwrap();

        let Definition::Operation(OperationDefinition::SelectionSet(set)) = &document.definitions[0] else {
            panic!("expected a shorthand query");
        };
        let Selection::Field(field) = &set.items[0] else {
            panic!("expected a field");
        };
        assert!(matches!(field.arguments[0].1, Value::Float(x) if x == 1.0));
        assert!(matches!(field.arguments[1].1, Value::Float(y) if y == 2500.0));
        assert!(matches!(field.arguments[2].1, Value::Int(_)));
    }

    #[test]
    fn digits_in_strings_and_names_are_not_floats() {
        let pretty = prettify("{ field2(s: \"1.5\", t: \"\"\"2.0\"\"\") # 3.0\n}").unwrap();
        assert!(pretty.contains("field2(s: \"1.5\""), "{pretty}");
        assert!(FloatLiterals::scan("{ field2(s: \"1.5\") } # 3.0").0.is_empty());
    }

    #[test]
    fn malformed_query_carries_text() {
        let err = prettify("{ user(").unwrap_err();
        assert_eq!(err.text, "{ user(");
        assert!(!err.message.is_empty());
    }

    #[test]
    fn lenient_keeps_unparseable_text() {
        assert_eq!(prettify_lenient("{ user("), "{ user(");
        assert_eq!(prettify_lenient("   "), "");
        assert_eq!(prettify_lenient("{a}"), "{\n  a\n}");
    }
}
