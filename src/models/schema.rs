use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Clone, Deserialize)]
struct NamedRef {
    name: String,
}

/// A (possibly wrapped) type reference as found in introspection output
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// The innermost named type
    pub fn named(&self) -> Option<&str> {
        match &self.of_type {
            Some(inner) if matches!(self.kind, TypeKind::List | TypeKind::NonNull) => inner.named(),
            _ => self.name.as_deref(),
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.kind, &self.of_type) {
            (TypeKind::NonNull, Some(inner)) => write!(f, "{}!", inner),
            (TypeKind::List, Some(inner)) => write!(f, "[{}]", inner),
            _ => write!(f, "{}", self.name.as_deref().unwrap_or("?")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionInputValue {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type")]
    type_ref: TypeRef,
    #[serde(default)]
    default_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionField {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    type_ref: TypeRef,
    #[serde(default)]
    is_deprecated: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct IntrospectionEnumValue {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionType {
    kind: TypeKind,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    input_fields: Option<Vec<IntrospectionInputValue>>,
    #[serde(default)]
    enum_values: Option<Vec<IntrospectionEnumValue>>,
}

#[derive(Debug, Clone, Deserialize)]
struct IntrospectionDirective {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionSchema {
    #[serde(default)]
    query_type: Option<NamedRef>,
    #[serde(default)]
    mutation_type: Option<NamedRef>,
    #[serde(default)]
    subscription_type: Option<NamedRef>,
    #[serde(default)]
    types: Vec<IntrospectionType>,
    #[serde(default)]
    directives: Vec<IntrospectionDirective>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaArgument {
    pub name: String,
    /// Type signature such as `ID!`
    pub signature: String,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub name: String,
    pub description: Option<String>,
    /// Type signature such as `[User!]!`
    pub signature: String,
    /// Name of the innermost type, used to walk into selections
    pub type_name: Option<String>,
    pub args: Vec<SchemaArgument>,
    pub is_deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaType {
    pub name: String,
    pub kind: TypeKind,
    pub description: Option<String>,
    /// Output fields for objects and interfaces, input fields for input objects
    pub fields: Vec<SchemaField>,
    pub enum_values: Vec<String>,
}

/// Schema built from an introspection result, used for completion and display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSchema {
    pub query_type: String,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
    pub types: BTreeMap<String, SchemaType>,
    pub directives: Vec<String>,
}

impl ClientSchema {
    /// Build from the `data` object of an introspection response
    pub fn from_introspection(data: &serde_json::Value) -> Result<Self, SchemaError> {
        let raw = data.get("__schema").ok_or(SchemaError::MissingSchema)?;
        let schema: IntrospectionSchema = serde_json::from_value(raw.clone())?;

        let query_type = schema
            .query_type
            .map(|t| t.name)
            .ok_or(SchemaError::MissingQueryType)?;

        let types: BTreeMap<String, SchemaType> = schema
            .types
            .into_iter()
            .filter_map(|t| {
                let name = t.name?;
                let mut fields: Vec<SchemaField> = t
                    .fields
                    .unwrap_or_default()
                    .into_iter()
                    .map(|f| SchemaField {
                        name: f.name,
                        description: f.description,
                        signature: f.type_ref.to_string(),
                        type_name: f.type_ref.named().map(str::to_string),
                        args: f.args.into_iter().map(to_argument).collect(),
                        is_deprecated: f.is_deprecated,
                    })
                    .collect();
                fields.extend(t.input_fields.unwrap_or_default().into_iter().map(|f| SchemaField {
                    name: f.name,
                    description: f.description,
                    signature: f.type_ref.to_string(),
                    type_name: f.type_ref.named().map(str::to_string),
                    args: Vec::new(),
                    is_deprecated: false,
                }));

                Some((
                    name.clone(),
                    SchemaType {
                        name,
                        kind: t.kind,
                        description: t.description,
                        fields,
                        enum_values: t
                            .enum_values
                            .unwrap_or_default()
                            .into_iter()
                            .map(|v| v.name)
                            .collect(),
                    },
                ))
            })
            .collect();

        if !types.contains_key(&query_type) {
            return Err(SchemaError::UnknownQueryType(query_type));
        }

        Ok(ClientSchema {
            query_type,
            mutation_type: schema.mutation_type.map(|t| t.name),
            subscription_type: schema.subscription_type.map(|t| t.name),
            types,
            directives: schema.directives.into_iter().map(|d| d.name).collect(),
        })
    }

    pub fn get_type(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    /// Fields available at the top of a query
    pub fn root_fields(&self) -> &[SchemaField] {
        self.types
            .get(&self.query_type)
            .map(|t| t.fields.as_slice())
            .unwrap_or(&[])
    }

    /// Field names on `type_name` starting with `prefix`, for completion
    pub fn complete_field(&self, type_name: &str, prefix: &str) -> Vec<&str> {
        self.types
            .get(type_name)
            .map(|t| {
                t.fields
                    .iter()
                    .filter(|f| f.name.starts_with(prefix))
                    .map(|f| f.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Types defined by the service, excluding introspection types
    pub fn user_types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.values().filter(|t| !t.name.starts_with("__"))
    }
}

fn to_argument(arg: IntrospectionInputValue) -> SchemaArgument {
    SchemaArgument {
        name: arg.name,
        signature: arg.type_ref.to_string(),
        default_value: arg.default_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_introspection;
    use serde_json::json;

    #[test]
    fn builds_root_fields_with_signatures() {
        let schema = ClientSchema::from_introspection(&sample_introspection()).unwrap();

        assert_eq!(schema.query_type, "Query");
        let fields = schema.root_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].signature, "User!");
        assert_eq!(fields[1].signature, "[User!]");
        assert_eq!(fields[1].type_name.as_deref(), Some("User"));
        assert_eq!(fields[1].args[0].default_value.as_deref(), Some("10"));
        assert_eq!(schema.directives, vec!["include", "skip"]);
    }

    #[test]
    fn completes_fields_by_prefix() {
        let schema = ClientSchema::from_introspection(&sample_introspection()).unwrap();

        assert_eq!(schema.complete_field("User", "f"), vec!["firstName"]);
        assert!(schema.complete_field("Missing", "").is_empty());
        assert_eq!(schema.get_type("Role").unwrap().enum_values, vec!["ADMIN", "MEMBER"]);
        assert_eq!(schema.user_types().count(), 3);
    }

    #[test]
    fn rejects_payload_without_schema() {
        let result = ClientSchema::from_introspection(&json!({ "viewer": null }));
        assert!(matches!(result, Err(SchemaError::MissingSchema)));
    }

    #[test]
    fn rejects_undefined_query_root() {
        let data = json!({ "__schema": { "queryType": { "name": "Query" }, "types": [] } });
        assert!(matches!(
            ClientSchema::from_introspection(&data),
            Err(SchemaError::UnknownQueryType(name)) if name == "Query"
        ));
    }
}
