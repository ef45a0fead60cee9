//! Fixtures shared by unit tests

use serde_json::json;

/// `data` of an introspection response for a tiny user service
pub fn sample_introspection() -> serde_json::Value {
    json!({
        "__schema": {
            "queryType": { "name": "Query" },
            "mutationType": null,
            "subscriptionType": null,
            "types": [
                {
                    "kind": "OBJECT",
                    "name": "Query",
                    "description": null,
                    "fields": [
                        {
                            "name": "viewer",
                            "description": "The current user",
                            "args": [],
                            "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "OBJECT", "name": "User", "ofType": null } },
                            "isDeprecated": false
                        },
                        {
                            "name": "users",
                            "args": [
                                { "name": "first", "type": { "kind": "SCALAR", "name": "Int", "ofType": null }, "defaultValue": "10" }
                            ],
                            "type": { "kind": "LIST", "name": null, "ofType": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "OBJECT", "name": "User", "ofType": null } } },
                            "isDeprecated": false
                        }
                    ]
                },
                {
                    "kind": "OBJECT",
                    "name": "User",
                    "fields": [
                        { "name": "id", "args": [], "type": { "kind": "SCALAR", "name": "ID", "ofType": null } },
                        { "name": "firstName", "args": [], "type": { "kind": "SCALAR", "name": "String", "ofType": null } }
                    ]
                },
                { "kind": "ENUM", "name": "Role", "enumValues": [ { "name": "ADMIN" }, { "name": "MEMBER" } ] },
                { "kind": "OBJECT", "name": "__Type", "fields": [] }
            ],
            "directives": [ { "name": "include" }, { "name": "skip" } ]
        }
    })
}
