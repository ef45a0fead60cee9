//! Latest introspection result and the schema derived from it

use std::sync::Arc;

use crate::models::ClientSchema;

#[derive(Debug, Default)]
pub struct SchemaCache {
    introspection: Option<serde_json::Value>,
    built: Option<Arc<ClientSchema>>,
    /// Set once a build of the current payload failed, so it is not retried
    build_failed: bool,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached introspection wholesale
    pub fn set(&mut self, introspection: serde_json::Value) {
        self.introspection = Some(introspection);
        self.built = None;
        self.build_failed = false;
    }

    /// The client schema, or `None` when schema features should be disabled
    pub fn schema(&mut self) -> Option<Arc<ClientSchema>> {
        if let Some(schema) = &self.built {
            return Some(Arc::clone(schema));
        }
        if self.build_failed {
            return None;
        }

        let raw = self.introspection.as_ref()?;
        match ClientSchema::from_introspection(raw) {
            Ok(schema) => {
                let schema = Arc::new(schema);
                self.built = Some(Arc::clone(&schema));
                Some(schema)
            }
            Err(e) => {
                log::warn!("Schema unavailable: {}", e);
                self.build_failed = true;
                None
            }
        }
    }
}
