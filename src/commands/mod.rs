pub mod query;
pub mod query_history;
pub mod saved_query;
pub mod schema;
pub mod settings;

pub use query::*;
pub use query_history::*;
pub use saved_query::*;
pub use schema::*;
pub use settings::*;
