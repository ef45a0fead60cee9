pub mod query_history;
pub mod saved_query;
pub mod schema;
pub mod selected_query;
pub mod settings;
pub mod view;

pub use query_history::*;
pub use saved_query::*;
pub use schema::*;
pub use selected_query::*;
pub use settings::*;
pub use view::*;
