mod dashboard;

pub use dashboard::{sample_query, Dashboard, SAMPLE_QUERY_JSON};
