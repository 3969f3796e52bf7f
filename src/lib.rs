pub mod aggregate;
pub mod error;
pub mod metrics;
pub mod output;
pub mod record;
pub mod stats;
