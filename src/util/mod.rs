pub mod backoff;

pub use backoff::SimpleBackoff;
