pub mod math;
pub mod resolver;
pub mod search;

pub use math::{calculate, evaluate, format_number, looks_like_math, MathError};
pub use resolver::{TaskIntentResolver, TaskResolver};
pub use search::{SearchProvider, WebSearch};

#[cfg(test)]
pub use resolver::MockTaskResolver;
#[cfg(test)]
pub use search::MockSearchProvider;
