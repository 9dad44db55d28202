// Adapters: concrete transport and listener implementations behind the domain ports.

pub mod outcome_listener;
pub mod reqwest_executor;
pub mod tracing_listener;
