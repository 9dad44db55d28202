pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, ModelKind};

pub use crate::adapters::outcome_listener::{CallOutcome, OutcomeRecorder};
pub use crate::adapters::reqwest_executor::{ExecutorOptions, ReqwestExecutor};
pub use crate::adapters::tracing_listener::TracingListener;
pub use crate::config::BastionConfig;
pub use crate::core::assertions::{JsonResponseAssertions, NoAssertions, StatusCodeAssertions};
pub use crate::core::bastion::{Bastion, Bound, Unbound};
pub use crate::core::callback::NoCallback;
pub use crate::core::decoding::{JsonModelConverter, StringModelConverter};
pub use crate::core::factory::BastionFactory;
pub use crate::domain::event::{
    BastionErrorEvent, BastionFailureEvent, BastionFinishedEvent, BastionStartedEvent,
};
pub use crate::domain::method::HttpMethod;
pub use crate::domain::ports::{
    Assertions, BastionListener, Callback, DecodingHints, RequestExecutor, ResponseModelConverter,
};
pub use crate::domain::request::{GeneralRequest, JsonRequest, Request};
pub use crate::domain::response::{DecodedResponse, ModelResponse, Response};
pub use crate::utils::error::{AssertionError, BastionError, Result};
