use crate::adapters::reqwest_executor::{ExecutorOptions, ReqwestExecutor};
use crate::adapters::tracing_listener::TracingListener;
use crate::config::toml_config::BastionConfig;
use crate::core::bastion::{Bastion, Unbound};
use crate::domain::ports::{BastionListener, RequestExecutor};
use crate::domain::request::Request;
use crate::utils::error::Result;
use std::sync::Arc;

/// Produces pre-configured [`Bastion`] builders.
///
/// Listeners and the executor are shared between every builder the factory
/// hands out. Without an executor, each call creates a default HTTP executor.
#[derive(Clone, Default)]
pub struct BastionFactory {
    executor: Option<Arc<dyn RequestExecutor>>,
    listeners: Vec<Arc<dyn BastionListener>>,
    suppress_assertions: bool,
}

impl BastionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從設定檔建立工廠: HTTP executor, tracing listener 與 assertion 設定
    pub fn from_config(config: &BastionConfig) -> Result<Self> {
        let executor = ReqwestExecutor::with_options(ExecutorOptions::from_config(config)?)?;

        Ok(Self::new()
            .with_executor(executor)
            .with_listener(TracingListener::new())
            .with_suppressed_assertions(config.suppress_assertions()))
    }

    pub fn with_executor(self, executor: impl RequestExecutor + 'static) -> Self {
        self.with_shared_executor(Arc::new(executor))
    }

    pub fn with_shared_executor(mut self, executor: Arc<dyn RequestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_listener(self, listener: impl BastionListener + 'static) -> Self {
        self.with_shared_listener(Arc::new(listener))
    }

    pub fn with_shared_listener(mut self, listener: Arc<dyn BastionListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn with_suppressed_assertions(mut self, suppress_assertions: bool) -> Self {
        self.suppress_assertions = suppress_assertions;
        self
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn api<'r>(&self, message: impl Into<String>, request: &'r dyn Request) -> Bastion<'r, Unbound> {
        let mut bastion = Bastion::new(message, request);
        if let Some(executor) = &self.executor {
            bastion.set_executor(executor.clone());
        }
        for listener in &self.listeners {
            bastion.register_listener(listener.clone());
        }
        bastion.set_suppress_assertions(self.suppress_assertions);
        bastion
    }
}
