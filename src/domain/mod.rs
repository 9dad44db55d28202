// Domain layer: values, events and ports (interfaces) shared by the core and the adapters.

pub mod event;
pub mod method;
pub mod ports;
pub mod request;
pub mod response;
