pub mod assertions;
pub mod bastion;
pub mod callback;
pub mod decoding;
pub mod dispatch;
pub mod factory;

pub use crate::domain::ports::{
    Assertions, BastionListener, Callback, DecodingHints, RequestExecutor, ResponseModelConverter,
};
pub use crate::utils::error::Result;
