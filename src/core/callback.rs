use crate::domain::ports::Callback;
use crate::domain::response::ModelResponse;

/// Does nothing after the assertions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCallback;

impl<M> Callback<M> for NoCallback {
    fn execute(&self, _: u16, _: &ModelResponse<M>, _: &M) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn no_callback() -> NoCallback {
    NoCallback
}

/// Wraps a closure so its argument types are inferred from the model type.
pub fn from_fn<M, F>(f: F) -> FnCallback<F>
where
    F: Fn(u16, &ModelResponse<M>, &M) -> anyhow::Result<()>,
{
    FnCallback(f)
}

pub struct FnCallback<F>(F);

impl<M, F> Callback<M> for FnCallback<F>
where
    F: Fn(u16, &ModelResponse<M>, &M) -> anyhow::Result<()>,
{
    fn execute(&self, status_code: u16, response: &ModelResponse<M>, model: &M) -> anyhow::Result<()> {
        (self.0)(status_code, response, model)
    }
}
