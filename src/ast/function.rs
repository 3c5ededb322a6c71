use std::{fmt, sync::Arc};

use crate::value::Value;

type Callable = dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync;

/// A named host function callable from expressions.
///
/// # Examples
/// ```text
/// strlen("abc") > 2
/// max(a, b)
/// ```
#[derive(Clone)]
pub struct ExpressionFunction {
    name: String,
    func: Arc<Callable>,
}

impl ExpressionFunction {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        ExpressionFunction {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.func)(args)
    }
}

impl fmt::Debug for ExpressionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExpressionFunction").field(&self.name).finish()
    }
}

// Two functions are the same token when they share a name; the registry
// guarantees names are unique.
impl PartialEq for ExpressionFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
