use domdriver_core_types::RemoteObjectId;
use serde_json::Value;

/// Prepared remote expression.
///
/// A function declaration that is invoked with `this` bound to `owner` (or
/// against the page's global scope when there is no owner) and the JSON
/// `args` as positional parameters. Built exclusively by [`crate::templates`].
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    name: &'static str,
    function: String,
    owner: Option<RemoteObjectId>,
    args: Vec<Value>,
}

impl Expression {
    pub(crate) fn new(
        name: &'static str,
        function: String,
        owner: Option<RemoteObjectId>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            name,
            function,
            owner,
            args,
        }
    }

    /// Template name, used for logging and diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn owner(&self) -> Option<&RemoteObjectId> {
        self.owner.as_ref()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Self-invoking source for `Runtime.evaluate` when no owner is bound.
    pub fn to_invocation(&self) -> String {
        let args = Value::Array(self.args.clone());
        format!("({}).apply(null, {})", self.function, args)
    }
}
