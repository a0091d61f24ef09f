//! The slice of an Execute request the response renderer consumes.

use crate::process::ExecuteInput;

/// Execute-request view: the lineage flag and the supplied inputs.
///
/// The full request parser lives upstream; the renderer only needs enough to
/// echo inputs back when lineage is requested.
#[derive(Default)]
pub struct ExecuteRequest {
    /// Echo inputs and output definitions alongside the results
    pub lineage: bool,

    /// Supplied inputs, in request order
    pub inputs: Vec<Box<dyn ExecuteInput + Send + Sync>>,
}

impl ExecuteRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the lineage echo.
    pub fn with_lineage(mut self) -> Self {
        self.lineage = true;
        self
    }

    /// Add an input descriptor.
    pub fn with_input(mut self, input: Box<dyn ExecuteInput + Send + Sync>) -> Self {
        self.inputs.push(input);
        self
    }
}

impl std::fmt::Debug for ExecuteRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecuteRequest")
            .field("lineage", &self.lineage)
            .field(
                "inputs",
                &self.inputs.iter().map(|i| i.identifier()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
