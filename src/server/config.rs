use std::sync::Arc;

use server::Config;

impl Config {
    /// Create a config with defaults
    pub fn new() -> Config {
        Config {
            max_request_header_size: 16384,
            output_watermark: 65536,
        }
    }
    /// Maximum size of the request head in bytes
    ///
    /// The connection is aborted without a response when the head
    /// grows beyond this before parsing completes.
    pub fn max_request_header_size(&mut self, value: usize) -> &mut Self {
        self.max_request_header_size = value;
        self
    }
    /// Outbound buffer level above which body producers should pause
    pub fn output_watermark(&mut self, value: usize) -> &mut Self {
        self.output_watermark = value;
        self
    }
    /// Create a Arc'd config clone to pass to the constructor
    ///
    /// This is just a convenience method.
    pub fn done(&mut self) -> Arc<Config> {
        Arc::new(self.clone())
    }

    pub(crate) fn watermark(&self) -> usize {
        self.output_watermark
    }
}
