mod tracing_renderer;

pub use tracing_renderer::TracingNotificationRenderer;
