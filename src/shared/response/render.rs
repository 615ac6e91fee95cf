use crate::shared::response::types::Response;

/// Serializes a `Response` for the wire.
pub trait Renderer: Send + Sync {
    /// Render a complete Response to bytes. Empty bodies render to nothing.
    fn render(&self, response: &Response) -> Vec<u8>;

    /// Value for the `Content-Type` header of non-empty bodies.
    fn content_type(&self) -> &'static str;
}
