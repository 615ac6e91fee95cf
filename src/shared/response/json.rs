use crate::shared::response::render::Renderer;
use crate::shared::response::types::{Response, ResponseBody};
use serde::Serialize;
use serde_json::Value;

pub struct JsonRenderer;

#[derive(Serialize)]
struct DataEnvelope<'a> {
    data: &'a Value,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a str,
}

impl Renderer for JsonRenderer {
    fn render(&self, response: &Response) -> Vec<u8> {
        let mut buf = Vec::new();
        let written = match &response.body {
            ResponseBody::Data(data) => sonic_rs::to_writer(&mut buf, &DataEnvelope { data }),
            ResponseBody::Error(error) => sonic_rs::to_writer(&mut buf, &ErrorEnvelope { error }),
            ResponseBody::Empty => return buf,
        };

        if written.is_err() {
            buf = b"{\"error\":\"Failed to serialize JSON\"}".to_vec();
        }
        buf
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
