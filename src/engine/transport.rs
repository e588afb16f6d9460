// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use serde_json::Value;

use crate::engine::value::Shared;
use crate::errors::DispatchError;
use crate::traits::{EventHandler, TransportAdapter};

/// An [`EventHandler`] behind a [`TransportAdapter`].
pub struct AdaptedHandler<A: TransportAdapter> {
    adapter: A,
    handler: Arc<dyn EventHandler>,
}

impl<A: TransportAdapter> AdaptedHandler<A> {
    pub fn new(adapter: A, handler: Arc<dyn EventHandler>) -> Self {
        Self { adapter, handler }
    }

    pub fn handler(&self) -> &Arc<dyn EventHandler> {
        &self.handler
    }

    /// Decode `payload`, dispatch it and encode the outcome.
    pub async fn call(&self, payload: A::Payload) -> A::Response {
        let (event, platform) = self.adapter.decode(payload);
        let outcome = self.handler.handle(event, platform, None).await;
        self.adapter.encode(outcome)
    }
}

/// JSON in, JSON out.
///
/// The payload is the event itself. Results are encoded when they are a
/// `serde_json::Value`, a string (`String`, `&'static str`), `bool`, any primitive
/// integer or float type, or `()` (as `null`). Anything else, including custom
/// structs, is `DispatchError::UnencodableResult`; steps producing structured
/// output should return a `Value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPassthrough;

// Tries each listed type in turn, returning the first that matches
macro_rules! encode_as {
    ($result:expr, $($ty:ty),+ $(,)?) => {
        $(
            if let Some(value) = $result.downcast_ref::<$ty>() {
                return Ok(Value::from(*value));
            }
        )+
    };
}

impl JsonPassthrough {
    pub fn to_json(result: &Shared) -> Result<Value, DispatchError> {
        if let Some(value) = result.downcast_ref::<Value>() {
            return Ok(value.clone());
        }
        if let Some(text) = result.downcast_ref::<String>() {
            return Ok(Value::from(text.as_str()));
        }
        encode_as!(result, &'static str, bool);
        encode_as!(result, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
        if result.is::<()>() {
            return Ok(Value::Null);
        }
        Err(DispatchError::UnencodableResult {
            type_name: result.type_name(),
        })
    }
}

impl TransportAdapter for JsonPassthrough {
    type Payload = Value;
    type Response = Result<Value, DispatchError>;

    fn decode(&self, payload: Value) -> (Value, Option<Shared>) {
        (payload, None)
    }

    fn encode(&self, outcome: Result<Shared, DispatchError>) -> Self::Response {
        outcome.and_then(|result| Self::to_json(&result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json() {
        let cases = vec![
            (Shared::new(json!({"ok": true})), json!({"ok": true})),
            (Shared::new(String::from("sharp")), json!("sharp")),
            (Shared::new("dull"), json!("dull")),
            (Shared::new(3_u32), json!(3)),
            (Shared::new(-4_i64), json!(-4)),
            (Shared::new(false), json!(false)),
            (Shared::new(7_u8), json!(7)),
            (Shared::new(300_u16), json!(300)),
            (Shared::new(-8_i8), json!(-8)),
            (Shared::new(-900_i16), json!(-900)),
            (Shared::new(2.5_f32), json!(2.5)),
            (Shared::new(0.25_f64), json!(0.25)),
            (Shared::new(11_usize), json!(11)),
            (Shared::unit(), Value::Null),
        ];

        for (input, expected) in cases {
            assert_eq!(JsonPassthrough::to_json(&input).unwrap(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_unencodable_result() {
        struct Pencil;
        match JsonPassthrough::to_json(&Shared::new(Pencil)) {
            Err(DispatchError::UnencodableResult { type_name }) => assert!(type_name.ends_with("Pencil")),
            other => panic!("expected UnencodableResult, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_passes_errors_through() {
        let outcome = JsonPassthrough.encode(Err(DispatchError::AmbiguousMatch {
            workflows: vec!["a".to_string(), "b".to_string()],
        }));
        assert!(matches!(outcome, Err(DispatchError::AmbiguousMatch { .. })));
    }
}
