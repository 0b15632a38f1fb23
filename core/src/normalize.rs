//! Reshapes loosely-enveloped backend JSON into canonical forms.
//!
//! # Design
//! The backend is not consistent about envelopes: bulk endpoints put a flat
//! array in `data`, list endpoints put a pagination object in `data`, and
//! single-record endpoints put the record itself in `data`. Some deployments
//! skip the envelope entirely. Rather than branching per endpoint, `classify`
//! turns a raw body into an [`Envelope`] and each call site picks one of
//! `to_entity`, `to_array` or `to_paginated`.
//!
//! All three are total. An unrecognised shape yields the input itself, an
//! empty sequence, or default pagination; it is never an error.
//!
//! Known ambiguity: an entity that has its own array-valued `data` field,
//! wrapped as `{data: entity}`, classifies as [`Envelope::Paginated`]. The
//! backend contract gives no way to tell the two apart, so the heuristic is
//! kept as-is.

use serde_json::{Map, Value};

use crate::types::PaginatedResponse;

/// The response shapes the backend is known to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// The body is itself an array.
    FlatArray,
    /// `{data: [...]}`
    WrappedArray,
    /// `{data: {data: [...], current_page, ...}}`
    Paginated,
    /// `{data: {...}}` where the inner object has no array `data`.
    WrappedObject,
    /// Anything else, including `null` and scalars.
    Unrecognized,
}

pub fn classify(raw: &Value) -> Envelope {
    match raw {
        Value::Array(_) => Envelope::FlatArray,
        Value::Object(outer) => match outer.get("data") {
            Some(Value::Array(_)) => Envelope::WrappedArray,
            Some(Value::Object(inner)) if matches!(inner.get("data"), Some(Value::Array(_))) => {
                Envelope::Paginated
            }
            Some(Value::Object(_)) => Envelope::WrappedObject,
            _ => Envelope::Unrecognized,
        },
        _ => Envelope::Unrecognized,
    }
}

/// Unwrap exactly one `{data: {...}}` layer; anything else passes through.
pub fn to_entity(raw: Value) -> Value {
    match classify(&raw) {
        Envelope::Paginated | Envelope::WrappedObject => take_data(raw),
        Envelope::FlatArray | Envelope::WrappedArray | Envelope::Unrecognized => raw,
    }
}

/// Extract a sequence from a flat, wrapped or double-wrapped array.
pub fn to_array(raw: Value) -> Vec<Value> {
    match classify(&raw) {
        Envelope::FlatArray => match raw {
            Value::Array(items) => items,
            _ => Vec::new(),
        },
        Envelope::WrappedArray => match take_data(raw) {
            Value::Array(items) => items,
            _ => Vec::new(),
        },
        Envelope::Paginated => match take_data(take_data(raw)) {
            Value::Array(items) => items,
            _ => Vec::new(),
        },
        Envelope::WrappedObject | Envelope::Unrecognized => Vec::new(),
    }
}

/// Produce a listing with every pagination field resolved.
pub fn to_paginated(raw: Value) -> PaginatedResponse<Value> {
    match classify(&raw) {
        Envelope::Paginated | Envelope::WrappedObject => match take_data(raw) {
            Value::Object(page) => from_page_object(page),
            _ => PaginatedResponse::single_page(Vec::new()),
        },
        // An array-valued `data` is not a page object and carries no items.
        Envelope::WrappedArray => PaginatedResponse::single_page(Vec::new()),
        Envelope::FlatArray | Envelope::Unrecognized => {
            PaginatedResponse::single_page(to_array(raw))
        }
    }
}

fn from_page_object(mut page: Map<String, Value>) -> PaginatedResponse<Value> {
    let items = match page.remove("data") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let count = items.len() as u64;
    PaginatedResponse {
        current_page: number_or(page.get("current_page"), 1),
        last_page: number_or(page.get("last_page"), 1),
        per_page: number_or(page.get("per_page"), count),
        total: number_or(page.get("total"), count),
        next_page_url: link(page.remove("next_page_url")),
        prev_page_url: link(page.remove("prev_page_url")),
        items,
    }
}

fn take_data(raw: Value) -> Value {
    match raw {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Read a non-negative count from a number or numeric string.
fn number_or(value: Option<&Value>, default: u64) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(default),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(default)
        }
        _ => default,
    }
}

fn link(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(url)) => Some(url),
        _ => None,
    }
}
