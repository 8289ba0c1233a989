// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Dot-path lookup into parsed profiles (`"db.MONGODB_URI"`).

use serde_json::Value;

/// Descend one segment. Objects are keyed by name, arrays by index.
fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Walk `path` through `root`, returning `fallback` at the first segment that
/// does not resolve.
///
/// The walk stops at the first miss: `fallback` is returned as-is and is never
/// descended into.
pub fn lookup_path(root: &Value, path: &str, fallback: Option<Value>) -> Option<Value> {
    let mut current = root;
    for segment in path.split('.') {
        match child(current, segment) {
            Some(next) => current = next,
            None => return fallback,
        }
    }
    Some(current.clone())
}
