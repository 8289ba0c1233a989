// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Payload format sniffing for AppConfig profiles.
//!
//! Profiles are stored as free-form content. Parsers are tried in order and
//! the first success wins; anything that neither JSON nor YAML accepts is
//! kept verbatim as a string (e.g. a raw secret).

use serde_json::Value;

/// Format a payload was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Yaml,
    Raw,
}

impl PayloadFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadFormat::Json => "json",
            PayloadFormat::Yaml => "yaml",
            PayloadFormat::Raw => "raw",
        }
    }
}

type ParseAttempt = fn(&str) -> Option<Value>;

/// Structured parsers in priority order.
const PARSERS: &[(PayloadFormat, ParseAttempt)] = &[
    (PayloadFormat::Json, parse_json),
    (PayloadFormat::Yaml, parse_yaml),
];

fn parse_json(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

fn parse_yaml(raw: &str) -> Option<Value> {
    serde_yaml::from_str(raw).ok()
}

/// Parse a profile payload. Never fails: unparseable content becomes
/// [`Value::String`].
pub fn parse_payload(raw: &str) -> (PayloadFormat, Value) {
    PARSERS
        .iter()
        .find_map(|(format, parse)| parse(raw).map(|value| (*format, value)))
        .unwrap_or_else(|| (PayloadFormat::Raw, Value::String(raw.to_string())))
}
