// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Resource path composition and `key=value` argument parsing

use serde_json::Value;

use datera_api::Attributes;

use crate::error::{Error, Result};

/// Join path segments with single `/` separators.
///
/// Empty segments and leading, trailing or repeated separators are
/// dropped, so the result is always relative to the versioned base URL
/// and `join_path([join_path([a, b]), c]) == join_path([a, join_path([b, c])])`.
pub fn join_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parts: Vec<String> = Vec::new();
    for segment in segments {
        parts.extend(
            segment
                .as_ref()
                .split('/')
                .filter(|part| !part.is_empty())
                .map(str::to_string),
        );
    }
    parts.join("/")
}

/// Parse `key=value` strings into a JSON object with string values.
///
/// The value is everything after the first `=`, so `descr=a=b` sets
/// `descr` to `a=b`. A later duplicate key wins.
pub fn parse_kv<S: AsRef<str>>(args: &[S]) -> Result<Attributes> {
    let mut attrs = Attributes::new();
    for arg in args {
        let arg = arg.as_ref();
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            Error::InvalidArgument(format!("expected key=value, got '{}'", arg))
        })?;
        if key.is_empty() {
            return Err(Error::InvalidArgument(format!("empty key in '{}'", arg)));
        }
        attrs.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(attrs)
}

/// Parse `key=value` strings into query-string pairs.
pub fn parse_query<S: AsRef<str>>(args: &[S]) -> Result<Vec<(String, String)>> {
    Ok(parse_kv(args)?
        .into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect())
}
