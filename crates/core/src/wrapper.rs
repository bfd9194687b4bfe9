//! Code wrapping for publicly served scripts.
//!
//! User code is enclosed in a strict-mode IIFE with a `try`/`catch` so a
//! runtime exception is logged instead of breaking the host page. The
//! transform is purely textual: every original line is kept verbatim behind a
//! fixed indentation prefix, so [`unwrap_code`] can recover the source.
//!
//! A script that does not parse (for example unbalanced braces) still fails
//! on the host page before the `catch` can run.

use chrono::SecondsFormat;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Tag prefixed to every console message emitted by served scripts.
pub const LOG_TAG: &str = "[AB Script Injection]";

/// Platform name shown in the banner comment.
pub const PLATFORM_NAME: &str = "AB Script Injection Platform";

/// Indentation added in front of every line of user code.
pub const CODE_INDENT: &str = "    ";

const WRAPPER_HEAD: &str = "(function() {\n  'use strict';\n  try {\n";

/// Everything after the last user line: the catch block and the invocation.
fn wrapper_tail() -> String {
    format!("\n  }} catch (e) {{\n    console.error('{LOG_TAG} Error:', e);\n  }}\n}})();")
}

// ---------------------------------------------------------------------------
// Wrapping
// ---------------------------------------------------------------------------

/// Wrap raw user code in an isolated, self-invoking unit.
///
/// Never fails; syntax is not inspected.
pub fn wrap_code(code: &str) -> String {
    let body = code
        .split('\n')
        .map(|line| format!("{CODE_INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut wrapped = String::with_capacity(WRAPPER_HEAD.len() + body.len() + 96);
    wrapped.push_str(WRAPPER_HEAD);
    wrapped.push_str(&body);
    wrapped.push_str(&wrapper_tail());
    wrapped
}

/// Recover the original code from the output of [`wrap_code`].
///
/// Returns `None` when `wrapped` was not produced by [`wrap_code`].
pub fn unwrap_code(wrapped: &str) -> Option<String> {
    let tail = wrapper_tail();
    let body = wrapped.strip_prefix(WRAPPER_HEAD)?.strip_suffix(&tail)?;

    body.split('\n')
        .map(|line| line.strip_prefix(CODE_INDENT))
        .collect::<Option<Vec<_>>>()
        .map(|lines| lines.join("\n"))
}

// ---------------------------------------------------------------------------
// Served payloads
// ---------------------------------------------------------------------------

/// Full body served for a published script: banner comment plus wrapped code.
pub fn render_public_script(public_id: &str, code: &str, generated_at: Timestamp) -> String {
    format!(
        "/**\n * {PLATFORM_NAME}\n * Script ID: {public_id}\n * Generated: {}\n */\n{}\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        wrap_code(code),
    )
}

/// Fallback body served when an identifier does not resolve.
///
/// Evaluating it only logs a warning. The identifier comes straight from the
/// request path, so it is embedded as an escaped string literal.
pub fn render_not_found_script(identifier: &str) -> String {
    let message = format!("Script with ID \"{identifier}\" not found or not published.");
    format!(
        "// Script not found or not published\nconsole.warn({}, {});\n",
        js_string_literal(LOG_TAG),
        js_string_literal(&message),
    )
}

/// Encode `value` as a double-quoted JavaScript string literal.
///
/// JSON string syntax is a subset of JS string syntax; `<`, `>`, and the two
/// line separators are additionally escaped so the literal is also safe
/// inside an inline `<script>` element.
pub fn js_string_literal(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
