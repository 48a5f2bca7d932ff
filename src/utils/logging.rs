use serde::Serialize;

/// Longest pretty-printed payload handed to a debug log line.
const MAX_DEBUG_PAYLOAD: usize = 4096;

/// Pretty-prints `value` for a debug log line, only when DEBUG is enabled.
/// Oversized payloads are cut at a char boundary and marked as truncated.
pub(crate) fn with_pretty_json_debug<T, F>(value: &T, log_action: F)
where
    T: Serialize,
    F: FnOnce(&str),
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty = serde_json::to_string_pretty(value)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    log_action(truncate_payload(&pretty).as_ref());
}

fn truncate_payload(payload: &str) -> std::borrow::Cow<'_, str> {
    if payload.len() <= MAX_DEBUG_PAYLOAD {
        return payload.into();
    }
    let mut end = MAX_DEBUG_PAYLOAD;
    while !payload.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}… <truncated {} bytes>", &payload[..end], payload.len() - end).into()
}
