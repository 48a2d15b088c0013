//! Locating JSON payloads embedded in scraped markup.
//!
//! Price pages ship their market data inside a `<script>` element as one
//! large JSON object sitting in otherwise non-JSON text. Pulling it out
//! takes three steps, each a pure function here:
//!
//! 1. [`script_segments`] — split the page into script bodies without a DOM.
//! 2. [`find_data_bearing_segment`] — pick the body carrying the data markers.
//! 3. [`locate_json_object`] — return the balanced JSON span at a marker.

/// Extract one balanced, string-aware JSON object starting at `start_marker`.
///
/// Finds the first occurrence of the marker, then scans forward counting
/// brace depth. Braces inside quoted strings are ignored: a `"` toggles
/// string state unless the previous character was an unconsumed `\`, and a
/// `\` inside a string escapes exactly the next character. The scan stops
/// when depth returns to zero after at least one `{`, returning the slice
/// from the marker through that closing brace.
///
/// Returns `None` when the marker is absent or the input ends before the
/// braces balance — truncated markup is an extraction failure, never a
/// panic or a garbage span.
pub fn locate_json_object<'a>(markup: &'a str, start_marker: &str) -> Option<&'a str> {
    let start = markup.find(start_marker)?;

    let mut depth: i64 = 0;
    let mut opened = false;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in markup.as_bytes().iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => {
                depth += 1;
                opened = true;
            }
            b'}' if !in_string => {
                depth -= 1;
                if opened && depth == 0 {
                    return Some(&markup[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Split markup into the inner text of each `<script …>…</script>` element.
///
/// Tag detection is case-insensitive and attribute-tolerant; no DOM is
/// built. Unterminated script elements are dropped.
pub fn script_segments(markup: &str) -> Vec<&str> {
    let lower = markup.to_ascii_lowercase();
    let mut segments = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = lower[cursor..].find("<script") {
        let open = cursor + rel;
        let after_name = open + "<script".len();

        // Reject tags that merely start with "script" (e.g. <scripty>).
        match lower.as_bytes().get(after_name) {
            Some(b'>' | b' ' | b'\t' | b'\n' | b'\r' | b'/') => {}
            _ => {
                cursor = after_name;
                continue;
            }
        }

        let Some(gt) = lower[after_name..].find('>') else {
            break;
        };
        let body_start = after_name + gt + 1;

        let Some(close) = lower[body_start..].find("</script") else {
            break;
        };
        let body_end = body_start + close;

        segments.push(&markup[body_start..body_end]);
        cursor = body_end + "</script".len();
    }

    segments
}

/// First segment containing every marker, or `None`.
///
/// The data-bearing script of a price page is identified by substrings that
/// must all appear in it (for Kitco: `"gold"` and `"bid"`).
pub fn find_data_bearing_segment<'a>(
    segments: impl IntoIterator<Item = &'a str>,
    markers: &[&str],
) -> Option<&'a str> {
    segments
        .into_iter()
        .find(|segment| markers.iter().all(|marker| segment.contains(marker)))
}
