//! Text cleanup for festival and side-table text.

/// Literal backslash-n left behind by double-escaped source JSON.
const ESCAPE_ARTIFACT: &str = "\\n";

/// Placeholder the source emits for days without a festival.
const TRAILING_PLACEHOLDER: &str = "日历事件";

/// Remove escape artifacts, strip the trailing placeholder and trim.
///
/// Each step runs until nothing changes, so `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    let mut current = text.to_string();

    loop {
        let mut next = current.replace(ESCAPE_ARTIFACT, "");
        next = next.trim().to_string();
        while let Some(stripped) = next.strip_suffix(TRAILING_PLACEHOLDER) {
            next = stripped.trim_end().to_string();
        }

        if next == current {
            return next;
        }
        current = next;
    }
}
