// File: src/splitter.rs
//! Slices raw input into self-contained VCALENDAR container blocks.
//!
//! Broken exporters concatenate several complete calendars into one file,
//! which standards-compliant parsers reject. The splitter runs before the
//! grammar collaborator and only looks at top-level container markers;
//! markers of nested components (VEVENT, VALARM, ...) never split.
use crate::error::RepairError;

const CONTAINER_BEGIN: &str = "BEGIN:VCALENDAR";
const CONTAINER_END: &str = "END:VCALENDAR";

/// Splits `raw` into one substring per top-level VCALENDAR block, in input
/// order. Each block starts with its BEGIN marker and ends with its END
/// marker, original line endings preserved. Text outside any container is
/// dropped.
///
/// Fails with `MalformedInput` when a container is still open at end of
/// input, or when the input holds no container at all.
pub fn split_container_blocks(raw: &str) -> Result<Vec<String>, RepairError> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut depth: u32 = 0;

    for line in raw.split_inclusive('\n') {
        let marker = line.trim();

        if marker.eq_ignore_ascii_case(CONTAINER_BEGIN) {
            depth += 1;
        }

        if depth > 0 {
            current.push_str(line);
        }

        if marker.eq_ignore_ascii_case(CONTAINER_END) && depth > 0 {
            depth -= 1;
            if depth == 0 {
                // The final line may lack a trailing newline; the block is
                // complete either way.
                blocks.push(std::mem::take(&mut current));
            }
        }
    }

    if depth > 0 {
        return Err(RepairError::MalformedInput(
            "container block opened without a matching END:VCALENDAR".to_string(),
        ));
    }
    if blocks.is_empty() {
        return Err(RepairError::MalformedInput(
            "no VCALENDAR container block found".to_string(),
        ));
    }

    Ok(blocks)
}
