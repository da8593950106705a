use tracing::{debug, warn};

use crate::config::SanitizerConfig;

pub const DEFAULT_OPEN_MARKER: &str = "<think>";
pub const DEFAULT_CLOSE_MARKER: &str = "</think>";

/// Removes reasoning-trace regions from raw provider output
///
/// A region starts at the opening marker and ends at the first closing marker
/// after it, both markers included. Markers are matched literally and
/// case-sensitively and do not nest. An opening marker with no closing marker
/// after it is left in place along with everything that follows.
#[derive(Debug, Clone)]
pub struct ResponseSanitizer {
    open_marker: String,
    close_marker: String,
}

impl ResponseSanitizer {
    pub fn new(config: &SanitizerConfig) -> Self {
        Self::with_markers(&config.open_marker, &config.close_marker)
    }

    pub fn with_markers(open_marker: &str, close_marker: &str) -> Self {
        Self {
            open_marker: open_marker.to_string(),
            close_marker: close_marker.to_string(),
        }
    }

    /// Strip every marker region, repeating until a pass removes nothing
    pub fn sanitize(&self, raw: &str) -> String {
        if self.open_marker.is_empty() || self.close_marker.is_empty() {
            return raw.to_string();
        }

        let mut current = raw.to_string();
        loop {
            let (next, removed) = self.strip_pass(&current);
            if removed == 0 {
                if self.has_unterminated_region(&next) {
                    warn!("Unterminated {} marker left in output", self.open_marker);
                }
                return next;
            }
            debug!("Removed {} reasoning region(s)", removed);
            current = next;
        }
    }

    /// True when an opening marker remains with no closing marker after it
    fn has_unterminated_region(&self, text: &str) -> bool {
        text.find(&self.open_marker).is_some_and(|start| {
            !text[start + self.open_marker.len()..].contains(&self.close_marker)
        })
    }

    /// Single left-to-right scan; returns the stripped text and the number of regions removed
    fn strip_pass(&self, input: &str) -> (String, usize) {
        let mut output = String::with_capacity(input.len());
        let mut rest = input;
        let mut removed = 0;

        while let Some(start) = rest.find(&self.open_marker) {
            let after_open = &rest[start + self.open_marker.len()..];

            match after_open.find(&self.close_marker) {
                Some(end) => {
                    output.push_str(&rest[..start]);
                    rest = &after_open[end + self.close_marker.len()..];
                    removed += 1;
                }
                // Unterminated: keep the marker and the tail as-is
                None => break,
            }
        }

        output.push_str(rest);
        (output, removed)
    }
}

impl Default for ResponseSanitizer {
    fn default() -> Self {
        Self::with_markers(DEFAULT_OPEN_MARKER, DEFAULT_CLOSE_MARKER)
    }
}
