const FILENAME_MARKER: &str = "filename=\"";

/// Pulls the advertised file name out of a `Content-Disposition` value.
/// The name runs from the first `filename="` to the last quote, so quotes
/// inside the name survive. Empty names count as absent.
pub fn extract_filename(value: &str) -> Option<String> {
    value.find(FILENAME_MARKER).and_then(|start_idx| {
        let remaining = &value[start_idx + FILENAME_MARKER.len()..];
        match remaining.rfind('"') {
            Some(end_idx) if end_idx > 0 => Some(remaining[..end_idx].to_string()),
            _ => None,
        }
    })
}
