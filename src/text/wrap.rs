/// Measures the rendered width of a string in pixels.
pub trait TextMeasure {
    fn text_width(&mut self, text: &str) -> f32;
}

/// Greedy word wrap by measured pixel width.
///
/// Words are split on whitespace and re-joined with single spaces. A word joins the current
/// line when the joined candidate fits in `max_width`; otherwise the line is closed and the
/// word starts the next one. A word wider than `max_width` gets a line to itself and is never
/// broken. Empty or whitespace-only text yields no lines.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &mut M,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure.text_width(&candidate) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
