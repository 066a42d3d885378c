//! Content stream operators for the signature sheets

/// Escape special characters for PDF string literals. Non-ASCII characters
/// are replaced, as Helvetica literal strings cannot carry them.
pub fn escape_pdf_string(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '(' => "\\(".to_string(),
            ')' => "\\)".to_string(),
            '\\' => "\\\\".to_string(),
            _ if c.is_ascii() => c.to_string(),
            _ => "?".to_string(),
        })
        .collect()
}

/// One line of text at a baseline position.
pub fn text_op(x: f64, y: f64, size: f64, text: &str) -> String {
    format!(
        "BT\n/F1 {} Tf\n{} {} Td\n({}) Tj\nET\n",
        size,
        x,
        y,
        escape_pdf_string(text)
    )
}

/// A thin horizontal rule.
pub fn rule_op(x1: f64, x2: f64, y: f64) -> String {
    format!("0.5 w\n{} {} m\n{} {} l\nS\n", x1, y, x2, y)
}

/// Paint a registered image XObject into a w x h box at (x, y).
pub fn image_op(name: &str, x: f64, y: f64, w: f64, h: f64) -> String {
    format!("q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n", w, h, x, y, name)
}
