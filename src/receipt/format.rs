/// columns a string takes up in a monospace terminal
///
/// Thai vowel and tone marks written above or below a consonant share its
/// cell and take no width of their own.
pub fn display_width(text: &str) -> usize {
    text.chars().filter(|c| !is_zero_width(*c)).count()
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{0E31}' | '\u{0E34}'..='\u{0E3A}' | '\u{0E47}'..='\u{0E4E}')
        || matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}')
}

/// `text` centered in `width` columns, trailing spaces dropped
pub fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(text)) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// `left` flush left and `right` flush right, at least one space apart
pub fn justify(left: &str, right: &str, width: usize) -> String {
    let used = display_width(left) + display_width(right);
    let gap = width.saturating_sub(used).max(1);
    format!("{}{}{}", left, " ".repeat(gap), right)
}

pub fn rule(width: usize) -> String {
    "-".repeat(width)
}
