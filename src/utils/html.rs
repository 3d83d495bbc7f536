/// Escapes the characters Telegram's HTML parse mode treats as markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("R&D <lead>"), "R&amp;D &lt;lead&gt;");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape("http://cv/jane?x=1"), "http://cv/jane?x=1");
    }
}
