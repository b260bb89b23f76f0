// 🧹 Input normalization for catalog and member fields
//
// Callers hand in raw strings; the ledger stores the canonical form.

/// Trim and title-case: the first letter of every word is upper case,
/// all other letters lower case. A word starts after any non-letter,
/// so "o'neil" becomes "O'Neil" and "sci-fi" becomes "Sci-Fi".
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;

    for c in input.trim().chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Trim and lower-case an email address
pub fn normalize_email(input: &str) -> String {
    input.trim().to_lowercase()
}

/// ISBNs are only trimmed; hyphenation is kept as entered
pub fn normalize_isbn(input: &str) -> String {
    input.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_basic() {
        assert_eq!(title_case("  the rust programming LANGUAGE "), "The Rust Programming Language");
        assert_eq!(title_case("dune"), "Dune");
    }

    #[test]
    fn test_title_case_word_boundaries() {
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("sci-fi stories"), "Sci-Fi Stories");
        assert_eq!(title_case("1984 and 2nd edition"), "1984 And 2Nd Edition");
    }

    #[test]
    fn test_title_case_empty() {
        assert_eq!(title_case("   "), "");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
        assert_eq!(normalize_email(" "), "");
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn(" 978-0-13-110362-7\n"), "978-0-13-110362-7");
    }
}
