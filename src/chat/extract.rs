//! Field extraction rules for visitor messages.
//!
//! Pure pattern matching; none of these can fail. A miss falls back to the
//! raw input or an empty value so the conversation always moves on.

use std::sync::LazyLock;

use regex::Regex;

/// Company mention: a keyword followed by `:` or whitespace, then a token.
/// No word boundaries, so keywords also match inside longer words.
static COMPANY_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:from|at|with|company|website|site)[:\s]+([^\s,]+)").unwrap()
});

/// Loose `local@domain.tld` shape.
static EMBEDDED_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap()
});

/// Result of the name+company rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameAndCompany {
    pub name: String,
    /// Empty when no company mention was found.
    pub company: String,
}

/// Name is the text before the first `,` `.` or newline; company comes
/// from a keyword mention anywhere in the message.
pub fn extract_name_and_company(text: &str) -> NameAndCompany {
    let first = text.split([',', '.', '\n']).next().unwrap_or_default().trim();
    let name = if first.is_empty() { text.trim() } else { first };

    let company = COMPANY_HINT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    NameAndCompany {
        name: name.to_string(),
        company,
    }
}

/// First email-shaped substring, else the trimmed input unvalidated.
pub fn extract_email(text: &str) -> String {
    match EMBEDDED_EMAIL.find(text) {
        Some(m) => m.as_str().to_string(),
        None => text.trim().to_string(),
    }
}

/// Whole trimmed input, verbatim.
pub fn extract_verbatim(text: &str) -> String {
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Name + company ──────────────────────────────────────────────

    #[test]
    fn name_is_text_before_first_delimiter() {
        assert_eq!(extract_name_and_company("Maria Lopez, Contoso").name, "Maria Lopez");
        assert_eq!(extract_name_and_company("  Sam Lee. Hello").name, "Sam Lee");
        assert_eq!(extract_name_and_company("Ana\nFabrikam").name, "Ana");
    }

    #[test]
    fn name_without_delimiter_is_whole_trimmed_input() {
        assert_eq!(extract_name_and_company("  Maria Lopez  ").name, "Maria Lopez");
    }

    #[test]
    fn name_falls_back_when_first_segment_blank() {
        assert_eq!(extract_name_and_company(", Maria").name, ", Maria");
    }

    #[test]
    fn greeting_first_segment_is_taken_literally() {
        let got = extract_name_and_company("Hi, I'm Maria Lopez from Contoso");
        assert_eq!(got.name, "Hi");
        assert_eq!(got.company, "Contoso");
    }

    #[test]
    fn company_keywords() {
        assert_eq!(extract_name_and_company("Tom at Initech").company, "Initech");
        assert_eq!(extract_name_and_company("Tom, with Globex, hi").company, "Globex");
        assert_eq!(extract_name_and_company("Tom. Company: Umbrella").company, "Umbrella");
        assert_eq!(
            extract_name_and_company("Tom, WEBSITE acme.io").company,
            "acme.io"
        );
    }

    #[test]
    fn company_missing_is_empty() {
        assert_eq!(extract_name_and_company("Maria Lopez").company, "");
        // Keyword with no separator after it does not match.
        assert_eq!(extract_name_and_company("Fromage").company, "");
    }

    #[test]
    fn company_keyword_inside_word_matches() {
        assert_eq!(extract_name_and_company("Pat Lee").company, "Lee");
    }

    // ── Email ───────────────────────────────────────────────────────

    #[test]
    fn email_found_inside_sentence() {
        assert_eq!(
            extract_email("Sure, reach me at maria.lopez@contoso.com thanks"),
            "maria.lopez@contoso.com"
        );
    }

    #[test]
    fn email_trailing_period_excluded() {
        assert_eq!(extract_email("It's john@example.com."), "john@example.com");
    }

    #[test]
    fn email_missing_falls_back_to_trimmed_input() {
        assert_eq!(extract_email("  call me instead  "), "call me instead");
        assert_eq!(extract_email("john at example dot com"), "john at example dot com");
    }

    // ── Verbatim ────────────────────────────────────────────────────

    #[test]
    fn verbatim_trims() {
        assert_eq!(extract_verbatim("  $20k - $50k \n"), "$20k - $50k");
    }
}
