use serde::Deserialize;

/// Normalized form of whatever the scanner entry point received.
///
/// QR payloads arrive as JSON produced by the ticket generator, while manual
/// entry hands over the bare code; both shapes come through the same field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPayload {
    /// Input parsed as JSON and carried a recognizable ticket code field.
    Structured { ticket_code: String },
    /// Anything else: the trimmed input is taken as the code itself.
    Raw(String),
}

#[derive(Deserialize)]
struct StructuredScan {
    // Older QR payloads used "ticketId" for the same value.
    #[serde(rename = "ticketCode", alias = "ticketId")]
    ticket_code: String,
}

impl ScanPayload {
    /// Structured parsing first; any miss (not JSON, no code field, blank
    /// code) falls back to the raw string.
    pub fn parse(raw_input: &str) -> Self {
        let trimmed = raw_input.trim();
        if let Ok(scan) = serde_json::from_str::<StructuredScan>(trimmed) {
            let code = scan.ticket_code.trim();
            if !code.is_empty() {
                return Self::Structured {
                    ticket_code: code.to_string(),
                };
            }
        }
        Self::Raw(trimmed.to_string())
    }

    /// The candidate ticket code, whichever shape it came in.
    pub fn into_code(self) -> String {
        match self {
            Self::Structured { ticket_code } => ticket_code,
            Self::Raw(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_code_is_raw() {
        assert_eq!(
            ScanPayload::parse("ABC123"),
            ScanPayload::Raw("ABC123".to_string())
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            ScanPayload::parse("  ABC123\n"),
            ScanPayload::Raw("ABC123".to_string())
        );
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(ScanPayload::parse("   "), ScanPayload::Raw(String::new()));
    }

    #[test]
    fn json_with_ticket_code_is_structured() {
        assert_eq!(
            ScanPayload::parse(r#"{"ticketCode":"ABC123"}"#),
            ScanPayload::Structured {
                ticket_code: "ABC123".to_string()
            }
        );
    }

    #[test]
    fn json_with_legacy_ticket_id_is_structured() {
        assert_eq!(
            ScanPayload::parse(r#"{"ticketId":"ABC123","event":"RustConf"}"#),
            ScanPayload::Structured {
                ticket_code: "ABC123".to_string()
            }
        );
    }

    #[test]
    fn json_without_code_field_falls_back_to_raw() {
        let input = r#"{"name":"Sari"}"#;
        assert_eq!(
            ScanPayload::parse(input),
            ScanPayload::Raw(input.to_string())
        );
    }

    #[test]
    fn json_with_blank_code_falls_back_to_raw() {
        let input = r#"{"ticketCode":"  "}"#;
        assert_eq!(
            ScanPayload::parse(input),
            ScanPayload::Raw(input.to_string())
        );
    }

    #[test]
    fn json_with_non_string_code_falls_back_to_raw() {
        let input = r#"{"ticketCode":42}"#;
        assert_eq!(
            ScanPayload::parse(input),
            ScanPayload::Raw(input.to_string())
        );
    }
}
