//! `mailto:` links for sharing a report from the user's own mail client.
//! Nothing is sent from here.

use campaign_core::{CalcResult, CampaignError};
use url::Url;

use crate::report_builder::CalculationReport;

/// Percent-encode a header value. Spaces become `%20`, not `+`, since mail
/// clients do not decode form encoding.
fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Build `mailto:<recipient>?subject=..&body=..`. An empty recipient leaves
/// the address for the user to fill in.
pub fn build_mailto_link(recipient: &str, subject: &str, body: &str) -> CalcResult<Url> {
    let recipient = recipient.trim();
    if !recipient.is_empty() {
        let malformed = !recipient.contains('@')
            || recipient
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '?' | '&' | '#' | '%'));
        if malformed {
            return Err(CampaignError::invalid(format!(
                "'{recipient}' is not a valid email address"
            )));
        }
    }

    let link = format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        encode_component(subject),
        encode_component(body)
    );
    Url::parse(&link).map_err(|e| CampaignError::invalid(format!("invalid mailto link: {e}")))
}

impl CalculationReport {
    /// A `mailto:` link whose body is the plain-text table.
    pub fn mailto_link(&self, recipient: &str, subject: &str) -> CalcResult<Url> {
        build_mailto_link(recipient, subject, &self.render_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report_builder::ReportBuilder;
    use campaign_core::CampaignParameters;
    use campaign_economics::compute_roi;

    #[test]
    fn test_spaces_encoded_as_percent_20() {
        let link = build_mailto_link("owner@pharmacy.example", "ROI Results", "a b").unwrap();
        assert_eq!(
            link.as_str(),
            "mailto:owner@pharmacy.example?subject=ROI%20Results&body=a%20b"
        );
    }

    #[test]
    fn test_reserved_characters_encoded() {
        let link = build_mailto_link("", "Q&A", "ROI: 1,500.00%\n+10").unwrap();
        let query = link.query().unwrap();
        assert!(query.starts_with("subject=Q%26A&body="));
        assert!(query.contains("%25"));
        assert!(query.contains("%0A"));
        assert!(query.contains("%2B10"));
        assert!(!query.contains(' '));
    }

    #[test]
    fn test_empty_recipient_allowed() {
        let link = build_mailto_link("", "Subject", "Body").unwrap();
        assert_eq!(link.scheme(), "mailto");
        assert_eq!(link.path(), "");
    }

    #[test]
    fn test_malformed_recipient_rejected() {
        assert!(build_mailto_link("not-an-address", "s", "b")
            .unwrap_err()
            .is_invalid_input());
        assert!(build_mailto_link("a@b.com?cc=x@y.com", "s", "b").is_err());
    }

    #[test]
    fn test_report_mailto_link() {
        let result = compute_roi(&CampaignParameters::new(500.0, 200, 40.0, 30.0)).unwrap();
        let report = ReportBuilder::default().roi(&result);
        let link = report
            .mailto_link("owner@pharmacy.example", "Pharmacy Campaign ROI Results")
            .unwrap();

        assert!(link.as_str().contains("subject=Pharmacy%20Campaign%20ROI%20Results"));
        assert!(link.as_str().contains("%248%2C000.00"));
    }
}
