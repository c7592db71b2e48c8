use crate::error::CliError;
use indexmap::IndexMap;

/// List filter parameters sent with a collection query
pub type Filter = IndexMap<String, String>;

/// Splits `key:value`, requiring exactly one separator
fn split_pair(token: &str) -> Option<(&str, &str)> {
    if token.matches(':').count() != 1 {
        return None;
    }
    token.split_once(':')
}

/// Parses `key:value` list filter tokens; later duplicates overwrite earlier ones
pub fn parse_filters(tokens: &[String]) -> Result<Filter, CliError> {
    let mut filter = Filter::new();
    for token in tokens {
        let (key, value) = split_pair(token).ok_or_else(|| CliError::InvalidFilterFormat {
            filter: token.clone(),
        })?;
        filter.insert(key.to_string(), value.to_string());
    }

    tracing::debug!(?filter, "Parsed list filter");
    Ok(filter)
}

/// Parses `domain:email` approver tokens for certificate orders
pub fn parse_approver_emails(tokens: &[String]) -> Result<IndexMap<String, String>, CliError> {
    if tokens.is_empty() {
        return Err(CliError::NoApproverEmail);
    }

    let mut approvers = IndexMap::new();
    for token in tokens {
        let (domain, email) =
            split_pair(token).ok_or_else(|| CliError::InvalidApproverEmail {
                approver: token.clone(),
            })?;
        approvers.insert(domain.to_string(), email.to_string());
    }
    Ok(approvers)
}
