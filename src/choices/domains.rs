use super::engine::{ChoiceSource, Scope};
use crate::api::Collection;
use crate::error::{ChoiceDomain, CliError};
use crate::input::InputSet;

fn all_cloud_accounts(_: &InputSet) -> Result<Scope, CliError> {
    Ok(Scope::new(Collection::CloudAccounts))
}

pub fn cloud_accounts() -> ChoiceSource {
    ChoiceSource {
        domain: ChoiceDomain::CloudAccount,
        scope: all_cloud_accounts,
        key_field: "id",
        label_field: "domain",
        padded: &["domain", "id"],
        description: "choices.cloud_account",
    }
}

fn backups_of_cloud_account(inputs: &InputSet) -> Result<Scope, CliError> {
    let cloud_account_id = inputs.required_int("cloud_account_id")?;
    Ok(Scope::new(Collection::Backups { cloud_account_id })
        .context("cloud_account_id", cloud_account_id)
        .owned_by(Collection::CloudAccounts, cloud_account_id, &["domain"]))
}

/// Backups of the already-resolved `cloud_account_id`, keyed by filename
pub fn backups() -> ChoiceSource {
    ChoiceSource {
        domain: ChoiceDomain::Backup,
        scope: backups_of_cloud_account,
        key_field: "filename",
        label_field: "filename",
        padded: &[],
        description: "choices.backup",
    }
}

fn production_packages(kind: &str) -> Scope {
    Scope::new(Collection::Packages)
        .filter("type", kind)
        .filter("environment_type", "production")
        .context("type", kind)
}

fn cloud_account_package_scope(_: &InputSet) -> Result<Scope, CliError> {
    Ok(production_packages("virt-guest-cloud"))
}

pub fn cloud_account_packages() -> ChoiceSource {
    ChoiceSource {
        domain: ChoiceDomain::CloudAccountPackage,
        scope: cloud_account_package_scope,
        key_field: "id",
        label_field: "name",
        padded: &["name", "monthly_fee"],
        description: "choices.package",
    }
}

fn ssl_package_scope(_: &InputSet) -> Result<Scope, CliError> {
    Ok(production_packages("ssl"))
}

pub fn ssl_packages() -> ChoiceSource {
    ChoiceSource {
        domain: ChoiceDomain::SslPackage,
        scope: ssl_package_scope,
        key_field: "id",
        label_field: "name",
        padded: &["name", "monthly_fee"],
        description: "choices.package",
    }
}

fn all_ssl_certificates(_: &InputSet) -> Result<Scope, CliError> {
    Ok(Scope::new(Collection::SslCertificates))
}

pub fn ssl_certificates() -> ChoiceSource {
    ChoiceSource {
        domain: ChoiceDomain::SslCertificate,
        scope: all_ssl_certificates,
        key_field: "id",
        label_field: "common_name",
        padded: &["common_name", "id"],
        description: "choices.ssl",
    }
}

fn all_api_tokens(_: &InputSet) -> Result<Scope, CliError> {
    Ok(Scope::new(Collection::ApiTokens))
}

pub fn api_tokens() -> ChoiceSource {
    ChoiceSource {
        domain: ChoiceDomain::ApiToken,
        scope: all_api_tokens,
        key_field: "id",
        label_field: "name",
        padded: &["name", "id"],
        description: "choices.api_token",
    }
}

fn all_apps(_: &InputSet) -> Result<Scope, CliError> {
    Ok(Scope::new(Collection::Apps))
}

pub fn apps() -> ChoiceSource {
    ChoiceSource {
        domain: ChoiceDomain::App,
        scope: all_apps,
        key_field: "app_id",
        label_field: "name",
        padded: &["name"],
        description: "choices.app",
    }
}

fn active_clouds(_: &InputSet) -> Result<Scope, CliError> {
    Ok(Scope::new(Collection::Clouds)
        .filter("status", "active")
        .context("status", "active"))
}

pub fn clouds() -> ChoiceSource {
    ChoiceSource {
        domain: ChoiceDomain::Cloud,
        scope: active_clouds,
        key_field: "cloud_id",
        label_field: "location_code",
        padded: &["location"],
        description: "choices.cloud",
    }
}
