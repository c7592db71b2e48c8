use super::{InputCommand, NEXCESS_ONLY, ensure_enabled};
use super::list::ListCommand;
use crate::api::{Collection, Record};
use crate::choices::{ChoiceProvider, ChoiceSource, ssl_certificates, ssl_packages};
use crate::config::ConfigType;
use crate::context::Context;
use crate::error::CliError;
use crate::input::{
    InputSet, InputSpec, Invocation, ValueFilter, input, lookup_choice, parse_approver_emails,
};
use crate::summary::{pick, say_summary, timestamp};
use anyhow::Result;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;

const LIST_KEYS: &[&str] = &["id", "common_name"];
const SHOW_KEYS: &[&str] = &["id", "common_name", "valid_from_date", "valid_to_date"];

/// Certificate material and order details never echoed back
const HIDDEN_KEYS: &[&str] = &[
    "approver_email",
    "chain",
    "client_id",
    "crt",
    "domain",
    "identity",
    "is_expired",
    "is_installable",
    "is_multi_domain",
    "is_wildcard",
    "key",
    "months",
    "package_id",
];

const ORDER_INPUTS: InputSpec = &[
    input("months", ValueFilter::Int),
    input("package_id", ValueFilter::Int),
];

pub fn list(ctx: &Context, filters: &[String]) -> Result<()> {
    ListCommand::execute(
        ctx,
        "ssl.list",
        Collection::SslCertificates,
        LIST_KEYS,
        filters,
    )
}

/// Valid-from/to as dates; null dates are dropped
fn with_dates(mut summary: Record) -> Record {
    for key in ["valid_from_date", "valid_to_date"] {
        let Some(date) = summary.get(key).cloned() else {
            continue;
        };
        if date.is_null() {
            summary.shift_remove(key);
        } else {
            summary.insert(key.to_string(), timestamp(&date));
        }
    }
    summary
}

/// A created or imported certificate without its key material
fn certificate_summary(certificate: &Record) -> Record {
    let mut summary = certificate.clone();
    for key in HIDDEN_KEYS {
        summary.shift_remove(*key);
    }
    let no_alt_names = summary
        .get("alt_names")
        .is_some_and(|names| names.is_null() || names.as_array().is_some_and(Vec::is_empty));
    if no_alt_names {
        summary.shift_remove("alt_names");
    }
    with_dates(summary)
}

/// Contents of a certificate-related file that must exist
fn read_file(ctx: &Context, filename: &str) -> Result<String> {
    let path = Path::new(filename);
    if filename.is_empty() || !ctx.fs.is_file(path) {
        return Err(CliError::InvalidFilename {
            filename: filename.to_string(),
        }
        .into());
    }
    ctx.fs.read_to_string(path)
}

fn order_invocation(months: &Option<String>, package_id: &Option<String>) -> Invocation {
    Invocation::new()
        .option("months", months.clone())
        .option("package-id", package_id.clone())
}

fn say_created(ctx: &Context, command: &str, certificate: &Record) -> Result<()> {
    ctx.say(&ctx.phrase(command, "created", certificate));
    say_summary(ctx, command, &certificate_summary(certificate))
}

pub struct Show {
    pub id: Option<String>,
    pub lookup: Option<String>,
}

impl InputCommand for Show {
    const NAME: &'static str = "ssl.show";
    const RESTRICT_TO: &'static [ConfigType] = NEXCESS_ONLY;
    const INPUTS: InputSpec = &[input("id", ValueFilter::Int)];

    fn invocation(&self) -> Invocation {
        Invocation::new().argument("id", self.id.clone())
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("id", ssl_certificates())]
    }

    fn initialize(&self, inputs: &mut InputSet, choices: &mut dyn ChoiceProvider) -> Result<()> {
        if let Some(search) = self.lookup.as_deref().filter(|s| !s.is_empty()) {
            if inputs.is_unresolved("id") {
                lookup_choice(inputs, choices, "id", search)?;
            }
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let id = inputs.required_int("id")?;
        let certificate = ctx
            .endpoint
            .retrieve(&Collection::SslCertificates, &id.to_string())?;

        say_summary(ctx, Self::NAME, &with_dates(pick(&certificate, SHOW_KEYS)))
    }
}

/// Subject fields of a certificate request
#[derive(Debug, Clone, Default, Serialize)]
pub struct DistinguishedName {
    pub organization: Option<String>,
    pub street: Option<String>,
    pub locality: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub organizational_unit: Option<String>,
}

/// `ssl create`: order a certificate for a domain
pub struct Create {
    pub domain: Option<String>,
    pub months: Option<String>,
    pub package_id: Option<String>,
    /// JSON file with the subject fields; the DN flags are used if it is
    /// empty or not an object
    pub dn_file: Option<String>,
    pub dn: DistinguishedName,
    pub approver_emails: Vec<String>,
}

impl Create {
    fn distinguished_name(&self, ctx: &Context, approvers: &Value) -> Result<Value> {
        if let Some(file) = self.dn_file.as_deref().filter(|f| !f.is_empty()) {
            let contents = read_file(ctx, file)?;
            match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Object(dn)) if !dn.is_empty() => return Ok(Value::Object(dn)),
                Ok(_) => tracing::warn!(file, "Distinguished name file is empty, using flags"),
                Err(e) => {
                    tracing::warn!(file, error = %e, "Distinguished name file is not valid JSON, using flags")
                }
            }
        }

        let mut dn = serde_json::to_value(&self.dn)?;
        if let Value::Object(fields) = &mut dn {
            fields.insert("approver_email".to_string(), approvers.clone());
        }
        Ok(dn)
    }
}

impl InputCommand for Create {
    const NAME: &'static str = "ssl.create";
    const INPUTS: InputSpec = &[
        input("domain", ValueFilter::String),
        input("months", ValueFilter::Int),
        input("package_id", ValueFilter::Int),
    ];

    fn invocation(&self) -> Invocation {
        order_invocation(&self.months, &self.package_id).option("domain", self.domain.clone())
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("package_id", ssl_packages())]
    }

    fn initialize(&self, _inputs: &mut InputSet, _choices: &mut dyn ChoiceProvider) -> Result<()> {
        parse_approver_emails(&self.approver_emails)?;
        Ok(())
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let domain = inputs.required_string("domain")?;
        let months = inputs.required_int("months")?;
        let package_id = inputs.required_int("package_id")?;
        let approvers = serde_json::to_value(parse_approver_emails(&self.approver_emails)?)?;
        let dn = self.distinguished_name(ctx, &approvers)?;

        ctx.say(&ctx.phrase(Self::NAME, "creating", &()));
        let certificate = ctx.endpoint.create(
            &Collection::SslCertificates,
            &json!({
                "domain": domain,
                "distinguished_name": dn,
                "months": months,
                "package_id": package_id,
                "approver_email": approvers,
            }),
        )?;

        say_created(ctx, Self::NAME, &certificate)
    }
}

/// `ssl create-from-csr`: order a certificate for an existing signing request
pub struct CreateFromCsr {
    pub csr_file: String,
    pub key_file: String,
    pub months: Option<String>,
    pub package_id: Option<String>,
    pub approver_emails: Vec<String>,
}

impl InputCommand for CreateFromCsr {
    const NAME: &'static str = "ssl.create_from_csr";
    const INPUTS: InputSpec = ORDER_INPUTS;

    fn invocation(&self) -> Invocation {
        order_invocation(&self.months, &self.package_id)
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("package_id", ssl_packages())]
    }

    fn initialize(&self, _inputs: &mut InputSet, _choices: &mut dyn ChoiceProvider) -> Result<()> {
        parse_approver_emails(&self.approver_emails)?;
        Ok(())
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let months = inputs.required_int("months")?;
        let package_id = inputs.required_int("package_id")?;
        let approvers = parse_approver_emails(&self.approver_emails)?;
        let key = read_file(ctx, &self.key_file)?;
        let csr = read_file(ctx, &self.csr_file)?;

        ctx.say(&ctx.phrase(Self::NAME, "creating", &()));
        let certificate = ctx.endpoint.create(
            &Collection::SslCertificates,
            &json!({
                "csr": csr,
                "key": key,
                "months": months,
                "package_id": package_id,
                "approver_email": approvers,
            }),
        )?;

        say_created(ctx, Self::NAME, &certificate)
    }
}

/// `ssl import`: upload an existing certificate and key
pub struct Import {
    pub crt_file: String,
    pub key_file: String,
    pub chain_file: Option<String>,
}

impl Import {
    const NAME: &'static str = "ssl.import";

    pub fn execute(&self, ctx: &Context) -> Result<()> {
        ensure_enabled(ctx, Self::NAME, NEXCESS_ONLY)?;

        let key = read_file(ctx, &self.key_file)?;
        let crt = read_file(ctx, &self.crt_file)?;
        let chain = match self.chain_file.as_deref() {
            Some(file) if !file.is_empty() => read_file(ctx, file)?,
            _ => String::new(),
        };

        ctx.say(&ctx.phrase(Self::NAME, "creating", &()));
        let certificate = ctx.endpoint.create(
            &Collection::SslImports,
            &json!({ "key": key, "crt": crt, "chain": chain }),
        )?;

        say_created(ctx, Self::NAME, &certificate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockEndpoint;
    use crate::commands::run;
    use crate::test_helpers::{TestHarness, certificate};
    use crate::traits::MockResponse;

    fn certificates() -> MockEndpoint {
        MockEndpoint::new()
            .with_list(
                Collection::SslCertificates,
                vec![certificate(11, "example.com"), certificate(12, "shop.example.org")],
            )
            .with_record(Collection::SslCertificates, "12", certificate(12, "shop.example.org"))
    }

    fn approvers(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_show_by_lookup() {
        let harness = TestHarness::new(certificates());

        run(
            &harness.context(),
            &Show {
                id: None,
                lookup: Some("SHOP".to_string()),
            },
        )
        .unwrap();

        let printed = harness.printed();
        assert!(printed.contains("id: 12"));
        assert!(printed.contains("valid_from_date: 2023-11-14 22:13:20 UTC"));
        assert!(!printed.contains("BEGIN"));
    }

    fn create(approver_emails: Vec<String>) -> Create {
        Create {
            domain: Some("example.com".to_string()),
            months: Some("12".to_string()),
            package_id: None,
            dn_file: None,
            dn: DistinguishedName {
                organization: Some("Example Inc".to_string()),
                country: Some("US".to_string()),
                ..Default::default()
            },
            approver_emails,
        }
    }

    fn packages() -> MockEndpoint {
        MockEndpoint::new()
            .with_list(
                Collection::Packages,
                vec![json!({"id": 90, "name": "RapidSSL", "monthly_fee": "2.50"})],
            )
            .with_created(Collection::SslCertificates, certificate(31, "example.com"))
    }

    #[test]
    fn test_create_without_approvers_fails_before_prompting() {
        let harness = TestHarness::new(packages()).interactive();

        let err = run(&harness.context(), &create(vec![])).unwrap_err();

        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::NoApproverEmail)));
        assert!(harness.input.prompts().is_empty());
    }

    #[test]
    fn test_create_rejects_malformed_approver() {
        let harness = TestHarness::new(packages());

        let err = run(&harness.context(), &create(approvers(&["admin@example.com"]))).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidApproverEmail { approver }) if approver == "admin@example.com"
        ));
    }

    #[test]
    fn test_create_orders_certificate() {
        let harness = TestHarness::new(packages()).answering(vec![MockResponse::SelectDefault]);

        run(
            &harness.context(),
            &create(approvers(&["example.com:admin@example.com"])),
        )
        .unwrap();

        let (collection, body) = harness.endpoint.created().remove(0);
        assert_eq!(collection, Collection::SslCertificates);
        assert_eq!(body["package_id"], json!(90));
        assert_eq!(body["months"], json!(12));
        assert_eq!(body["approver_email"], json!({"example.com": "admin@example.com"}));
        assert_eq!(body["distinguished_name"]["organization"], json!("Example Inc"));
        assert_eq!(
            body["distinguished_name"]["approver_email"],
            json!({"example.com": "admin@example.com"})
        );

        let printed = harness.printed();
        assert!(printed.contains("Certificate #31 ordered."));
        assert!(!printed.contains("approver_email"));
        assert!(!printed.contains("alt_names"));
    }

    #[test]
    fn test_create_reads_distinguished_name_file() {
        let harness = TestHarness::new(packages())
            .with_file("/certs/dn.json", r#"{"organization": "From File"}"#);
        let mut command = create(approvers(&["example.com:admin@example.com"]));
        command.package_id = Some("90".to_string());
        command.dn_file = Some("/certs/dn.json".to_string());

        run(&harness.context(), &command).unwrap();

        let (_, body) = harness.endpoint.created().remove(0);
        assert_eq!(body["distinguished_name"], json!({"organization": "From File"}));
    }

    #[test]
    fn test_create_from_csr_requires_files() {
        let harness = TestHarness::new(packages()).with_file("/certs/site.key", "KEY");

        let err = run(
            &harness.context(),
            &CreateFromCsr {
                csr_file: "/certs/site.csr".to_string(),
                key_file: "/certs/site.key".to_string(),
                months: Some("12".to_string()),
                package_id: Some("90".to_string()),
                approver_emails: approvers(&["example.com:admin@example.com"]),
            },
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidFilename { filename }) if filename == "/certs/site.csr"
        ));
        assert!(harness.endpoint.created().is_empty());
    }

    #[test]
    fn test_import_sends_files() {
        let harness = TestHarness::new(
            MockEndpoint::new().with_created(Collection::SslImports, certificate(40, "example.com")),
        )
        .with_file("/certs/site.crt", "CRT")
        .with_file("/certs/site.key", "KEY");

        Import {
            crt_file: "/certs/site.crt".to_string(),
            key_file: "/certs/site.key".to_string(),
            chain_file: None,
        }
        .execute(&harness.context())
        .unwrap();

        assert_eq!(
            harness.endpoint.created(),
            vec![(
                Collection::SslImports,
                json!({"key": "KEY", "crt": "CRT", "chain": ""})
            )]
        );
        assert!(harness.printed().contains("Certificate #40 imported."));
    }

    #[test]
    fn test_import_refused_for_thermo_profile() {
        let harness = TestHarness::new(MockEndpoint::new())
            .thermo()
            .with_file("/certs/site.crt", "CRT")
            .with_file("/certs/site.key", "KEY");

        let err = Import {
            crt_file: "/certs/site.crt".to_string(),
            key_file: "/certs/site.key".to_string(),
            chain_file: None,
        }
        .execute(&harness.context())
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::CommandRestricted { .. })
        ));
        assert!(harness.endpoint.created().is_empty());
    }
}
