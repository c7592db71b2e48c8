mod api;
mod choices;
mod commands;
mod config;
mod context;
mod error;
mod input;
mod logging;
mod output;
mod phrases;
mod summary;
#[cfg(test)]
mod test_helpers;
mod traits;
mod wait;

use anyhow::Result;
use api::ApiClient;
use clap::{ArgAction, Parser, Subcommand};
use commands::{api_token, backup, cloud_account, run, ssl};
use config::{Environment, Overrides, Settings};
use context::{Context, RunOptions};
use std::sync::Arc;
use traits::RealFileSystem;

#[derive(Parser)]
#[command(name = "nexcess")]
#[command(about = "Command-line client for the Nexcess and Thermo hosting APIs", long_about = None)]
#[command(version)]
struct Cli {
    /// API token to authenticate with (overrides the profile and NEXCESS_API_TOKEN)
    #[arg(long, global = true)]
    api_token: Option<String>,

    /// Built-in config type (nexcess, thermo) or a json/yaml profile file
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Wait for long-running operations to finish
    #[arg(long, global = true)]
    wait: bool,

    /// Never prompt; missing inputs are errors
    #[arg(short = 'n', long = "no-interaction", global = true)]
    no_interaction: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage cloud accounts and their backups
    #[command(subcommand)]
    CloudAccount(CloudAccountCommands),

    /// Manage SSL certificates
    #[command(subcommand)]
    Ssl(SslCommands),

    /// Manage API tokens
    #[command(subcommand)]
    ApiToken(ApiTokenCommands),
}

#[derive(Subcommand)]
enum CloudAccountCommands {
    /// List cloud accounts
    List {
        /// Filters as key:value
        filter: Vec<String>,
    },

    /// Show one cloud account
    Show {
        id: Option<String>,

        /// Find the cloud account by (part of) its domain
        #[arg(long)]
        domain: Option<String>,

        /// Find the cloud account by (part of) its IP address
        #[arg(long)]
        ip: Option<String>,
    },

    /// Create a cloud account
    Create {
        /// Find the application by (part of) its name
        app: Option<String>,

        #[arg(long)]
        app_id: Option<String>,

        #[arg(long)]
        cloud_id: Option<String>,

        #[arg(long)]
        domain: Option<String>,

        /// Install the application after provisioning
        #[arg(long)]
        install_app: bool,

        #[arg(long)]
        package_id: Option<String>,
    },

    /// Delete a cloud account
    Delete {
        id: Option<String>,

        /// Do not ask for confirmation
        #[arg(long)]
        force: bool,
    },

    /// Manage cloud account backups
    #[command(subcommand)]
    Backup(BackupCommands),
}

#[derive(Subcommand)]
enum BackupCommands {
    /// List the backups of a cloud account
    List {
        #[arg(short = 'c', long)]
        cloud_account_id: Option<String>,
    },

    /// Show one backup
    Show {
        #[arg(short = 'c', long)]
        cloud_account_id: Option<String>,

        #[arg(short = 'f', long)]
        filename: Option<String>,
    },

    /// Start a backup
    Create {
        #[arg(short = 'c', long)]
        cloud_account_id: Option<String>,

        /// Wait for the backup and download it into this directory
        #[arg(short = 'd', long)]
        download: Option<String>,
    },

    /// Download a backup
    Download {
        #[arg(short = 'c', long)]
        cloud_account_id: Option<String>,

        #[arg(short = 'f', long)]
        filename: Option<String>,

        /// Directory to save the backup in
        #[arg(short = 'd', long)]
        download_path: Option<String>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Delete a backup
    Delete {
        #[arg(short = 'c', long)]
        cloud_account_id: Option<String>,

        #[arg(short = 'f', long)]
        filename: Option<String>,
    },
}

#[derive(Subcommand)]
enum SslCommands {
    /// List SSL certificates
    List {
        /// Filters as key:value
        filter: Vec<String>,
    },

    /// Show one certificate
    Show {
        id: Option<String>,

        /// Find the certificate by (part of) its common name
        #[arg(long)]
        lookup: Option<String>,
    },

    /// Order a certificate for a domain
    Create {
        #[arg(long)]
        domain: Option<String>,

        #[arg(long)]
        months: Option<String>,

        #[arg(long)]
        package_id: Option<String>,

        /// JSON file with the distinguished name fields
        #[arg(long)]
        dn_file: Option<String>,

        #[arg(long)]
        organization: Option<String>,

        #[arg(long)]
        street: Option<String>,

        #[arg(long)]
        locality: Option<String>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long, alias = "unit")]
        organizational_unit: Option<String>,

        /// Approver per domain, as domain:email (repeatable)
        #[arg(long = "approver-email")]
        approver_email: Vec<String>,
    },

    /// Order a certificate from an existing signing request
    CreateFromCsr {
        #[arg(long)]
        csr_file: String,

        #[arg(long)]
        key_file: String,

        #[arg(long)]
        months: Option<String>,

        #[arg(long)]
        package_id: Option<String>,

        /// Approver per domain, as domain:email (repeatable)
        #[arg(long = "approver-email")]
        approver_email: Vec<String>,
    },

    /// Import an existing certificate
    Import {
        #[arg(long)]
        crt_file: String,

        #[arg(long)]
        key_file: String,

        #[arg(long)]
        chain_file: Option<String>,
    },
}

#[derive(Subcommand)]
enum ApiTokenCommands {
    /// List API tokens
    List {
        /// Filters as key:value
        filter: Vec<String>,
    },

    /// Create an API token
    Create {
        #[arg(long)]
        name: Option<String>,
    },

    /// Delete an API token
    Delete {
        id: Option<String>,

        /// Do not ask for confirmation
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = start(cli) {
        if json {
            match serde_json::to_string_pretty(&error::to_json(&err)) {
                Ok(body) => eprintln!("{}", body),
                Err(_) => output::error(&format!("{:#}", err)),
            }
        } else {
            output::error(&format!("{:#}", err));
        }
        std::process::exit(error::exit_code_for(&err));
    }
}

fn start(cli: Cli) -> Result<()> {
    let fs = RealFileSystem;
    let vars = |name: &str| std::env::var(name).ok();
    let env = Environment {
        vars: &vars,
        cwd: std::env::current_dir()?,
        home: dirs::home_dir(),
        fs: &fs,
    };
    let settings = Settings::load(
        &Overrides {
            profile: cli.profile.clone(),
            api_token: cli.api_token.clone(),
            wait: cli.wait,
        },
        &env,
    )?;

    logging::init_tracing(cli.verbose.max(u8::from(settings.debug)));
    tracing::debug!(
        profile = %settings.profile,
        profile_path = ?settings.profile_path,
        config_type = %settings.config_type,
        base_url = %settings.base_url,
        "Starting"
    );

    let client = ApiClient::new(&settings.base_url, &settings.api_token)?;
    let options = RunOptions {
        json: cli.json,
        interactive: !cli.no_interaction,
        wait: settings.wait_always,
        wait_policy: settings.wait,
        config_type: settings.config_type,
    };
    let ctx = Context::new(Arc::new(client), options)?;

    dispatch(&ctx, cli.command)
}

fn dispatch(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::CloudAccount(command) => match command {
            CloudAccountCommands::List { filter } => cloud_account::list(ctx, &filter),
            CloudAccountCommands::Show { id, domain, ip } => {
                run(ctx, &cloud_account::Show { id, domain, ip })
            }
            CloudAccountCommands::Create {
                app,
                app_id,
                cloud_id,
                domain,
                install_app,
                package_id,
            } => run(
                ctx,
                &cloud_account::Create {
                    app,
                    app_id,
                    cloud_id,
                    domain,
                    install_app,
                    package_id,
                },
            ),
            CloudAccountCommands::Delete { id, force } => {
                run(ctx, &cloud_account::Delete { id, force })
            }
            CloudAccountCommands::Backup(command) => dispatch_backup(ctx, command),
        },
        Commands::Ssl(command) => match command {
            SslCommands::List { filter } => ssl::list(ctx, &filter),
            SslCommands::Show { id, lookup } => run(ctx, &ssl::Show { id, lookup }),
            SslCommands::Create {
                domain,
                months,
                package_id,
                dn_file,
                organization,
                street,
                locality,
                state,
                country,
                organizational_unit,
                approver_email,
            } => run(
                ctx,
                &ssl::Create {
                    domain,
                    months,
                    package_id,
                    dn_file,
                    dn: ssl::DistinguishedName {
                        organization,
                        street,
                        locality,
                        state,
                        country,
                        organizational_unit,
                    },
                    approver_emails: approver_email,
                },
            ),
            SslCommands::CreateFromCsr {
                csr_file,
                key_file,
                months,
                package_id,
                approver_email,
            } => run(
                ctx,
                &ssl::CreateFromCsr {
                    csr_file,
                    key_file,
                    months,
                    package_id,
                    approver_emails: approver_email,
                },
            ),
            SslCommands::Import {
                crt_file,
                key_file,
                chain_file,
            } => ssl::Import {
                crt_file,
                key_file,
                chain_file,
            }
            .execute(ctx),
        },
        Commands::ApiToken(command) => match command {
            ApiTokenCommands::List { filter } => api_token::list(ctx, &filter),
            ApiTokenCommands::Create { name } => run(ctx, &api_token::Create { name }),
            ApiTokenCommands::Delete { id, force } => run(ctx, &api_token::Delete { id, force }),
        },
    }
}

fn dispatch_backup(ctx: &Context, command: BackupCommands) -> Result<()> {
    match command {
        BackupCommands::List { cloud_account_id } => run(ctx, &backup::List { cloud_account_id }),
        BackupCommands::Show {
            cloud_account_id,
            filename,
        } => run(
            ctx,
            &backup::Show {
                cloud_account_id,
                filename,
            },
        ),
        BackupCommands::Create {
            cloud_account_id,
            download,
        } => run(
            ctx,
            &backup::Create {
                cloud_account_id,
                download,
            },
        ),
        BackupCommands::Download {
            cloud_account_id,
            filename,
            download_path,
            force,
        } => run(
            ctx,
            &backup::Download {
                cloud_account_id,
                filename,
                download_path,
                force,
            },
        ),
        BackupCommands::Delete {
            cloud_account_id,
            filename,
        } => run(
            ctx,
            &backup::Delete {
                cloud_account_id,
                filename,
            },
        ),
    }
}
