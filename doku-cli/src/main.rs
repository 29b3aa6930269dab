//! DOKU CLI
//!
//! Command-line interface for the DOKU disbursement and repayment APIs.

mod listener;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doku_client::{ClientConfig, DisbursementClient, RepaymentClient};
use doku_types::Environment;
use doku_types::disbursement::{Account, Bank, Country, Person};
use doku_webhook::WebhookServer;

use crate::listener::ConsoleHandler;

#[derive(Parser)]
#[command(name = "doku")]
#[command(author, version, about = "DOKU disbursement and repayment CLI", long_about = None)]
struct Cli {
    /// Target environment (overrides DOKU_ENVIRONMENT)
    #[arg(long)]
    environment: Option<Environment>,

    /// Base URL override (e.g. a mock server)
    #[arg(long, env = "DOKU_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Disbursement (cash-in) operations
    Disbursement {
        #[command(flatten)]
        creds: AgentCredentials,
        #[command(subcommand)]
        action: DisbursementCommands,
    },
    /// Repayment (payment code) operations
    Repayment {
        #[command(flatten)]
        creds: MallCredentials,
        #[command(subcommand)]
        action: RepaymentCommands,
    },
    /// Webhook operations
    Webhook {
        #[command(flatten)]
        creds: MallCredentials,
        #[command(subcommand)]
        action: WebhookCommands,
    },
}

#[derive(Args)]
struct AgentCredentials {
    /// Agent key issued by DOKU
    #[arg(long, env = "DOKU_AGENT_KEY")]
    agent_key: String,
    /// AES encryption key (16, 24 or 32 bytes)
    #[arg(long, env = "DOKU_ENC_KEY", hide_env_values = true)]
    enc_key: String,
}

#[derive(Args)]
struct MallCredentials {
    /// Mall id issued by DOKU
    #[arg(long, env = "DOKU_MALL_ID")]
    mall_id: String,
    /// Shared key used for WORDS
    #[arg(long, env = "DOKU_SHARED_KEY", hide_env_values = true)]
    shared_key: String,
}

#[derive(Args)]
struct BeneficiaryAccount {
    /// Bank id (e.g. SWIFT code)
    #[arg(long)]
    bank_id: String,
    /// Bank code (e.g. 014)
    #[arg(long)]
    bank_code: String,
    #[arg(long, default_value = "")]
    bank_name: String,
    #[arg(long)]
    account_number: String,
    #[arg(long)]
    account_name: String,
    #[arg(long, default_value = "")]
    account_address: String,
    #[arg(long, default_value = "")]
    account_city: String,
}

impl BeneficiaryAccount {
    fn into_account(self) -> Account {
        Account {
            bank: Bank {
                id: self.bank_id,
                name: self.bank_name,
                code: self.bank_code,
                country_code: "ID".to_string(),
            },
            number: self.account_number,
            name: self.account_name,
            address: self.account_address,
            city: self.account_city,
        }
    }
}

#[derive(Subcommand)]
enum DisbursementCommands {
    /// Check connectivity and credentials
    Ping {
        /// Request id (defaults to a random UUID)
        #[arg(long)]
        request_id: Option<String>,
    },
    /// Quote a domestic bank transfer
    Inquiry {
        #[arg(long)]
        request_id: Option<String>,
        #[arg(long)]
        amount: f64,
        #[command(flatten)]
        account: BeneficiaryAccount,
    },
    /// Commit a transfer quoted by a previous inquiry
    Remit {
        #[arg(long)]
        request_id: Option<String>,
        /// idToken returned by the inquiry
        #[arg(long)]
        token: String,
        #[arg(long)]
        amount: f64,
        #[command(flatten)]
        account: BeneficiaryAccount,
        #[arg(long)]
        sender_first_name: String,
        #[arg(long, default_value = "")]
        sender_last_name: String,
        #[arg(long, default_value = "")]
        sender_phone: String,
        #[arg(long)]
        beneficiary_first_name: String,
        #[arg(long, default_value = "")]
        beneficiary_last_name: String,
        #[arg(long, default_value = "")]
        beneficiary_phone: String,
        #[arg(long, default_value = "")]
        note: String,
    },
}

#[derive(Subcommand)]
enum RepaymentCommands {
    /// Query the status of a transaction
    CheckStatus {
        #[arg(long)]
        trans_id: String,
        #[arg(long)]
        session_id: String,
    },
    /// Print the WORDS for an amount and transaction id
    Words {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        trans_id: String,
    },
}

#[derive(Subcommand)]
enum WebhookCommands {
    /// Start a local webhook receiver that bills every payment code at a fixed amount
    Listen {
        /// Port to listen on
        #[arg(long, default_value = "3000")]
        port: u16,
        /// Amount returned for every inquiry
        #[arg(long)]
        amount: f64,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,doku_client=debug,doku_webhook=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn person(first_name: String, last_name: String, phone_number: String) -> Person {
    Person {
        country: Some(Country::indonesia()),
        first_name,
        last_name,
        phone_number,
        ..Default::default()
    }
}

fn request_id(id: Option<String>) -> String {
    id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("invalid DOKU configuration")?;
    if let Some(environment) = cli.environment {
        config.environment = environment;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = Some(base_url);
    }
    tracing::debug!(environment = %config.environment, "using configuration");

    match cli.command {
        Commands::Disbursement { creds, action } => {
            let client = DisbursementClient::from_config(creds.agent_key, creds.enc_key, &config)?;

            match action {
                DisbursementCommands::Ping { request_id: id } => {
                    let resp = client.ping(&request_id(id)).await?;
                    println!("{}", serde_json::to_string_pretty(&resp)?);
                }
                DisbursementCommands::Inquiry {
                    request_id: id,
                    amount,
                    account,
                } => {
                    let resp = client
                        .inquiry(&request_id(id), amount, &account.into_account())
                        .await?;
                    println!("{}", serde_json::to_string_pretty(&resp)?);
                }
                DisbursementCommands::Remit {
                    request_id: id,
                    token,
                    amount,
                    account,
                    sender_first_name,
                    sender_last_name,
                    sender_phone,
                    beneficiary_first_name,
                    beneficiary_last_name,
                    beneficiary_phone,
                    note,
                } => {
                    let sender = person(sender_first_name, sender_last_name, sender_phone);
                    let beneficiary = person(
                        beneficiary_first_name,
                        beneficiary_last_name,
                        beneficiary_phone,
                    );
                    let resp = client
                        .remit(
                            &request_id(id),
                            &token,
                            amount,
                            &account.into_account(),
                            &sender,
                            &beneficiary,
                            &note,
                        )
                        .await?;
                    println!("{}", serde_json::to_string_pretty(&resp)?);
                }
            }
        }

        Commands::Repayment { creds, action } => {
            let client = RepaymentClient::from_config(creds.mall_id, creds.shared_key, &config)?;

            match action {
                RepaymentCommands::CheckStatus {
                    trans_id,
                    session_id,
                } => {
                    let resp = client.check_status(&trans_id, &session_id).await?;
                    println!("{}", serde_json::to_string_pretty(&resp)?);
                }
                RepaymentCommands::Words { amount, trans_id } => {
                    println!("{}", client.make_words(amount, &trans_id));
                }
            }
        }

        Commands::Webhook { creds, action } => match action {
            WebhookCommands::Listen { port, amount } => {
                let client =
                    RepaymentClient::from_config(creds.mall_id, creds.shared_key, &config)?;
                let server = WebhookServer::new(client, ConsoleHandler::new(amount));
                server.run(&format!("127.0.0.1:{}", port)).await?;
            }
        },
    }

    Ok(())
}
