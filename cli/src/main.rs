use clap::{Args, Parser, Subcommand};
use color_eyre::{eyre, eyre::Context};
use paywatch::{
    WatchEndpoint, WebhookSigner,
    invoice::{self, InvoiceStatus, InvoiceUpdate},
    listen::Listener,
};

/* Defaults match the local test service, so a bare `paywatch sign` or
 * `paywatch listen` works against it out of the box. */
const DEFAULT_KEY: &str = "some-key";
/// A recorded InvoicePayed delivery, byte for byte.
const DEFAULT_BODY: &str = r#"{"invoiceId": "some-id", "type": "InvoicePayed"}"#;
const DEFAULT_SERVER: &str = "ws://localhost:5000";
const DEFAULT_INVOICE_ID: &str = "some-id";

/// Synthesize a webhook body instead of passing one literally.
#[derive(Debug, Args)]
struct SynthesizedBody {
    /// Invoice to put in the synthesized body
    #[clap(long, value_name = "ID", requires = "status")]
    invoice_id: Option<String>,
    /// Event type to put in the synthesized body, e.g. InvoicePayed
    #[clap(long, value_name = "STATUS", requires = "invoice_id")]
    status: Option<InvoiceStatus>,
}

#[derive(Debug, Subcommand)]
enum PaywatchCommand {
    /// Compute the HMAC-SHA256 tag of a webhook body
    ///
    /// Prints the lowercase hex digest a sender would put in the
    /// BTCPAY-SIG header (minus the 'sha256=' prefix).
    Sign {
        /// Shared secret the tag is keyed with
        #[clap(long, value_name = "KEY", default_value = DEFAULT_KEY)]
        key: String,
        #[clap(flatten)]
        synthesized: SynthesizedBody,
        /// Raw body to sign; defaults to the recorded InvoicePayed delivery
        #[clap(value_name = "BODY", conflicts_with_all = ["invoice_id", "status"])]
        body: Option<String>,
    },
    /// Watch one invoice's status feed until the server closes it
    Listen {
        /// Base URL of the invoice service
        #[clap(long, value_name = "ws://HOST:PORT", default_value = DEFAULT_SERVER)]
        server: url::Url,
        /// Invoice to watch
        #[clap(long, value_name = "ID", default_value = DEFAULT_INVOICE_ID)]
        invoice_id: String,
    },
}

#[derive(Debug, Parser)]
#[clap(version, about, arg_required_else_help = true)]
struct PaywatchCli {
    /// Enable logging to stderr, for debugging purposes
    #[clap(short = 'v', long = "verbose", alias = "log", global = true)]
    log: bool,
    #[clap(subcommand)]
    command: PaywatchCommand,
}

#[async_std::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let app = PaywatchCli::parse();

    if app.log {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .filter_module("paywatch", log::LevelFilter::Trace)
            .try_init()?;
        log::debug!("Logging enabled.");
    } else {
        env_logger::builder()
            .filter_level(log::LevelFilter::Info)
            .format_timestamp(None)
            .format_target(false)
            .try_init()?;
    }

    match app.command {
        PaywatchCommand::Sign {
            key,
            synthesized,
            body,
        } => {
            let body = match (body, synthesized.invoice_id, synthesized.status) {
                (Some(body), _, _) => body,
                (None, Some(invoice_id), Some(status)) => {
                    InvoiceUpdate::new(invoice_id, status).to_json()
                },
                _ => DEFAULT_BODY.to_owned(),
            };
            let digest = WebhookSigner::new(key).sign(body.as_bytes());
            println!("{digest}");
        },
        PaywatchCommand::Listen { server, invoice_id } => {
            let endpoint = WatchEndpoint::new(server, invoice_id);
            let mut listener = Listener::connect(&endpoint)
                .await
                .wrap_err_with(|| format!("Failed to open the status feed at {endpoint}"))?;
            loop {
                match listener.next_message().await {
                    Ok(Some(text)) => {
                        if let Some(status) = invoice::peek_status(&text) {
                            log::debug!(
                                "Invoice status is now {status}{}",
                                if status.is_terminal() { ", feed will end" } else { "" },
                            );
                        }
                        println!("{text}");
                    },
                    /* A clean close and a broken connection end the watch
                     * the same way; only the debug log tells them apart. */
                    Ok(None) => {
                        println!("Websocket closed");
                        break;
                    },
                    Err(err) => {
                        log::debug!("Feed failed: {err}");
                        println!("Websocket closed");
                        break;
                    },
                }
            }
        },
    }

    Ok(())
}
