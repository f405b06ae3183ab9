use clap::{Parser, Subcommand};
use frog_tips_cli::commands::{decode_arg, hash, inspect, verify_tx};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "frog-tips")]
#[command(about = "FROG tips operator tool: content hashes, tx checks and snapshot inspection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the content hash a post payload will be stored under.
    Hash {
        /// JSON file with `text`, `links` and `images`. Overrides the flags below.
        #[arg(long, short)]
        file: Option<PathBuf>,

        #[arg(long, short, default_value = "")]
        text: String,

        #[arg(long = "link")]
        links: Vec<String>,

        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// Decode a Clarity function argument (`u42` or `0x01...`).
    DecodeArg {
        value: String,
    },
    /// Fetch a transaction and check it against a tip claim.
    VerifyTx {
        #[arg(long)]
        txid: String,

        #[arg(long)]
        post_id: String,

        #[arg(long)]
        amount: String,

        #[arg(long, default_value = frog_tips_node::config::DEFAULT_CHAIN_API_URL)]
        api_url: String,

        #[arg(long, default_value = frog_tips_node::config::DEFAULT_TIPS_CONTRACT)]
        contract: String,

        #[arg(long, default_value = frog_tips::config::DEFAULT_TIP_FUNCTION)]
        function: String,

        /// Request timeout in seconds
        #[arg(long, default_value_t = frog_tips_node::config::DEFAULT_CHAIN_TIMEOUT_SECS)]
        timeout: u64,
    },
    /// Show the contents of a store snapshot file.
    Inspect {
        snapshot_path: PathBuf,

        /// Also list every receipt.
        #[arg(long)]
        receipts: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            file,
            text,
            links,
            images,
        } => hash::run(file, text, links, images).map(|_| ()),
        Commands::DecodeArg { value } => decode_arg::run(&value).map(|_| ()),
        Commands::VerifyTx {
            txid,
            post_id,
            amount,
            api_url,
            contract,
            function,
            timeout,
        } => verify_tx::run(verify_tx::Args {
            txid,
            post_id,
            amount,
            api_url,
            contract,
            function,
            timeout_secs: timeout,
        }),
        Commands::Inspect {
            snapshot_path,
            receipts,
        } => inspect::run(&snapshot_path, receipts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use frog_tips_node::config::{DEFAULT_CHAIN_API_URL, DEFAULT_CHAIN_TIMEOUT_SECS, DEFAULT_TIPS_CONTRACT};

    #[test]
    fn test_verify_tx_defaults_follow_node_config() {
        Cli::command().debug_assert();
        let cli = Cli::try_parse_from([
            "frog-tips", "verify-tx", "--txid", "abc", "--post-id", "1", "--amount", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::VerifyTx {
                api_url,
                contract,
                function,
                timeout,
                ..
            } => {
                assert_eq!(api_url, DEFAULT_CHAIN_API_URL);
                assert_eq!(contract, DEFAULT_TIPS_CONTRACT);
                assert_eq!(function, frog_tips::config::DEFAULT_TIP_FUNCTION);
                assert_eq!(timeout, DEFAULT_CHAIN_TIMEOUT_SECS);
            }
            _ => panic!("expected verify-tx"),
        }
    }
}
