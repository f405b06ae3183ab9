use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use frog_tips::types::{MicroStx, PostId, TxId};
use frog_tips::verify::{verify_tip_tx, TipExpectation};
use frog_tips_node::network::{HiroClient, TxSource};
use std::time::Duration;

pub struct Args {
    pub txid: String,
    pub post_id: String,
    pub amount: String,
    pub api_url: String,
    pub contract: String,
    pub function: String,
    pub timeout_secs: u64,
}

/// Runs the same checks the service applies before crediting a tip.
/// Exits with an error when the transaction would be rejected.
pub fn run(args: Args) -> anyhow::Result<()> {
    let txid = TxId::parse(&args.txid)?;
    let post_id = PostId::parse(&args.post_id)?;
    let amount = MicroStx::parse(&args.amount)?;

    let client = HiroClient::new(&args.api_url, Duration::from_secs(args.timeout_secs))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let tx = runtime.block_on(client.fetch_tx(&txid))?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);
    table.add_row(vec!["txid".to_string(), txid.to_string()]);
    table.add_row(vec!["status".to_string(), tx.tx_status.clone()]);
    table.add_row(vec!["type".to_string(), tx.tx_type.clone()]);
    table.add_row(vec![
        "block height".to_string(),
        tx.block_height.map(|h| h.to_string()).unwrap_or_else(|| "pending".into()),
    ]);
    if let Some(call) = &tx.contract_call {
        table.add_row(vec!["contract".to_string(), call.contract_id.clone()]);
        table.add_row(vec!["function".to_string(), call.function_name.clone()]);
        for (i, arg) in call.function_args.iter().enumerate() {
            let shown = match arg.decode() {
                Some(v) => format!("{:?}", v),
                None => "undecodable".to_string(),
            };
            table.add_row(vec![format!("arg {}", i), shown]);
        }
    }
    println!("{table}");

    let expect = TipExpectation {
        contract_id: &args.contract,
        function_name: &args.function,
        post_id,
        amount,
    };
    match verify_tip_tx(&tx, &txid, &expect) {
        Ok(verified) => {
            println!("OK: tip of {} microSTX to post {} verified ({})", amount, post_id, verified.txid);
            Ok(())
        }
        Err(rejection) => anyhow::bail!("REJECTED: {}", rejection),
    }
}
