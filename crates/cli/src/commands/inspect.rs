use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use frog_tips::receipt::{PostRecord, TipReceipt};
use frog_tips::types::{ContentHash, TxId};
use frog_tips_node::persistence::SnapshotManager;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Deserialize)]
pub struct SnapshotContents {
    pub posts: BTreeMap<ContentHash, PostRecord>,
    pub receipts: BTreeMap<TxId, TipReceipt>,
}

/// Loads and checks a snapshot, then prints a per-post summary.
pub fn run(snapshot_path: &Path, show_receipts: bool) -> anyhow::Result<()> {
    let contents = load(snapshot_path)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Content Hash", "Tips", "Total (microSTX)", "Created"]);
    for post in contents.posts.values() {
        table.add_row(vec![
            post.content_hash.to_string(),
            post.totals.count.to_string(),
            post.totals.total.to_string(),
            post.created_at.to_rfc3339(),
        ]);
    }
    println!("{table}\n");

    if show_receipts {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Txid", "Content Hash", "Post", "Amount", "Block"]);
        for r in contents.receipts.values() {
            table.add_row(vec![
                r.txid.to_string(),
                r.content_hash.to_string(),
                r.post_id.to_string(),
                r.amount.to_string(),
                r.block_height.map(|h| h.to_string()).unwrap_or_default(),
            ]);
        }
        println!("{table}\n");
    }

    let orphans = orphaned_receipts(&contents);
    if orphans > 0 {
        println!("{} receipt(s) reference deleted posts", orphans);
    }
    Ok(())
}

pub fn load(snapshot_path: &Path) -> anyhow::Result<SnapshotContents> {
    let (meta, body) = SnapshotManager::load(snapshot_path)?;

    println!("\nFROG Snapshot Report");
    println!("--------------------");
    println!(
        "Version: {}, Written: {}, Posts: {}, Receipts: {}, Body: {} bytes",
        meta.version,
        chrono::DateTime::from_timestamp(meta.timestamp, 0)
            .unwrap_or_default()
            .to_rfc3339(),
        meta.post_count,
        meta.receipt_count,
        meta.body_len
    );

    let contents: SnapshotContents = serde_json::from_slice(&body)?;
    if contents.posts.len() as u64 != meta.post_count || contents.receipts.len() as u64 != meta.receipt_count {
        anyhow::bail!(
            "snapshot counts disagree with its header ({} posts, {} receipts)",
            contents.posts.len(),
            contents.receipts.len()
        );
    }
    Ok(contents)
}

pub fn orphaned_receipts(contents: &SnapshotContents) -> usize {
    contents
        .receipts
        .values()
        .filter(|r| !contents.posts.contains_key(&r.content_hash))
        .count()
}
