use anyhow::Context;
use frog_tips::post::PostPayload;
use frog_tips::types::ContentHash;
use std::path::PathBuf;

pub fn run(
    file: Option<PathBuf>,
    text: String,
    links: Vec<String>,
    images: Vec<String>,
) -> anyhow::Result<ContentHash> {
    let payload = match file {
        Some(path) => {
            let raw = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice::<PostPayload>(&raw)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => PostPayload { text, links, images },
    };

    let normalized = payload.normalize()?;
    let hash = normalized.content_hash();

    println!("{}", hash);
    if normalized.links.len() != payload.links.len() || normalized.images.len() != payload.images.len() {
        eprintln!("note: duplicate or blank urls were dropped");
    }
    Ok(hash)
}
