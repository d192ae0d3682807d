//! Episode read commands.

use super::{to_json, write_line};
use crate::Result;
use crate::storage::GraphBackend;
use std::io::Write;

/// Prints every episode as one JSON object per line, newest first.
///
/// Returns the number of episodes printed.
pub async fn cmd_episodes(backend: &dyn GraphBackend, out: &mut impl Write) -> Result<usize> {
    let episodes = backend.get_episodes().await?;
    for episode in &episodes {
        write_line(out, to_json(episode)?)?;
    }
    Ok(episodes.len())
}

/// Prints one episode. Returns false when it does not exist.
pub async fn cmd_episode(
    backend: &dyn GraphBackend,
    episode_id: &str,
    out: &mut impl Write,
) -> Result<bool> {
    match backend.get_one_episode(episode_id).await? {
        Some(episode) => {
            write_line(out, to_json(&episode)?)?;
            Ok(true)
        },
        None => {
            write_line(out, format_args!("episode not found: {episode_id}"))?;
            Ok(false)
        },
    }
}
