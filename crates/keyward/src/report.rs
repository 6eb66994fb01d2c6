//! Report formatting.
//!
//! Pure rendering of an [`AggregateResult`] into one text block per pool.
//! The underlying maps are unordered; ordering is imposed here, at render
//! time, so the same result always produces byte-identical output.

use std::collections::HashMap;

use keyward_common::{NodeMessage, PoolId, PoolResponse};

use crate::aggregate::AggregateResult;

/// Which key-count map a read command shows; writes show none
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyView {
    Installed,
    Primary,
    None,
}

/// Render the full report, one block per pool in result order
pub fn render(result: &AggregateResult, view: KeyView) -> String {
    result
        .pools
        .iter()
        .map(|response| format_pool(response, view))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_pool(response: &PoolResponse, view: KeyView) -> String {
    let keys = match view {
        KeyView::Installed => format_keys(&response.keys, response.num_nodes),
        KeyView::Primary => format_keys(&response.primary_keys, response.num_nodes),
        KeyView::None => String::new(),
    };

    let sections = [
        format!("{}:", pool_label(&response.pool)),
        format_error(response.error.as_deref()),
        format_messages(&response.messages),
        keys,
    ];

    sections
        .into_iter()
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// "<site> (LAN)" for local pools, "WAN" for the wide-area pool, with an
/// optional "[<segment>]" suffix
fn pool_label(pool: &PoolId) -> String {
    let name = if pool.wan {
        "WAN".to_string()
    } else {
        format!("{} (LAN)", pool.site)
    };

    match &pool.segment {
        Some(segment) => format!("{} [{}]", name, segment),
        None => name,
    }
}

fn format_error(error: Option<&str>) -> String {
    match error {
        Some(message) => format!("  error: {}", message),
        None => String::new(),
    }
}

fn format_messages(messages: &HashMap<String, NodeMessage>) -> String {
    let mut entries: Vec<_> = messages.iter().collect();
    entries.sort_by_key(|(from, _)| from.as_str());

    entries
        .into_iter()
        .map(|(from, message)| format!("  {}: {}", from, message.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_keys(keys: &HashMap<String, usize>, total: usize) -> String {
    let mut entries: Vec<_> = keys.iter().collect();
    entries.sort_by_key(|(key, _)| key.as_str());

    entries
        .into_iter()
        .map(|(key, count)| format!("  {} [{}/{}]", key, count, total))
        .collect::<Vec<_>>()
        .join("\n")
}
