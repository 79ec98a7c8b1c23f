//! Clipboard integration.

use crate::data::Node;
use crate::data_viewer::slicer::DatasetView;
use crate::error::Result;
use arboard::Clipboard;

/// Copy the address of `node` (`/g1/d1`).
pub fn copy_node_path(node: &Node) -> Result<()> {
    set_text(node.path())
}

/// Copy the current page of `view` as tab-separated rows.
pub fn copy_page(view: &DatasetView) -> Result<()> {
    set_text(view.to_tsv())
}

fn set_text(text: String) -> Result<()> {
    let len = text.len();
    Clipboard::new()?.set_text(text)?;
    tracing::debug!("Copied {} bytes to clipboard", len);
    Ok(())
}
