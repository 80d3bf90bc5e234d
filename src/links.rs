use std::io::Write;
use std::process::{Command, Stdio};

use crate::render::Link;

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const OPENER: &str = "xdg-open";

/// Hand a link to the desktop opener. Returns a status-line message.
pub fn open_link(link: &Link) -> String {
    if link.is_inert() {
        return format!("{}: no link available", link.label);
    }
    match Command::new(OPENER)
        .arg(&link.url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_) => {
            tracing::debug!(url = %link.url, "opening link");
            format!("Opening: {}", link.url)
        }
        Err(e) => {
            tracing::warn!(url = %link.url, error = %e, "opener not available");
            format!("Link: {} ({} not available)", link.url, OPENER)
        }
    }
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> bool {
    let Ok(mut child) = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
    else {
        return false;
    };
    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(text.as_bytes());
    }
    let _ = child.wait();
    true
}

/// Copy a link with xclip or wl-copy. Returns a status-line message.
pub fn copy_link(link: &Link) -> String {
    if link.is_inert() {
        return format!("{}: no link available", link.label);
    }
    if pipe_to("xclip", &["-selection", "clipboard"], &link.url) || pipe_to("wl-copy", &[], &link.url) {
        format!("Copied: {}", link.url)
    } else {
        format!("Link: {} (clipboard not available)", link.url)
    }
}
