//! # tabsplit Entry Point
//!
//! ```text
//! tabsplit split demos/dinner.json
//! tabsplit split demos/dinner.json --format json > report.json
//! tabsplit check demos/dinner.json
//! ```
//!
//! ## Exit Status
//! - 0: success
//! - 1: invalid bill content or internal error
//! - 2: unreadable file or bad configuration
//! - 3: unassigned line items (`check`, or `split --strict`)

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    tabsplit_cli::run()
}
