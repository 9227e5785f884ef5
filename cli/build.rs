/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::Write;
use std::path::PathBuf;

fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    // built does not provide a human-readable build date
    let out_dir = std::env::var_os("OUT_DIR").expect("OUT_DIR is not set");
    let path: PathBuf = [out_dir, "built.rs".into()].iter().collect();
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .expect("Failed to open built.rs");
    writeln!(
        file,
        "#[allow(dead_code)]\npub const BUILD_DATE: &str = \"{}\";",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .expect("Failed to write build date");
}
