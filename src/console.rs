//! Console byte stream: banner, column header, one line per entry.
//!
//! The console is any [`core::fmt::Write`]. Output is fire-and-forget, so
//! write errors are dropped here and never reach the machine.

use core::fmt::Write;

use crate::config::{APP_NAME, APP_URL, APP_VERSION};

pub const COLUMN_HEADER: &str = "size  filename";

pub fn write_banner<W: Write>(console: &mut W) {
    let _ = write!(
        console,
        "\n####################\n# {} v{} ({})\n####################\n",
        APP_NAME, APP_VERSION, APP_URL
    );
}

pub fn write_column_header<W: Write>(console: &mut W) {
    let _ = writeln!(console, "{COLUMN_HEADER}");
}

pub fn write_entry<W: Write>(console: &mut W, size: u32, name: &str, width: u8) {
    let _ = writeln!(console, "{:>width$} {}", size, name, width = width as usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_carries_name_and_version() {
        let mut out = String::new();
        write_banner(&mut out);
        assert!(out.starts_with("\n####################\n"));
        assert!(out.contains(&format!("# winc-imager v{}", env!("CARGO_PKG_VERSION"))));
        assert!(out.ends_with("####################\n"));
    }

    #[test]
    fn entry_size_is_right_justified() {
        let mut out = String::new();
        write_entry(&mut out, 1234, "BOOT.BIN", 10);
        write_entry(&mut out, 0, "empty", 4);
        assert_eq!(out, "      1234 BOOT.BIN\n   0 empty\n");
    }

    #[test]
    fn oversized_numbers_are_not_truncated() {
        let mut out = String::new();
        write_entry(&mut out, u32::MAX, "big", 4);
        assert_eq!(out, "4294967295 big\n");
    }
}
