use core::fmt;

/// Console text goes straight to the UART, without the logger's prefix.
pub(crate) struct SerialConsole;

impl fmt::Write for SerialConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        esp_println::print!("{}", s);
        Ok(())
    }
}
