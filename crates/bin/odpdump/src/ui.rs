/// Print a success message with a green checkmark
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        eprintln!("{} {}", console::style("✓").green().bold(), format!($($arg)*))
    };
}

/// Print a warning message with a yellow warning symbol
#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => {
        eprintln!("{} {}", console::style("⚠").yellow().bold(), format!($($arg)*))
    };
}

/// Print an error message with a red cross, including the full error chain
#[macro_export]
macro_rules! error {
    ($err:expr) => {{
        eprintln!("{} {}", console::style("✗").red().bold(), $err);

        let err_ref = &$err;
        for (i, cause) in err_ref.chain().skip(1).enumerate() {
            let indent = if i == 0 { "  " } else { "    " };
            eprintln!(
                "{indent}{} {}",
                console::style("→").dim(),
                console::style(cause).dim()
            );
        }
    }};
}

/// Print a dimmed detail message (indented)
#[macro_export]
macro_rules! detail {
    ($($arg:tt)*) => {
        eprintln!("  {}", console::style(format!($($arg)*)).dim())
    };
}
