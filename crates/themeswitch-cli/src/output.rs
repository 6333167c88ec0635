// Output formatting and styling

use std::{collections::BTreeMap, path::PathBuf};

use colored::Colorize;
use themeswitch_themes::{renderer::resolve_stylesheet, StylesheetLayer};

/// Output styling configuration
#[derive(Debug, Clone, Copy)]
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format info message
    pub fn info(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "ℹ".blue(), msg)
        } else {
            format!("ℹ {}", msg)
        }
    }

    pub fn code(&self, code: &str) -> String {
        if self.use_colors {
            code.cyan().to_string()
        } else {
            code.to_string()
        }
    }

    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// One row per stylesheet layer: the file that would be injected, the
    /// stem when no stylesheet exists for it, or `-` when the layer is absent.
    pub fn layer_table(&self, layers: &BTreeMap<StylesheetLayer, Option<PathBuf>>) -> String {
        let mut table = String::new();
        for layer in StylesheetLayer::ALL {
            let row = match layers.get(&layer).cloned().flatten() {
                Some(stem) => match resolve_stylesheet(&stem) {
                    Some(file) => format!("{:<10} {}", layer.as_str(), self.code(&file.display().to_string())),
                    None => format!("{:<10} {} (no stylesheet)", layer.as_str(), stem.display()),
                },
                None => format!("{:<10} -", layer.as_str()),
            };
            table.push_str(&row);
            table.push('\n');
        }
        table
    }
}

/// Print error message to stderr
pub fn print_error(msg: &str) {
    eprintln!("{}", OutputStyle::default().error(msg));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plain_messages() {
        let style = OutputStyle::plain();
        assert_eq!(style.success("done"), "✓ done");
        assert_eq!(style.error("bad"), "✗ bad");
        assert_eq!(style.warning("hmm"), "⚠ hmm");
        assert_eq!(style.info("fyi"), "ℹ fyi");
        assert_eq!(style.header("Themes"), "Themes");
    }

    #[test]
    fn test_layer_table() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("style.css"), "body {}").unwrap();

        let mut layers = BTreeMap::new();
        layers.insert(StylesheetLayer::Variables, Some(temp.path().join("variables")));
        layers.insert(StylesheetLayer::Style, Some(temp.path().join("style")));
        layers.insert(StylesheetLayer::Fonts, None);

        let table = OutputStyle::plain().layer_table(&layers);
        let rows: Vec<&str> = table.lines().collect();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].starts_with("variables"));
        assert!(rows[0].ends_with("(no stylesheet)"));
        assert_eq!(rows[1], "details    -");
        assert_eq!(rows[2], "fonts      -");
        assert!(rows[3].ends_with("style.css"));
    }
}
