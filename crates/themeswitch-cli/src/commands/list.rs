// List available themes

use anyhow::Result;
use async_trait::async_trait;

use super::{Command, Context};

/// List every theme, marking the selected one and user themes
pub struct ListCommand;

impl ListCommand {
    async fn rows(ctx: &Context) -> Result<Vec<String>> {
        let operations = ctx.operations();
        let current = ctx.extension.store().current_theme();

        let mut rows = Vec::new();
        for name in operations.read_themes().await? {
            let marker = if current.as_deref() == Some(name.as_str()) {
                "*"
            } else {
                " "
            };
            let tag = if operations.is_theme_custom(&name).await {
                " (custom)"
            } else {
                ""
            };
            rows.push(format!("{} {}{}", marker, name, tag));
        }
        Ok(rows)
    }
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, ctx: &Context) -> Result<()> {
        let rows = Self::rows(ctx).await?;
        if rows.is_empty() {
            let config = ctx.extension.config();
            println!(
                "{}",
                ctx.style.warning(&format!(
                    "No themes found in {} or {}",
                    config.bundled_themes_dir.display(),
                    config.user_themes_dir.display()
                ))
            );
            return Ok(());
        }

        println!("{}", ctx.style.header("Themes"));
        for row in rows {
            println!("{}", row);
        }
        Ok(())
    }
}
