// Show the selected theme and its startup layers

use anyhow::Result;
use async_trait::async_trait;
use themeswitch_themes::operations::supplied_layers;

use super::{Command, Context};

/// Show the selected theme as the application would apply it on startup
pub struct ShowCommand;

#[async_trait]
impl Command for ShowCommand {
    async fn execute(&self, ctx: &Context) -> Result<()> {
        let Some(theme) = ctx.extension.store().current_theme() else {
            println!("{}", ctx.style.info("No theme selected"));
            return Ok(());
        };

        println!("{}", ctx.style.header(&format!("Current theme: {}", theme)));
        ctx.extension.applier().apply_sync(Some(&theme));
        ctx.print_layers();

        match ctx.extension.applier().registry().lookup(&theme).await? {
            Some(resolved) if resolved.is_custom() => {
                println!(
                    "{}",
                    ctx.style.info(&format!(
                        "User theme at {} replaces these layers once startup completes",
                        resolved.path().display()
                    ))
                );
            }
            Some(resolved) => {
                let supplied: Vec<&str> = supplied_layers(resolved.path())
                    .into_iter()
                    .map(|layer| layer.as_str())
                    .collect();
                println!(
                    "{}",
                    ctx.style
                        .info(&format!("Stylesheets supplied: {}", supplied.join(", ")))
                );
            }
            None => {
                println!(
                    "{}",
                    ctx.style
                        .warning(&format!("No theme directory named '{}' was found", theme))
                );
            }
        }
        Ok(())
    }
}
