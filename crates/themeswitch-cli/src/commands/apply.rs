// Select or apply a theme

use anyhow::Result;
use async_trait::async_trait;
use themeswitch_themes::ApplyOutcome;
use tracing::debug;

use super::{Command, Context};

/// Persist a new selection and apply it
pub struct SelectCommand {
    name: Option<String>,
}

impl SelectCommand {
    /// `None` clears the selection
    pub fn new(name: Option<String>) -> Self {
        Self { name }
    }
}

#[async_trait]
impl Command for SelectCommand {
    async fn execute(&self, ctx: &Context) -> Result<()> {
        ctx.extension.select_theme(self.name.as_deref())?;
        let message = match &self.name {
            Some(name) => format!("Selected theme '{}'", name),
            None => "Cleared theme selection".to_string(),
        };
        println!("{}", ctx.style.info(&message));

        apply_and_report(ctx, self.name.as_deref()).await?;
        Ok(())
    }
}

/// Apply a theme without changing the stored selection
pub struct ApplyCommand {
    name: String,
}

impl ApplyCommand {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

#[async_trait]
impl Command for ApplyCommand {
    async fn execute(&self, ctx: &Context) -> Result<()> {
        apply_and_report(ctx, Some(&self.name)).await?;
        Ok(())
    }
}

/// Run a full apply, print the resulting layers and wait for the injection
/// check
pub(crate) async fn apply_and_report(ctx: &Context, theme: Option<&str>) -> Result<ApplyOutcome> {
    let applier = ctx.extension.applier();
    let outcome = applier.apply(theme, false).await?;
    debug!(?outcome, "Apply finished");

    match &outcome {
        ApplyOutcome::Applied { theme, directory } => {
            println!(
                "{}",
                ctx.style.success(&format!(
                    "Applied theme '{}' from {}",
                    theme,
                    directory.display()
                ))
            );
            ctx.print_layers();
            match applier.wait_for_verification().await {
                Some(check) if check.succeeded() => println!(
                    "{}",
                    ctx.style.info(&format!(
                        "Verified {} bytes of injected stylesheet content",
                        check.content_length
                    ))
                ),
                Some(check) => println!(
                    "{}",
                    ctx.style.warning(&format!(
                        "No stylesheet content found for '{}'",
                        check.theme
                    ))
                ),
                None => {}
            }
        }
        ApplyOutcome::Cleared => {
            println!("{}", ctx.style.success("Cleared all theme stylesheets"));
            ctx.print_layers();
        }
        ApplyOutcome::NotFound { theme } => {
            println!(
                "{}",
                ctx.style.warning(&format!(
                    "Theme '{}' not found, stylesheets left cleared",
                    theme
                ))
            );
        }
        ApplyOutcome::Superseded { .. } => {
            println!("{}", ctx.style.info("A newer theme change took over"));
        }
    }

    Ok(outcome)
}
