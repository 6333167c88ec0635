// Clone, remove and edit the variables of user themes

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use themeswitch_storage::default_theme;

use super::{apply::apply_and_report, Command, Context};

/// Copy a theme into the user root, select and apply the copy
pub struct CloneCommand {
    source: String,
    name: String,
}

impl CloneCommand {
    pub fn new(source: String, name: String) -> Self {
        Self { source, name }
    }
}

#[async_trait]
impl Command for CloneCommand {
    async fn execute(&self, ctx: &Context) -> Result<()> {
        let target = ctx.operations().clone_theme(&self.source, &self.name).await?;
        println!(
            "{}",
            ctx.style.success(&format!(
                "Cloned '{}' to {}",
                self.source,
                target.display()
            ))
        );

        apply_and_report(ctx, Some(&self.name)).await?;
        Ok(())
    }
}

/// Delete a user theme
pub struct RemoveCommand {
    name: String,
}

impl RemoveCommand {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

#[async_trait]
impl Command for RemoveCommand {
    async fn execute(&self, ctx: &Context) -> Result<()> {
        ctx.operations().remove_theme(&self.name).await?;
        println!(
            "{}",
            ctx.style.success(&format!("Removed theme '{}'", self.name))
        );
        println!(
            "{}",
            ctx.style
                .info(&format!("Selected default theme '{}'", default_theme()))
        );
        Ok(())
    }
}

/// Print a theme's variables, saving any `KEY=VALUE` assignments first
pub struct VarsCommand {
    name: String,
    assignments: Vec<String>,
}

impl VarsCommand {
    pub fn new(name: String, assignments: Vec<String>) -> Self {
        Self { name, assignments }
    }
}

#[async_trait]
impl Command for VarsCommand {
    async fn execute(&self, ctx: &Context) -> Result<()> {
        let operations = ctx.operations();
        let mut variables = operations.read_theme_variables(&self.name).await?;

        if !self.assignments.is_empty() {
            for raw in &self.assignments {
                let (key, value) = parse_assignment(raw)?;
                variables.insert(key, value);
            }
            operations.save_theme(&self.name, &variables).await?;
            println!(
                "{}",
                ctx.style.success(&format!(
                    "Saved {} variables to {}",
                    variables.len(),
                    operations.theme_path(&self.name).display()
                ))
            );
        }

        for (key, value) in &variables {
            println!("${}: {}", ctx.style.code(key), value);
        }
        Ok(())
    }
}

/// Split `KEY=VALUE`; a leading `$` on the key is dropped
fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim().trim_start_matches('$');
    if key.is_empty() {
        bail!("missing variable name in '{}'", raw);
    }
    Ok((key.to_string(), value.trim().to_string()))
}
