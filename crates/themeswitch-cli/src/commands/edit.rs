// Open a theme's style sheet in an editor

use anyhow::{bail, Result};
use async_trait::async_trait;
use themeswitch_themes::{
    operations::validate_theme_name, Dialog, DialogSink, EditOutcome, FileOpener, SystemOpener,
};

use super::{Command, Context};
use crate::output::OutputStyle;

/// Prints dialogs to stderr
pub struct TerminalDialogs {
    style: OutputStyle,
}

impl TerminalDialogs {
    pub fn new(style: OutputStyle) -> Self {
        Self { style }
    }
}

impl DialogSink for TerminalDialogs {
    fn show_dialog(&self, dialog: Dialog) {
        eprintln!("{}", self.style.error(&dialog.title));
        eprintln!("{}", dialog.text);
        eprintln!("  {}", self.style.code(&dialog.message));
    }
}

/// Create the theme's `style.scss` if needed and open it
pub struct EditCommand {
    name: String,
    opener: Box<dyn FileOpener>,
}

impl EditCommand {
    pub fn new(name: String) -> Self {
        Self {
            name,
            opener: Box::new(SystemOpener),
        }
    }

    pub fn with_opener(mut self, opener: Box<dyn FileOpener>) -> Self {
        self.opener = opener;
        self
    }
}

#[async_trait]
impl Command for EditCommand {
    async fn execute(&self, ctx: &Context) -> Result<()> {
        validate_theme_name(&self.name)?;
        let dialogs = TerminalDialogs::new(ctx.style);

        match ctx
            .extension
            .edit_style(&self.name, self.opener.as_ref(), &dialogs)
            .await
        {
            EditOutcome::Opened(path) => {
                println!(
                    "{}",
                    ctx.style.success(&format!("Opened {}", path.display()))
                );
                Ok(())
            }
            EditOutcome::MissingHandler(_) => Ok(()),
            EditOutcome::Failed(path) => bail!("could not open {}", path.display()),
        }
    }
}
