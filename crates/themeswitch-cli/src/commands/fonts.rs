// List font families

use anyhow::Result;
use async_trait::async_trait;
use themeswitch_themes::FcListFonts;

use super::{Command, Context};

pub struct FontsCommand;

#[async_trait]
impl Command for FontsCommand {
    async fn execute(&self, ctx: &Context) -> Result<()> {
        for family in ctx.extension.available_fonts(&FcListFonts).await {
            println!("{}", family);
        }
        Ok(())
    }
}
