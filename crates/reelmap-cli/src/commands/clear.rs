use super::prompts;
use super::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;

pub fn run_clear(yes: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;

    if !yes {
        let confirmed = prompts::prompt_yes_no_with_output(
            "Delete the imported library, all edits and all added movies?",
            Some(false),
            Some(output),
        )?;
        if !confirmed {
            output.info("Nothing was cleared");
            return Ok(());
        }
    }

    ctx.store
        .clear_all()
        .map_err(|e| eyre!("Failed to clear stored data: {}", e))?;
    output.success(format!("Cleared stored data in {}", ctx.store.store_dir().display()));
    Ok(())
}
