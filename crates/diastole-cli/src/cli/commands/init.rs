use crate::cli::args::InitArgs;
use crate::exit_codes;
use crate::templates;
use diastole_core::instructions::{CONTINUOUS_FILE, DIASTOLIC_FILE};
use std::path::Path;

pub fn run(args: InitArgs) -> anyhow::Result<i32> {
    std::fs::create_dir_all(&args.dir)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {}", args.dir.display(), e))?;

    let files = [
        ("prompts.json", templates::SAMPLE_PROMPTS_JSON),
        (CONTINUOUS_FILE, templates::CONTINUOUS_INSTRUCTIONS),
        (DIASTOLIC_FILE, templates::DIASTOLIC_INSTRUCTIONS),
        ("conversation.json", templates::SAMPLE_CONVERSATION_JSON),
    ];
    for (name, content) in files {
        write_file(&args.dir.join(name), content, args.force)?;
    }

    println!("Initialization complete. Set OPENAI_API_KEY and run 'diastole run'.");
    Ok(exit_codes::SUCCESS)
}

fn write_file(path: &Path, content: &str, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        println!("   Skipped {} (exists)", path.display());
        return Ok(());
    }
    std::fs::write(path, content)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {}", path.display(), e))?;
    println!("   Created {}", path.display());
    Ok(())
}
