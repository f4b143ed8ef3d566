use super::super::args::ConverseArgs;
use super::runner_builder::{build_caller, run_config};
use crate::exit_codes;
use diastole_core::config::parse_seconds;
use diastole_core::engine::{load_script, run_conversation, write_transcript};
use diastole_core::instructions::Instructions;

pub async fn run(args: ConverseArgs) -> anyhow::Result<i32> {
    match execute(&args).await {
        Ok(turns) => {
            println!(
                "Transcript ({} turns per mode) written to {}",
                turns,
                args.output.display()
            );
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            Ok(exit_codes::for_error(&e))
        }
    }
}

async fn execute(args: &ConverseArgs) -> anyhow::Result<usize> {
    let mut cfg = run_config(&args.provider);
    cfg.sleep = parse_seconds(args.sleep)?;
    cfg.validate()?;

    let script = load_script(&args.script)?;
    let instructions = Instructions::load(&args.instructions_dir)?;
    let caller = build_caller(&cfg)?;

    let transcript = run_conversation(&caller, &script, &instructions, cfg.sleep).await?;
    write_transcript(&args.output, &transcript)?;
    Ok(transcript.turns.len())
}
