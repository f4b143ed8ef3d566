use super::super::args::VerifyArgs;
use crate::exit_codes;
use diastole_core::prompts::load_prompts;
use diastole_core::report::unblind::{verify_run, VerifyReport};

pub fn run(args: VerifyArgs) -> anyhow::Result<i32> {
    let report = match execute(&args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e:#}");
            return Ok(exit_codes::for_error(&e));
        }
    };

    if report.is_ok() {
        println!(
            "ok: {} prompts verified in {}",
            report.prompts,
            args.out.display()
        );
        return Ok(exit_codes::SUCCESS);
    }

    eprintln!("verification failed ({} problems):", report.problems.len());
    for p in &report.problems {
        eprintln!("  - {}", p);
    }
    Ok(exit_codes::VERIFY_FAILED)
}

fn execute(args: &VerifyArgs) -> anyhow::Result<VerifyReport> {
    let prompts = args.prompts.as_deref().map(load_prompts).transpose()?;
    Ok(verify_run(&args.out, prompts.as_deref())?)
}
