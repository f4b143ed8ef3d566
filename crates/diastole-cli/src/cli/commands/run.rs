use super::super::args::RunArgs;
use super::runner_builder::{ensure_dir, run_config};
use crate::exit_codes;
use diastole_core::config::parse_seconds;
use diastole_core::engine::{ExperimentRunner, RunSummary};
use diastole_core::instructions::Instructions;
use diastole_core::prompts::load_prompts;
use diastole_core::providers::build_client;
use diastole_core::report::console::print_run_footer;

pub(crate) async fn run(args: RunArgs) -> anyhow::Result<i32> {
    match execute(args).await {
        Ok(summary) => {
            print_run_footer(&summary);
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            Ok(exit_codes::for_error(&e))
        }
    }
}

async fn execute(args: RunArgs) -> anyhow::Result<RunSummary> {
    let mut cfg = run_config(&args.provider);
    cfg.seed = args.seed;
    cfg.sleep = parse_seconds(args.sleep)?;
    cfg.failure_policy = args.on_error.into();
    cfg.prompts_path = args.prompts;
    cfg.instructions_dir = args.instructions_dir;
    cfg.out_dir = args.out;
    cfg.validate()?;
    tracing::debug!(
        provider = cfg.provider.as_str(),
        model = %cfg.model,
        seed = cfg.seed,
        out = %cfg.out_dir.display(),
        "run configuration"
    );

    let prompts = load_prompts(&cfg.prompts_path)?;
    let instructions = Instructions::load(&cfg.instructions_dir)?;
    let client = build_client(&cfg)?;
    ensure_dir(&cfg.out_dir)?;

    let runner = ExperimentRunner::new(cfg, client).with_progress(!args.quiet);
    Ok(runner.run(&prompts, &instructions).await?)
}
