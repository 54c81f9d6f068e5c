use crate::infra::{read_json, write_json, ResponsesFile};
use clap::Args;
use harmony::assessment::{score_responses, FormDefinition};
use harmony::error::AppError;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Form definition JSON, including category weights and answer options
    #[arg(long)]
    pub(crate) form: PathBuf,
    /// Response JSON: an array of { questionId, answerOptionId } or { "responses": [...] }
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let form: FormDefinition = read_json(&args.form)?;
    let responses = read_json::<ResponsesFile>(&args.responses)?.into_entries();

    let preview = score_responses(&form, &responses)?;
    info!(
        form_id = %preview.form_id,
        normalized_score = preview.score.normalized_score,
        label = %preview.score.label,
        "responses scored"
    );

    write_json(&preview, args.pretty)
}
