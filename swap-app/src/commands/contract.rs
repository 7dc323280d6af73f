//! Drives the contract wizard from an answers file.
//!
//! ```toml
//! conversation_id = "1"
//!
//! [fields]
//! start_date = "2025-06-01"
//! end_date = "2025-08-31"
//! has_read_terms = true
//! ```
//!
//! The conversation prefills participants and properties; `[fields]` then
//! sets or overrides any wizard field by its path.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use swap_core::FieldValue;
use swap_core::contract::{
    ContractFormData, ContractMeta, ContractReview, ContractWizard, DirectorySink, STEP_TITLES, export_contract,
    prefill_form, save_contract, step_errors,
};
use swap_core::forms::{Advance, Completion};
use swap_core::samples::conversation_parties;
use tracing::{debug, info};

use crate::app::App;
use crate::cli::ContractArgs;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Answers {
    pub conversation_id: Option<String>,
    pub fields: toml::Table,
}

impl Answers {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read answers file '{}'", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Failed to parse answers file '{}'", path.display()))
    }
}

fn field_value(
    key: &str,
    value: &toml::Value,
) -> Result<FieldValue> {
    Ok(match value {
        toml::Value::String(s) => FieldValue::Text(s.clone()),
        toml::Value::Integer(i) => FieldValue::Integer(*i),
        toml::Value::Boolean(b) => FieldValue::Flag(*b),
        toml::Value::Float(f) => FieldValue::Number(
            Decimal::try_from(*f).with_context(|| format!("Field '{key}': {f} is not a valid number"))?,
        ),
        other => bail!("Field '{key}': unsupported value type {}", other.type_str()),
    })
}

/// Builds the wizard: prefill from the conversation, apply the configured
/// fee, then every answer in `fields`.
pub fn fill_wizard(
    answers: &Answers,
    conversation_id: Option<&str>,
    configured_fee: Option<Decimal>,
) -> Result<ContractWizard> {
    let form = match conversation_id {
        Some(id) => prefill_form(&conversation_parties(id)),
        None => ContractFormData::default(),
    };
    let mut wizard = ContractWizard::new(form);
    if let Some(fee) = configured_fee {
        wizard.update("platform_fee_percentage", fee)?;
    }
    for (key, value) in &answers.fields {
        wizard
            .update(key, field_value(key, value)?)
            .with_context(|| format!("Invalid answer for '{key}'"))?;
    }
    Ok(wizard)
}

fn report_step(
    wizard: &ContractWizard,
    step: usize,
    out: &mut dyn Write,
) -> Result<()> {
    let title = STEP_TITLES.get(step - 1).copied().unwrap_or("?");
    writeln!(out, "Step {step} ({title}) is incomplete:")?;
    for (field, message) in step_errors(wizard.data(), step).iter() {
        writeln!(out, "  {field}: {message}")?;
    }
    Ok(())
}

/// Advances step by step until the review step, then checks the whole form.
/// Returns the first invalid step, if any.
pub fn walk(wizard: &mut ContractWizard) -> Option<usize> {
    loop {
        match wizard.next() {
            Advance::Moved(step) => debug!(step, "wizard advanced"),
            Advance::Blocked => return Some(wizard.current_step()),
            Advance::AtLastStep => break,
        }
    }
    match wizard.complete() {
        Completion::Ready => None,
        Completion::Incomplete(step) => Some(step),
        Completion::NotAtLastStep => Some(wizard.current_step()),
    }
}

pub async fn run(
    app: &App,
    state: &AppState,
    args: &ContractArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let answers = Answers::load(&args.answers)?;
    let conversation_id = args.conversation.as_deref().or(answers.conversation_id.as_deref());
    let mut wizard = fill_wizard(&answers, conversation_id, app.config.platform_fee_percentage)?;

    if let Some(step) = walk(&mut wizard) {
        report_step(&wizard, step, out)?;
        bail!("Contract is incomplete at step {step}");
    }

    let form = wizard.data();
    write!(out, "{}", ContractReview::new(form))?;

    let mut contract_file = None;
    if args.export {
        let meta = ContractMeta::new(Utc::now());
        let sink = DirectorySink::new(&app.config.export_dir);
        let path = export_contract(form, &meta, &sink).context("Failed to export contract")?;
        writeln!(out, "Contract {} exported to {}", meta.contract_id, path.display())?;
        contract_file = Some(path.display().to_string());
    }

    if args.save {
        let contract = save_contract(&*app.repo, form, &state.user_id, conversation_id, contract_file)
            .await
            .context("Failed to save contract")?;
        info!(contract_id = %contract.id, "contract stored");
        writeln!(out, "Contract saved as {} ({})", contract.id, contract.status.as_str())?;
    }
    Ok(())
}
