use std::io::Write;

use anyhow::{Context, Result};
use swap_core::ContractStatus;
use swap_core::common::format_euros;
use swap_core::dashboard::{Dashboard, load_dashboard};

use crate::app::App;
use crate::cli::DashboardArgs;
use crate::state::AppState;
use crate::utils::opt_text_display;

const STATUSES: [ContractStatus; 5] = [
    ContractStatus::Draft,
    ContractStatus::Pending,
    ContractStatus::Active,
    ContractStatus::Completed,
    ContractStatus::Terminated,
];

pub fn write_dashboard(
    dashboard: &Dashboard,
    out: &mut dyn Write,
) -> Result<()> {
    match &dashboard.profile {
        Some(p) => {
            writeln!(out, "{} ({})", p.name, p.initials)?;
            writeln!(out, "  Email:    {}", opt_text_display(Some(p.email.as_str())))?;
            writeln!(out, "  Location: {}", p.location)?;
            if !p.languages.is_empty() {
                writeln!(out, "  Speaks:   {}", p.languages.join(", "))?;
            }
            writeln!(out, "  Member since {}", p.member_since.format("%B %Y"))?;
        }
        None => writeln!(out, "No profile yet. Finish onboarding to create one.")?,
    }

    writeln!(out, "\nProperties ({})", dashboard.flats.len())?;
    for flat in &dashboard.flats {
        let rent = flat.rent_amount.map_or_else(|| "—".to_string(), format_euros);
        writeln!(out, "  {} | {} | {rent}", flat.title, opt_text_display(flat.city.as_deref()))?;
    }

    writeln!(out, "\nSearches ({})", dashboard.searches.len())?;
    for search in &dashboard.searches {
        let max_rent = search.max_rent.map_or_else(|| "—".to_string(), format_euros);
        writeln!(
            out,
            "  {} | {} | up to {max_rent}",
            search.title,
            opt_text_display(search.city.as_deref())
        )?;
    }

    writeln!(out, "\nContracts ({})", dashboard.contracts.len())?;
    let counts: Vec<String> = STATUSES
        .iter()
        .map(|&s| (s, dashboard.contracts_with_status(s)))
        .filter(|(_, n)| *n > 0)
        .map(|(s, n)| format!("{n} {}", s.as_str()))
        .collect();
    if !counts.is_empty() {
        writeln!(out, "  {}", counts.join(", "))?;
    }
    for contract in &dashboard.contracts {
        writeln!(
            out,
            "  {} with {} [{}]",
            contract.title,
            contract.other_party,
            contract.status.as_str()
        )?;
    }
    Ok(())
}

pub async fn run(
    app: &App,
    state: &AppState,
    args: &DashboardArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let user_id = args.user.as_deref().unwrap_or(&state.user_id);
    let dashboard = load_dashboard(&*app.repo, user_id, state.email.as_deref())
        .await
        .with_context(|| format!("Failed to load dashboard for '{user_id}'"))?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &dashboard).context("Failed to write dashboard JSON")?;
        writeln!(out)?;
        return Ok(());
    }
    write_dashboard(&dashboard, out)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use swap_core::samples::sample_contract_summaries;

    use super::*;

    #[test]
    fn empty_dashboard_prompts_for_onboarding() {
        let dashboard = Dashboard {
            profile: None,
            flats: vec![],
            searches: vec![],
            contracts: vec![],
        };
        let mut out = Vec::new();

        write_dashboard(&dashboard, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("No profile yet."));
        assert!(text.contains("Properties (0)"));
    }

    #[test]
    fn contracts_are_counted_by_status() {
        let contracts = sample_contract_summaries(Utc::now());
        let total = contracts.len();
        let dashboard = Dashboard {
            profile: None,
            flats: vec![],
            searches: vec![],
            contracts,
        };
        let mut out = Vec::new();

        write_dashboard(&dashboard, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("Contracts ({total})")));
        let listed = text.lines().filter(|l| l.contains(" with ")).count();
        assert_eq!(listed, total);
    }
}
